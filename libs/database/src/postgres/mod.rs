//! PostgreSQL connections, migrations, health checks and constraint handling.

mod config;
mod connector;
mod constraint;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry, run_migrations};
pub use constraint::{ConstraintViolation, constraint_violation};
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
