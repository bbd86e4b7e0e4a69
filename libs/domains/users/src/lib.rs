//! Users Domain
//!
//! Staff accounts and their roles. Emails are unique (case-insensitive),
//! passwords are stored as Argon2 hashes and never returned, and roles are
//! the two seeded authorities `ROLE_OPERATOR` and `ROLE_ADMIN`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{
    CreateUser, ROLE_ADMIN, ROLE_OPERATOR, Reference, Role, UpdateUser, User, UserResponse,
    UserSort,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
