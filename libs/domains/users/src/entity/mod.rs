//! SeaORM entities for users, roles and their join table.

pub mod role;
pub mod user;
pub mod user_role;
