//! Shared application state handed to the routers.

use axum_helpers::JwtAuth;

/// Cloned into each router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Verifies bearer tokens
    pub jwt_auth: JwtAuth,
}
