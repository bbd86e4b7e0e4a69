//! Authentication and authorization.
//!
//! - Stateless HS256 JWT verification ([`JwtAuth`])
//! - An optional middleware that attaches verified [`JwtClaims`] to requests
//! - Role guards ([`Authorized`], [`Reader`]) used as handler extractors
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{Admin, Authorized, JwtAuth, JwtConfig, optional_jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! async fn purge(_: Authorized<Admin>) -> &'static str { "done" }
//!
//! let app = Router::new()
//!     .route("/purge", post(purge))
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod config;
pub mod guard;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::{JwtConfig, ReadAccess};
pub use guard::{AccessRule, Admin, Authorized, Reader, Staff};
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::optional_jwt_auth_middleware;
