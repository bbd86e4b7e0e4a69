//! # Axum Helpers
//!
//! Shared building blocks for the storefront's Axum services.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT verification and role guards
//! - **[`errors`]**: Uniform error payload and status mapping
//! - **[`extractors`]**: UUID path, validated JSON and pagination extractors
//! - **[`pagination`]**: Page requests and the paged response envelope
//! - **[`server`]**: Router setup, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), config.request_timeout())?;
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod pagination;
pub mod server;

// Re-export auth types
pub use auth::{
    AccessRule, Admin, Authorized, JwtAuth, JwtClaims, JwtConfig, ReadAccess, Reader, Staff,
    optional_jwt_auth_middleware,
};

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse, FieldMessage};

// Re-export extractors
pub use extractors::{PageQuery, UuidPath, ValidatedJson};

// Re-export pagination types
pub use pagination::{Direction, Page, PageParams, PageRequest};
