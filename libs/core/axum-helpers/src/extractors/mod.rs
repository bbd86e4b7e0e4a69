//! Custom extractors for Axum handlers.
//!
//! Every rejection is an [`AppError`](crate::errors::AppError), so failures
//! render as the uniform error payload.

pub mod page_query;
pub mod uuid_path;
pub mod validated_json;

pub use page_query::PageQuery;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
