//! Machine-readable error identifiers.
//!
//! The identifier is what clients match on (`error` in the payload). The
//! numeric code only appears in logs, so two identifiers may share a name
//! while staying distinguishable there.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::DataConflict.to_string(), "DATA_CONFLICT");
//! assert_eq!(ErrorCode::UnsupportedMediaType.to_string(), "BAD_REQUEST");
//! ```

use serde::Serialize;
use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(into = "&'static str")]
pub enum ErrorCode {
    /// Request fields failed validation
    ValidationError,
    /// Malformed body, path or query string
    BadRequest,
    /// The resource, or one it references, does not exist
    NotFound,
    /// Deleting a record that others still reference
    DataConflict,
    /// Business rule violation such as a taken email
    InvalidArgument,
    Unauthorized,
    Forbidden,
    /// Body not declared as JSON; reported to clients as a bad request
    #[strum(serialize = "BAD_REQUEST")]
    UnsupportedMediaType,
    InternalError,
}

impl ErrorCode {
    /// Numeric code for structured logs: 1xxx client, 5xxx server.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::BadRequest => 1002,
            Self::NotFound => 1004,
            Self::DataConflict => 1005,
            Self::InvalidArgument => 1006,
            Self::Unauthorized => 1007,
            Self::Forbidden => 1008,
            Self::UnsupportedMediaType => 1009,
            Self::InternalError => 5001,
        }
    }

    /// Message used when the failure carries none of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation failed",
            Self::BadRequest => "Malformed request",
            Self::NotFound => "Resource not found",
            Self::DataConflict => "Integrity violation",
            Self::InvalidArgument => "Invalid argument",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access denied",
            Self::UnsupportedMediaType => "Expected request with `Content-Type: application/json`",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCode::InvalidArgument.to_string(), "INVALID_ARGUMENT");
        assert_eq!(ErrorCode::InternalError.to_string(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_media_type_shares_bad_request_identifier_only() {
        assert_eq!(
            ErrorCode::UnsupportedMediaType.to_string(),
            ErrorCode::BadRequest.to_string()
        );
        assert_ne!(
            ErrorCode::UnsupportedMediaType.code(),
            ErrorCode::BadRequest.code()
        );
    }

    #[test]
    fn test_serializes_as_identifier() {
        let json = serde_json::to_string(&ErrorCode::DataConflict).unwrap();
        assert_eq!(json, "\"DATA_CONFLICT\"");
    }
}
