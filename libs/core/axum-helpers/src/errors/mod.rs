pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;
pub use handlers::{not_found, stamp_error_path};

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// One invalid request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// Standard error payload returned for every failure.
///
/// `path` is filled in by [`stamp_error_path`]; responses produced outside
/// that middleware carry an empty path.
///
/// # JSON Example
///
/// ```json
/// {
///   "timestamp": "2025-06-01T12:00:00Z",
///   "status": 400,
///   "error": "VALIDATION_ERROR",
///   "message": "Validation failed",
///   "path": "/api/products",
///   "errors": [{ "field": "name", "message": "Length must be between 3 and 60" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    /// HTTP status code
    pub status: u16,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Request path that produced the error
    pub path: String,
    /// Field-level failures, present only for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldMessage>>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: code.to_string(),
            message: message.into(),
            path: String::new(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldMessage>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own errors into this type; it is the single
/// place where failures are mapped to status codes and rendered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldMessage>),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Data conflict: {0}")]
    DataConflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldMessage> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldMessage {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

impl AppError {
    /// Status code and error code this failure renders as.
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::JsonExtractorRejection(JsonRejection::MissingJsonContentType(_)) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorCode::UnsupportedMediaType,
            ),
            AppError::JsonExtractorRejection(_)
            | AppError::QueryExtractorRejection(_)
            | AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::DataConflict(_) => (StatusCode::BAD_REQUEST, ErrorCode::DataConflict),
            AppError::InvalidArgument(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidArgument,
            ),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let (message, errors) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "Query extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::Validation(fields) => {
                tracing::info!(error_code = code.code(), ?fields, "Validation error");
                (code.default_message().to_string(), Some(fields))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (code.default_message().to_string(), None)
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::DataConflict(msg)
            | AppError::InvalidArgument(msg) => {
                tracing::info!(error_code = code.code(), "{}: {}", code, msg);
                (msg, None)
            }
        };

        let mut body = ErrorResponse::new(status, code, message);
        body.errors = errors;

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::DataConflict("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::InvalidArgument("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                AppError::InternalServerError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.classify().0, expected, "{error}");
        }
    }

    #[tokio::test]
    async fn test_data_conflict_payload() {
        let response = AppError::DataConflict("Integrity violation".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorResponse>().is_some());

        let body = body_of(response).await;
        assert_eq!(body.status, 400);
        assert_eq!(body.error, "DATA_CONFLICT");
        assert_eq!(body.message, "Integrity violation");
        assert_eq!(body.path, "");
        assert!(body.errors.is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let response =
            AppError::InternalServerError("connection reset by peer".into()).into_response();
        let body = body_of(response).await;
        assert_eq!(body.error, "INTERNAL_ERROR");
        assert!(!body.message.contains("connection reset"));
    }

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 3, message = "Too short"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[tokio::test]
    async fn test_validation_errors_become_field_messages() {
        let input = Input {
            name: "ab".into(),
            email: "nope".into(),
        };
        let error: AppError = input.validate().unwrap_err().into();

        let body = body_of(error.into_response()).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
        let errors = body.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[0].message, "Invalid value (email)");
        assert_eq!(
            errors[1],
            FieldMessage {
                field: "name".into(),
                message: "Too short".into()
            }
        );
    }
}
