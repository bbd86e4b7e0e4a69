//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 500,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred",
        "path": "/api/products"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 400,
        "error": "VALIDATION_ERROR",
        "message": "Validation failed",
        "path": "/api/products",
        "errors": [
            { "field": "name", "message": "Length must be between 3 and 60" }
        ]
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Referenced by another record",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 400,
        "error": "DATA_CONFLICT",
        "message": "Integrity violation",
        "path": "/api/categories/0197a0b2-5c1e-7d2a-9f4b-1e2d3c4b5a69"
    })
)]
pub struct DataConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 404,
        "error": "NOT_FOUND",
        "message": "Product not found",
        "path": "/api/products/0197a0b2-5c1e-7d2a-9f4b-1e2d3c4b5a69"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unprocessable Entity - Business rule violated",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 422,
        "error": "INVALID_ARGUMENT",
        "message": "Email already registered",
        "path": "/api/users"
    })
)]
pub struct InvalidArgumentResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - Authentication required",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 401,
        "error": "UNAUTHORIZED",
        "message": "Authentication required",
        "path": "/api/users"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Forbidden - Insufficient permissions",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-06-01T12:00:00Z",
        "status": 403,
        "error": "FORBIDDEN",
        "message": "Access denied",
        "path": "/api/users"
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);
