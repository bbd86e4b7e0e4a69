use axum::{
    Json,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AppError, ErrorResponse};

/// Fallback handler for unknown routes.
pub async fn not_found() -> Response {
    AppError::NotFound("The requested resource was not found".to_string()).into_response()
}

/// Fills the `path` of error payloads rendered by [`AppError`].
///
/// Apply it as the outermost routing layer so the path includes any
/// `/api` prefix the inner routers were nested under.
pub async fn stamp_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorResponse>() {
        Some(mut body) => {
            body.path = path;
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn missing() -> Result<&'static str, AppError> {
        Err(AppError::NotFound("Product not found".into()))
    }

    fn app() -> Router {
        Router::new()
            .nest("/api", Router::new().route("/products/{id}", get(missing)))
            .route("/ok", get(|| async { "ok" }))
            .fallback(not_found)
            .layer(middleware::from_fn(stamp_error_path))
    }

    #[tokio::test]
    async fn test_path_is_stamped_with_full_uri() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/products/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.path, "/api/products/42");
        assert_eq!(body.message, "Product not found");
    }

    #[tokio::test]
    async fn test_fallback_is_uniform_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.path, "/nowhere");
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }
}
