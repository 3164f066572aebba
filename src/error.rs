use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                // Raw technical detail stays in the logs, never in the response
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not calculate the route. Please check the addresses and try again."
                        .to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Last resort for a panic escaping a handler: the whole calculation
/// fails with the same generic message as any other internal error,
/// never a partial result or a raw panic payload.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_hides_technical_detail() {
        let response = AppError::Internal("osrm exploded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let text = body_text(response).await;
        assert!(text.contains("Could not calculate the route"));
        assert!(!text.contains("osrm"));
    }

    #[tokio::test]
    async fn test_bad_request_keeps_its_message() {
        let response =
            AppError::BadRequest("Please enter both starting address and destination.".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let text = body_text(response).await;
        assert!(text.contains("Please enter both starting address and destination."));
    }

    #[tokio::test]
    async fn test_panic_maps_to_generic_failure() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let text = body_text(response).await;
        assert!(text.contains("Could not calculate the route"));
        assert!(!text.contains("boom"));
    }
}
