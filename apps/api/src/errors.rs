use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::LayoutError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Layout(LayoutError::Photo(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PHOTO_UNREADABLE",
                msg.clone(),
            ),
            AppError::Layout(e @ LayoutError::FontUnavailable { .. }) => {
                tracing::error!("Font error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FONT_UNAVAILABLE",
                    "The configured font could not be loaded".to_string(),
                )
            }
            AppError::Layout(e @ LayoutError::Pdf(_)) => {
                tracing::error!("PDF error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF_ERROR",
                    "The document could not be written".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let response = AppError::Validation("accent_color must be #rrggbb".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "accent_color must be #rrggbb");
    }

    #[tokio::test]
    async fn test_photo_error_is_unprocessable() {
        let response = AppError::from(LayoutError::Photo("bad png".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "PHOTO_UNREADABLE");
    }

    #[tokio::test]
    async fn test_font_error_hides_path() {
        let err = LayoutError::FontUnavailable {
            path: "/secret/fonts/a.ttf".into(),
            reason: "missing".into(),
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "FONT_UNAVAILABLE");
        assert!(!body["error"]["message"].as_str().unwrap().contains("/secret"));
    }
}
