use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A missing, invalid, or expired credential/session.
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    /// A valid identity without access to the requested course.
    #[error("Not entitled")]
    NotEntitled,

    /// A malformed request field or unsupported provider.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The resolved reference is not a playable video.
    #[error("Unsupported content: {mime_type}")]
    UnsupportedContent { name: String, mime_type: String },

    /// The upstream store substituted a non-media payload for video bytes.
    #[error("Upstream contract violation: {content_type}")]
    UpstreamContract { content_type: String },

    /// An upstream request that failed before any bytes were streamed.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthenticated(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, sonic_rs::json!({ "error": msg }))
            }

            AppError::NotEntitled => {
                tracing::warn!("Entitlement check failed");
                (
                    StatusCode::FORBIDDEN,
                    sonic_rs::json!({ "error": "Not enrolled in this course" }),
                )
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, sonic_rs::json!({ "error": msg }))
            }

            AppError::UnsupportedContent {
                ref name,
                ref mime_type,
            } => {
                tracing::warn!("Unsupported content for {}: {}", name, mime_type);
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    sonic_rs::json!({
                        "error": "Lesson media is not a playable video",
                        "name": name,
                        "mimeType": mime_type,
                    }),
                )
            }

            AppError::UpstreamContract { ref content_type } => {
                tracing::error!("Upstream returned a non-media payload: {}", content_type);
                (
                    StatusCode::BAD_GATEWAY,
                    sonic_rs::json!({
                        "error": "Upstream returned a non-media payload where video bytes were expected",
                        "contentType": content_type,
                    }),
                )
            }

            AppError::Upstream(ref e) => {
                tracing::error!("Upstream request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    sonic_rs::json!({ "error": "Upstream request failed" }),
                )
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    sonic_rs::json!({ "error": "Internal server error" }),
                )
            }
        };

        let body = sonic_rs::to_string(&body)
            .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
