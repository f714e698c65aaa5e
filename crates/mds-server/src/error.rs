//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request lacks valid credentials.
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    /// Request body could not be parsed.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Document could not be saved.
    #[error("Failed to create document: {0}")]
    CreateDocument(#[source] mds_store::StoreError),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Store(#[from] mds_store::StoreError),

    /// Rendering pipeline failed on an endpoint that does not degrade inline.
    #[error("Render failed")]
    Render,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Forbidden(detail) => (StatusCode::FORBIDDEN, *detail),
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
            Self::CreateDocument(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create document")
            }
            Self::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Self::Render => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error rendering markdown content.",
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServerError::Forbidden("API key required").into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::Render.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ServerError::from(parse_err).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_render_message_matches_placeholder() {
        assert_eq!(
            mds_renderer::RENDER_ERROR_HTML,
            "<p>Error rendering markdown content.</p>"
        );
    }
}
