//! JSON API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use mds_store::{DEFAULT_TITLE, Document};
use serde::{Deserialize, Serialize};

use crate::auth::ApiKeyAuth;
use crate::error::ServerError;
use crate::handlers::log_warnings;
use crate::state::AppState;

/// Body for POST /api/new. Missing or null fields take their defaults.
#[derive(Debug, Deserialize)]
struct NewDocumentRequest {
    title: Option<String>,
    content: Option<String>,
}

/// Response for POST /api/new.
#[derive(Debug, Serialize)]
pub(crate) struct NewDocumentResponse {
    id: String,
    title: String,
    content: String,
    created_at: String,
}

impl From<Document> for NewDocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            title: document.title,
            content: document.content,
            created_at: document.created_at.to_rfc3339(),
        }
    }
}

/// Handle POST /api/new.
pub(crate) async fn new_document(
    State(state): State<Arc<AppState>>,
    ApiKeyAuth(key): ApiKeyAuth,
    body: Bytes,
) -> Result<Json<NewDocumentResponse>, ServerError> {
    let request: NewDocumentRequest = serde_json::from_slice(&body)?;
    let title = request.title.as_deref().unwrap_or(DEFAULT_TITLE);
    let content = request.content.as_deref().unwrap_or_default();

    let document = state
        .store
        .create_document(title, content)
        .await
        .map_err(ServerError::CreateDocument)?;
    tracing::info!(id = %document.id, api_key = %key.hash, "Document created");
    Ok(Json(document.into()))
}

/// Body for POST /render-embed.
#[derive(Debug, Deserialize)]
struct EmbedRequest {
    #[serde(default)]
    md: String,
}

/// Handle POST /render-embed.
///
/// Returns the sanitized fragment only. Unlike the page endpoints, a failed
/// render is reported as an error.
pub(crate) async fn render_embed(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Html<String>, ServerError> {
    let request: EmbedRequest = serde_json::from_slice(&body)?;
    let outcome = state.pipeline.render_embed(&request.md);
    log_warnings("embed", &outcome);
    if outcome.is_failed() {
        return Err(ServerError::Render);
    }
    Ok(Html(outcome.html))
}
