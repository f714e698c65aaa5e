//! Page-view endpoints.
//!
//! Rendering failures degrade inline: the page is still served with 200 and
//! the error placeholder as its content.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::constants::{APP_NAME, HOME_PAGE};
use crate::error::ServerError;
use crate::handlers::log_warnings;
use crate::state::AppState;
use crate::templates;

/// Title used by `/render` when none is given.
const DEFAULT_RENDER_TITLE: &str = "Document";

fn render_full_page(state: &AppState, source: &str, title: &str) -> Html<String> {
    let page = state.pipeline.render_page(source, title);
    log_warnings(title, &page.outcome);
    Html(templates::page(&page.title, &page.outcome.html, APP_NAME))
}

/// Handle GET /.
pub(crate) async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    tracing::debug!("Home page requested");
    render_full_page(&state, HOME_PAGE, "Home")
}

/// Handle GET /d/{id}.
pub(crate) async fn document(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let Some(document) = state.store.get_document(&id).await? else {
        tracing::warn!(id = %id, "Document not found");
        return Ok((StatusCode::NOT_FOUND, Html(templates::not_found(&id, APP_NAME))).into_response());
    };

    Ok(render_full_page(&state, &document.content, &document.title).into_response())
}

/// Handle GET /raw/{id}. The stored markdown is returned untouched.
pub(crate) async fn raw(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let Some(document) = state.store.get_document(&id).await? else {
        tracing::warn!(id = %id, "Raw document not found");
        return Ok((
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Document not found",
        )
            .into_response());
    };

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        document.content,
    )
        .into_response())
}

/// Query parameters for GET /render.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RenderQuery {
    #[serde(default)]
    md: String,
    title: Option<String>,
}

/// Handle GET /render?md=&title=.
pub(crate) async fn render(
    Query(query): Query<RenderQuery>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let title = query.title.as_deref().unwrap_or(DEFAULT_RENDER_TITLE);
    render_full_page(&state, &query.md, title)
}

/// Handle GET /health and GET /api/health.
pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
