//! Static file serving.
//!
//! The stylesheet is compiled into the binary.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::state::AppState;

const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Create router for `/static/*`.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().route("/static/{*path}", get(serve_asset))
}

/// Look up an embedded asset and its MIME type.
fn asset(path: &str) -> Option<(&'static str, &'static str)> {
    match path {
        "style.css" => Some((STYLE_CSS, "text/css; charset=utf-8")),
        _ => None,
    }
}

async fn serve_asset(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Response {
    let Some((content, mime)) = asset(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let cache_control = if state.no_cache {
        "no-cache, no-store, must-revalidate"
    } else {
        "public, max-age=3600"
    };

    let mut response = (
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, cache_control),
        ],
        content,
    )
        .into_response();
    if state.no_cache {
        let headers = response.headers_mut();
        headers.insert(header::PRAGMA, header::HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, header::HeaderValue::from_static("0"));
    }
    response
}
