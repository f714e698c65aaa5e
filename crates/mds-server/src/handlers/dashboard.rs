//! Dashboard endpoints for users authenticated by the identity proxy.

use axum::Json;
use axum::response::Html;
use serde::Serialize;

use crate::auth::{DashboardUser, KnownUser};
use crate::constants::APP_NAME;
use crate::templates;

/// Response for GET /dash/status.
#[derive(Debug, Serialize)]
pub(crate) struct StatusResponse {
    authenticated: bool,
    user_id: String,
    username: Option<String>,
}

/// Handle GET /dash/.
pub(crate) async fn home(DashboardUser(user): DashboardUser) -> Html<String> {
    tracing::info!(user_id = %user.id, "Dashboard requested");
    Html(templates::dashboard(&user, APP_NAME))
}

/// Handle GET /dash/status.
pub(crate) async fn status(KnownUser(user): KnownUser) -> Json<StatusResponse> {
    tracing::info!(user_id = %user.id, "Authentication status requested");
    Json(StatusResponse {
        authenticated: true,
        user_id: user.id,
        username: user.name,
    })
}
