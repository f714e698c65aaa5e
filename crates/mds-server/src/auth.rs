//! Request authentication extractors.
//!
//! API endpoints authenticate with the `X-API-KEY` header. Dashboard
//! endpoints trust the identity proxy headers (`X-authentik-uid`,
//! `X-authentik-username`); uids are only stored as SHA-256 digests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use mds_store::{ApiKey, User, hash_secret};

use crate::constants::{API_KEY_HEADER, USER_ID_HEADER, USER_NAME_HEADER};
use crate::error::ServerError;
use crate::state::AppState;

/// A verified API key. Extracting it records an `ApiUsage` entry.
pub(crate) struct ApiKeyAuth(pub(crate) ApiKey);

impl FromRequestParts<Arc<AppState>> for ApiKeyAuth {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let client_ip = client_ip(parts);
        let Some(key) = header_str(parts, API_KEY_HEADER).filter(|k| !k.is_empty()) else {
            tracing::warn!(client_ip = ?client_ip, "No API key provided");
            return Err(ServerError::Forbidden("API key required"));
        };

        let hash = hash_secret(key);
        let Some(record) = state.store.find_api_key(&hash).await? else {
            tracing::warn!(client_ip = ?client_ip, "Invalid API key attempt");
            return Err(ServerError::Forbidden("Invalid API key"));
        };

        state
            .store
            .log_api_usage(&hash, parts.uri.path(), client_ip.as_deref())
            .await?;
        tracing::info!(client_ip = ?client_ip, endpoint = %parts.uri.path(), "API key verified");
        Ok(Self(record))
    }
}

/// Dashboard user, created on first visit when `auth.create_users` is on.
pub(crate) struct DashboardUser(pub(crate) User);

impl FromRequestParts<Arc<AppState>> for DashboardUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        verify_user(parts, state, state.create_users).await.map(Self)
    }
}

/// Dashboard user that must already exist.
pub(crate) struct KnownUser(pub(crate) User);

impl FromRequestParts<Arc<AppState>> for KnownUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        verify_user(parts, state, false).await.map(Self)
    }
}

async fn verify_user(
    parts: &Parts,
    state: &AppState,
    create: bool,
) -> Result<User, ServerError> {
    if state.auth_disabled {
        tracing::warn!("Authenticated endpoints are disabled");
        return Err(ServerError::Forbidden("Authenticated endpoints are disabled"));
    }

    let Some(uid) = header_str(parts, USER_ID_HEADER).filter(|u| !u.is_empty()) else {
        tracing::warn!("No identity provider uid provided");
        return Err(ServerError::Forbidden("User authentication required"));
    };

    let uid_sha256 = hash_secret(uid);
    if let Some(user) = state.store.find_user(&uid_sha256).await? {
        tracing::debug!(user_id = %user.id, "User authenticated");
        return Ok(user);
    }

    if !create {
        tracing::warn!(uid_sha256 = %uid_sha256, "User not recognized");
        return Err(ServerError::Forbidden("User not recognized"));
    }

    let name = header_str(parts, USER_NAME_HEADER);
    Ok(state.store.create_user(&uid_sha256, name).await?)
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}
