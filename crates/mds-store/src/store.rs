//! Stored entities and the [`DocumentStore`] trait.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::error::StoreError;

/// Title given to documents created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// A stored markdown document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// UUIDv4 string.
    pub id: String,
    pub title: String,
    /// Raw markdown, stored byte-for-byte.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// An API key record. Only the SHA-256 digest of the key is kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiKey {
    /// Hex SHA-256 of the plaintext key.
    pub hash: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One authenticated API call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiUsage {
    /// Hash of the key that made the call.
    pub api_key: String,
    /// Request path.
    pub endpoint: String,
    pub client_ip: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A dashboard user known through the identity proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    /// UUIDv4 string.
    pub id: String,
    /// Hex SHA-256 of the identity provider uid.
    pub uid_sha256: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persistence for documents, API keys, usage logs and users.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by ID. Unknown IDs yield `Ok(None)`.
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Store a new document under a fresh UUIDv4.
    async fn create_document(&self, title: &str, content: &str) -> Result<Document, StoreError>;

    /// Remove a document. Returns whether it existed.
    async fn delete_document(&self, id: &str) -> Result<bool, StoreError>;

    /// Record a new API key by its hash.
    async fn create_api_key(
        &self,
        hash: &str,
        description: Option<&str>,
    ) -> Result<ApiKey, StoreError>;

    /// Look up an API key by its hash.
    async fn find_api_key(&self, hash: &str) -> Result<Option<ApiKey>, StoreError>;

    /// All API keys, oldest first.
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StoreError>;

    /// Append a usage record for an authenticated call.
    async fn log_api_usage(
        &self,
        api_key: &str,
        endpoint: &str,
        client_ip: Option<&str>,
    ) -> Result<ApiUsage, StoreError>;

    /// Look up a user by the hash of their identity provider uid.
    async fn find_user(&self, uid_sha256: &str) -> Result<Option<User>, StoreError>;

    /// Create a user for the given uid hash.
    async fn create_user(&self, uid_sha256: &str, name: Option<&str>)
    -> Result<User, StoreError>;
}

/// Current time at the precision the stores persist.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
