//! In-memory store for tests.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreErrorKind};
use crate::store::{ApiKey, ApiUsage, Document, DocumentStore, User, new_id, now};

#[derive(Debug, Default)]
struct Tables {
    documents: HashMap<String, Document>,
    api_keys: Vec<ApiKey>,
    usage: Vec<ApiUsage>,
    users: Vec<User>,
}

/// Store keeping everything in process memory.
///
/// Use the builder methods to seed test data.
///
/// # Example
///
/// ```
/// use mds_store::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_document("doc-1", "Guide", "# Guide")
///     .with_api_key("deadbeef");
/// assert_eq!(store.usage().len(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document with a fixed ID.
    #[must_use]
    pub fn with_document(
        self,
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            let id = id.into();
            tables.documents.insert(
                id.clone(),
                Document {
                    id,
                    title: title.into(),
                    content: content.into(),
                    created_at: now(),
                },
            );
        }
        self
    }

    /// Seed an API key by its hash.
    #[must_use]
    pub fn with_api_key(self, hash: impl Into<String>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.api_keys.push(ApiKey {
                hash: hash.into(),
                description: None,
                created_at: now(),
            });
        }
        self
    }

    /// Seed a user by uid hash.
    #[must_use]
    pub fn with_user(self, uid_sha256: impl Into<String>, name: Option<&str>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.users.push(User {
                id: new_id(),
                uid_sha256: uid_sha256.into(),
                name: name.map(str::to_owned),
                created_at: now(),
            });
        }
        self
    }

    /// Usage records logged so far.
    pub fn usage(&self) -> Vec<ApiUsage> {
        self.read().map(|t| t.usage.clone()).unwrap_or_default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.read().map(|t| t.users.len()).unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::new(StoreErrorKind::Poisoned).with_backend("Memory")
}

fn already_exists() -> StoreError {
    StoreError::new(StoreErrorKind::AlreadyExists).with_backend("Memory")
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.read()?.documents.get(id).cloned())
    }

    async fn create_document(&self, title: &str, content: &str) -> Result<Document, StoreError> {
        let document = Document {
            id: new_id(),
            title: title.to_owned(),
            content: content.to_owned(),
            created_at: now(),
        };
        self.write()?
            .documents
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn delete_document(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.documents.remove(id).is_some())
    }

    async fn create_api_key(
        &self,
        hash: &str,
        description: Option<&str>,
    ) -> Result<ApiKey, StoreError> {
        let mut tables = self.write()?;
        if tables.api_keys.iter().any(|k| k.hash == hash) {
            return Err(already_exists());
        }
        let key = ApiKey {
            hash: hash.to_owned(),
            description: description.map(str::to_owned),
            created_at: now(),
        };
        tables.api_keys.push(key.clone());
        Ok(key)
    }

    async fn find_api_key(&self, hash: &str) -> Result<Option<ApiKey>, StoreError> {
        Ok(self
            .read()?
            .api_keys
            .iter()
            .find(|k| k.hash == hash)
            .cloned())
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StoreError> {
        Ok(self.read()?.api_keys.clone())
    }

    async fn log_api_usage(
        &self,
        api_key: &str,
        endpoint: &str,
        client_ip: Option<&str>,
    ) -> Result<ApiUsage, StoreError> {
        let usage = ApiUsage {
            api_key: api_key.to_owned(),
            endpoint: endpoint.to_owned(),
            client_ip: client_ip.map(str::to_owned),
            timestamp: now(),
        };
        self.write()?.usage.push(usage.clone());
        Ok(usage)
    }

    async fn find_user(&self, uid_sha256: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.uid_sha256 == uid_sha256)
            .cloned())
    }

    async fn create_user(
        &self,
        uid_sha256: &str,
        name: Option<&str>,
    ) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.uid_sha256 == uid_sha256) {
            return Err(already_exists());
        }
        let user = User {
            id: new_id(),
            uid_sha256: uid_sha256.to_owned(),
            name: name.map(str::to_owned),
            created_at: now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_seeded_document() {
        let store = MemoryStore::new().with_document("id-1", "Title", "body");
        let doc = store.get_document("id-1").await.unwrap().unwrap();
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.content, "body");
    }

    #[tokio::test]
    async fn test_create_and_delete_document() {
        let store = MemoryStore::new();
        let doc = store.create_document("T", "c").await.unwrap();
        assert_eq!(store.get_document(&doc.id).await.unwrap(), Some(doc.clone()));
        assert!(store.delete_document(&doc.id).await.unwrap());
        assert!(store.get_document(&doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_api_key() {
        let store = MemoryStore::new().with_api_key("aaa");
        let err = store.create_api_key("aaa", None).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::AlreadyExists);
        assert_eq!(store.list_api_keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_usage_is_recorded() {
        let store = MemoryStore::new();
        store.log_api_usage("aaa", "/api/new", None).await.unwrap();
        assert_eq!(store.usage().len(), 1);
        assert_eq!(store.usage()[0].endpoint, "/api/new");
    }

    #[tokio::test]
    async fn test_users() {
        let store = MemoryStore::new().with_user("hash", Some("bob"));
        assert_eq!(store.user_count(), 1);
        let user = store.find_user("hash").await.unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("bob"));
        assert!(store.create_user("hash", None).await.is_err());
    }
}
