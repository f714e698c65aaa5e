//! SQLite-backed store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::error::StoreError;
use crate::store::{ApiKey, ApiUsage, Document, DocumentStore, User, new_id, now};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS api_keys (
        hash TEXT PRIMARY KEY NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS api_usage (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        api_key TEXT NOT NULL,
        endpoint TEXT NOT NULL,
        client_ip TEXT,
        timestamp TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_api_usage_api_key ON api_usage (api_key)",
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        uid_sha256 TEXT NOT NULL UNIQUE,
        name TEXT,
        created_at TEXT NOT NULL
    )",
];

/// Store backed by a SQLite database through an `sqlx` pool.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and apply the schema.
    ///
    /// `url` is an sqlx SQLite URL such as `sqlite://md-server.db?mode=rwc`
    /// or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Each in-memory connection is its own database, so keep exactly one alive.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        tracing::info!(url = %url, "Database ready");
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Close the pool, waiting for connections to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|err| StoreError::corrupt(format!("{column} `{raw}`: {err}")).with_backend("Sqlite"))
}

fn document_from_row(row: &SqliteRow) -> Result<Document, StoreError> {
    Ok(Document {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at: parse_time(row, "created_at")?,
    })
}

fn api_key_from_row(row: &SqliteRow) -> Result<ApiKey, StoreError> {
    Ok(ApiKey {
        hash: row.try_get("hash")?,
        description: row.try_get("description")?,
        created_at: parse_time(row, "created_at")?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        uid_sha256: row.try_get("uid_sha256")?,
        name: row.try_get("name")?,
        created_at: parse_time(row, "created_at")?,
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT id, title, content, created_at FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(document_from_row).transpose()
    }

    async fn create_document(&self, title: &str, content: &str) -> Result<Document, StoreError> {
        let document = Document {
            id: new_id(),
            title: title.to_owned(),
            content: content.to_owned(),
            created_at: now(),
        };
        sqlx::query("INSERT INTO documents (id, title, content, created_at) VALUES (?, ?, ?, ?)")
            .bind(&document.id)
            .bind(&document.title)
            .bind(&document.content)
            .bind(format_time(&document.created_at))
            .execute(&self.pool)
            .await?;
        tracing::debug!(id = %document.id, "Created document");
        Ok(document)
    }

    async fn delete_document(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_api_key(
        &self,
        hash: &str,
        description: Option<&str>,
    ) -> Result<ApiKey, StoreError> {
        let key = ApiKey {
            hash: hash.to_owned(),
            description: description.map(str::to_owned),
            created_at: now(),
        };
        sqlx::query("INSERT INTO api_keys (hash, description, created_at) VALUES (?, ?, ?)")
            .bind(&key.hash)
            .bind(&key.description)
            .bind(format_time(&key.created_at))
            .execute(&self.pool)
            .await?;
        Ok(key)
    }

    async fn find_api_key(&self, hash: &str) -> Result<Option<ApiKey>, StoreError> {
        let row = sqlx::query("SELECT hash, description, created_at FROM api_keys WHERE hash = ?")
            .bind(hash)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(api_key_from_row).transpose()
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StoreError> {
        let rows = sqlx::query(
            "SELECT hash, description, created_at FROM api_keys ORDER BY created_at, hash",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(api_key_from_row).collect()
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
        sqlx::query(
            "INSERT INTO api_usage (api_key, endpoint, client_ip, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(&usage.api_key)
        .bind(&usage.endpoint)
        .bind(&usage.client_ip)
        .bind(format_time(&usage.timestamp))
        .execute(&self.pool)
        .await?;
        Ok(usage)
    }

    async fn find_user(&self, uid_sha256: &str) -> Result<Option<User>, StoreError> {
        let row =
            sqlx::query("SELECT id, uid_sha256, name, created_at FROM users WHERE uid_sha256 = ?")
                .bind(uid_sha256)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_user(
        &self,
        uid_sha256: &str,
        name: Option<&str>,
    ) -> Result<User, StoreError> {
        let user = User {
            id: new_id(),
            uid_sha256: uid_sha256.to_owned(),
            name: name.map(str::to_owned),
            created_at: now(),
        };
        sqlx::query("INSERT INTO users (id, uid_sha256, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.uid_sha256)
            .bind(&user.name)
            .bind(format_time(&user.created_at))
            .execute(&self.pool)
            .await?;
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::StoreErrorKind;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_document_round_trip() {
        let store = memory_store().await;
        let content = "# Title\n\n  trailing spaces  \r\n\u{1F600}\n";
        let created = store.create_document("Title", content).await.unwrap();

        let fetched = store.get_document(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.content, content);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let store = memory_store().await;
        assert!(store.get_document("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_document() {
        let store = memory_store().await;
        let doc = store.create_document("T", "c").await.unwrap();
        assert!(store.delete_document(&doc.id).await.unwrap());
        assert!(!store.delete_document(&doc.id).await.unwrap());
        assert!(store.get_document(&doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_api_keys() {
        let store = memory_store().await;
        store.create_api_key("aaa", Some("ci")).await.unwrap();
        store.create_api_key("bbb", None).await.unwrap();

        let found = store.find_api_key("aaa").await.unwrap().unwrap();
        assert_eq!(found.description.as_deref(), Some("ci"));
        assert!(store.find_api_key("ccc").await.unwrap().is_none());

        let hashes: Vec<_> = store
            .list_api_keys()
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.hash)
            .collect();
        assert_eq!(hashes.len(), 2);
        assert!(hashes.contains(&"aaa".to_owned()));
    }

    #[tokio::test]
    async fn test_duplicate_api_key_is_already_exists() {
        let store = memory_store().await;
        store.create_api_key("aaa", None).await.unwrap();
        let err = store.create_api_key("aaa", None).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_log_api_usage() {
        let store = memory_store().await;
        let usage = store
            .log_api_usage("aaa", "/api/new", Some("127.0.0.1"))
            .await
            .unwrap();
        assert_eq!(usage.endpoint, "/api/new");
        assert_eq!(usage.client_ip.as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_users() {
        let store = memory_store().await;
        let user = store.create_user("uidhash", Some("alice")).await.unwrap();
        let found = store.find_user("uidhash").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(store.find_user("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let id = {
            let store = SqliteStore::connect(&url).await.unwrap();
            let doc = store.create_document("Saved", "body").await.unwrap();
            store.close().await;
            doc.id
        };

        let store = SqliteStore::connect(&url).await.unwrap();
        let doc = store.get_document(&id).await.unwrap().unwrap();
        assert_eq!(doc.title, "Saved");
    }
}
