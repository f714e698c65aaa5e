//! Persistence for md-server.
//!
//! This crate provides the [`DocumentStore`] trait used by the HTTP server and
//! the CLI, together with its backends:
//!
//! - [`SqliteStore`] backed by an `sqlx` SQLite pool
//! - [`MemoryStore`] for tests (behind `mock` feature flag)
//!
//! API keys are never stored in plaintext. Use [`generate_api_key`] to mint a
//! key and [`hash_secret`] to derive the value kept in the store.
//!
//! # Example
//!
//! ```no_run
//! use mds_store::{DocumentStore, SqliteStore};
//!
//! # async fn example() -> Result<(), mds_store::StoreError> {
//! let store = SqliteStore::connect("sqlite://md-server.db?mode=rwc").await?;
//! let doc = store.create_document("Guide", "# Guide").await?;
//! assert!(store.get_document(&doc.id).await?.is_some());
//! # Ok(())
//! # }
//! ```

mod error;
mod keys;
#[cfg(feature = "mock")]
mod memory;
mod sqlite;
mod store;

pub use error::{StoreError, StoreErrorKind};
pub use keys::{API_KEY_BYTES, generate_api_key, hash_secret};
#[cfg(feature = "mock")]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{ApiKey, ApiUsage, DEFAULT_TITLE, Document, DocumentStore, User};
