//! `mds doc` subcommand group.

use clap::Subcommand;
use mds_store::DocumentStore;

use crate::commands::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Stored document commands.
#[derive(Subcommand)]
pub(crate) enum DocCommand {
    /// Delete a stored document.
    Delete {
        /// Document ID, as shown in `/d/{id}` URLs.
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
}

impl DocCommand {
    /// Execute the doc subcommand.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        match self {
            Self::Delete { id, store } => {
                let store = store.open().await?;
                let deleted = store.delete_document(&id).await;
                store.close().await;

                if !deleted? {
                    return Err(CliError::DocumentNotFound(id));
                }
                tracing::info!(id = %id, "Document deleted");
                output.success(&format!("Deleted document {id}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mds_store::SqliteStore;

    use super::*;

    fn store_args(url: &str) -> StoreArgs {
        StoreArgs {
            config: None,
            database_url: Some(url.to_owned()),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("md.db").display());
        let store = SqliteStore::connect(&url).await.unwrap();
        let doc = store.create_document("Doomed", "# Bye").await.unwrap();
        store.close().await;

        let command = DocCommand::Delete {
            id: doc.id.clone(),
            store: store_args(&url),
        };
        command.execute().await.unwrap();

        let store = SqliteStore::connect(&url).await.unwrap();
        assert!(store.get_document(&doc.id).await.unwrap().is_none());
        store.close().await;
    }

    #[tokio::test]
    async fn test_delete_missing_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("md.db").display());

        let command = DocCommand::Delete {
            id: "missing".to_owned(),
            store: store_args(&url),
        };
        let err = command.execute().await.unwrap_err();
        assert!(matches!(err, CliError::DocumentNotFound(ref id) if id == "missing"));
    }
}
