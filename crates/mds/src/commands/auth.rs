//! `mds auth` subcommand group.

use clap::Subcommand;
use mds_store::{DocumentStore, generate_api_key, hash_secret};

use crate::commands::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// API key commands.
#[derive(Subcommand)]
pub(crate) enum AuthCommand {
    /// Create a new API key. The key is printed once and never stored.
    New {
        /// Description for the new API key.
        description: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List stored API keys.
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
}

impl AuthCommand {
    /// Execute the auth subcommand.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        match self {
            Self::New { description, store } => {
                let store = store.open().await?;
                let key = generate_api_key();
                store
                    .create_api_key(&hash_secret(&key), Some(&description))
                    .await?;
                store.close().await;
                tracing::info!(description = %description, "API key created");

                output.success("New API key created:");
                output.result(&key);
                output.warning("Please store this key securely; it will not be shown again.");
            }
            Self::List { store } => {
                let store = store.open().await?;
                let keys = store.list_api_keys().await?;
                store.close().await;

                if keys.is_empty() {
                    output.info("No API keys found.");
                }
                for key in keys {
                    output.result(&format!(
                        "Key (SHA256): {} | Description: {} | Created At: {}",
                        key.hash,
                        key.description.as_deref().unwrap_or("No description"),
                        key.created_at.to_rfc3339(),
                    ));
                }
            }
        }
        Ok(())
    }
}
