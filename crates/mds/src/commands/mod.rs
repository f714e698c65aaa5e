//! CLI command implementations.

pub(crate) mod auth;
pub(crate) mod doc;
pub(crate) mod serve;

pub(crate) use auth::AuthCommand;
pub(crate) use doc::DocCommand;
pub(crate) use serve::ServeArgs;

use std::path::PathBuf;

use clap::Args;
use mds_config::{CliSettings, Config};
use mds_store::SqliteStore;

use crate::error::CliError;

/// Database selection shared by store commands.
#[derive(Args)]
pub(crate) struct StoreArgs {
    /// Path to configuration file (default: auto-discover md-server.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database URL (overrides config).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl StoreArgs {
    /// Load configuration and open the configured database.
    async fn open(self) -> Result<SqliteStore, CliError> {
        let settings = CliSettings {
            database_url: self.database_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        Ok(SqliteStore::connect(&config.database.url).await?)
    }
}
