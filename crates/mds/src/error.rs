//! CLI error types.

use mds_config::ConfigError;
use mds_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Server(String),

    #[error("No document found with ID: {0}")]
    DocumentNotFound(String),
}
