//! `mds serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mds_config::{CliSettings, Config};
use mds_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover md-server.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// SQLite database URL (overrides config).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Send no-cache headers for static assets.
    #[arg(long, env = "NO_CACHE")]
    no_cache: bool,
}

impl ServeArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            no_cache: self.no_cache.then_some(true),
        }
    }

    /// Execute the serve command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!("Database: {}", config.database.url));
        if config.auth.disabled {
            output.warning("Dashboard authentication: disabled");
        }

        run_server(ServerConfig::from(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn test_flags_become_cli_settings() {
        let cli = TestCli::parse_from([
            "serve",
            "--port",
            "9000",
            "--database-url",
            "sqlite::memory:",
            "--no-cache",
        ]);
        let settings = cli.serve.cli_settings();
        assert_eq!(settings.port, Some(9000));
        assert_eq!(settings.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(settings.no_cache, Some(true));
    }

    #[test]
    fn test_unset_no_cache_does_not_override() {
        let cli = TestCli::parse_from(["serve"]);
        assert_eq!(cli.serve.cli_settings().no_cache, None);
    }
}
