//! md-server CLI.
//!
//! Provides commands for:
//! - `serve`: Start the markdown server
//! - `auth new`: Create an API key
//! - `auth list`: List stored API keys
//! - `doc delete`: Delete a stored document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AuthCommand, DocCommand, ServeArgs};
use error::CliError;
use output::Output;

/// Default filter when neither `--verbose` nor `RUST_LOG` is given.
const DEFAULT_FILTER: &str = "warn,mds=info,mds_server=info,mds_store=info,mds_renderer=info";

/// md-server - a tiny markdown preview server.
#[derive(Parser)]
#[command(name = "mds", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the markdown server.
    Serve(ServeArgs),
    /// Manage API keys.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Manage stored documents.
    #[command(subcommand)]
    Doc(DocCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    init_tracing(verbose);

    if let Err(err) = run(cli.command) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Initialize tracing.
///
/// `--verbose` forces INFO for everything, otherwise `RUST_LOG` applies,
/// falling back to INFO for this workspace's crates.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(command: Commands) -> Result<(), CliError> {
    let runtime = tokio::runtime::Runtime::new()?;
    match command {
        Commands::Serve(args) => runtime.block_on(args.execute()),
        Commands::Auth(cmd) => runtime.block_on(cmd.execute()),
        Commands::Doc(cmd) => runtime.block_on(cmd.execute()),
    }
}
