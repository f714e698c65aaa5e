//! HTTP server for md-server.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Rendered markdown pages (`/`, `/d/{id}`, `/render`)
//! - Raw stored markdown (`/raw/{id}`) and embeddable fragments (`/render-embed`)
//! - API endpoints guarded by API keys (`/api/*`)
//! - Dashboard endpoints behind an identity proxy (`/dash/*`)
//! - The built-in stylesheet (`/static/style.css`)
//!
//! # Quick Start
//!
//! ```no_run
//! use mds_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (mds-server)
//!                        │
//!                        ├─► Page handlers ──► MarkdownPipeline ──► page template
//!                        │
//!                        ├─► API / dashboard ──► auth extractors ──► DocumentStore
//!                        │
//!                        └─► Static stylesheet (embedded)
//! ```

mod app;
mod auth;
mod constants;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;
mod templates;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use mds_store::{DocumentStore, SqliteStore};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// sqlx SQLite connection URL.
    pub database_url: String,
    /// Send no-cache headers for static assets.
    pub no_cache: bool,
    /// Dashboard endpoints refuse all requests.
    pub auth_disabled: bool,
    /// Dashboard auto-creates unknown users.
    pub create_users: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            database_url: "sqlite://md-server.db?mode=rwc".to_owned(),
            no_cache: false,
            auth_disabled: false,
            create_users: true,
        }
    }
}

impl From<&mds_config::Config> for ServerConfig {
    fn from(config: &mds_config::Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            database_url: config.database.url.clone(),
            no_cache: config.server.no_cache,
            auth_disabled: config.auth.disabled,
            create_users: config.auth.create_users,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// Opens the database, builds the router and serves it on the configured
/// address.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let sqlite = SqliteStore::connect(&config.database_url).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(sqlite.clone());

    let state = Arc::new(AppState::new(store, &config));
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, app = constants::APP_NAME, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sqlite.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
