//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use mds_renderer::{CodeFormatter, DefaultFormatter, MarkdownPipeline, RenderConfig};
use mds_store::DocumentStore;

/// Pipeline with the code formatter chosen at startup.
pub(crate) type Pipeline = MarkdownPipeline<Box<dyn CodeFormatter>>;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Markdown rendering pipeline.
    pub(crate) pipeline: Pipeline,
    /// Document, key and user storage.
    pub(crate) store: Arc<dyn DocumentStore>,
    /// Dashboard endpoints refuse all requests.
    pub(crate) auth_disabled: bool,
    /// Dashboard auto-creates unknown users.
    pub(crate) create_users: bool,
    /// Send no-cache headers for static assets.
    pub(crate) no_cache: bool,
}

impl AppState {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, config: &crate::ServerConfig) -> Self {
        Self::with_formatter(store, config, Box::new(DefaultFormatter))
    }

    pub(crate) fn with_formatter(
        store: Arc<dyn DocumentStore>,
        config: &crate::ServerConfig,
        formatter: Box<dyn CodeFormatter>,
    ) -> Self {
        Self {
            pipeline: MarkdownPipeline::new(RenderConfig::with_formatter(formatter)),
            store,
            auth_disabled: config.auth_disabled,
            create_users: config.create_users,
            no_cache: config.no_cache,
        }
    }
}
