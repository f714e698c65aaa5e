//! HTTP request handlers.

pub(crate) mod api;
pub(crate) mod dashboard;
pub(crate) mod pages;

use mds_renderer::RenderOutcome;

/// Log non-fatal render warnings for a page.
pub(crate) fn log_warnings(page: &str, outcome: &RenderOutcome) {
    for warning in &outcome.warnings {
        tracing::warn!(page = %page, warning = %warning, "Render warning");
    }
}
