//! Markdown to sanitized HTML pipeline.
//!
//! Every render runs the same stages in order: admonition preprocessing,
//! parsing and rendering, admonition enhancement, sanitization. Failures in
//! any stage are logged and degrade to a fixed placeholder.

use std::borrow::Cow;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_yaml::Mapping;

use crate::admonition;
use crate::code_block::{CodeFormatter, DefaultFormatter};
use crate::error::RenderError;
use crate::extension::{Extension, ExtensionSet};
use crate::renderer::MarkdownRenderer;
use crate::sanitize::Sanitizer;
use crate::state::TocEntry;

/// Returned for empty or whitespace-only input.
pub const EMPTY_DOCUMENT_HTML: &str = "<p>This document has no content.</p>";

/// Returned when any rendering stage fails.
pub const RENDER_ERROR_HTML: &str = "<p>Error rendering markdown content.</p>";

/// How a render finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RenderStatus {
    /// All stages ran.
    Rendered,
    /// Input was blank; no stage ran.
    Empty,
    /// A stage failed; `html` holds the error placeholder.
    Failed,
}

/// Result of a pipeline run.
#[derive(Clone, Debug)]
pub struct RenderOutcome {
    /// Sanitized HTML fragment.
    pub html: String,
    pub status: RenderStatus,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Parsed front matter, when present and valid.
    pub front_matter: Option<Mapping>,
    /// Non-fatal problems found while rendering.
    pub warnings: Vec<String>,
}

impl RenderOutcome {
    fn placeholder(html: &str, status: RenderStatus) -> Self {
        Self {
            html: html.to_owned(),
            status,
            toc: Vec::new(),
            front_matter: None,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == RenderStatus::Failed
    }
}

/// A rendered fragment together with its page title.
///
/// The title is kept apart from the fragment and is never sanitized into it.
#[derive(Clone, Debug)]
pub struct Page {
    pub title: String,
    pub outcome: RenderOutcome,
}

/// Immutable rendering configuration.
#[derive(Clone, Debug)]
pub struct RenderConfig<F: CodeFormatter = DefaultFormatter> {
    pub extensions: ExtensionSet,
    pub formatter: F,
}

impl RenderConfig {
    /// Configuration with the default formatter and the given extensions.
    #[must_use]
    pub fn new(extensions: ExtensionSet) -> Self {
        Self {
            extensions,
            formatter: DefaultFormatter,
        }
    }
}

impl<F: CodeFormatter> RenderConfig<F> {
    /// Configuration with every extension enabled and a custom formatter.
    #[must_use]
    pub fn with_formatter(formatter: F) -> Self {
        Self {
            extensions: ExtensionSet::default(),
            formatter,
        }
    }

    /// Replace the extension set.
    #[must_use]
    pub fn extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(ExtensionSet::default())
    }
}

/// Entry point for turning untrusted markdown into safe HTML.
///
/// Holds no per-render state, so a single instance can be shared across
/// threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use mds_renderer::{MarkdownPipeline, RenderStatus};
///
/// let pipeline = MarkdownPipeline::default();
/// let outcome = pipeline.render_markdown("**bold** <script>alert(1)</script>");
/// assert_eq!(outcome.status, RenderStatus::Rendered);
/// assert_eq!(outcome.html, "<p><strong>bold</strong> </p>");
/// ```
pub struct MarkdownPipeline<F: CodeFormatter = DefaultFormatter> {
    config: RenderConfig<F>,
    sanitizer: Sanitizer,
}

impl<F: CodeFormatter> MarkdownPipeline<F> {
    #[must_use]
    pub fn new(config: RenderConfig<F>) -> Self {
        Self {
            config,
            sanitizer: Sanitizer::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig<F> {
        &self.config
    }

    /// Render a markdown document to a sanitized HTML fragment.
    pub fn render_markdown(&self, source: &str) -> RenderOutcome {
        if source.trim().is_empty() {
            tracing::debug!("Empty markdown source, skipping render");
            return RenderOutcome::placeholder(EMPTY_DOCUMENT_HTML, RenderStatus::Empty);
        }

        let result = catch_unwind(AssertUnwindSafe(|| self.run_stages(source)))
            .map_err(|payload| RenderError::Panicked(panic_message(&*payload)));

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, source_len = source.len(), "Markdown rendering failed");
                RenderOutcome::placeholder(RENDER_ERROR_HTML, RenderStatus::Failed)
            }
        }
    }

    /// Render a fragment for embedding into third-party pages.
    pub fn render_embed(&self, source: &str) -> RenderOutcome {
        self.render_markdown(source)
    }

    /// Render a document together with its page title.
    pub fn render_page(&self, source: &str, title: &str) -> Page {
        Page {
            title: title.to_owned(),
            outcome: self.render_markdown(source),
        }
    }

    /// Clean arbitrary HTML with the pipeline's sanitizer.
    #[must_use]
    pub fn sanitize(&self, html: &str) -> String {
        self.sanitizer.sanitize(html)
    }

    fn run_stages(&self, source: &str) -> RenderOutcome {
        let extensions = &self.config.extensions;
        let source = if extensions.contains(Extension::Admonitions) {
            Cow::Owned(admonition::preprocess(source))
        } else {
            Cow::Borrowed(source)
        };

        let rendered =
            MarkdownRenderer::render_markdown(&self.config.formatter, extensions, &source);
        let enhanced = admonition::enhance(&rendered.html);
        let html = self.sanitizer.sanitize(&enhanced);

        let mut warnings = Vec::new();
        let front_matter = rendered
            .front_matter
            .as_deref()
            .and_then(|raw| parse_front_matter(raw, &mut warnings));

        RenderOutcome {
            html,
            status: RenderStatus::Rendered,
            toc: rendered.toc,
            front_matter,
            warnings,
        }
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

fn parse_front_matter(raw: &str, warnings: &mut Vec<String>) -> Option<Mapping> {
    if raw.trim().is_empty() {
        return Some(Mapping::new());
    }
    match serde_yaml::from_str::<Mapping>(raw) {
        Ok(mapping) => Some(mapping),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring invalid front matter");
            warnings.push(format!("invalid front matter: {err}"));
            None
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
