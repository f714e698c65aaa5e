//! Markdown to sanitized HTML rendering.
//!
//! [`MarkdownPipeline`] is the only entry point other crates need. It runs
//! untrusted markdown through a fixed sequence of stages:
//!
//! 1. Admonition preprocessing (`!!! type "title"` blocks)
//! 2. Parsing and rendering with pulldown-cmark ([`MarkdownRenderer`])
//! 3. Admonition enhancement ([`admonition::enhance`])
//! 4. Allow-list sanitization with ammonia ([`Sanitizer`])
//!
//! Blank input and stage failures never surface as errors; they produce
//! fixed placeholder fragments and a [`RenderStatus`] describing what
//! happened.
//!
//! # Example
//!
//! ```
//! use mds_renderer::MarkdownPipeline;
//!
//! let pipeline = MarkdownPipeline::default();
//! let outcome = pipeline.render_markdown("!!! warning Careful\n    Body text.");
//!
//! assert!(outcome.html.contains(r#"<div class="admonition admonition-warning">"#));
//! assert!(outcome.html.contains(r#"<span class="admonition-title">Careful</span>"#));
//! ```

pub mod admonition;
mod code_block;
mod error;
mod extension;
mod fence;
mod pipeline;
mod renderer;
mod sanitize;
mod state;

pub use code_block::{CodeFormatter, DefaultFormatter};
pub use error::RenderError;
pub use extension::{Extension, ExtensionSet};
pub use pipeline::{
    EMPTY_DOCUMENT_HTML, MarkdownPipeline, Page, RENDER_ERROR_HTML, RenderConfig, RenderOutcome,
    RenderStatus,
};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use sanitize::{
    ALLOWED_TAGS, DROPPED_TAGS, GENERIC_ATTRIBUTES, Sanitizer, TAG_ATTRIBUTES, URL_SCHEMES,
};
pub use state::{TocEntry, escape_html, slugify};
