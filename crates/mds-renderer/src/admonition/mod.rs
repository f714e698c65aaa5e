//! Admonition blocks.
//!
//! ```markdown
//! !!! warning "Careful"
//!     Indented body, parsed as markdown.
//! ```
//!
//! Processing runs in two phases:
//!
//! 1. [`preprocess`] rewrites `!!!` blocks into `<div class="admonition TYPE">`
//!    containers before parsing, leaving the body as markdown.
//! 2. [`enhance`] rewrites the rendered containers into the final structure
//!    with an icon header and a content wrapper.

mod enhancer;
mod kind;
mod preprocessor;

pub use enhancer::enhance;
pub use kind::{AdmonitionKind, DEFAULT_ICON};
pub use preprocessor::preprocess;
