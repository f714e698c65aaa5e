//! Code block formatting strategy.
//!
//! The renderer hands every fenced and indented code block to a
//! [`CodeFormatter`]. The formatter is a type parameter of
//! [`MarkdownPipeline`](crate::MarkdownPipeline), so the choice is made once
//! at configuration time and dispatched statically.
//!
//! # Example
//!
//! ```
//! use mds_renderer::{CodeFormatter, MarkdownPipeline, RenderConfig};
//!
//! struct PlainFormatter;
//!
//! impl CodeFormatter for PlainFormatter {
//!     fn format(&self, code: &str, _language: Option<&str>) -> String {
//!         format!("<pre>{}</pre>", mds_renderer::escape_html(code))
//!     }
//! }
//!
//! let pipeline = MarkdownPipeline::new(RenderConfig::with_formatter(PlainFormatter));
//! let outcome = pipeline.render_markdown("```\nx < y\n```");
//! assert_eq!(outcome.html, "<pre>x &lt; y\n</pre>");
//! ```

use crate::state::escape_html;

/// Turns the content of a code block into HTML.
///
/// Output still passes through the sanitizer, so formatters may only rely on
/// allow-listed markup (`pre`, `code`, `span` with classes).
pub trait CodeFormatter: Send + Sync {
    /// Format a code block.
    ///
    /// `language` is the first word of the fence info string, `None` for
    /// indented blocks and fences without info.
    fn format(&self, code: &str, language: Option<&str>) -> String;
}

impl<F: CodeFormatter + ?Sized> CodeFormatter for Box<F> {
    fn format(&self, code: &str, language: Option<&str>) -> String {
        (**self).format(code, language)
    }
}

/// Formatter producing `<pre><code class="language-X">` blocks.
///
/// Client-side highlighters pick up the `language-*` class.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFormatter;

impl CodeFormatter for DefaultFormatter {
    fn format(&self, code: &str, language: Option<&str>) -> String {
        match language {
            Some(lang) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            ),
            None => format!("<pre><code>{}</code></pre>", escape_html(code)),
        }
    }
}

/// Extract the language from a fence info string.
///
/// Only the first whitespace-separated word is used. Attributes after it
/// (`python title="x"`) are ignored.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_boxed_formatter_delegates() {
        let boxed: Box<dyn CodeFormatter> = Box::new(DefaultFormatter);
        assert_eq!(boxed.format("x", None), "<pre><code>x</code></pre>");
    }

    #[test]
    fn test_default_formatter_with_language() {
        assert_eq!(
            DefaultFormatter.format("fn main() {}\n", Some("rust")),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_default_formatter_without_language() {
        assert_eq!(
            DefaultFormatter.format("plain", None),
            "<pre><code>plain</code></pre>"
        );
    }

    #[test]
    fn test_default_formatter_escapes_code_and_language() {
        assert_eq!(
            DefaultFormatter.format("<b>&</b>", Some("x\"y")),
            "<pre><code class=\"language-x&quot;y\">&lt;b&gt;&amp;&lt;/b&gt;</code></pre>"
        );
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust").as_deref(), Some("rust"));
        assert_eq!(fence_language("python title=\"x\"").as_deref(), Some("python"));
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
    }
}
