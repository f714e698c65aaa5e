//! Allow-list HTML sanitizer.

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "a",
    "em",
    "strong",
    "i",
    "b",
    "s",
    "del",
    "blockquote",
    "code",
    "pre",
    "ul",
    "ol",
    "li",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "br",
    "hr",
    "img",
    "div",
    "span",
    "table",
    "thead",
    "tbody",
    "tr",
    "th",
    "td",
];

/// Attributes permitted on every allowed tag.
pub const GENERIC_ATTRIBUTES: &[&str] = &["class", "id"];

/// Per-tag attributes on top of [`GENERIC_ATTRIBUTES`].
pub const TAG_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("img", &["src", "alt", "title"]),
];

/// URL schemes allowed in `href` and `src`.
pub const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Tags removed together with their content.
///
/// Any other tag outside the allow-list is unwrapped and its text kept.
pub const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea",
    "select", "svg", "math",
];

/// HTML sanitizer enforcing a fixed allow-list.
///
/// Built once and shared; cleaning never fails and is idempotent.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Builder::empty();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .generic_attributes(GENERIC_ATTRIBUTES.iter().copied().collect())
            .tag_attributes(
                TAG_ATTRIBUTES
                    .iter()
                    .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect::<HashSet<_>>()))
                    .collect::<HashMap<_, _>>(),
            )
            .url_schemes(URL_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .clean_content_tags(DROPPED_TAGS.iter().copied().collect())
            .link_rel(None)
            .strip_comments(true);
        Self { builder }
    }

    /// Clean an HTML fragment.
    #[must_use]
    pub fn sanitize(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
