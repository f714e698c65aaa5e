//! Per-render state tracked while walking parser events.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// Buffers a fenced or indented code block until its end tag.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// Finish the block and return `(language, content)`.
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Column alignment and header tracking for GFM tables.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Class attribute for the current cell.
    ///
    /// Alignment is carried by a class because inline styles do not survive
    /// sanitization.
    pub(crate) fn current_alignment_class(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" class="align-left""#,
            Some(Alignment::Center) => r#" class="align-center""#,
            Some(Alignment::Right) => r#" class="align-right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Collects image alt text between the image start and end tags.
#[derive(Default)]
pub(crate) struct ImageState {
    /// Nesting depth; images inside image alt text are flattened.
    depth: usize,
    alt_text: String,
    pending: Vec<(String, String)>,
}

impl ImageState {
    pub(crate) fn start(&mut self, src: String, title: String) {
        if self.depth == 0 {
            self.alt_text.clear();
        }
        self.depth += 1;
        self.pending.push((src, title));
    }

    /// Finish the innermost image and return `(src, title, alt)` once the
    /// outermost image closes.
    pub(crate) fn end(&mut self) -> Option<(String, String, String)> {
        self.depth = self.depth.saturating_sub(1);
        let (src, title) = self.pending.pop()?;
        if self.depth > 0 {
            return None;
        }
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID, empty when heading anchors are disabled.
    pub id: String,
}

/// A heading ready to be written out.
pub(crate) struct CompletedHeading {
    pub level: u8,
    pub id: Option<String>,
    pub html: String,
}

/// Heading buffers, anchor generation and table of contents.
pub(crate) struct HeadingState {
    anchors: bool,
    current_level: Option<u8>,
    /// Plain text, used for the slug and the table of contents.
    text: String,
    /// Inline HTML of the heading body.
    html: String,
    toc: Vec<TocEntry>,
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new(anchors: bool) -> Self {
        Self {
            anchors,
            current_level: None,
            text: String::new(),
            html: String::new(),
            toc: Vec::new(),
            id_counts: HashMap::new(),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Finish the current heading and record it in the table of contents.
    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);

        let id = self.anchors.then(|| self.generate_id(&text));
        self.toc.push(TocEntry {
            level,
            title: text.trim().to_owned(),
            id: id.clone().unwrap_or_default(),
        });

        Some(CompletedHeading { level, id, html })
    }

    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id.push_str("section");
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Convert text to a URL-safe slug.
///
/// Lowercases letters and digits from any script, collapses whitespace,
/// dashes and underscores into single dashes, and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
