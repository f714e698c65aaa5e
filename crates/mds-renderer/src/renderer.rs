//! Event-driven HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::code_block::{CodeFormatter, fence_language};
use crate::extension::{Extension, ExtensionSet};
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, TocEntry, escape_html};

/// Output of the core renderer, before enhancement and sanitization.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Unsanitized HTML.
    pub html: String,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Raw YAML of the front matter block, if present.
    pub front_matter: Option<String>,
}

/// Renders pulldown-cmark events to HTML.
///
/// Code blocks are delegated to the [`CodeFormatter`]. Raw HTML from the
/// source is passed through untouched; the sanitizer deals with it later.
pub struct MarkdownRenderer<'f, F: CodeFormatter> {
    formatter: &'f F,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    /// Front matter text, `Some` once a metadata block has started.
    metadata: Option<String>,
    in_metadata: bool,
}

impl<'f, F: CodeFormatter> MarkdownRenderer<'f, F> {
    #[must_use]
    pub fn new(formatter: &'f F, extensions: &ExtensionSet) -> Self {
        Self {
            formatter,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(extensions.contains(Extension::HeadingAnchors)),
            metadata: None,
            in_metadata: false,
        }
    }

    /// Parse `markdown` with the options of `extensions` and render it.
    pub fn render_markdown(
        formatter: &'f F,
        extensions: &ExtensionSet,
        markdown: &str,
    ) -> RenderResult {
        let parser = Parser::new_ext(markdown, extensions.parser_options());
        Self::new(formatter, extensions).render(parser)
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: self.output,
            toc: self.heading.take_toc(),
            front_matter: self.metadata,
        }
    }

    /// Push inline content to the heading buffer when inside a heading.
    ///
    /// Markup inside image alt text is dropped.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(language);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::MetadataBlock(_) => {
                self.in_metadata = true;
                self.metadata.get_or_insert_with(String::new);
            }
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let align = self.table.current_alignment_class();
                let _ = write!(self.output, "<{tag}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    let _ = write!(link, r#" title="{}""#, escape_html(&title));
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image.start(dest_url.into_string(), title.into_string());
            }
            Tag::HtmlBlock
            | Tag::FootnoteDefinition(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.complete_heading() {
                    let level = heading.level;
                    match heading.id {
                        Some(id) => {
                            let _ = write!(
                                self.output,
                                r#"<h{level} id="{id}">{}</h{level}>"#,
                                heading.html.trim()
                            );
                        }
                        None => {
                            let _ = write!(
                                self.output,
                                "<h{level}>{}</h{level}>",
                                heading.html.trim()
                            );
                        }
                    }
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let (language, content) = self.code.end();
                let html = self.formatter.format(&content, language.as_deref());
                self.output.push_str(&html);
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::MetadataBlock(_) => self.in_metadata = false,
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    let mut img = format!(
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    if !title.is_empty() {
                        let _ = write!(img, r#" title="{}""#, escape_html(&title));
                    }
                    img.push('>');
                    self.push_inline(&img);
                }
            }
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::HtmlBlock
            | TagEnd::FootnoteDefinition
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn text(&mut self, text: &CowStr<'_>) {
        if self.in_metadata {
            if let Some(metadata) = &mut self.metadata {
                metadata.push_str(text);
            }
            return;
        }

        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }

        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
            return;
        }

        self.output.push_str(&escape_html(text));
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html("\n");
        } else {
            self.output.push('\n');
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<span class="task-list-marker checked">☑</span> "#
        } else {
            r#"<span class="task-list-marker">☐</span> "#
        });
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
