//! Line-based rewrite of `!!!` blocks into raw HTML containers.
//!
//! The container lines are HTML blocks in CommonMark terms, surrounded by
//! blank lines so the body between them is still parsed as markdown.

use crate::fence::FenceTracker;
use crate::state::escape_html;

/// Parsed `!!! type title` header line.
#[derive(Debug, PartialEq, Eq)]
struct Header<'a> {
    /// Leading whitespace of the header line.
    indent: &'a str,
    /// Lowercased type keyword.
    keyword: String,
    /// `None` when the title was given as `""`.
    title: Option<String>,
}

/// Admonitions nested deeper than this are left as text.
const MAX_NESTING: usize = 32;

/// Rewrite every admonition block in `input`.
///
/// ```text
/// !!! warning "Careful"
///     Body text.
/// ```
///
/// becomes
///
/// ```text
/// <div class="admonition warning">
/// <p class="admonition-title">Careful</p>
///
/// Body text.
///
/// </div>
/// ```
///
/// Headers are recognized at the top level, inside list items, inside
/// blockquotes and inside other admonition bodies. Lines indented four or
/// more columns past the enclosing block are code and stay untouched.
#[must_use]
pub fn preprocess(input: &str) -> String {
    preprocess_nested(input, 0)
}

fn preprocess_nested(input: &str, depth: usize) -> String {
    if depth >= MAX_NESTING {
        return input.to_owned();
    }

    let lines: Vec<&str> = input.lines().collect();
    let mut output = String::with_capacity(input.len() + 128);
    let mut fence = FenceTracker::new();
    let mut lists = ListContext::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if fence.observe(line).is_code() {
            output.push_str(line);
            output.push('\n');
            continue;
        }
        lists.observe(line);
        if indent_width(line) >= lists.content_column() + 4 {
            output.push_str(line);
            output.push('\n');
            continue;
        }

        if strip_quote(line).is_some() {
            let start = i - 1;
            while i < lines.len() && strip_quote(lines[i]).is_some() {
                i += 1;
            }
            write_quote(&mut output, &lines[start..i], depth);
            continue;
        }

        let Some(header) = parse_header(line) else {
            output.push_str(line);
            output.push('\n');
            continue;
        };

        let body_start = i;
        let mut body_end = i;
        while i < lines.len() {
            let candidate = lines[i];
            if candidate.trim().is_empty() {
                i += 1;
            } else if body_line(candidate, header.indent).is_some() {
                i += 1;
                body_end = i;
            } else {
                break;
            }
        }
        // Trailing blank lines belong to the enclosing document.
        i = body_end;

        let body: Vec<&str> = lines[body_start..body_end]
            .iter()
            .map(|line| body_line(line, header.indent).unwrap_or(""))
            .collect();
        write_block(
            &mut output,
            &header,
            &preprocess_nested(&body.join("\n"), depth + 1),
        );
    }

    if !input.ends_with('\n') && output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Content columns of the list items enclosing the current line.
#[derive(Debug, Default)]
struct ListContext {
    columns: Vec<usize>,
}

impl ListContext {
    fn observe(&mut self, line: &str) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return;
        }

        let column = indent_width(line);
        while self.columns.last().is_some_and(|&c| c > column) {
            self.columns.pop();
        }
        if column >= self.content_column() + 4 {
            return;
        }
        if let Some(width) = list_marker_width(trimmed) {
            self.columns.push(column + width);
        }
    }

    fn content_column(&self) -> usize {
        self.columns.last().copied().unwrap_or(0)
    }
}

/// Width of a bullet or ordered list marker plus the spaces after it.
fn list_marker_width(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let marker = match bytes.first()? {
        b'-' | b'*' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 || !matches!(bytes.get(digits), Some(b'.' | b')')) {
                return None;
            }
            digits + 1
        }
        _ => return None,
    };

    let spaces = bytes[marker..].iter().take_while(|&&b| b == b' ').count();
    match spaces {
        0 if marker == bytes.len() => Some(marker + 1),
        0 => None,
        1..=4 => Some(marker + spaces),
        _ => Some(marker + 1),
    }
}

/// Leading whitespace width in columns, with tabs stopping at multiples of 4.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Content of a blockquote line: the `>` marker and one following space
/// removed.
fn strip_quote(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Rewrite admonitions inside a run of blockquote lines. Runs without
/// admonitions are copied unchanged.
fn write_quote(output: &mut String, lines: &[&str], depth: usize) {
    let inner = lines
        .iter()
        .filter_map(|line| strip_quote(line))
        .collect::<Vec<_>>()
        .join("\n");
    let rewritten = preprocess_nested(&inner, depth + 1);
    if rewritten == inner {
        for line in lines {
            output.push_str(line);
            output.push('\n');
        }
        return;
    }

    let first = lines.first().copied().unwrap_or_default();
    let prefix = &first[..first.len() - first.trim_start().len()];
    for line in rewritten.lines() {
        output.push_str(prefix);
        output.push('>');
        if !line.is_empty() {
            output.push(' ');
            output.push_str(line);
        }
        output.push('\n');
    }
}

fn write_block(output: &mut String, header: &Header<'_>, body: &str) {
    let indent = header.indent;
    output.push_str(indent);
    output.push_str("<div class=\"admonition ");
    output.push_str(&header.keyword);
    output.push_str("\">\n");
    if let Some(title) = &header.title {
        output.push_str(indent);
        output.push_str("<p class=\"admonition-title\">");
        output.push_str(&escape_html(title));
        output.push_str("</p>\n");
    }
    output.push('\n');
    for line in body.lines() {
        if !line.trim().is_empty() {
            output.push_str(indent);
            output.push_str(line);
        }
        output.push('\n');
    }
    output.push('\n');
    output.push_str(indent);
    output.push_str("</div>\n\n");
}

/// Strip the header indentation plus one indent unit from a body line.
fn body_line<'a>(line: &'a str, indent: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(indent)?;
    rest.strip_prefix("    ").or_else(|| rest.strip_prefix('\t'))
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];
    let rest = trimmed.strip_prefix("!!!")?;
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let rest = rest.trim();
    let (keyword, title) = rest.split_once([' ', '\t']).unwrap_or((rest, ""));
    if keyword.is_empty()
        || !keyword
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }

    Some(Header {
        indent,
        keyword: keyword.to_lowercase(),
        title: parse_title(keyword, title.trim()),
    })
}

/// Resolve the header title.
///
/// Absent titles default to the capitalized keyword, `""` suppresses the
/// title, and matching surrounding quotes are stripped.
fn parse_title(keyword: &str, raw: &str) -> Option<String> {
    if raw.is_empty() {
        return Some(capitalize(keyword));
    }

    let unquoted = ['"', '\'']
        .into_iter()
        .find_map(|q| raw.strip_prefix(q)?.strip_suffix(q))
        .filter(|_| raw.len() >= 2);
    match unquoted {
        Some("") => None,
        Some(inner) => Some(inner.to_owned()),
        None => Some(raw.to_owned()),
    }
}

fn capitalize(keyword: &str) -> String {
    let lower = keyword.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
