//! Rewrites admonition containers into the styled header/content structure.

use super::AdmonitionKind;

const OPENER: &str = "<div class=\"admonition ";
const TITLE_OPEN: &str = "<p class=\"admonition-title\">";
const TITLE_CLOSE: &str = "</p>";

/// Replace every `<div class="admonition TYPE">` container with the
/// indicator, header and content structure.
///
/// The HTML is scanned once, tracking open `div` elements on an explicit
/// stack, so nested containers of any depth are rewritten without
/// recursion. Comments are copied without being counted. Containers still
/// open at the end of input are closed there; the sanitizer repairs any
/// other unbalanced markup. HTML without admonitions is returned unchanged.
#[must_use]
pub fn enhance(html: &str) -> String {
    if !html.contains(OPENER) {
        return html.to_owned();
    }

    let mut output = String::with_capacity(html.len() + 256);
    // One entry per open div: `true` for admonition containers.
    let mut open: Vec<bool> = Vec::new();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let at = pos + offset;
        output.push_str(&html[pos..at]);
        let tail = &html[at..];
        let bytes = tail.as_bytes();

        if tail.starts_with("<!--") {
            let len = tail.find("-->").map_or(tail.len(), |end| end + 3);
            output.push_str(&tail[..len]);
            pos = at + len;
        } else if let Some((class, len)) = opener(tail) {
            let (title, skipped) = leading_title(&tail[len..]);
            let keyword = class.split_whitespace().next().unwrap_or_default();
            write_header(&mut output, AdmonitionKind::from_keyword(keyword), title);
            open.push(true);
            pos = at + len + skipped;
        } else if starts_with_tag(bytes, b"<div") {
            open.push(false);
            output.push_str(&tail[..4]);
            pos = at + 4;
        } else if starts_with_tag(bytes, b"</div") && open.last() == Some(&true) {
            open.pop();
            write_footer(&mut output);
            pos = at + closing_tag_len(tail);
        } else if starts_with_tag(bytes, b"</div") {
            open.pop();
            output.push_str(&tail[..5]);
            pos = at + 5;
        } else {
            output.push('<');
            pos = at + 1;
        }
    }
    output.push_str(&html[pos..]);

    while let Some(is_admonition) = open.pop() {
        if is_admonition {
            write_footer(&mut output);
        } else {
            output.push_str("</div>");
        }
    }
    output
}

fn write_header(output: &mut String, kind: AdmonitionKind, title: Option<&str>) {
    output.push_str("<div class=\"admonition admonition-");
    output.push_str(kind.as_str());
    output.push_str(
        "\">\n<div class=\"admonition-indicator\"></div>\n<div class=\"admonition-header\">\
         <span class=\"admonition-icon material-symbols-outlined\">",
    );
    output.push_str(kind.icon());
    output.push_str("</span>");
    if let Some(title) = title {
        output.push_str("<span class=\"admonition-title\">");
        output.push_str(title);
        output.push_str("</span>");
    }
    output.push_str("</div>\n<div class=\"admonition-content\">");
}

/// Close the content wrapper and the container, dropping trailing
/// whitespace of the body.
fn write_footer(output: &mut String) {
    output.truncate(output.trim_end().len());
    output.push_str("</div>\n</div>");
}

/// Class attribute and byte length of an admonition opening tag at the
/// start of `tail`.
fn opener(tail: &str) -> Option<(&str, usize)> {
    let after = tail.strip_prefix(OPENER)?;
    let end = after.find(['"', '<', '>'])?;
    after[end..]
        .starts_with("\">")
        .then(|| (&after[..end], OPENER.len() + end + 2))
}

/// Title of a container whose content starts at `content`, and the number
/// of bytes taken by the title paragraph and surrounding whitespace.
fn leading_title(content: &str) -> (Option<&str>, usize) {
    let trimmed = content.trim_start();
    let skipped = content.len() - trimmed.len();
    let Some(after_open) = trimmed.strip_prefix(TITLE_OPEN) else {
        return (None, skipped);
    };
    let Some(end) = title_end(after_open) else {
        return (None, skipped);
    };
    let body = after_open[end + TITLE_CLOSE.len()..].trim_start();
    (Some(&after_open[..end]), content.len() - body.len())
}

/// Offset of the `</p>` ending a title paragraph. The search stops at the
/// next block-level tag.
fn title_end(text: &str) -> Option<usize> {
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('<') {
        let at = pos + offset;
        let tail = &text.as_bytes()[at..];
        if tail.starts_with(TITLE_CLOSE.as_bytes()) {
            return Some(at);
        }
        if starts_with_tag(tail, b"<p")
            || starts_with_tag(tail, b"<div")
            || starts_with_tag(tail, b"</div")
        {
            return None;
        }
        pos = at + 1;
    }
    None
}

/// Length of a `</div>` tag at the start of `tail`, including whitespace
/// before the `>`.
fn closing_tag_len(tail: &str) -> usize {
    let rest = &tail[5..];
    let trimmed = rest.trim_start();
    let len = 5 + rest.len() - trimmed.len();
    if trimmed.starts_with('>') {
        len + 1
    } else {
        len
    }
}

/// Case-insensitive tag-name match that requires a delimiter after the name.
fn starts_with_tag(tail: &[u8], name: &[u8]) -> bool {
    tail.len() > name.len()
        && tail[..name.len()].eq_ignore_ascii_case(name)
        && matches!(tail[name.len()], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
}
