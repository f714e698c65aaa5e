//! Code fence tracking for line-based preprocessing.
//!
//! Admonition headers (`!!!`) inside fenced code blocks are literal text,
//! so the preprocessor needs to know which lines belong to a fence.

/// Classification of a single line relative to fenced code blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FenceLine {
    /// Opening fence marker.
    Open,
    /// Closing fence marker.
    Close,
    /// Line inside a fenced block.
    Inside,
    /// Regular markdown line.
    Outside,
}

impl FenceLine {
    /// Whether the line is part of a fenced code block (markers included).
    pub(crate) fn is_code(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Tracks fence state across consecutive lines.
///
/// Fences open with three or more backticks or tildes indented by at most
/// three spaces. A fence closes on a line made only of the same character,
/// at least as long as the opener.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Classify `line` and advance the fence state.
    pub(crate) fn observe(&mut self, line: &str) -> FenceLine {
        let Some(marker) = fence_marker(line) else {
            return if self.open.is_some() {
                FenceLine::Inside
            } else {
                FenceLine::Outside
            };
        };

        match self.open {
            Some((ch, len)) => {
                if marker.ch == ch && marker.len >= len && marker.rest.trim().is_empty() {
                    self.open = None;
                    FenceLine::Close
                } else {
                    FenceLine::Inside
                }
            }
            None => {
                // Backtick fences may not carry backticks in their info string.
                if marker.ch == '`' && marker.rest.contains('`') {
                    return FenceLine::Outside;
                }
                self.open = Some((marker.ch, marker.len));
                FenceLine::Open
            }
        }
    }
}

struct FenceMarker<'a> {
    ch: char,
    len: usize,
    rest: &'a str,
}

fn fence_marker(line: &str) -> Option<FenceMarker<'_>> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }

    Some(FenceMarker {
        ch,
        len,
        rest: &trimmed[len..],
    })
}
