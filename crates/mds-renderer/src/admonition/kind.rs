//! Admonition types and their icons.

use std::fmt;

/// Icon shown for admonition types without a dedicated glyph.
pub const DEFAULT_ICON: &str = "info";

/// Fixed set of admonition types understood by the renderer.
///
/// Unrecognized type keywords resolve to [`AdmonitionKind::Note`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdmonitionKind {
    Note,
    Info,
    Tip,
    Hint,
    Important,
    Attention,
    Warning,
    Caution,
    Danger,
    Error,
    Failure,
    Success,
    Check,
    Question,
    Bug,
    Quote,
    Example,
    Abstract,
    Summary,
}

impl AdmonitionKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Note,
        Self::Info,
        Self::Tip,
        Self::Hint,
        Self::Important,
        Self::Attention,
        Self::Warning,
        Self::Caution,
        Self::Danger,
        Self::Error,
        Self::Failure,
        Self::Success,
        Self::Check,
        Self::Question,
        Self::Bug,
        Self::Quote,
        Self::Example,
        Self::Abstract,
        Self::Summary,
    ];

    /// Resolve a type keyword, case-insensitively.
    ///
    /// Returns `None` for keywords outside the fixed set.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(keyword))
    }

    /// Resolve a type keyword, falling back to [`AdmonitionKind::Note`].
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        Self::parse(keyword).unwrap_or(Self::Note)
    }

    /// Lowercase keyword, also used as the CSS class suffix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Hint => "hint",
            Self::Important => "important",
            Self::Attention => "attention",
            Self::Warning => "warning",
            Self::Caution => "caution",
            Self::Danger => "danger",
            Self::Error => "error",
            Self::Failure => "failure",
            Self::Success => "success",
            Self::Check => "check",
            Self::Question => "question",
            Self::Bug => "bug",
            Self::Quote => "quote",
            Self::Example => "example",
            Self::Abstract => "abstract",
            Self::Summary => "summary",
        }
    }

    /// Material Symbols ligature name for the header icon.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Note | Self::Info => DEFAULT_ICON,
            Self::Tip | Self::Hint => "lightbulb",
            Self::Important => "priority_high",
            Self::Attention | Self::Warning | Self::Caution => "warning",
            Self::Danger => "dangerous",
            Self::Error => "error",
            Self::Failure => "cancel",
            Self::Success | Self::Check => "check_circle",
            Self::Question => "help",
            Self::Bug => "bug_report",
            Self::Quote => "format_quote",
            Self::Example => "science",
            Self::Abstract | Self::Summary => "summarize",
        }
    }
}

impl fmt::Display for AdmonitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keyword() {
        assert_eq!(AdmonitionKind::parse("warning"), Some(AdmonitionKind::Warning));
        assert_eq!(AdmonitionKind::parse("abstract"), Some(AdmonitionKind::Abstract));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(AdmonitionKind::parse("WARNING"), Some(AdmonitionKind::Warning));
        assert_eq!(AdmonitionKind::parse("Tip"), Some(AdmonitionKind::Tip));
    }

    #[test]
    fn test_unknown_keyword_falls_back_to_note() {
        assert_eq!(AdmonitionKind::parse("bogus"), None);
        assert_eq!(AdmonitionKind::from_keyword("bogus"), AdmonitionKind::Note);
        assert_eq!(AdmonitionKind::from_keyword("bogus").icon(), DEFAULT_ICON);
    }

    #[test]
    fn test_every_kind_round_trips_through_keyword() {
        for kind in AdmonitionKind::ALL {
            assert_eq!(AdmonitionKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_warning_family_shares_icon() {
        assert_eq!(AdmonitionKind::Warning.icon(), "warning");
        assert_eq!(AdmonitionKind::Caution.icon(), "warning");
        assert_eq!(AdmonitionKind::Attention.icon(), "warning");
    }

    #[test]
    fn test_display() {
        assert_eq!(AdmonitionKind::Success.to_string(), "success");
    }
}
