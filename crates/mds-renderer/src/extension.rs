//! Markdown syntax extensions and their activation order.

use pulldown_cmark::Options;

/// Syntax extension understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Extension {
    /// `- [ ]` / `- [x]` list items.
    TaskLists,
    /// Slugified `id` attributes on headings.
    HeadingAnchors,
    /// Leading `---` YAML block, parsed and kept out of the output.
    FrontMatter,
    /// `!!! type "title"` blocks.
    Admonitions,
}

impl Extension {
    /// Parser options this extension turns on.
    ///
    /// Extensions implemented by renderer stages contribute nothing here.
    fn parser_options(self) -> Options {
        match self {
            Self::TaskLists => Options::ENABLE_TASKLISTS,
            Self::FrontMatter => Options::ENABLE_YAML_STYLE_METADATA_BLOCKS,
            Self::HeadingAnchors | Self::Admonitions => Options::empty(),
        }
    }
}

/// Ordered, duplicate-free set of enabled extensions.
///
/// Immutable once built. The default enables every extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: Vec<Extension>,
}

impl ExtensionSet {
    /// Activation order of the full set.
    pub const ORDER: [Extension; 4] = [
        Extension::TaskLists,
        Extension::HeadingAnchors,
        Extension::FrontMatter,
        Extension::Admonitions,
    ];

    /// Build a set from the given extensions.
    ///
    /// Duplicates are dropped; the result follows [`Self::ORDER`] regardless
    /// of input order.
    #[must_use]
    pub fn new(extensions: impl IntoIterator<Item = Extension>) -> Self {
        let requested: Vec<Extension> = extensions.into_iter().collect();
        Self {
            extensions: Self::ORDER
                .into_iter()
                .filter(|ext| requested.contains(ext))
                .collect(),
        }
    }

    /// Set with no extensions: plain CommonMark plus tables and strikethrough.
    #[must_use]
    pub fn none() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, extension: Extension) -> bool {
        self.extensions.contains(&extension)
    }

    /// Enabled extensions in activation order.
    pub fn iter(&self) -> impl Iterator<Item = Extension> + '_ {
        self.extensions.iter().copied()
    }

    /// pulldown-cmark options for this set.
    ///
    /// GFM tables and strikethrough are always on.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        self.iter().fold(
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
            |options, ext| options | ext.parser_options(),
        )
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(Self::ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_all_in_order() {
        let set = ExtensionSet::default();
        assert_eq!(set.iter().collect::<Vec<_>>(), ExtensionSet::ORDER);
    }

    #[test]
    fn test_new_normalizes_order_and_duplicates() {
        let set = ExtensionSet::new([
            Extension::Admonitions,
            Extension::TaskLists,
            Extension::Admonitions,
        ]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            [Extension::TaskLists, Extension::Admonitions]
        );
    }

    #[test]
    fn test_parser_options() {
        let options = ExtensionSet::default().parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(options.contains(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS));
        assert!(!options.contains(Options::ENABLE_GFM));
    }

    #[test]
    fn test_none_keeps_tables() {
        let options = ExtensionSet::none().parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(!options.contains(Options::ENABLE_TASKLISTS));
        assert!(!ExtensionSet::none().contains(Extension::Admonitions));
    }
}
