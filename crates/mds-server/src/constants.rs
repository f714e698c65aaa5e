//! Application identity and fixed content.

pub(crate) const APP_NAME: &str = "md-server";
pub(crate) const APP_DESCRIPTION: &str = "A tiny markdown preview server for your services.";
pub(crate) const APP_SOURCE: &str = "https://github.com/squid1127/md-server";

pub(crate) const API_KEY_HEADER: &str = "x-api-key";
pub(crate) const USER_ID_HEADER: &str = "x-authentik-uid";
pub(crate) const USER_NAME_HEADER: &str = "x-authentik-username";

/// Markdown rendered at `/`.
pub(crate) const HOME_PAGE: &str = r"# md-server

A tiny markdown preview server for your services.

([Source](https://github.com/squid1127/md-server))

## Markdown Support
md-server renders CommonMark with GitHub-style tables, strikethrough and task lists.

### Basic Markdown
**Bold** / *Italic* / ~~Strikethrough~~ / `Inline code`
#### Headers (H1, H2, H3, H4, H5, H6)

### Blockquotes
> This is a blockquote.

### Admonition
Admonitions use `!!!` rather than `> [type]` syntax.

!!! success Success Admonition
    This is the content of the admonition.

!!! warning Warning Admonition
    This is the content of the warning admonition.
    This is a [Link](https://github.com/squid1127/md-server)

### Lists
- Unordered list item 1
- Unordered list item 2
    - Nested unordered list item 1
    - Nested unordered list item 2

1. Ordered list item 1
2. Ordered list item 2
    1. Nested ordered list item 1
    2. Nested ordered list item 2

### Task Lists
- [x] Render markdown
- [ ] Take over the world

### Tables
| Header 1 | Header 2 | Header 3 |
|----------|:--------:|---------:|
| Row 1    | Data 1   | [Data 2](https://github.com/squid1127/md-server) |
| Row 2    | Data 3   | Data 4   |
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_page_mentions_identity() {
        assert!(HOME_PAGE.starts_with(&format!("# {APP_NAME}\n\n{APP_DESCRIPTION}")));
        assert!(HOME_PAGE.contains(APP_SOURCE));
    }
}
