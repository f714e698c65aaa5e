//! HTML page templates.
//!
//! Fragments passed in are already sanitized. Everything else (titles,
//! app name, user-supplied identifiers) is escaped here.

use std::fmt::Write;

use mds_renderer::escape_html;
use mds_store::User;

const FONTS_STYLESHEET: &str = "https://fonts.googleapis.com/css2?family=Material+Symbols+Outlined:opsz,wght,FILL,GRAD@20..48,100..700,0..1,-50..200";

/// Wrap a sanitized fragment into a full HTML document.
pub(crate) fn page(title: &str, fragment: &str, app_name: &str) -> String {
    let title = escape_html(title);
    let app_name = escape_html(app_name);

    let mut html = String::with_capacity(fragment.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{title} | {app_name}</title>");
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{FONTS_STYLESHEET}\">");
    html.push_str("<link rel=\"stylesheet\" href=\"/static/style.css\">\n");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(
        html,
        "<header class=\"site-header\"><a href=\"/\">{app_name}</a><span class=\"page-title\">{title}</span></header>"
    );
    html.push_str("<main class=\"markdown-body\">\n");
    html.push_str(fragment);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}

/// Page shown when a stored document does not exist.
pub(crate) fn not_found(id: &str, app_name: &str) -> String {
    let fragment = format!(
        "<h1>Document not found</h1>\n<p>No document with ID <code>{}</code> exists.</p>\n<p><a href=\"/\">Back to home</a></p>",
        escape_html(id)
    );
    page("Not Found", &fragment, app_name)
}

/// Dashboard landing page for an authenticated user.
pub(crate) fn dashboard(user: &User, app_name: &str) -> String {
    let name = user.name.as_deref().unwrap_or("unknown user");
    let mut fragment = String::new();
    let _ = write!(
        fragment,
        "<h1>Dashboard</h1>\n<p>Signed in as <strong>{}</strong>.</p>\n<p>Member since {}.</p>",
        escape_html(name),
        user.created_at.format("%Y-%m-%d")
    );
    page("Dashboard", &fragment, app_name)
}
