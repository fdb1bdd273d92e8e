//! HTML minification transform.
//!
//! Every generated file passes through [`transform`] before it is written.
//! Only `.html` outputs are touched, and only when minification is enabled
//! (production builds, or `build.minify = true`). Everything else comes back
//! borrowed and unchanged.

use std::borrow::Cow;
use std::path::Path;

/// Minify `content` if enabled and `output_path` is an HTML file.
pub fn transform<'a>(content: &'a str, output_path: &Path, enabled: bool) -> Cow<'a, str> {
    let is_html = output_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("html"));
    if enabled && is_html {
        Cow::Owned(minify_html_inner(content))
    } else {
        Cow::Borrowed(content)
    }
}

/// Minify HTML with the `minify_html` crate: drop comments, collapse
/// whitespace, minify inline CSS and JS.
fn minify_html_inner(html: &str) -> String {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    let bytes = minify_html::minify(html.as_bytes(), &cfg);
    String::from_utf8_lossy(&bytes).into_owned()
}
