//! Text, date, and sequence helpers used by the page templates.
//!
//! Each helper is total: absent or malformed input yields a fallback value
//! (reading time 1, empty excerpt, `None` from [`find`]) rather than an error.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

/// Average reading speed used by [`reading_time`].
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum excerpt length in characters, before the ellipsis.
pub const EXCERPT_LENGTH: usize = 150;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup tag pattern is valid"));

/// Estimated reading time in whole minutes, never less than 1.
///
/// Words are whitespace-delimited tokens.
pub fn reading_time(content: Option<&str>) -> usize {
    let words = content.map_or(0, |c| c.split_whitespace().count());
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Long-form US English date: `January 5, 2024`.
pub fn date_format(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Machine-readable date for `<time datetime=...>` attributes.
pub fn date_iso(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Plain-text preview: markup stripped, cut to [`EXCERPT_LENGTH`] characters,
/// `...` appended when something was cut.
pub fn excerpt(content: Option<&str>) -> String {
    let Some(content) = content else {
        return String::new();
    };
    truncate_chars(&MARKUP_TAG.replace_all(content, ""), EXCERPT_LENGTH)
}

/// Cut `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// First `n` items of a slice; the whole slice when `n` exceeds its length.
pub fn limit<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// First element of a JSON array whose `property` equals `value`.
///
/// Returns `None` when nothing matches or `array` isn't an array.
pub fn find<'a>(array: &'a Value, property: &str, value: &Value) -> Option<&'a Value> {
    array
        .as_array()?
        .iter()
        .find(|item| item.get(property) == Some(value))
}

/// Typed counterpart of [`find`]: compares the serialized `property` of each item.
pub fn find_by<'a, T: Serialize>(items: &'a [T], property: &str, value: &Value) -> Option<&'a T> {
    items.iter().find(|item| {
        serde_json::to_value(item)
            .ok()
            .is_some_and(|v| v.get(property) == Some(value))
    })
}

/// URL-safe slug: transliterated to ASCII, lowercased, runs of anything
/// else collapsed to a single `-`.
///
/// - `"Rust"` → `"rust"`
/// - `"Web Dev & APIs"` → `"web-dev-apis"`
/// - `"Café"` → `"cafe"`
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
