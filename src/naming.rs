//! Post filename parsing for the optional `YYYY-MM-DD-slug` convention.
//!
//! Post files may carry their publish date in the filename, the way many
//! blogs name them. The prefix is stripped from the slug and used as a
//! fallback date when the front matter has none:
//!
//! - `2024-01-05-hello-world.md` → date 2024-01-05, slug `hello-world`
//! - `hello-world.md` → no date, slug `hello-world`
//! - `2024-13-01-typo.md` → not a valid date, slug `2024-13-01-typo`
//!
//! ## Display Titles
//!
//! Dashes in the slug become spaces for the fallback title:
//! `2024-01-05-hello-world` → "hello world".

use chrono::NaiveDate;

/// Result of parsing a post filename stem like `2024-01-05-hello-world`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Date prefix if present and valid
    pub date: Option<NaiveDate>,
    /// Slug after the date prefix. For undated entries, the full input.
    pub slug: String,
    /// Fallback title: slug with dashes converted to spaces.
    pub display_title: String,
}

/// Length of the `YYYY-MM-DD` prefix.
const DATE_PREFIX_LEN: usize = 10;

/// Parse a post filename stem following the `YYYY-MM-DD-slug` convention.
///
/// A date prefix followed by nothing (`2024-01-05` or `2024-01-05-`) keeps
/// the whole stem as the slug, since an empty slug can't form a URL.
pub fn parse_entry_name(stem: &str) -> ParsedName {
    if let Some(prefix) = stem.get(..DATE_PREFIX_LEN)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        let slug = stem[DATE_PREFIX_LEN..].trim_start_matches('-');
        let slug = if slug.is_empty() { stem } else { slug };
        return ParsedName {
            date: Some(date),
            slug: slug.to_string(),
            display_title: slug.replace('-', " "),
        };
    }
    ParsedName {
        date: None,
        slug: stem.to_string(),
        display_title: stem.replace('-', " "),
    }
}
