//! TOML front matter at the top of a post.
//!
//! ```text
//! +++
//! title = "Hello"
//! date = 2024-01-05
//! tags = ["rust", "cli"]
//! +++
//! Body starts here.
//! ```
//!
//! The block is optional. Every field is optional and unknown keys are
//! ignored, so posts written for other generators (with `layout`,
//! `permalink`, ...) still load.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

const FENCE: &str = "+++";

/// Metadata block of a post.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// TOML date/datetime or a string; resolved with [`parse_date`]
    pub date: Option<toml::Value>,
    pub tags: Tags,
    pub draft: bool,
    pub description: Option<String>,
}

/// `tags` accepts either a single string or a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    One(String),
    Many(Vec<String>),
}

impl Default for Tags {
    fn default() -> Self {
        Tags::Many(Vec::new())
    }
}

impl Tags {
    /// Distinct non-empty tags in first-occurrence order.
    pub fn into_vec(self) -> Vec<String> {
        let raw = match self {
            Tags::One(tag) => vec![tag],
            Tags::Many(tags) => tags,
        };
        let mut tags: Vec<String> = Vec::with_capacity(raw.len());
        for tag in raw {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }
}

/// Split a post into its front matter source and body.
///
/// Returns `(None, content)` when the file doesn't open with a `+++` line
/// or the block is never closed.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let body = &rest[offset + line.len()..];
            return (Some(&rest[..offset]), body);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse a post's front matter and return it with the remaining body.
pub fn parse(content: &str) -> Result<(FrontMatter, &str), toml::de::Error> {
    match split(content) {
        (Some(source), body) => Ok((toml::from_str(source)?, body)),
        (None, body) => Ok((FrontMatter::default(), body)),
    }
}

/// Resolve a front matter `date` value.
///
/// Accepts TOML dates and datetimes as well as strings in `YYYY-MM-DD`,
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, or RFC 3339 form. Times without an offset are UTC.
pub fn parse_date(value: &toml::Value) -> Option<DateTime<Utc>> {
    let text = match value {
        toml::Value::String(s) => s.trim().to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        _ => return None,
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
