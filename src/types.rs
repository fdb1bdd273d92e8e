//! Shared types passed between the scan, derive, and generate stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post loaded from a markdown file in the posts directory.
///
/// Optional front-matter fields are present-but-empty by default: a post
/// with no `tags` key has an empty tag list, and a post with no `draft` key
/// is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Site-relative URL (`/posts/{slug}/`). Unique per post; used for identity.
    pub url: String,
    /// URL slug (filename stem with any `YYYY-MM-DD-` prefix stripped)
    pub slug: String,
    pub title: String,
    /// Publish timestamp, used for reverse-chronological ordering
    pub date: DateTime<Utc>,
    /// Distinct tags in first-occurrence order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Drafts are excluded from every derived view
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw markdown body (front matter removed)
    #[serde(default)]
    pub body: String,
    /// Source file path relative to the source root
    #[serde(default)]
    pub source_path: String,
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
