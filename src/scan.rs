//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the site config and every post in the
//! posts directory, producing a [`Manifest`] that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! src/                                  # Source root
//! ├── config.toml                       # Site configuration (optional)
//! ├── robots.txt                        # Passthrough file
//! ├── assets/                           # Passthrough directories
//! │   ├── images/
//! │   └── styles/
//! └── posts/
//!     ├── 2024-01-05-hello-world.md     # Date in filename (fallback date)
//!     ├── async-in-practice.md          # Date from front matter
//!     └── notes/                        # Subdirectories are ignored
//! ```
//!
//! ## Post Resolution
//!
//! For each `*.md` file directly inside the posts directory:
//!
//! - **Slug**: filename stem, with a `YYYY-MM-DD-` prefix stripped
//! - **Date**: front matter `date` → filename prefix → file modification time
//! - **Title**: front matter `title` → first level-one heading (code blocks
//!   skipped) → slug with dashes as spaces
//! - **URL**: `{path_prefix}posts/{slug}/`
//!
//! Drafts are kept in the manifest; the derived collections drop them.
//!
//! ## Validation
//!
//! The scanner rejects:
//! - Front matter that isn't valid TOML
//! - A `date` value that can't be parsed
//! - Two posts resolving to the same URL

use crate::config::{self, SiteConfig};
use crate::front_matter;
use crate::markdown::first_heading;
use crate::naming::parse_entry_name;
use crate::types::Post;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Unrecognized date '{value}' in {path}")]
    InvalidDate { path: PathBuf, value: String },
    #[error("Posts {0} and {1} both resolve to {2}")]
    DuplicateUrl(PathBuf, PathBuf, String),
}

/// Manifest output from the scan stage
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// Every post found, drafts included, in filename order
    pub posts: Vec<Post>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Load site config (uses defaults if config.toml doesn't exist)
    let config = config::load_config(root)?;
    let posts = parse_posts(root, &config)?;
    Ok(Manifest { posts, config })
}

/// Parse every markdown file directly inside the posts directory.
///
/// A missing posts directory yields an empty list: a brand new site has no
/// posts yet.
fn parse_posts(root: &Path, config: &SiteConfig) -> Result<Vec<Post>, ScanError> {
    let posts_dir = root.join(&config.dirs.posts);
    if !posts_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut md_files: Vec<PathBuf> = fs::read_dir(&posts_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && !is_hidden(p)
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();

    md_files.sort();

    let mut posts = Vec::with_capacity(md_files.len());
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for md_path in &md_files {
        let post = parse_post(md_path, root, config)?;
        if let Some(previous) = seen.insert(post.url.clone(), md_path.clone()) {
            return Err(ScanError::DuplicateUrl(previous, md_path.clone(), post.url));
        }
        posts.push(post);
    }
    Ok(posts)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn parse_post(md_path: &Path, root: &Path, config: &SiteConfig) -> Result<Post, ScanError> {
    let content = fs::read_to_string(md_path)?;
    let (front, body) =
        front_matter::parse(&content).map_err(|source| ScanError::FrontMatter {
            path: md_path.to_path_buf(),
            source,
        })?;

    let stem = md_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parsed = parse_entry_name(&stem);

    let date = match &front.date {
        Some(value) => {
            front_matter::parse_date(value).ok_or_else(|| ScanError::InvalidDate {
                path: md_path.to_path_buf(),
                value: value.to_string(),
            })?
        }
        None => match parsed.date.and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(naive) => naive.and_utc(),
            None => modified_time(md_path)?,
        },
    };

    let title = front
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| parsed.display_title.clone());

    let source_path = md_path
        .strip_prefix(root)
        .unwrap_or(md_path)
        .to_string_lossy()
        .replace('\\', "/");

    Ok(Post {
        url: config.url_for(&format!("posts/{}/", parsed.slug)),
        slug: parsed.slug,
        title,
        date,
        tags: front.tags.into_vec(),
        draft: front.draft,
        description: front.description.filter(|d| !d.trim().is_empty()),
        body: body.to_string(),
        source_path,
    })
}

fn modified_time(path: &Path) -> Result<DateTime<Utc>, ScanError> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}
