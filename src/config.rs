//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. The file lives in the source
//! root and every key has a default: only the keys you want to change need to
//! be present.
//!
//! ## Config File Location
//!
//! ```text
//! src/
//! ├── config.toml              # Site config (optional)
//! ├── posts/
//! │   └── ...
//! └── assets/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! path_prefix = "/"           # URL prefix for every generated link
//!
//! [site]
//! title = "My Blog"
//! description = "Things I learned"
//! url = "https://example.com" # Absolute base URL, used by the feed
//! author = ""
//! language = "en"
//!
//! [dirs]
//! posts = "posts"             # Posts directory, relative to the source root
//!
//! [collections]
//! related_limit = 3           # Related posts shown under each post
//!
//! [build]
//! minify = false              # Minify generated HTML (forced on in production)
//!
//! [feed]
//! enabled = true
//! path = "feed.xml"
//! limit = 20                  # Newest posts included in the feed
//!
//! [passthrough]
//! paths = ["assets/images", "assets/js", "assets/styles", "robots.txt"]
//!
//! [processing]
//! max_processes = 4           # Max parallel render workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::collections::DEFAULT_RELATED_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// Environment variable that switches a build to production mode.
pub const ENV_VAR: &str = "SIMPLE_BLOG_ENV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// URL prefix prepended to every generated link. Must start and end with `/`.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    /// Site identity: title, description, base URL.
    pub site: SiteInfo,
    /// Content directories relative to the source root.
    pub dirs: DirsConfig,
    /// Derived collection settings.
    pub collections: CollectionsConfig,
    /// Output transforms.
    pub build: BuildConfig,
    /// RSS feed settings.
    pub feed: FeedConfig,
    /// Files and directories copied verbatim into the output.
    pub passthrough: PassthroughConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

fn default_path_prefix() -> String {
    "/".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            path_prefix: default_path_prefix(),
            site: SiteInfo::default(),
            dirs: DirsConfig::default(),
            collections: CollectionsConfig::default(),
            build: BuildConfig::default(),
            feed: FeedConfig::default(),
            passthrough: PassthroughConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path_prefix.starts_with('/') || !self.path_prefix.ends_with('/') {
            return Err(ConfigError::Validation(
                "path_prefix must start and end with '/'".into(),
            ));
        }
        if !(self.site.url.starts_with("http://") || self.site.url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site.url must be an absolute http(s) URL".into(),
            ));
        }
        if !is_relative_inside(&self.dirs.posts) {
            return Err(ConfigError::Validation(
                "dirs.posts must be a relative path inside the source root".into(),
            ));
        }
        if self.feed.limit == 0 {
            return Err(ConfigError::Validation("feed.limit must be at least 1".into()));
        }
        if !self.feed.path.ends_with(".xml") || !is_relative_inside(&self.feed.path) {
            return Err(ConfigError::Validation(
                "feed.path must be a relative .xml path".into(),
            ));
        }
        if let Some(bad) = self
            .passthrough
            .paths
            .iter()
            .find(|p| !is_relative_inside(p))
        {
            return Err(ConfigError::Validation(format!(
                "passthrough path '{bad}' must be relative and stay inside the source root"
            )));
        }
        Ok(())
    }

    /// Prefix a site-relative path: `posts/x/` → `/blog/posts/x/`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.path_prefix, path.trim_start_matches('/'))
    }

    /// Absolute URL for a site-relative one, for feeds.
    pub fn absolute_url(&self, url: &str) -> String {
        format!("{}{}", self.site.url.trim_end_matches('/'), url)
    }
}

/// True for non-empty relative paths without `..` or root components.
fn is_relative_inside(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    /// Absolute base URL without the path prefix (e.g. `https://example.com`).
    pub url: String,
    pub author: String,
    /// `lang` attribute of generated pages and the feed language.
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: "Things I learned".to_string(),
            url: "https://example.com".to_string(),
            author: String::new(),
            language: "en".to_string(),
        }
    }
}

/// Content directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirsConfig {
    /// Posts directory relative to the source root. Only `*.md` directly inside it are read.
    pub posts: String,
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            posts: "posts".to_string(),
        }
    }
}

/// Derived collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionsConfig {
    /// Maximum related posts listed under a post.
    pub related_limit: usize,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

/// Output transform settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Minify generated HTML. Production builds minify regardless.
    pub minify: bool,
}

/// RSS feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Output path of the feed, relative to the output root.
    pub path: String,
    /// Number of newest posts included.
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "feed.xml".to_string(),
            limit: 20,
        }
    }
}

/// Passthrough copy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassthroughConfig {
    /// Files or directories relative to the source root, copied to the same
    /// relative path in the output.
    pub paths: Vec<String>,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                "assets/images".to_string(),
                "assets/js".to_string(),
                "assets/styles".to_string(),
                "robots.txt".to_string(),
            ],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Whether the environment asks for a production build.
pub fn is_production_env(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("production"))
}

// =============================================================================
// Config loading
// =============================================================================

/// Load `config.toml` from the source root, or the defaults when there is none.
///
/// Every section and key is optional; missing ones take their default values
/// and unknown ones are rejected. The result is validated before returning.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let config = if config_path.exists() {
        toml::from_str::<SiteConfig>(&fs::read_to_string(&config_path)?)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Blog Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the source root (e.g. src/config.toml).
# Unknown keys will cause an error.

# URL prefix for every generated link. Use "/blog/" when the site is served
# from a sub-path (e.g. a GitHub Pages project site).
path_prefix = "/"

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "My Blog"
description = "Things I learned"
# Absolute base URL, without the path prefix. Used for feed links.
url = "https://example.com"
author = ""
language = "en"

# ---------------------------------------------------------------------------
# Content directories (relative to the source root)
# ---------------------------------------------------------------------------
[dirs]
# Only *.md files directly inside this directory become posts.
posts = "posts"

# ---------------------------------------------------------------------------
# Derived collections
# ---------------------------------------------------------------------------
[collections]
# Related posts listed under each post: ranked by shared tags, then recency,
# backfilled with the newest remaining posts.
related_limit = 3

# ---------------------------------------------------------------------------
# Output transforms
# ---------------------------------------------------------------------------
[build]
# Minify generated HTML. Production builds (--production or
# SIMPLE_BLOG_ENV=production) always minify.
minify = false

# ---------------------------------------------------------------------------
# RSS feed
# ---------------------------------------------------------------------------
[feed]
enabled = true
path = "feed.xml"
# Number of newest posts included.
limit = 20

# ---------------------------------------------------------------------------
# Passthrough copy (relative to the source root, copied as-is)
# ---------------------------------------------------------------------------
[passthrough]
paths = ["assets/images", "assets/js", "assets/styles", "robots.txt"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
