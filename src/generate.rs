//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Takes the scan manifest, derives the post
//! collections, and writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): published posts, newest first, with date,
//!   reading time and excerpt
//! - **Post pages** (`/posts/{slug}/index.html`): rendered markdown, tags,
//!   copy-link share button, related posts, reading progress bar
//! - **Tag index** (`/tags/index.html`): every tag with its post count
//! - **Tag pages** (`/tags/{tag-slug}/index.html`): posts carrying one tag
//! - **Feed** (`/feed.xml`): RSS 2.0, see [`crate::feed`]
//!
//! Drafts never reach any page: every page is built from
//! [`Collections`], which drops them.
//!
//! ## Output Structure
//!
//! ```text
//! _site/
//! ├── index.html
//! ├── feed.xml
//! ├── posts/
//! │   └── hello-world/
//! │       └── index.html
//! ├── tags/
//! │   ├── index.html
//! │   └── rust/
//! │       └── index.html
//! ├── assets/                # Passthrough copies
//! └── robots.txt
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles with light and dark palettes
//! - `static/highlight.css`: colours for the code-block scope classes
//! - `static/theme.js`: theme toggle, persisted in `localStorage`
//! - `static/share.js`: copy-link button on post pages
//! - `static/progress.js`: reading progress bar, throttled to one update per
//!   animation frame
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Every page
//! goes through [`minify::transform`] on its way to disk.

use crate::collections::Collections;
use crate::config::SiteConfig;
use crate::feed;
use crate::filters::{self, date_format, date_iso, reading_time, slugify};
use crate::markdown::{markdown_text, render_markdown};
use crate::minify;
use crate::passthrough::{self, PassthroughReport};
use crate::scan::Manifest;
use crate::types::Post;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Feed error: {0}")]
    Feed(String),
    #[error("Failed to copy {path}: {source}")]
    Passthrough {
        path: PathBuf,
        source: std::io::Error,
    },
}

const CSS: &str = include_str!("../static/style.css");
const HIGHLIGHT_CSS: &str = include_str!("../static/highlight.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const SHARE_JS: &str = include_str!("../static/share.js");
const PROGRESS_JS: &str = include_str!("../static/progress.js");

/// One HTML file written by [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub title: String,
    /// Output path relative to the output root, `/`-separated
    pub path: String,
}

/// Everything [`generate`] wrote, for CLI output.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub home: Option<GeneratedPage>,
    pub posts: Vec<GeneratedPage>,
    pub tag_index: Option<GeneratedPage>,
    pub tags: Vec<GeneratedPage>,
    /// Feed path relative to the output root, when the feed is enabled
    pub feed: Option<String>,
    pub passthrough: PassthroughReport,
    pub minified: bool,
}

impl GenerateReport {
    pub fn page_count(&self) -> usize {
        usize::from(self.home.is_some())
            + self.posts.len()
            + usize::from(self.tag_index.is_some())
            + self.tags.len()
    }
}

/// Which top-level section a page belongs to, for the nav highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Posts,
    Tags,
}

pub fn generate(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
    minify_html: bool,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    let collections = Collections::derive(&manifest.posts);
    let tag_slugs = tag_slugs(&collections.tags);

    fs::create_dir_all(output_dir)?;

    let mut report = GenerateReport {
        minified: minify_html,
        ..Default::default()
    };

    // Index page
    let index_html = render_index(config, &collections.published, &tag_slugs);
    write_page(output_dir, "index.html", &index_html.into_string(), minify_html)?;
    report.home = Some(GeneratedPage {
        title: "Home".to_string(),
        path: "index.html".to_string(),
    });

    // Post pages, rendered in parallel. Indexed collect keeps published order.
    let related_limit = config.collections.related_limit;
    report.posts = collections
        .published
        .par_iter()
        .map(|post| -> Result<GeneratedPage, GenerateError> {
            let related = collections.related_to(post, related_limit);
            let html = render_post_page(config, post, &related, &tag_slugs);
            let path = format!("posts/{}/index.html", post.slug);
            write_page(output_dir, &path, &html.into_string(), minify_html)?;
            Ok(GeneratedPage {
                title: post.title.clone(),
                path,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Tag index and per-tag pages
    let tags_html = render_tags_index(config, &collections, &tag_slugs);
    write_page(output_dir, "tags/index.html", &tags_html.into_string(), minify_html)?;
    report.tag_index = Some(GeneratedPage {
        title: "Tags".to_string(),
        path: "tags/index.html".to_string(),
    });

    for tag in &collections.tags {
        let tagged = collections.posts_tagged(tag);
        let html = render_tag_page(config, tag, &tagged, &tag_slugs);
        let path = format!("tags/{}/index.html", tag_slugs[tag.as_str()]);
        write_page(output_dir, &path, &html.into_string(), minify_html)?;
        report.tags.push(GeneratedPage {
            title: tag.clone(),
            path,
        });
    }

    // Feed
    if config.feed.enabled {
        let xml = feed::render_feed(config, &collections.published)?;
        write_page(output_dir, &config.feed.path, &xml, minify_html)?;
        report.feed = Some(config.feed.path.clone());
    }

    // Passthrough copy
    report.passthrough =
        passthrough::copy_all(source_dir, output_dir, &config.passthrough.paths)
            .map_err(|(path, source)| GenerateError::Passthrough { path, source })?;

    Ok(report)
}

/// Write one output file, minifying it on the way when enabled.
fn write_page(
    output_dir: &Path,
    rel_path: &str,
    content: &str,
    minify_html: bool,
) -> Result<(), GenerateError> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = minify::transform(content, &path, minify_html);
    fs::write(&path, content.as_bytes())?;
    Ok(())
}

/// Slug used when a tag has no URL-safe characters at all (`"+++"`).
const FALLBACK_TAG_SLUG: &str = "tag";

/// Map every tag to a unique URL slug.
///
/// Tags are visited in sorted order; the first to claim a slug keeps it and
/// later ones get `-2`, `-3`, ... so `C`, `C++`, `C#` land on `c`, `c-2`, `c-3`.
fn tag_slugs(tags: &[String]) -> HashMap<&str, String> {
    let mut slugs: HashMap<&str, String> = HashMap::with_capacity(tags.len());
    let mut taken: HashSet<String> = HashSet::with_capacity(tags.len());
    for tag in tags {
        let mut base = slugify(tag);
        if base.is_empty() {
            base = FALLBACK_TAG_SLUG.to_string();
        }
        let mut slug = base.clone();
        let mut n = 2;
        while taken.contains(&slug) {
            slug = format!("{base}-{n}");
            n += 1;
        }
        taken.insert(slug.clone());
        slugs.insert(tag.as_str(), slug);
    }
    slugs
}

/// Short plain-text summary: the post's description, else an excerpt of its body.
///
/// The excerpt is plain text; callers escape it for their output format.
pub fn post_excerpt(post: &Post) -> String {
    match &post.description {
        Some(description) => description.clone(),
        None => filters::truncate_chars(&markdown_text(&post.body), filters::EXCERPT_LENGTH),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    config: &SiteConfig,
    title: &str,
    description: Option<&str>,
    content: Markup,
    scripts: &[&str],
) -> Markup {
    let page_title = if title == config.site.title {
        title.to_string()
    } else {
        format!("{} | {}", title, config.site.title)
    };
    let description = description.unwrap_or(&config.site.description);
    html! {
        (DOCTYPE)
        html lang=(config.site.language) class="dark" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                meta name="description" content=(description);
                @if config.feed.enabled {
                    link rel="alternate" type="application/rss+xml"
                        title=(config.site.title) href=(config.url_for(&config.feed.path));
                }
                style { (PreEscaped(CSS)) (PreEscaped(HIGHLIGHT_CSS)) }
            }
            body {
                (content)
                footer.site-footer {
                    "© " (config.site.title)
                    @if !config.site.author.is_empty() {
                        " · " (config.site.author)
                    }
                }
                script { (PreEscaped(THEME_JS)) }
                @for js in scripts {
                    script { (PreEscaped(*js)) }
                }
            }
        }
    }
}

/// Renders the site header with title, navigation and theme toggle
fn site_header(config: &SiteConfig, current: Option<Section>) -> Markup {
    html! {
        header.site-header {
            a.site-title href=(config.url_for("")) { (config.site.title) }
            nav.site-nav {
                ul {
                    li class=[(current == Some(Section::Posts)).then_some("current")] {
                        a href=(config.url_for("")) { "Posts" }
                    }
                    li class=[(current == Some(Section::Tags)).then_some("current")] {
                        a href=(config.url_for("tags/")) { "Tags" }
                    }
                    @if config.feed.enabled {
                        li { a href=(config.url_for(&config.feed.path)) { "RSS" } }
                    }
                }
            }
            button.theme-toggle #theme-toggle type="button" aria-label="Switch to light mode" {
                "◐"
            }
        }
    }
}

/// Date and reading time line shown under post titles
fn post_meta(post: &Post) -> Markup {
    html! {
        p.post-meta {
            time datetime=(date_iso(&post.date)) { (date_format(&post.date)) }
            " · "
            (reading_time(Some(&post.body))) " min read"
        }
    }
}

/// Renders a tag list linking to the tag pages
fn tag_links(config: &SiteConfig, tags: &[String], slugs: &HashMap<&str, String>) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    @if let Some(slug) = slugs.get(tag.as_str()) {
                        li { a href=(config.url_for(&format!("tags/{slug}/"))) { (tag) } }
                    }
                }
            }
        }
    }
}

/// Renders one entry of a post listing
fn post_summary(config: &SiteConfig, post: &Post, slugs: &HashMap<&str, String>) -> Markup {
    html! {
        li.post-summary {
            h2 { a href=(post.url) { (post.title) } }
            (post_meta(post))
            p.excerpt { (post_excerpt(post)) }
            (tag_links(config, &post.tags, slugs))
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page listing every published post
fn render_index(config: &SiteConfig, posts: &[Post], slugs: &HashMap<&str, String>) -> Markup {
    let content = html! {
        (site_header(config, Some(Section::Posts)))
        main.index-page {
            @if posts.is_empty() {
                p { "No posts yet." }
            } @else {
                ul.post-list {
                    @for post in posts {
                        (post_summary(config, post, slugs))
                    }
                }
            }
        }
    };

    base_document(config, &config.site.title, None, content, &[])
}

/// Renders a single post page
fn render_post_page(
    config: &SiteConfig,
    post: &Post,
    related: &[&Post],
    slugs: &HashMap<&str, String>,
) -> Markup {
    let content = html! {
        div #reading-progress { div #reading-progress-bar {} }
        (site_header(config, None))
        main.post-page {
            article.post {
                h1 { (post.title) }
                (post_meta(post))
                (tag_links(config, &post.tags, slugs))
                div.post-body {
                    (PreEscaped(render_markdown(&post.body)))
                }
                section.share {
                    button #copy-link type="button" data-url=(config.absolute_url(&post.url)) {
                        span #copy-link-text { "Copy Link" }
                    }
                }
            }
            @if !related.is_empty() {
                aside.related {
                    h2 { "Related posts" }
                    ul {
                        @for other in related {
                            li {
                                a href=(other.url) { (other.title) }
                                " "
                                span.post-meta { (date_format(&other.date)) }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(
        config,
        &post.title,
        post.description.as_deref(),
        content,
        &[PROGRESS_JS, SHARE_JS],
    )
}

/// Renders the tag index with per-tag post counts
fn render_tags_index(
    config: &SiteConfig,
    collections: &Collections,
    slugs: &HashMap<&str, String>,
) -> Markup {
    let content = html! {
        (site_header(config, Some(Section::Tags)))
        main.tags-page {
            h1 { "Tags" }
            @if collections.tags.is_empty() {
                p { "No tags yet." }
            } @else {
                ul.tag-index {
                    @for tag in &collections.tags {
                        @if let Some(slug) = slugs.get(tag.as_str()) {
                            li {
                                a href=(config.url_for(&format!("tags/{slug}/"))) { (tag) }
                                " "
                                span.tag-count { "(" (collections.posts_tagged(tag).len()) ")" }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(config, "Tags", None, content, &[])
}

/// Renders the listing for one tag
fn render_tag_page(
    config: &SiteConfig,
    tag: &str,
    posts: &[&Post],
    slugs: &HashMap<&str, String>,
) -> Markup {
    let title = format!("Tagged “{tag}”");
    let content = html! {
        (site_header(config, Some(Section::Tags)))
        main.tag-page {
            h1 { (title) }
            ul.post-list {
                @for post in posts {
                    (post_summary(config, post, slugs))
                }
            }
        }
    };

    base_document(config, &title, None, content, &[])
}

// ============================================================================
// Tests
// ============================================================================
