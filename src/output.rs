//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every post is its semantic identity (positional index and title) with
//! filesystem paths shown as secondary context via indented `Source:` lines.
//! This makes the output readable as a content inventory while still letting
//! users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 Async Rust Basics (November 20, 2023)
//!     Source: posts/2023-11-20-async-rust-basics.md
//!     Tags: async, rust
//! 002 Secret Plans (February 1, 2024) [draft]
//!     Source: posts/secret-plans.md
//!
//! Tags
//!     async (1)
//!     rust (1)
//!
//! Config
//!     config.toml
//!     assets/images
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Testing in Rust → posts/testing-in-rust/index.html
//! Tags → tags/index.html
//!     001 rust → tags/rust/index.html
//! Feed → feed.xml
//! Passthrough
//!     assets/images (3 files)
//!     robots.txt (1 file)
//!     assets/js (missing)
//!
//! Generated 6 pages, 4 copied files (minified)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects. [`format_scan_output`] is the one exception, as
//! it checks which config files and passthrough paths exist.

use crate::collections::Collections;
use crate::filters::date_format;
use crate::generate::GenerateReport;
use crate::scan::Manifest;
use crate::types::Post;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a post header: positional index, title, date, draft marker.
///
/// ```text
/// 001 Hello, World (January 5, 2024)
/// 002 Secret Plans (February 1, 2024) [draft]
/// ```
fn post_header(index: usize, post: &Post) -> String {
    let draft = if post.draft { " [draft]" } else { "" };
    format!(
        "{} {} ({}){}",
        format_index(index),
        post.title,
        date_format(&post.date),
        draft
    )
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered posts, tags and config.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    // Posts section
    lines.push("Posts".to_string());
    if manifest.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        lines.push(format!("{}Source: {}", indent(1), post.source_path));
        if !post.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
        }
    }

    // Tags section, counted over published posts only
    let collections = Collections::derive(&manifest.posts);
    if !collections.tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for tag in &collections.tags {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                tag,
                collections.posts_tagged(tag).len()
            ));
        }
    }

    // Config section
    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    for path in &manifest.config.passthrough.paths {
        if source_root.join(path).exists() {
            lines.push(format!("{}{}", indent(1), path));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output showing every written file.
///
/// Each page leads with its title, followed by `→` and the output path.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(home) = &report.home {
        lines.push(format!("{} \u{2192} {}", home.title, home.path));
    }
    for (i, page) in report.posts.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.title,
            page.path
        ));
    }
    if let Some(tag_index) = &report.tag_index {
        lines.push(format!("{} \u{2192} {}", tag_index.title, tag_index.path));
    }
    for (i, page) in report.tags.iter().enumerate() {
        lines.push(format!(
            "{}{} {} \u{2192} {}",
            indent(1),
            format_index(i + 1),
            page.title,
            page.path
        ));
    }
    if let Some(feed) = &report.feed {
        lines.push(format!("Feed \u{2192} {}", feed));
    }

    let passthrough = &report.passthrough;
    if !passthrough.copied.is_empty() || !passthrough.missing.is_empty() {
        lines.push("Passthrough".to_string());
        for (path, count) in &passthrough.copied {
            lines.push(format!("{}{} ({})", indent(1), path, plural(*count, "file")));
        }
        for path in &passthrough.missing {
            lines.push(format!("{}{} (missing)", indent(1), path));
        }
    }

    lines.push(String::new());
    let minified = if report.minified { " (minified)" } else { "" };
    lines.push(format!(
        "Generated {}, {}{}",
        plural(report.page_count(), "page"),
        plural(passthrough.file_count(), "copied file"),
        minified
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Related posts
// ============================================================================

/// Format the related-post ranking for one post.
///
/// ```text
/// Related to Hello, World
/// 001 Error Handling (February 10, 2024) shared: rust
/// 002 Testing in Rust (March 15, 2024)
/// ```
pub fn format_related_output(current: &Post, related: &[&Post]) -> Vec<String> {
    let mut lines = vec![format!("Related to {}", current.title)];
    if related.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in related.iter().enumerate() {
        let shared: Vec<&str> = post
            .tags
            .iter()
            .filter(|t| current.has_tag(t))
            .map(String::as_str)
            .collect();
        let mut line = post_header(i + 1, post);
        if !shared.is_empty() {
            line.push_str(&format!(" shared: {}", shared.join(", ")));
        }
        lines.push(line);
    }
    lines
}

/// Print related-post output to stdout.
pub fn print_related_output(current: &Post, related: &[&Post]) {
    for line in format_related_output(current, related) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
