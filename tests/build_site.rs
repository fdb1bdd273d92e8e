//! End-to-end build of the fixture site.
//!
//! Runs the real binary against `fixtures/site` and inspects the output tree,
//! then drives the library directly for the cases the CLI can't isolate.

use simple_blog::collections::Collections;
use simple_blog::{generate, scan};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn fixture_source() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site")
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_simple-blog"))
        .args(args)
        .env_remove("SIMPLE_BLOG_ENV")
        .output()
        .expect("failed to run simple-blog")
}

fn build_into(out: &Path, extra: &[&str]) -> String {
    let source = fixture_source();
    let mut args = vec![
        "build",
        "--source",
        source.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    let output = run(&args);
    assert!(
        output.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn read(out: &Path, rel: &str) -> String {
    fs::read_to_string(out.join(rel)).unwrap_or_else(|e| panic!("missing {rel}: {e}"))
}

// ---------------------------------------------------------------------------
// CLI build
// ---------------------------------------------------------------------------

#[test]
fn build_writes_expected_tree() {
    let out = TempDir::new().unwrap();
    build_into(out.path(), &[]);

    for rel in [
        "index.html",
        "posts/async-rust-basics/index.html",
        "posts/hello-world/index.html",
        "posts/error-handling/index.html",
        "posts/testing-in-rust/index.html",
        "tags/index.html",
        "tags/rust/index.html",
        "tags/meta/index.html",
        "feed.xml",
        "robots.txt",
        "assets/images/logo.svg",
        "assets/styles/extra.css",
    ] {
        assert!(out.path().join(rel).is_file(), "missing {rel}");
    }
}

#[test]
fn drafts_never_reach_output() {
    let out = TempDir::new().unwrap();
    build_into(out.path(), &[]);

    assert!(!out.path().join("posts/secret-plans").exists());
    assert!(!out.path().join("tags/secret").exists());
    for rel in ["index.html", "tags/index.html", "feed.xml"] {
        assert!(!read(out.path(), rel).contains("Secret Plans"), "draft in {rel}");
    }
}

#[test]
fn index_lists_newest_first() {
    let out = TempDir::new().unwrap();
    build_into(out.path(), &[]);
    let index = read(out.path(), "index.html");

    let order: Vec<usize> = [
        "/posts/testing-in-rust/",
        "/posts/error-handling/",
        "/posts/hello-world/",
        "/posts/async-rust-basics/",
    ]
    .iter()
    .map(|url| index.find(url).unwrap_or_else(|| panic!("{url} not on index")))
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "order: {order:?}");
    assert!(index.contains("March 15, 2024"));
    assert!(index.contains("1 min read"));
}

#[test]
fn post_page_shows_related_posts() {
    let out = TempDir::new().unwrap();
    build_into(out.path(), &[]);
    let page = read(out.path(), "posts/testing-in-rust/index.html");

    let related = &page[page.find("Related posts").expect("related section")..];
    let errors = related.find("/posts/error-handling/").unwrap();
    let async_basics = related.find("/posts/async-rust-basics/").unwrap();
    assert!(errors < async_basics);
    // related_limit = 2 in the fixture config
    assert!(!related.contains("/posts/hello-world/"));
}

#[test]
fn code_blocks_are_highlighted() {
    let out = TempDir::new().unwrap();
    build_into(out.path(), &[]);
    let page = read(out.path(), "posts/async-rust-basics/index.html");
    assert!(page.contains(r#"<pre class="highlight"><code class="language-rust">"#));
    assert!(page.contains("hl-rust"));
    assert!(!page.contains("```"));
}

#[test]
fn feed_has_absolute_links() {
    let out = TempDir::new().unwrap();
    build_into(out.path(), &[]);
    let feed = read(out.path(), "feed.xml");
    assert!(feed.contains("<title>Tech Learnings</title>"));
    assert!(feed.contains("<link>https://techlearnings.example/posts/error-handling/</link>"));
    assert!(feed.contains("Result, the ? operator, and one error enum per module."));
    assert_eq!(feed.matches("<item>").count(), 4);
}

#[test]
fn production_build_minifies() {
    let plain = TempDir::new().unwrap();
    let minified = TempDir::new().unwrap();
    build_into(plain.path(), &[]);
    let stdout = build_into(minified.path(), &["--production"]);

    assert!(stdout.contains("(minified)"));
    let plain_index = read(plain.path(), "index.html");
    let min_index = read(minified.path(), "index.html");
    assert!(min_index.len() < plain_index.len());
    assert_eq!(
        read(plain.path(), "robots.txt"),
        read(minified.path(), "robots.txt")
    );
}

#[test]
fn build_reports_missing_passthrough() {
    let out = TempDir::new().unwrap();
    let stdout = build_into(out.path(), &[]);
    assert!(stdout.contains("assets/js (missing)"));
    assert!(stdout.contains("robots.txt (1 file)"));
}

// ---------------------------------------------------------------------------
// Other commands
// ---------------------------------------------------------------------------

#[test]
fn check_lists_drafts() {
    let source = fixture_source();
    let output = run(&["check", "--source", source.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Secret Plans (February 1, 2024) [draft]"));
    assert!(stdout.contains("==> Content is valid"));
}

#[test]
fn related_command_ranks_by_shared_tags() {
    let source = fixture_source();
    let output = run(&[
        "related",
        "testing-in-rust",
        "--limit",
        "3",
        "--source",
        source.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Related to Testing in Rust");
    assert!(lines[1].starts_with("001 Error Handling"));
    assert!(lines[2].starts_with("002 Async Rust Basics"));
    assert!(lines[3].starts_with("003 Hello, World"));
}

#[test]
fn related_command_unknown_slug_fails() {
    let source = fixture_source();
    let output = run(&["related", "secret-plans", "--source", source.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn gen_config_prints_stock_config() {
    let output = run(&["gen-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("[collections]"));
    assert!(stdout.contains("related_limit = 3"));
}

// ---------------------------------------------------------------------------
// Library pipeline
// ---------------------------------------------------------------------------

#[test]
fn library_pipeline_matches_collections() {
    let out = TempDir::new().unwrap();
    let manifest = scan::scan(&fixture_source()).unwrap();
    let collections = Collections::derive(&manifest.posts);
    let report = generate::generate(&manifest, &fixture_source(), out.path(), false).unwrap();

    assert_eq!(report.posts.len(), collections.published.len());
    assert_eq!(report.tags.len(), collections.tags.len());
    assert_eq!(collections.tags, vec!["async", "errors", "meta", "rust", "testing"]);
}
