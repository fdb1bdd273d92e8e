//! Shared test utilities for the simple-blog test suite.
//!
//! Provides fixture setup, a compact post constructor, and lookup helpers
//! that panic with the available values on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let post = find_post(&manifest, "hello-world");
//! assert_eq!(post.tags, vec!["meta"]);
//! ```

use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Post construction
// =========================================================================

/// A published post dated `day` days after a fixed epoch.
///
/// Larger `day` means more recent, which keeps ordering assertions readable.
pub fn post(slug: &str, day: u32, tags: &[&str]) -> Post {
    let date = DateTime::<Utc>::from_timestamp(1_700_000_000 + i64::from(day) * 86_400, 0)
        .expect("fixture timestamp in range");
    Post {
        url: format!("/posts/{slug}/"),
        slug: slug.to_string(),
        title: slug.replace('-', " "),
        date,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        draft: false,
        description: None,
        body: format!("# {slug}\n\nBody of {slug}."),
        source_path: format!("posts/{slug}.md"),
    }
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs = post_slugs(&manifest.posts);
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// Slugs in iteration order. Accepts owned posts or references.
pub fn post_slugs<I>(posts: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Borrow<Post>,
{
    posts
        .into_iter()
        .map(|p| Borrow::<Post>::borrow(&p).slug.clone())
        .collect()
}
