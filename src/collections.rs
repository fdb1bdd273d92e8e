//! Derived views over the raw post set.
//!
//! Every build recomputes three views from the posts found by the scan stage:
//!
//! ```text
//! raw posts ──► published (no drafts, newest first) ──┬──► tag index
//!                                                     └──► related posts (per post)
//! ```
//!
//! All functions here are pure: they never mutate their input and never fail.
//! Malformed input degrades to a documented fallback instead of an error.
//!
//! ## Ordering
//!
//! - Dates sort newest first with a stable sort, so posts sharing a timestamp
//!   keep their input order.
//! - Tags sort by byte-wise ordinal comparison (`Ord for String`). Mixed-case
//!   tags therefore sort uppercase before lowercase, independent of locale.

use crate::types::Post;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

/// Number of related posts shown under a post when config doesn't say otherwise.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Non-draft posts, newest first. Equal dates keep their input order.
pub fn published_posts(posts: &[Post]) -> Vec<Post> {
    let mut published: Vec<Post> = posts.iter().filter(|p| !p.draft).cloned().collect();
    published.sort_by_key(|p| Reverse(p.date));
    published
}

/// Distinct tags used by non-draft posts, sorted byte-wise.
pub fn tag_list(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .filter(|p| !p.draft)
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rank up to `limit` posts from `collection` as related to `current`.
///
/// Posts sharing more tags with `current` come first, ties broken by the more
/// recent date. When fewer than `limit` posts share a tag, the result is
/// backfilled with the most recent remaining posts so related-post widgets
/// stay populated. Backfilled posts always follow ranked ones.
///
/// Fallbacks:
/// - `current` is `None`: the first `limit` posts of `collection`, unranked.
/// - `current` has no tags: the first `limit` posts of `collection` other
///   than `current`, in collection order.
///
/// `current` is never part of the result (compared by `url`).
pub fn related_posts<'a>(
    collection: &'a [Post],
    current: Option<&Post>,
    limit: usize,
) -> Vec<&'a Post> {
    let Some(current) = current else {
        return collection.iter().take(limit).collect();
    };

    let others = collection.iter().filter(|p| p.url != current.url);

    if current.tags.is_empty() {
        return others.take(limit).collect();
    }

    let current_tags: HashSet<&str> = current.tags.iter().map(String::as_str).collect();

    let mut scored: Vec<(usize, &Post)> = others
        .clone()
        .map(|p| (match_count(p, &current_tags), p))
        .filter(|(count, _)| *count > 0)
        .collect();
    scored.sort_by(|(a_count, a), (b_count, b)| {
        b_count.cmp(a_count).then_with(|| b.date.cmp(&a.date))
    });

    let mut related: Vec<&Post> = scored.into_iter().take(limit).map(|(_, p)| p).collect();

    if related.len() < limit {
        let mut backfill: Vec<&Post> = others
            .filter(|p| !related.iter().any(|r| r.url == p.url))
            .collect();
        backfill.sort_by_key(|p| Reverse(p.date));
        let missing = limit - related.len();
        related.extend(backfill.into_iter().take(missing));
    }

    related
}

/// Number of distinct tags `post` shares with `current_tags`.
fn match_count(post: &Post, current_tags: &HashSet<&str>) -> usize {
    post.tags
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(current_tags)
        .count()
}

/// All derived views for one build, computed once from the raw post set.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    /// Non-draft posts, newest first
    pub published: Vec<Post>,
    /// Distinct tags across published posts, sorted
    pub tags: Vec<String>,
}

impl Collections {
    pub fn derive(posts: &[Post]) -> Self {
        let published = published_posts(posts);
        let tags = tag_list(&published);
        Self { published, tags }
    }

    /// Published posts carrying `tag`, newest first.
    pub fn posts_tagged(&self, tag: &str) -> Vec<&Post> {
        self.published.iter().filter(|p| p.has_tag(tag)).collect()
    }

    /// Related posts for `current`, ranked within the published view.
    pub fn related_to(&self, current: &Post, limit: usize) -> Vec<&Post> {
        related_posts(&self.published, Some(current), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{post, post_slugs};

    fn draft(slug: &str, day: u32, tags: &[&str]) -> Post {
        Post {
            draft: true,
            ..post(slug, day, tags)
        }
    }

    // =========================================================================
    // published_posts
    // =========================================================================

    #[test]
    fn published_excludes_drafts() {
        let posts = vec![post("a", 1, &[]), draft("b", 2, &[]), post("c", 3, &[])];
        let published = published_posts(&posts);
        assert!(published.iter().all(|p| !p.draft));
        assert_eq!(post_slugs(&published), vec!["c", "a"]);
    }

    #[test]
    fn published_sorted_newest_first() {
        let posts = vec![post("old", 1, &[]), post("new", 20, &[]), post("mid", 10, &[])];
        let published = published_posts(&posts);
        assert_eq!(post_slugs(&published), vec!["new", "mid", "old"]);
        assert!(published.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn published_equal_dates_keep_input_order() {
        let posts = vec![post("first", 5, &[]), post("second", 5, &[]), post("third", 5, &[])];
        let published = published_posts(&posts);
        assert_eq!(post_slugs(&published), vec!["first", "second", "third"]);
    }

    #[test]
    fn published_empty_and_all_draft() {
        assert!(published_posts(&[]).is_empty());
        assert!(published_posts(&[draft("a", 1, &[]), draft("b", 2, &[])]).is_empty());
    }

    // =========================================================================
    // tag_list
    // =========================================================================

    #[test]
    fn tag_list_dedupes_and_sorts() {
        let posts = vec![
            post("a", 1, &["rust", "cli"]),
            post("b", 2, &["cli", "async"]),
            post("c", 3, &[]),
        ];
        assert_eq!(tag_list(&posts), vec!["async", "cli", "rust"]);
    }

    #[test]
    fn tag_list_ignores_drafts() {
        let posts = vec![post("a", 1, &["rust"]), draft("b", 2, &["secret"])];
        assert_eq!(tag_list(&posts), vec!["rust"]);
    }

    #[test]
    fn tag_list_is_byte_wise() {
        let posts = vec![post("a", 1, &["beta", "Zeta", "alpha", "Émile"])];
        assert_eq!(tag_list(&posts), vec!["Zeta", "alpha", "beta", "Émile"]);
    }

    // =========================================================================
    // related_posts
    // =========================================================================

    #[test]
    fn related_scenario_ranked_then_backfill() {
        let a = post("a", 10, &["x", "y"]);
        let b = post("b", 5, &["y"]);
        let c = post("c", 20, &[]);
        let collection = vec![a.clone(), b, c];
        let related = related_posts(&collection, Some(&a), 2);
        assert_eq!(post_slugs(related), vec!["b", "c"]);
    }

    #[test]
    fn related_never_includes_current() {
        let collection = vec![
            post("a", 3, &["x"]),
            post("b", 2, &["x"]),
            post("c", 1, &["x"]),
        ];
        for current in &collection {
            let related = related_posts(&collection, Some(current), 10);
            assert!(related.iter().all(|p| p.url != current.url));
            assert_eq!(related.len(), 2);
        }
    }

    #[test]
    fn related_more_shared_tags_rank_first() {
        let current = post("current", 1, &["a", "b", "c"]);
        let collection = vec![
            current.clone(),
            post("one", 30, &["a"]),
            post("three", 10, &["a", "b", "c"]),
            post("two", 20, &["a", "b"]),
        ];
        let related = related_posts(&collection, Some(&current), 3);
        assert_eq!(post_slugs(related), vec!["three", "two", "one"]);
    }

    #[test]
    fn related_equal_matches_newest_first() {
        let current = post("current", 1, &["rust"]);
        let collection = vec![
            post("older", 5, &["rust"]),
            post("newer", 9, &["rust"]),
            current.clone(),
        ];
        let related = related_posts(&collection, Some(&current), 3);
        assert_eq!(post_slugs(related), vec!["newer", "older"]);
    }

    #[test]
    fn related_backfill_follows_ranked() {
        let current = post("current", 1, &["rust"]);
        let collection = vec![
            post("recent-unrelated", 50, &["go"]),
            post("match", 2, &["rust"]),
            post("older-unrelated", 40, &[]),
            current.clone(),
        ];
        let related = related_posts(&collection, Some(&current), 3);
        assert_eq!(
            post_slugs(related),
            vec!["match", "recent-unrelated", "older-unrelated"]
        );
    }

    #[test]
    fn related_backfill_is_chronological_for_unsorted_input() {
        let current = post("current", 1, &["rust"]);
        let collection = vec![post("old", 2, &[]), post("new", 9, &[]), current.clone()];
        let related = related_posts(&collection, Some(&current), 2);
        assert_eq!(post_slugs(related), vec!["new", "old"]);
    }

    #[test]
    fn related_caps_at_limit() {
        let current = post("current", 1, &["x"]);
        let mut collection: Vec<Post> = (2..10).map(|d| post(&format!("p{d}"), d, &["x"])).collect();
        collection.push(current.clone());
        assert_eq!(related_posts(&collection, Some(&current), 3).len(), 3);
        assert_eq!(related_posts(&collection, Some(&current), 0).len(), 0);
    }

    #[test]
    fn related_returns_all_when_fewer_candidates() {
        let current = post("current", 1, &["x"]);
        let collection = vec![current.clone(), post("only", 2, &[])];
        let related = related_posts(&collection, Some(&current), 3);
        assert_eq!(post_slugs(related), vec!["only"]);
    }

    #[test]
    fn related_without_current_takes_collection_head() {
        let collection = vec![post("a", 3, &[]), post("b", 2, &[]), post("c", 1, &[])];
        let related = related_posts(&collection, None, 2);
        assert_eq!(post_slugs(related), vec!["a", "b"]);
    }

    #[test]
    fn related_current_without_tags_keeps_collection_order() {
        let current = post("current", 10, &[]);
        let collection = vec![
            post("a", 1, &["x"]),
            current.clone(),
            post("b", 30, &["y"]),
            post("c", 20, &[]),
        ];
        let related = related_posts(&collection, Some(&current), 2);
        assert_eq!(post_slugs(related), vec!["a", "b"]);
    }

    #[test]
    fn related_current_outside_collection() {
        let current = post("elsewhere", 1, &["x"]);
        let collection = vec![post("a", 2, &["x"]), post("b", 3, &[])];
        let related = related_posts(&collection, Some(&current), 3);
        assert_eq!(post_slugs(related), vec!["a", "b"]);
    }

    // =========================================================================
    // Collections
    // =========================================================================

    #[test]
    fn collections_derive_all_views() {
        let posts = vec![
            post("a", 1, &["rust"]),
            draft("b", 2, &["draft-only"]),
            post("c", 3, &["rust", "web"]),
        ];
        let collections = Collections::derive(&posts);
        assert_eq!(post_slugs(&collections.published), vec!["c", "a"]);
        assert_eq!(collections.tags, vec!["rust", "web"]);
        assert_eq!(post_slugs(collections.posts_tagged("rust")), vec!["c", "a"]);
        assert!(collections.posts_tagged("draft-only").is_empty());
    }

    #[test]
    fn collections_related_skips_drafts() {
        let current = post("a", 1, &["rust"]);
        let posts = vec![current.clone(), draft("b", 2, &["rust"]), post("c", 3, &[])];
        let collections = Collections::derive(&posts);
        let related = collections.related_to(&current, DEFAULT_RELATED_LIMIT);
        assert_eq!(post_slugs(related), vec!["c"]);
    }
}
