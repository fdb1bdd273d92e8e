//! # Simple Blog
//!
//! A minimal static site generator for a markdown blog. Posts are markdown
//! files with optional TOML front matter; the output is plain HTML, one RSS
//! feed, and whatever static assets you ask to have copied along.
//!
//! # Architecture: Scan → Derive → Generate
//!
//! ```text
//! 1. Scan      src/       →  Manifest      (posts + config, drafts included)
//! 2. Derive    Manifest   →  Collections   (published view, tag index, related ranking)
//! 3. Generate  Collections →  _site/        (HTML, feed.xml, passthrough, minify)
//! ```
//!
//! The derive step is pure: each view is a function of the raw post list,
//! recomputed on every build, and safe to compute in any order. The related
//! ranking for different posts runs in parallel during generation.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads `config.toml` and every post, produces the [`scan::Manifest`] |
//! | [`collections`] | Stage 2: published posts, tag index, related-posts ranking |
//! | [`generate`] | Stage 3: renders the site with Maud, writes it through the minifier |
//! | [`filters`] | Reading time, date formatting, excerpts, `limit`, `find`, slugs |
//! | [`feed`] | RSS 2.0 feed of the newest published posts |
//! | [`markdown`] | Markdown to HTML with highlighted code, plain-text extraction |
//! | [`minify`] | HTML minification transform applied to every written page |
//! | [`passthrough`] | Verbatim copy of configured asset paths |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`front_matter`] | `+++`-fenced TOML front matter and date parsing |
//! | [`naming`] | `YYYY-MM-DD-slug` filename convention parser |
//! | [`types`] | The [`types::Post`] record shared by every stage |
//! | [`output`] | CLI output formatting for each stage |
//!
//! # Design Decisions
//!
//! ## Drafts Live Until Derive
//!
//! The scanner keeps drafts so `check` can list them. Every page, the tag
//! index, and the feed are built from [`collections::Collections`], which
//! drops them, so no generated file can reference a draft.
//!
//! ## Related Posts: Shared Tags, Then Recency, Then Backfill
//!
//! Posts sharing more tags rank first, ties go to the newer post, and the
//! list is topped up with the newest remaining posts so every post page shows
//! the same number of links. See [`collections::related_posts`].
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Template variables are Rust expressions, interpolation is
//! escaped by default, and there is no template directory to ship. The
//! template helpers in [`filters`] are plain functions called from Maud.
//!
//! ## Browser Scripts Stay JavaScript
//!
//! The theme toggle, copy-link button and reading progress bar are small
//! vanilla scripts embedded into the pages at compile time. They need the
//! DOM, so they are not Rust.

pub mod collections;
pub mod config;
pub mod feed;
pub mod filters;
pub mod front_matter;
pub mod generate;
pub mod markdown;
pub mod minify;
pub mod naming;
pub mod output;
pub mod passthrough;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
