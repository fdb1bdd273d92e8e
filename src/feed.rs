//! RSS 2.0 feed.
//!
//! One item per published post, newest first, capped at `feed.limit`. Links
//! are absolute (`site.url` + post URL) and double as permalink GUIDs. The
//! item description is the post's `description` when set, otherwise a
//! plain-text excerpt of the body.

use crate::config::SiteConfig;
use crate::filters;
use crate::generate::{GenerateError, post_excerpt};
use crate::types::Post;
use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder, validation::Validate};

/// Render the feed XML for `posts`, which must already be the published view.
pub fn render_feed(config: &SiteConfig, posts: &[Post]) -> Result<String, GenerateError> {
    let items: Vec<Item> = filters::limit(posts, config.feed.limit)
        .iter()
        .map(|post| post_to_item(post, config))
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.site.title.clone())
        .link(config.absolute_url(&config.url_for("")))
        .description(config.site.description.clone())
        .language(Some(config.site.language.clone()))
        .generator(Some(format!("simple-blog {}", env!("CARGO_PKG_VERSION"))))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| GenerateError::Feed(e.to_string()))?;
    Ok(channel.to_string())
}

fn post_to_item(post: &Post, config: &SiteConfig) -> Item {
    let link = config.absolute_url(&post.url);
    let mut categories = Vec::with_capacity(post.tags.len());
    for tag in &post.tags {
        categories.push(rss::CategoryBuilder::default().name(tag.clone()).build());
    }

    ItemBuilder::default()
        .title(Some(post.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .pub_date(Some(post.date.to_rfc2822()))
        .description(Some(post_excerpt(post)))
        .categories(categories)
        .build()
}
