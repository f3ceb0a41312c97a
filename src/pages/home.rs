//! Listing page props builder.

use crate::config::Config;
use crate::content::format::{self, PostPage};
use crate::content::{ContentClient, ContentError, QueryOptions};
use crate::ssg::Generated;

/// Fields the listing needs from each post document.
const LISTING_FIELDS: &[&str] = &["posts.title", "posts.subtitle", "posts.author"];

/// Build the listing page props: the first batch of posts, formatted once.
///
/// This runs at startup (the static generation of the listing) and again on
/// each revalidation; the feed is only ever seeded from its result.
///
/// # Errors
///
/// Returns an error if the content query fails; the caller decides whether
/// that fails startup or just skips a revalidation round.
pub async fn load_props(
    client: &ContentClient,
    config: &Config,
) -> Result<Generated<PostPage>, ContentError> {
    let options = QueryOptions::with_page_size(config.page_size).fetch(LISTING_FIELDS);
    let response = client.query("posts", &options).await?;

    Ok(Generated::new(
        format::format_page(&response),
        config.home_revalidate,
    ))
}
