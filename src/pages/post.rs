//! Post detail page props builder and path lister.

use crate::config::Config;
use crate::content::format::{self, PostDetail};
use crate::content::{ContentClient, ContentError, QueryOptions};
use crate::ssg::{Generated, PathSet};

/// How many slugs to enumerate for pre-building at startup.
const PATH_LIST_PAGE_SIZE: u32 = 100;

/// List the slugs known to the content store.
///
/// Slugs outside the returned set are still generated on first request
/// (fallback behavior); the set only drives pre-building.
///
/// # Errors
///
/// Returns an error if the content query fails.
pub async fn list_paths(client: &ContentClient) -> Result<PathSet, ContentError> {
    let options = QueryOptions::with_page_size(PATH_LIST_PAGE_SIZE);
    let response = client.query("posts", &options).await?;

    let slugs: Vec<String> = response
        .results
        .iter()
        .filter_map(|doc| doc.uid.clone())
        .filter(|uid| !uid.is_empty())
        .collect();

    Ok(PathSet::Known(slugs))
}

/// Build the props for a single post page.
///
/// Returns `Ok(None)` when the store has no post with that slug, so the
/// caller can cache the not-found outcome instead of re-querying on every
/// request.
///
/// # Errors
///
/// Returns an error if the content query fails; the page's build fails
/// explicitly rather than producing partial props.
pub async fn load_props(
    client: &ContentClient,
    config: &Config,
    slug: &str,
) -> Result<Option<Generated<PostDetail>>, ContentError> {
    let doc = client.get_by_uid("posts", slug).await?;

    Ok(doc.map(|raw| Generated::new(format::format_detail(&raw), config.post_revalidate)))
}
