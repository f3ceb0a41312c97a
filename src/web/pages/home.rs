//! Listing page rendering using maud templates.

use maud::{html, Markup};

use crate::components::{Alert, BaseLayout, EmptyState, LoadMoreButton, PostCard};
use crate::feed::FeedSnapshot;

/// Parameters for rendering the listing page.
#[derive(Debug, Clone)]
pub struct HomePageParams<'a> {
    /// The accumulated feed to display.
    pub snapshot: &'a FeedSnapshot,
    /// Resolved detail-page path per post, parallel to `snapshot.posts`.
    pub hrefs: &'a [String],
}

/// Render the listing page.
///
/// Shows the accumulated posts, a visible error banner when the last
/// load-more fetch failed, and the load-more control (non-interactive once
/// the terminal sentinel is reached or while a fetch is in flight).
#[must_use]
pub fn render_home(params: &HomePageParams) -> Markup {
    let snapshot = params.snapshot;

    let content = html! {
        @if let Some(error) = snapshot.last_error.as_deref() {
            (Alert::error(error))
        }

        @if snapshot.posts.is_empty() {
            (EmptyState::no_posts())
        } @else {
            div class="post-list" {
                @for (post, href) in snapshot.posts.iter().zip(params.hrefs) {
                    (PostCard::new(post, href))
                }
            }
        }

        (LoadMoreButton::new(!snapshot.next_page.is_end()).loading(snapshot.loading))
    };

    BaseLayout::new("Posts").render(content)
}
