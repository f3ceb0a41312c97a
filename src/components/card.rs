//! Card components for the post listing.

use maud::{html, Markup, Render};

use crate::content::format::{format_publication_date, PostSummary};

/// A post summary card linking to the post's detail page.
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    post: &'a PostSummary,
    href: &'a str,
}

impl<'a> PostCard<'a> {
    /// Create a card for a post with its resolved detail-page path.
    #[must_use]
    pub fn new(post: &'a PostSummary, href: &'a str) -> Self {
        Self { post, href }
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        // Display formatting happens here and nowhere else.
        let date = post
            .first_publication_date
            .as_ref()
            .map(format_publication_date);

        html! {
            article class="post-card" {
                a href=(self.href) {
                    strong class="post-title" { (post.title) }
                    p class="post-subtitle" { (post.subtitle) }
                    div class="post-meta" {
                        span class="meta-item meta-date" {
                            span class="icon icon-calendar" {}
                            @if let Some(date) = date {
                                time { (date) }
                            }
                        }
                        span class="meta-item meta-author" {
                            span class="icon icon-user" {}
                            (post.author)
                        }
                    }
                }
            }
        }
    }
}

/// Message shown when the listing has no posts.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// The default empty listing state.
    #[must_use]
    pub fn no_posts() -> Self {
        Self::new("Nenhum post encontrado.")
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}
