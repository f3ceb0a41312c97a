//! The load-more control.

use maud::{html, Markup, Render};

/// The "Carregar mais posts" control at the bottom of the listing.
///
/// Renders as a form POST so the trigger works without client scripting.
/// Once the feed's continuation token reaches the terminal sentinel the
/// control is rendered disabled and no transition is possible; while a
/// load-more fetch is in flight it is disabled as the overlapping-request
/// guard's visible half.
#[derive(Debug, Clone)]
pub struct LoadMoreButton {
    enabled: bool,
    loading: bool,
}

impl LoadMoreButton {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            loading: false,
        }
    }

    /// Mark a fetch as in flight; the control renders disabled.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl Render for LoadMoreButton {
    fn render(&self) -> Markup {
        let interactive = self.enabled && !self.loading;
        let label = if self.loading {
            "Carregando..."
        } else {
            "Carregar mais posts"
        };

        html! {
            form class="load-more" method="post" action="/posts/load-more" {
                button
                    type="submit"
                    class=(if interactive { "load-posts is-active" } else { "load-posts" })
                    disabled[!interactive] {
                    (label)
                }
            }
        }
    }
}
