//! Base layout component for the web UI.

use maud::{html, Markup, DOCTYPE};

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello" } };
/// let page = BaseLayout::new("Posts").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content is placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="pt-BR" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " | spacetraveling" }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (Self::render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                }
            }
        }
    }

    /// Render the page header with the site logo.
    fn render_header() -> Markup {
        html! {
            header class="container" {
                a href="/" {
                    strong class="site-logo" { "spacetraveling" span class="logo-accent" { "." } }
                }
            }
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { "spacetraveling" }
            }
        }
    }
}
