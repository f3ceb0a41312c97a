//! Post detail page rendering using maud templates.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::components::BaseLayout;
use crate::content::format::{estimated_reading_time, format_publication_date, PostDetail};

/// Render the full post detail page.
///
/// A post with no content sections renders as an article with zero sections;
/// that is a valid document, not an error.
#[must_use]
pub fn render_post(post: &PostDetail) -> Markup {
    let date = post
        .first_publication_date
        .as_ref()
        .map(format_publication_date);
    let reading_time = estimated_reading_time(post);

    let content = html! {
        article class="post" {
            @if let Some(banner) = post.banner_url.as_deref() {
                figure class="post-banner" {
                    img src=(banner) alt="banner";
                }
            }

            section {
                h1 { (post.title) }
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
                    span class="meta-item meta-reading-time" {
                        span class="icon icon-clock" {}
                        (reading_time) " min"
                    }
                }

                @for section in &post.content {
                    section class="post-section" {
                        h2 class="section-heading" { (section.heading) }
                        // Trusted-content boundary: body_html comes from the
                        // content store's rich-text renderer and is injected
                        // unescaped only here.
                        div class="section-body" {
                            (PreEscaped(&section.body_html))
                        }
                    }
                }
            }
        }
    };

    BaseLayout::new(&post.title).render(content)
}

/// Render the transitional page served while a post is still being generated.
///
/// This is the pass-through of the static-generation fallback state: the
/// page auto-refreshes until the build resolves to the article or a 404.
#[must_use]
pub fn render_post_loading() -> Markup {
    let content = html! {
        section class="post-loading" {
            h1 { "Carregando..." }
        }
    };

    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta http-equiv="refresh" content="1";
                title { "Carregando... | spacetraveling" }
                link rel="stylesheet" href="/static/css/style.css";
            }
            body {
                main class="container" {
                    (content)
                }
            }
        }
    }
}

/// Render the not-found page for a slug the content store does not know.
#[must_use]
pub fn render_not_found() -> Markup {
    let content = html! {
        section class="not-found" {
            h1 { "Post não encontrado" }
            p {
                a href="/" { "Voltar para a home" }
            }
        }
    };

    BaseLayout::new("Post não encontrado").render(content)
}
