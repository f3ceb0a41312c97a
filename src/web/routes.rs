use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;

use super::pages::{home, post as post_page};
use super::{generate_post_page, post_path, AppState};
use crate::feed::LoadMoreOutcome;
use crate::ssg::CacheStatus;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/posts/load-more", post(load_more))
        .route("/post/:slug", get(post_detail))
        .route("/healthz", get(health))
}

/// Listing page: renders the accumulated feed.
async fn home_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.feed.snapshot().await;

    let hrefs: Vec<String> = snapshot
        .posts
        .iter()
        .map(|p| {
            state
                .client
                .resolve_route("posts", &p.uid)
                .unwrap_or_else(|| post_path(&p.uid))
        })
        .collect();

    let markup = home::render_home(&home::HomePageParams {
        snapshot: &snapshot,
        hrefs: &hrefs,
    });
    Html(markup.into_string()).into_response()
}

/// Load-more trigger: advances the feed through its continuation token,
/// then returns to the listing. A failure shows up there as the error
/// banner; a trigger while another fetch is in flight issues no request.
async fn load_more(State(state): State<AppState>) -> Response {
    match state.feed.load_more(&state.client).await {
        LoadMoreOutcome::Loaded(_) | LoadMoreOutcome::AlreadyLoading => {}
        LoadMoreOutcome::Exhausted => {
            tracing::debug!("Load-more triggered after the terminal sentinel");
        }
        LoadMoreOutcome::Failed(e) => {
            tracing::error!("Load-more failed: {e}");
        }
    }

    Redirect::to("/").into_response()
}

/// Post detail page, through the static-generation cache.
///
/// Fresh props render directly; stale props render while a background
/// refresh runs; a path that was never built serves the transitional
/// "Carregando..." page while its first build runs (fallback behavior).
async fn post_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let path = post_path(&slug);

    match state.posts.lookup(&path).await {
        CacheStatus::Fresh(Some(post)) => {
            Html(post_page::render_post(&post).into_string()).into_response()
        }
        CacheStatus::Fresh(None) => not_found(),
        CacheStatus::Stale(props) => {
            let bg_state = state.clone();
            let bg_slug = slug.clone();
            tokio::spawn(async move {
                generate_post_page(&bg_state, &bg_slug).await;
            });

            match props {
                Some(post) => Html(post_page::render_post(&post).into_string()).into_response(),
                None => not_found(),
            }
        }
        CacheStatus::Generating => loading(),
        CacheStatus::Miss => {
            let bg_state = state.clone();
            let bg_slug = slug.clone();
            tokio::spawn(async move {
                generate_post_page(&bg_state, &bg_slug).await;
            });

            loading()
        }
    }
}

fn loading() -> Response {
    Html(post_page::render_post_loading().into_string()).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(post_page::render_not_found().into_string()),
    )
        .into_response()
}

async fn health() -> &'static str {
    "ok"
}
