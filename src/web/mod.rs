mod routes;
pub mod pages;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::content::format::PostDetail;
use crate::content::ContentClient;
use crate::feed::PostFeed;
use crate::pages as ssg_pages;
use crate::ssg::{Generated, PageCache};

/// Cached props for one post path: the post, or a remembered not-found.
pub type PostProps = Option<PostDetail>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ContentClient,
    pub feed: Arc<PostFeed>,
    pub posts: Arc<PageCache<PostProps>>,
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app).await.context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    let static_dir = find_static_dir();

    Router::new()
        .merge(routes::router())
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Generate the props for one post page and store them in the cache.
///
/// Claims the build for the path first; if another build for the same path
/// is already in flight this is a no-op. A failed build releases the claim
/// so the next request retries, instead of caching partial props.
pub async fn generate_post_page(state: &AppState, slug: &str) {
    let path = post_path(slug);
    if !state.posts.begin_generation(&path).await {
        return;
    }

    match ssg_pages::post::load_props(&state.client, &state.config, slug).await {
        Ok(Some(generated)) => {
            state
                .posts
                .store(
                    &path,
                    Generated::new(Some(generated.props), generated.revalidate_after),
                )
                .await;
        }
        Ok(None) => {
            // Remember the not-found outcome for the same window a post
            // would live, so unknown slugs don't re-query on every hit.
            state
                .posts
                .store(&path, Generated::new(None, state.config.post_revalidate))
                .await;
        }
        Err(e) => {
            error!(slug, "Failed to generate post page: {e}");
            state.posts.fail(&path).await;
        }
    }
}

/// Cache key for a post slug.
pub(crate) fn post_path(slug: &str) -> String {
    format!("/post/{slug}")
}

/// Find the static files directory.
///
/// Checks ./static (development) first, then the installed location.
fn find_static_dir() -> PathBuf {
    let candidates = [
        PathBuf::from("./static"),
        PathBuf::from("/usr/share/spacetraveling/static"),
    ];

    for path in &candidates {
        if path.exists() && path.is_dir() {
            return path.clone();
        }
    }

    PathBuf::from("./static")
}
