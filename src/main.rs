use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spacetraveling::config::Config;
use spacetraveling::content::{ContentClient, ContentConfig};
use spacetraveling::feed::PostFeed;
use spacetraveling::ssg::{PageCache, PathSet};
use spacetraveling::web::{self, AppState};
use spacetraveling::pages;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    init_tracing()?;

    info!("Starting spacetraveling");

    // Load and validate configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(repository = %config.cms_repository, "Configuration loaded");

    // Build the content client from explicit configuration
    let client = ContentClient::new(&ContentConfig::from_app_config(&config))
        .context("Failed to build content client")?;

    // Statically generate the listing: the feed is seeded from this query
    // and never from a client-side fetch. A failure here fails startup
    // explicitly instead of serving an empty listing.
    let seed = pages::home::load_props(&client, &config)
        .await
        .context("Failed to generate the listing page")?;

    info!(posts = seed.props.posts.len(), "Listing page generated");

    let home_revalidate = seed.revalidate_after;

    let state = AppState {
        config: Arc::new(config),
        client,
        feed: Arc::new(PostFeed::new(seed.props)),
        posts: Arc::new(PageCache::new()),
    };

    // Pre-build the known post pages in the background; slugs outside this
    // set are still generated on first request.
    let warm_state = state.clone();
    tokio::spawn(async move {
        prebuild_post_pages(&warm_state).await;
    });

    // Revalidate the listing periodically; accumulation restarts from the
    // fresh first page.
    let revalidate_state = state.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(home_revalidate).await;
            match pages::home::load_props(&revalidate_state.client, &revalidate_state.config).await
            {
                Ok(generated) => {
                    revalidate_state.feed.reseed(generated.props).await;
                    info!("Listing page revalidated");
                }
                Err(e) => warn!("Listing revalidation failed, keeping current page: {e}"),
            }
        }
    });

    // Sweep expired not-found entries out of the post cache so probed
    // unknown slugs don't accumulate; real posts keep serving stale props.
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let interval = sweep_state.config.post_revalidate;
        loop {
            tokio::time::sleep(interval).await;
            sweep_state.posts.evict_expired(Option::is_some).await;
        }
    });

    // Start web server in background
    let web_state = state.clone();
    let web_handle = tokio::spawn(async move {
        if let Err(e) = web::serve(web_state).await {
            error!("Web server error: {e:#}");
        }
    });

    // Wait for shutdown signal
    shutdown_signal().await;

    info!("Shutting down...");

    web_handle.abort();

    info!("Shutdown complete");

    Ok(())
}

/// Build all post pages the content store knows about at startup.
async fn prebuild_post_pages(state: &AppState) {
    let paths = match pages::post::list_paths(&state.client).await {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Failed to list post paths, pages will build on first request: {e}");
            return;
        }
    };

    match paths {
        PathSet::OnDemand => {}
        PathSet::Known(slugs) => {
            info!(count = slugs.len(), "Pre-building post pages");
            for slug in slugs {
                web::generate_post_page(state, &slug).await;
            }
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,spacetraveling=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
