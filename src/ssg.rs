//! Static generation driver.
//!
//! Each page type exposes two entry points: a path lister (the known slugs,
//! or a marker that paths are generated on first request) and a props loader
//! returning the page props plus a revalidation window. This module holds the
//! request-time cache that gives those entry points their incremental
//! regeneration semantics: props are generated once, served from memory,
//! refreshed in the background after the window expires, and a path that was
//! never built serves a transitional state while its first build runs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

/// The set of paths known at build time for a page type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSet {
    /// Slugs enumerated up front. Paths outside the set are still generated
    /// on first request.
    Known(Vec<String>),
    /// Nothing pre-built; every path is generated on first request.
    OnDemand,
}

/// Generated page props plus the window after which they go stale.
#[derive(Debug, Clone)]
pub struct Generated<P> {
    pub props: P,
    pub revalidate_after: Duration,
}

impl<P> Generated<P> {
    pub fn new(props: P, revalidate_after: Duration) -> Self {
        Self {
            props,
            revalidate_after,
        }
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus<P> {
    /// Cached and within its revalidation window; serve as-is.
    Fresh(P),
    /// Cached but past its window; serve, then regenerate in background.
    Stale(P),
    /// A build for this path is in flight and no props exist yet; serve the
    /// transitional state.
    Generating,
    /// Never built; the caller claims the build and serves the transitional
    /// state.
    Miss,
}

#[derive(Debug)]
struct Entry<P> {
    props: Option<(P, Instant, Duration)>,
    building: bool,
}

impl<P> Default for Entry<P> {
    fn default() -> Self {
        Self {
            props: None,
            building: false,
        }
    }
}

/// Per-path cache of generated page props.
#[derive(Debug, Default)]
pub struct PageCache<P> {
    entries: RwLock<HashMap<String, Entry<P>>>,
}

impl<P: Clone> PageCache<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the cached props for a path.
    pub async fn lookup(&self, path: &str) -> CacheStatus<P> {
        let entries = self.entries.read().await;
        match entries.get(path) {
            None => CacheStatus::Miss,
            Some(entry) => match &entry.props {
                None if entry.building => CacheStatus::Generating,
                None => CacheStatus::Miss,
                Some((props, generated_at, revalidate_after)) => {
                    if generated_at.elapsed() < *revalidate_after {
                        CacheStatus::Fresh(props.clone())
                    } else {
                        CacheStatus::Stale(props.clone())
                    }
                }
            },
        }
    }

    /// Claim the build for a path. Returns false when another build for the
    /// same path is already in flight, so only one builder runs per path.
    pub async fn begin_generation(&self, path: &str) -> bool {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(path.to_string()).or_default();
        if entry.building {
            false
        } else {
            entry.building = true;
            true
        }
    }

    /// Store freshly generated props for a path and release its build claim.
    pub async fn store(&self, path: &str, generated: Generated<P>) {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(path.to_string()).or_default();
        entry.props = Some((generated.props, Instant::now(), generated.revalidate_after));
        entry.building = false;
        debug!(path, "Stored generated page props");
    }

    /// Release the build claim after a failed build.
    ///
    /// A path with no prior props returns to `Miss`, so the next request
    /// retries the build explicitly instead of serving partial props.
    pub async fn fail(&self, path: &str) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(path) {
            entry.building = false;
            if entry.props.is_none() {
                entries.remove(path);
            }
        }
    }

    /// Drop expired entries whose props fail the keep predicate.
    ///
    /// Bounds the cache: every distinct requested path adds an entry, and
    /// paths that resolved to nothing worth keeping (remembered not-found
    /// outcomes) would otherwise accumulate for every probed slug. Entries
    /// within their window, entries with a build in flight, and expired
    /// entries the predicate keeps (stale props still serve while their
    /// refresh runs) all survive the sweep.
    pub async fn evict_expired<F>(&self, keep: F)
    where
        F: Fn(&P) -> bool,
    {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| {
            entry.building
                || match &entry.props {
                    None => true,
                    Some((props, generated_at, revalidate_after)) => {
                        generated_at.elapsed() < *revalidate_after || keep(props)
                    }
                }
        });
    }
}
