//! Listing feed pagination state machine.
//!
//! The feed owns the single accumulated listing page. It is seeded once from
//! the statically generated props and grows only through [`PostFeed::load_more`],
//! which follows the opaque continuation token, decodes the batch through the
//! post formatter, and appends in received order. At most one load-more fetch
//! is in flight at a time; a second trigger while loading is answered without
//! issuing a network call. A failed fetch leaves the accumulated page
//! unchanged and retains the error so the UI can surface a recoverable state.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::content::format::{self, NextPage, PostPage, PostSummary};
use crate::content::{ContentClient, ContentError};

/// Outcome of a load-more trigger.
#[derive(Debug)]
pub enum LoadMoreOutcome {
    /// Appended this many posts; the token advanced.
    Loaded(usize),
    /// The terminal sentinel was already reached; nothing to fetch.
    Exhausted,
    /// Another load-more fetch is in flight; no request was issued.
    AlreadyLoading,
    /// The fetch failed; the accumulated page is unchanged.
    Failed(ContentError),
}

/// A read-only copy of the feed for rendering.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub posts: Vec<PostSummary>,
    pub next_page: NextPage,
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct FeedState {
    page: PostPage,
    last_error: Option<String>,
}

/// The accumulated listing feed, shared across handlers.
///
/// The in-flight claim lives outside the mutex so it can be released from
/// `Drop`: the handler future running [`PostFeed::load_more`] is dropped
/// when the client disconnects, and the claim must not outlive the fetch.
#[derive(Debug)]
pub struct PostFeed {
    state: Mutex<FeedState>,
    loading: AtomicBool,
}

/// Releases the in-flight claim when dropped, whether the fetch completed
/// or its future was dropped mid-flight.
struct LoadingClaim<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingClaim<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl PostFeed {
    /// Seed the feed from statically generated props. This is the only way
    /// a feed comes into existence; it never starts from a client-side fetch.
    #[must_use]
    pub fn new(seed: PostPage) -> Self {
        Self {
            state: Mutex::new(FeedState {
                page: seed,
                last_error: None,
            }),
            loading: AtomicBool::new(false),
        }
    }

    /// Snapshot the current feed for rendering.
    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.lock().await;
        FeedSnapshot {
            posts: state.page.posts.clone(),
            next_page: state.page.next_page.clone(),
            loading: self.loading.load(Ordering::Acquire),
            last_error: state.last_error.clone(),
        }
    }

    /// Fetch the next batch and append it to the accumulated page.
    ///
    /// The lock is released during the network fetch; the `loading` claim is
    /// what prevents overlapping requests, not the lock itself. The claim is
    /// released on drop, so a caller dropped mid-fetch leaves the feed ready
    /// for the next trigger.
    pub async fn load_more(&self, client: &ContentClient) -> LoadMoreOutcome {
        if self.loading.swap(true, Ordering::AcqRel) {
            debug!("Load-more already in flight, ignoring trigger");
            return LoadMoreOutcome::AlreadyLoading;
        }
        let _claim = LoadingClaim {
            flag: &self.loading,
        };

        let token = {
            let state = self.state.lock().await;
            match &state.page.next_page {
                NextPage::End => return LoadMoreOutcome::Exhausted,
                NextPage::Token(token) => token.clone(),
            }
        };

        let fetched = client.fetch_page(&token).await.map(|raw| format::format_page(&raw));

        let mut state = self.state.lock().await;
        match fetched {
            Ok(batch) => {
                let appended = batch.posts.len();
                // Received order is preserved; no re-sort, no de-dup.
                state.page.posts.extend(batch.posts);
                state.page.next_page = batch.next_page;
                state.last_error = None;
                info!(appended, "Loaded more posts");
                LoadMoreOutcome::Loaded(appended)
            }
            Err(e) => {
                warn!("Load-more fetch failed: {e}");
                state.last_error = Some(e.to_string());
                LoadMoreOutcome::Failed(e)
            }
        }
    }

    /// Replace the accumulated page with a freshly generated seed.
    ///
    /// Used by the listing revalidation loop; accumulation restarts from the
    /// new first page, mirroring static regeneration of the listing.
    pub async fn reseed(&self, seed: PostPage) {
        let mut state = self.state.lock().await;
        state.page = seed;
        state.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(uid: &str) -> PostSummary {
        PostSummary {
            uid: uid.to_string(),
            first_publication_date: None,
            title: format!("Post {uid}"),
            subtitle: String::new(),
            author: String::new(),
        }
    }

    fn seed_page(next: NextPage, uids: &[&str]) -> PostPage {
        PostPage {
            next_page: next,
            posts: uids.iter().map(|u| post(u)).collect(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_reflects_seed() {
        let feed = PostFeed::new(seed_page(NextPage::Token("/page2".to_string()), &["a", "b"]));
        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.posts.len(), 2);
        assert_eq!(snapshot.next_page, NextPage::Token("/page2".to_string()));
        assert!(!snapshot.loading);
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn test_load_more_exhausted_without_network() {
        // No client is needed: the terminal sentinel short-circuits before
        // any request would be issued.
        let feed = PostFeed::new(seed_page(NextPage::End, &["a"]));
        let client = crate::content::ContentClient::new(&crate::content::ContentConfig {
            repository: "test".to_string(),
            endpoint: Some("http://127.0.0.1:1/api/v2".to_string()),
            access_token: None,
            routes: vec![],
            timeout: std::time::Duration::from_secs(1),
        })
        .unwrap();

        assert!(matches!(
            feed.load_more(&client).await,
            LoadMoreOutcome::Exhausted
        ));
        assert_eq!(feed.snapshot().await.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_reseed_replaces_accumulation() {
        let feed = PostFeed::new(seed_page(NextPage::End, &["a", "b", "c"]));
        feed.reseed(seed_page(NextPage::Token("/page2".to_string()), &["d"]))
            .await;
        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.posts.len(), 1);
        assert_eq!(snapshot.posts[0].uid, "d");
        assert_eq!(snapshot.next_page, NextPage::Token("/page2".to_string()));
    }
}
