//! Integration tests for the load-more pagination flow.

use std::time::Duration;

use spacetraveling::content::format::{self, NextPage};
use spacetraveling::content::{ContentClient, ContentConfig, QueryResponse, Route};
use spacetraveling::feed::{LoadMoreOutcome, PostFeed};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server_uri: &str) -> ContentClient {
    ContentClient::new(&ContentConfig {
        repository: "spacetraveling-test".to_string(),
        endpoint: Some(format!("{server_uri}/api/v2")),
        access_token: None,
        routes: vec![Route {
            document_type: "posts".to_string(),
            path: "/post/:uid".to_string(),
        }],
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build content client")
}

fn raw_page(next_page: &str, uids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "next_page": next_page,
        "results": uids.iter().map(|uid| serde_json::json!({
            "uid": uid,
            "first_publication_date": "2021-03-25T00:00:00Z",
            "data": {
                "title": format!("Title {uid}"),
                "subtitle": format!("Subtitle {uid}"),
                "author": "Author"
            }
        })).collect::<Vec<_>>()
    })
}

/// Seed a feed whose continuation token points at the mock server.
fn seeded_feed(server_uri: &str, uids: &[&str]) -> PostFeed {
    let seed: QueryResponse = serde_json::from_value(raw_page(
        &format!("{server_uri}/page2"),
        uids,
    ))
    .expect("Failed to build seed page");
    PostFeed::new(format::format_page(&seed))
}

#[tokio::test]
async fn test_load_more_appends_and_reaches_sentinel() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_page("", &["b"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let feed = seeded_feed(&mock_server.uri(), &["a"]);

    let outcome = feed.load_more(&client).await;
    assert!(matches!(outcome, LoadMoreOutcome::Loaded(1)));

    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.posts.len(), 2);
    assert_eq!(snapshot.posts[0].uid, "a");
    assert_eq!(snapshot.posts[1].uid, "b");
    assert_eq!(snapshot.next_page, NextPage::End);
    assert!(snapshot.last_error.is_none());

    // Once exhausted, further triggers fetch nothing.
    assert!(matches!(
        feed.load_more(&client).await,
        LoadMoreOutcome::Exhausted
    ));
}

#[tokio::test]
async fn test_rapid_triggers_issue_exactly_one_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(raw_page("", &["b"]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let feed = seeded_feed(&mock_server.uri(), &["a"]);

    let (first, second) = tokio::join!(feed.load_more(&client), feed.load_more(&client));

    let loaded = matches!(first, LoadMoreOutcome::Loaded(_)) as usize
        + matches!(second, LoadMoreOutcome::Loaded(_)) as usize;
    let rejected = matches!(first, LoadMoreOutcome::AlreadyLoading) as usize
        + matches!(second, LoadMoreOutcome::AlreadyLoading) as usize;

    assert_eq!(loaded, 1, "exactly one trigger should fetch");
    assert_eq!(rejected, 1, "the overlapping trigger must be refused");

    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.posts.len(), 2);

    // MockServer verifies expect(1) on drop: one network call total.
}

#[tokio::test]
async fn test_dropped_fetch_releases_the_claim() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(raw_page("", &["b"]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let feed = seeded_feed(&mock_server.uri(), &["a"]);

    // The handler future is dropped mid-fetch when the client disconnects.
    let cancelled = tokio::time::timeout(Duration::from_millis(50), feed.load_more(&client)).await;
    assert!(cancelled.is_err());

    // The claim is released with the dropped future, not left dangling.
    assert!(!feed.snapshot().await.loading);

    let outcome = feed.load_more(&client).await;
    assert!(
        matches!(outcome, LoadMoreOutcome::Loaded(1)),
        "a fresh trigger must fetch after a dropped one"
    );
    assert_eq!(feed.snapshot().await.posts.len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_leaves_feed_unchanged_and_recovers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let feed = seeded_feed(&mock_server.uri(), &["a"]);

    let outcome = feed.load_more(&client).await;
    assert!(matches!(outcome, LoadMoreOutcome::Failed(_)));

    // Accumulated page unchanged; the error is retained for the UI.
    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.posts.len(), 1);
    assert_eq!(
        snapshot.next_page,
        NextPage::Token(format!("{}/page2", mock_server.uri()))
    );
    assert!(snapshot.last_error.is_some());
    assert!(!snapshot.loading);

    // The store recovers; the same token succeeds on the next trigger.
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_page("", &["b"])))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        feed.load_more(&client).await,
        LoadMoreOutcome::Loaded(1)
    ));
    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.posts.len(), 2);
    assert!(snapshot.last_error.is_none());
}

#[tokio::test]
async fn test_order_preserved_across_batches() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_page("", &["c", "d"])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let feed = seeded_feed(&mock_server.uri(), &["a", "b"]);

    feed.load_more(&client).await;

    let snapshot = feed.snapshot().await;
    let uids: Vec<&str> = snapshot.posts.iter().map(|p| p.uid.as_str()).collect();
    // Batches append in received order, no re-sort and no de-dup.
    assert_eq!(uids, vec!["a", "b", "c", "d"]);
}
