//! Search discovery against a mock YouTube search endpoint.
//!
//! Uses wiremock to stand in for `search.list`, so pagination and the partial-result policy can be
//! checked without network access or quota.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
};
use youtube_engagement_corpus::config::ApiConfig;
use youtube_engagement_corpus::youtube_api::{DurationBucket, YouTubeClient};

fn client(server: &MockServer) -> YouTubeClient {
    let config = ApiConfig {
        base_url: server.uri(),
        request_interval_ms: 1,
        request_timeout_secs: 5,
        ..ApiConfig::default()
    };
    YouTubeClient::new("test-key", &config).unwrap()
}

fn search_page(ids: impl IntoIterator<Item = String>, next_page_token: Option<&str>) -> Value {
    let items: Vec<Value> = ids
        .into_iter()
        .map(|id| json!({ "kind": "youtube#searchResult", "id": { "kind": "youtube#video", "videoId": id } }))
        .collect();
    let mut page = json!({
        "kind": "youtube#searchListResponse",
        "pageInfo": { "totalResults": 1000, "resultsPerPage": items.len() },
        "items": items,
    });
    if let Some(token) = next_page_token {
        page["nextPageToken"] = json!(token);
    }
    page
}

fn ids(range: std::ops::Range<usize>) -> impl Iterator<Item = String> {
    range.map(|n| format!("vid-{n}"))
}

#[tokio::test]
async fn follows_cursor_until_last_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_is_missing("pageToken"))
        .and(query_param("q", "gaming clip"))
        .and(query_param("maxResults", "50"))
        .and(query_param("order", "viewCount"))
        .and(query_param("type", "video"))
        .and(query_param("publishedAfter", "2024-01-01T00:00:00Z"))
        .and(query_param("key", "test-key"))
        .and(query_param_is_missing("videoDuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(0..50), Some("page-2"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "page-2"))
        // 80 wanted, 50 already delivered
        .and(query_param("maxResults", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(50..60), None)))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .discover("gaming clip", DurationBucket::Any, 80)
        .await;

    assert_eq!(found, ids(0..60).collect::<Vec<_>>());
}

#[tokio::test]
async fn stops_once_max_results_reached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("videoDuration", "long"))
        .and(query_param("maxResults", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(0..30), Some("more"))))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .discover("full gameplay", DurationBucket::Long, 30)
        .await;

    assert_eq!(found.len(), 30);
}

#[tokio::test]
async fn last_page_only_asks_for_the_remainder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_is_missing("pageToken"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(0..50), Some("p2"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "p2"))
        .and(query_param("maxResults", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(50..70), Some("p3"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(70..80), None)))
        .expect(0)
        .mount(&server)
        .await;

    let found = client(&server)
        .discover("gaming clip", DurationBucket::Any, 70)
        .await;
    assert_eq!(found, ids(0..70).collect::<Vec<_>>());
}

#[tokio::test]
async fn duplicates_and_non_videos_are_dropped() {
    let server = MockServer::start().await;

    let page = json!({
        "items": [
            { "id": { "kind": "youtube#video", "videoId": "a" } },
            { "id": { "kind": "youtube#channel", "channelId": "UC123" } },
            { "id": { "kind": "youtube#video", "videoId": "a" } },
            { "id": { "kind": "youtube#video", "videoId": "b" } }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page))
        .mount(&server)
        .await;

    let found = client(&server).discover("cover", DurationBucket::Any, 80).await;
    assert_eq!(found, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn api_error_keeps_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(ids(0..50), Some("page-2"))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "quota exceeded",
                "errors": [{ "domain": "youtube.quota", "reason": "quotaExceeded" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .discover("gaming clip", DurationBucket::Any, 80)
        .await;
    assert_eq!(found, ids(0..50).collect::<Vec<_>>());
}

#[tokio::test]
async fn embedded_error_object_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 400, "message": "invalid publishedAfter" }
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .search_videos_page("cover", DurationBucket::Any, 50, None)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("invalid publishedAfter"), "{err:#}");
    assert!(client.discover("cover", DurationBucket::Any, 50).await.is_empty());
}

#[tokio::test]
async fn empty_page_ends_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(search_page(std::iter::empty(), Some("again"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server).discover("nothing", DurationBucket::Any, 80).await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn transport_failure_returns_nothing() {
    // nothing listens on the TCP port multiplexer port
    let config = ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        request_interval_ms: 1,
        request_timeout_secs: 2,
        ..ApiConfig::default()
    };
    let client = YouTubeClient::new("test-key", &config).unwrap();
    assert!(client.discover("cover", DurationBucket::Any, 80).await.is_empty());
}
