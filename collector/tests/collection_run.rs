//! A full collection run against mock search and videos endpoints.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{method, path, query_param, query_param_is_missing},
};
use youtube_engagement_corpus::config::{ApiConfig, CategoryTarget, CollectorConfig};
use youtube_engagement_corpus::pipeline;
use youtube_engagement_corpus::youtube_api::YouTubeClient;

fn search_page(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": { "kind": "youtube#video", "videoId": id } }))
        .collect();
    json!({ "items": items })
}

/// Ids starting with `s` are three minutes long, everything else 25 minutes.
fn videos(request: &Request) -> ResponseTemplate {
    let ids = request
        .url
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, ids)| ids.into_owned())
        .unwrap_or_default();
    let items: Vec<Value> = ids
        .split(',')
        .filter(|id| !id.is_empty())
        .map(|id| {
            let duration = if id.starts_with('s') { "PT3M" } else { "PT25M" };
            json!({
                "id": id,
                "snippet": { "title": id, "categoryId": "20", "publishedAt": "2024-05-05T05:05:05Z" },
                "statistics": { "viewCount": "1000", "likeCount": "40", "commentCount": "10" },
                "contentDetails": { "duration": duration }
            })
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "items": items }))
}

#[tokio::test]
async fn collects_both_phases_and_writes_csv() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_is_missing("videoDuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["s1", "l9", "s2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("videoDuration", "long"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(&["l1", "s3", "l2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(videos)
        .expect(2)
        .mount(&server)
        .await;

    let config = CollectorConfig {
        categories: vec![CategoryTarget::new(
            "20",
            "Gaming",
            ["gaming clip", "clutch moment"],
            ["full gameplay", "let's play"],
        )],
        target_count: 2,
        max_short_attempts: 3,
        api: ApiConfig {
            base_url: server.uri(),
            request_interval_ms: 1,
            request_timeout_secs: 5,
            ..ApiConfig::default()
        },
        ..CollectorConfig::default()
    };
    config.validate().unwrap();
    let client = YouTubeClient::new("test-key", &config.api).unwrap();

    let collection = pipeline::run(&config, &client).await.unwrap();

    let ids: Vec<_> = collection
        .corpus
        .rows()
        .iter()
        .map(|row| row.video_id.as_str())
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "l1", "l2"]);
    assert_eq!(collection.shortfalls().count(), 0);
    assert_eq!(collection.short[0].searches, 1);
    assert_eq!(collection.long[0].searches, 1);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("youtube_length_engagement.csv");
    collection.corpus.write_csv_path(&output).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[1],
        "s1,s1,20,Gaming,180,3.0,1000,40,10,2024-05-05T05:05:05Z,0.04,0.01,0.05"
    );
}
