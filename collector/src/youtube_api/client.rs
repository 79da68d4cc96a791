//! Core YouTube API client functionality: authentication, rate limiting and request plumbing.

use crate::config::ApiConfig;
use crate::youtube_api::{
    search::{DurationBucket, SearchListResponse},
    types::ApiErrorResponse,
    videos::VideoListResponse,
};
use eyre::Context;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use http::Method;
use jiff::Timestamp;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// The most ids the `videos.list` endpoint accepts in one request, and the largest page size the
/// `search.list` endpoint will return.
pub const MAX_PAGE_SIZE: usize = 50;

/// Client for the public (API key authenticated) parts of the YouTube Data API v3.
///
/// Every request goes through one shared token-bucket rate limiter with a burst of one, so
/// consecutive calls are spaced at least [`ApiConfig::request_interval`] apart no matter which
/// endpoint they hit. Every request also carries [`ApiConfig::request_timeout`], so a stalled
/// connection cannot block the collection forever.
///
/// Cloning is cheap and clones share the rate limiter.
#[derive(Clone)]
pub struct YouTubeClient {
    /// The API key sent as the `key` query parameter.
    api_key: Arc<str>,
    /// Endpoint root, normally `https://www.googleapis.com/youtube/v3`.
    base_url: Arc<str>,
    /// Only search for videos published after this point in time.
    published_after: Timestamp,
    /// HTTP client for API requests
    client: reqwest::Client,
    limiter: Arc<DirectRateLimiter>,
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("published_after", &self.published_after)
            .finish_non_exhaustive()
    }
}

/// Renders an API key safe for logs: the first five characters followed by a fixed mask.
pub fn mask_api_key(api_key: &str) -> String {
    let prefix: String = api_key.chars().take(5).collect();
    format!("{prefix}*****")
}

impl YouTubeClient {
    /// Creates a new YouTube API client using the given API key.
    ///
    /// Fails if the key is empty, the request interval is zero, or the HTTP client cannot be
    /// constructed.
    pub fn new(api_key: impl Into<String>, config: &ApiConfig) -> eyre::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            eyre::bail!("YouTube API key is empty");
        }

        let quota = Quota::with_period(config.request_interval())
            .ok_or_else(|| eyre::eyre!("request interval must be greater than zero"))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').into(),
            published_after: config.published_after,
            client,
            limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Makes a rate-limited GET request to a YouTube API endpoint and decodes the JSON body.
    ///
    /// This consolidates the logic shared by every endpoint:
    /// - waiting for the rate limiter
    /// - attaching the API key
    /// - status code validation, decoding the API's error object where there is one
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The endpoint name relative to the base URL, e.g. `search`
    /// * `query_params` - Query parameters other than the API key
    #[instrument(skip(self, query_params), level = tracing::Level::TRACE)]
    pub(crate) async fn get_json<T>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> eyre::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .request(Method::GET, &url)
            .query(query_params)
            .query(&[("key", &*self.api_key)])
            .send()
            .await
            .with_context(|| format!("send {} request to YouTube API: {}", Method::GET, url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let message = match serde_json::from_str::<ApiErrorResponse>(&error_text) {
                Ok(body) => body.error.to_string(),
                Err(_) => error_text,
            };
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                endpoint,
                status_code,
                message
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("parse YouTube {endpoint} API response as JSON"))
    }

    /// Fetches a single page of `search.list` results for videos.
    ///
    /// Results are ordered by view count and restricted to videos published after the
    /// configured cutoff. The `videoDuration` filter is only sent for buckets other than
    /// [`DurationBucket::Any`].
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search term
    /// * `bucket` - Coarse duration filter
    /// * `max_results` - Page size (clamped to 1-50)
    /// * `page_token` - Optional page token for pagination
    ///
    /// # API Cost
    ///
    /// 100 quota units per call, regardless of page size.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search_videos_page(
        &self,
        query: &str,
        bucket: DurationBucket,
        max_results: usize,
        page_token: Option<&str>,
    ) -> eyre::Result<SearchListResponse> {
        let max_results_string = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let published_after = self.published_after.to_string();
        let mut query_params = vec![
            ("part", "id"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results_string.as_str()),
            ("order", "viewCount"),
            ("publishedAfter", published_after.as_str()),
        ];

        if let Some(duration) = bucket.query_value() {
            query_params.push(("videoDuration", duration));
        }

        if let Some(token) = page_token {
            query_params.push(("pageToken", token));
        }

        let mut response: SearchListResponse = self.get_json("search", &query_params).await?;

        if let Some(error) = response.error.take() {
            return Err(eyre::Report::new(error).wrap_err("YouTube search API returned an error"));
        }

        tracing::debug!(
            total_results = response.page_info.total_results,
            returned_items = response.items.len(),
            has_next_page = response.next_page_token.is_some(),
            "fetched search page"
        );

        Ok(response)
    }

    /// Fetches snippet, statistics and content details for up to 50 videos at once.
    ///
    /// # Arguments
    ///
    /// * `video_ids` - The ids to look up; at most [`MAX_PAGE_SIZE`]
    ///
    /// # API Cost
    ///
    /// 1 quota unit per call.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self, video_ids), fields(count = video_ids.len()))]
    pub async fn list_videos(&self, video_ids: &[String]) -> eyre::Result<VideoListResponse> {
        if video_ids.len() > MAX_PAGE_SIZE {
            eyre::bail!(
                "videos.list accepts at most {MAX_PAGE_SIZE} ids, got {}",
                video_ids.len()
            );
        }

        let ids = video_ids.join(",");
        let query_params = [
            ("part", "snippet,statistics,contentDetails"),
            ("id", ids.as_str()),
        ];

        let mut response: VideoListResponse = self.get_json("videos", &query_params).await?;

        if let Some(error) = response.error.take() {
            return Err(eyre::Report::new(error).wrap_err("YouTube videos API returned an error"));
        }

        tracing::debug!(
            requested = video_ids.len(),
            returned_items = response.items.len(),
            "fetched video details"
        );

        Ok(response)
    }
}
