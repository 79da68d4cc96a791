//! YouTube Data API v3 client library.
//!
//! This module provides a small client for the read-only, API key authenticated parts of the
//! YouTube Data API v3 that corpus collection needs.
//!
//! # Core Concepts: Search vs Videos
//!
//! Building a corpus takes two different endpoints that serve different purposes:
//!
//! ## [`search::SearchListResponse`] - Discovery
//! - **What it returns**: Only ids (`part=id`), one page of up to 50 at a time
//! - **Filters**: Free-text query, coarse duration bucket, publish-date cutoff
//! - **Cost**: 100 quota units per page, so it is the expensive call
//! - **Caveat**: Results span every category and are only loosely matched to the query
//!
//! ## [`videos::VideoListResponse`] - Enrichment
//! - **What it returns**: Title, category, counters and exact duration for up to 50 ids
//! - **Cost**: 1 quota unit per batch
//! - **Use for**: Deciding which discovered videos actually belong in the corpus
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_engagement_corpus::config::ApiConfig;
//! use youtube_engagement_corpus::youtube_api::{DurationBucket, YouTubeClient};
//!
//! # async fn example() -> eyre::Result<()> {
//! let client = YouTubeClient::new("my-api-key", &ApiConfig::default())?;
//! let page = client
//!     .search_videos_page("full gameplay", DurationBucket::Long, 50, None)
//!     .await?;
//! let ids: Vec<String> = page.items.into_iter().filter_map(|item| item.id.video_id).collect();
//! let details = client.list_videos(&ids).await?;
//! for video in details.items {
//!     println!("{}: {:?}", video.id, video.content_details.duration);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod search;
pub mod types;
pub mod videos;

// Re-export main types for convenience
pub use client::{MAX_PAGE_SIZE, YouTubeClient, mask_api_key};
pub use search::{DurationBucket, SearchListResponse, SearchResult, SearchResultId};
pub use types::{ApiError, ApiErrorResponse, Page, PageInfo, PageRequest, PagedStream};
pub use videos::{Video, VideoContentDetails, VideoListResponse, VideoSnippet, VideoStatistics};
