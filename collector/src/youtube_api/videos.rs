//! YouTube Videos API types.

use crate::youtube_api::types::{ApiError, PageInfo};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `videos.list` API call.
///
/// Contains a list of [`Video`] resources that match the requested ids. Ids that do not exist
/// (deleted or private videos) are silently left out by the API.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#videoListResponse`.
    pub kind: String,
    /// A list of videos that match the request criteria.
    pub items: VecDeque<Video>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Set when the API embedded an error object instead of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// A `video` resource represents a YouTube video.
///
/// Only the `snippet`, `statistics` and `contentDetails` parts are modelled, since those are the
/// parts requested when enriching search results. Every part may be missing from a response, in
/// which case it deserializes to its default.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    /// Basic details about the video, such as its title and category.
    #[serde(default)]
    pub snippet: VideoSnippet,
    /// Engagement counters for the video.
    #[serde(default)]
    pub statistics: VideoStatistics,
    /// Information about the video content, including its length.
    #[serde(rename = "contentDetails", default)]
    pub content_details: VideoContentDetails,
}

/// Basic details about a video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSnippet {
    /// The video's title.
    pub title: Option<String>,
    /// The YouTube video category associated with the video, e.g. `"20"` for Gaming.
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    /// The date and time that the video was published, in ISO 8601 format.
    ///
    /// Kept as the raw string, since it is passed through to the corpus untouched.
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

/// Statistics about the video.
///
/// The API encodes every counter as a decimal string, and leaves a counter out entirely when the
/// uploader has hidden it.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoStatistics {
    /// The number of times the video has been viewed.
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    /// The number of users who have indicated that they liked the video.
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    /// The number of comments for the video.
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}

impl VideoStatistics {
    pub fn views(&self) -> u64 {
        parse_counter(self.view_count.as_deref())
    }

    pub fn likes(&self) -> u64 {
        parse_counter(self.like_count.as_deref())
    }

    pub fn comments(&self) -> u64 {
        parse_counter(self.comment_count.as_deref())
    }
}

fn parse_counter(counter: Option<&str>) -> u64 {
    counter.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Information about the video content.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#contentDetails>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoContentDetails {
    /// The length of the video as an ISO 8601 duration, e.g. `PT15M33S`.
    ///
    /// Upcoming and live broadcasts report `P0D`.
    pub duration: Option<String>,
}
