//! YouTube Search API types.

use crate::youtube_api::types::{ApiError, PageInfo};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `search.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#searchListResponse`.
    pub kind: String,
    /// A list of results that match the search criteria.
    pub items: VecDeque<SearchResult>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    /// Set when the API embedded an error object instead of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// A search result points at a single video, channel or playlist.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: SearchResultId,
}

/// Identifies the resource a [`SearchResult`] refers to.
///
/// Exactly one of the id fields is set, depending on `kind`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResultId {
    /// The type of the resource, e.g. `youtube#video`.
    pub kind: String,
    /// Set if the result is a video.
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// The API's own coarse duration filter (`videoDuration`).
///
/// This is much coarser than the minute-based windows the corpus uses, so it only narrows the
/// candidate set; it never replaces the exact duration checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationBucket {
    /// Videos shorter than four minutes.
    Short,
    /// Videos between four and twenty minutes long.
    Medium,
    /// Videos longer than twenty minutes.
    Long,
    /// No duration filter at all.
    Any,
}

impl DurationBucket {
    /// The value for the `videoDuration` query parameter.
    ///
    /// [`DurationBucket::Any`] omits the parameter rather than sending `any`, so that the results
    /// are exactly those of an unfiltered search.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            DurationBucket::Short => Some("short"),
            DurationBucket::Medium => Some("medium"),
            DurationBucket::Long => Some("long"),
            DurationBucket::Any => None,
        }
    }
}
