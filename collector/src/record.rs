//! The unit of the corpus: one video with the fields the engagement comparison needs.

use serde::{Deserialize, Serialize};

/// One video, as admitted to a category's collection.
///
/// Records are built by enrichment from raw API data and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// The category the record was collected under. Always equal to the category the API reports
    /// for the video.
    pub category_id: String,
    pub category_name: String,
    pub duration_seconds: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    /// Publication timestamp exactly as the API reported it.
    pub published_at: String,
}

impl VideoRecord {
    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }
}
