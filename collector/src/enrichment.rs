//! Detail enrichment: looking up full metadata for discovered ids and keeping only the videos
//! that can enter the corpus.

use crate::config::CategoryTarget;
use crate::duration::parse_duration;
use crate::record::VideoRecord;
use crate::youtube_api::{MAX_PAGE_SIZE, Video, YouTubeClient};

impl YouTubeClient {
    /// Fetches metadata for `ids` in batches of 50 and converts the usable videos into records.
    ///
    /// A batch that fails is skipped and the remaining batches are still fetched. Records come
    /// back in the order the API returned them; duplicates are not removed here.
    #[tracing::instrument(skip(self, ids, category), fields(count = ids.len(), category = %category.category_name))]
    pub async fn fetch_details(&self, ids: &[String], category: &CategoryTarget) -> Vec<VideoRecord> {
        let mut records = Vec::new();
        for (batch_index, batch) in ids.chunks(MAX_PAGE_SIZE).enumerate() {
            match self.list_videos(batch).await {
                Ok(response) => {
                    let before = records.len();
                    records.extend(
                        response
                            .items
                            .into_iter()
                            .filter_map(|video| to_record(video, category)),
                    );
                    tracing::trace!(
                        batch = batch_index,
                        requested = batch.len(),
                        kept = records.len() - before,
                        "enriched batch"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        batch = batch_index,
                        size = batch.len(),
                        error = %e,
                        "skipping batch of video details"
                    );
                }
            }
        }
        records
    }
}

/// Converts an API video into a record for `category`.
///
/// Returns `None` for videos filed under a different category and for videos whose duration is
/// missing, unparseable or zero. Those are expected in search results and not worth more than a
/// trace line.
pub fn to_record(video: Video, category: &CategoryTarget) -> Option<VideoRecord> {
    if video.snippet.category_id.as_deref() != Some(category.category_id.as_str()) {
        tracing::trace!(
            video_id = %video.id,
            category = ?video.snippet.category_id,
            "dropping video from another category"
        );
        return None;
    }

    let duration = video.content_details.duration.as_deref().unwrap_or("PT0S");
    let duration_seconds = match parse_duration(duration) {
        Ok(0) => {
            tracing::trace!(video_id = %video.id, "dropping zero-length video");
            return None;
        }
        Ok(seconds) => seconds,
        Err(e) => {
            tracing::trace!(video_id = %video.id, error = %e, "dropping video with unusable duration");
            return None;
        }
    };

    Some(VideoRecord {
        title: video.snippet.title.unwrap_or_default(),
        category_id: category.category_id.clone(),
        category_name: category.category_name.clone(),
        duration_seconds,
        views: video.statistics.views(),
        likes: video.statistics.likes(),
        comments: video.statistics.comments(),
        published_at: video.snippet.published_at.unwrap_or_default(),
        id: video.id,
    })
}
