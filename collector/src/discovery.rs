//! Search discovery: turning a query term into a bounded set of candidate video ids.

use crate::youtube_api::{DurationBucket, MAX_PAGE_SIZE, PageRequest, PagedStream, YouTubeClient};
use std::collections::{HashSet, VecDeque};
use tokio_stream::{Stream, StreamExt};

impl YouTubeClient {
    /// Returns a paginated stream of at most `limit` video ids matching `query`.
    ///
    /// Every page asks for no more ids than the stream still wants, capped at the API's page size.
    /// Results that are not videos are dropped. An empty page ends the stream even when the API
    /// hands out another page token, since the API keeps issuing tokens for result sets it has
    /// already exhausted.
    pub fn search_video_ids<'a>(
        &'a self,
        query: &'a str,
        bucket: DurationBucket,
        limit: usize,
    ) -> impl Stream<Item = eyre::Result<String>> + use<'a> {
        PagedStream::new(limit, move |request: PageRequest| async move {
            let page_size = request.remaining.min(MAX_PAGE_SIZE);
            let response = self
                .search_videos_page(query, bucket, page_size, request.page_token.as_deref())
                .await?;
            let next_page_token = if response.items.is_empty() {
                None
            } else {
                response.next_page_token
            };
            let ids: VecDeque<String> = response
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect();
            Ok((ids, next_page_token))
        })
    }

    /// Collects up to `max_results` distinct video ids for one search term.
    ///
    /// Pages are fetched until `max_results` ids have come back or the API runs out of pages. A
    /// failing page is not fatal: discovery stops there and returns the ids gathered so far, which
    /// may be none at all. Repeated ids count toward `max_results` but are returned once, in
    /// first-seen order.
    #[tracing::instrument(skip(self))]
    pub async fn discover(
        &self,
        query: &str,
        bucket: DurationBucket,
        max_results: usize,
    ) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let stream = self.search_video_ids(query, bucket, max_results);
        let mut stream = std::pin::pin!(stream);
        while let Some(id) = stream.next().await {
            match id {
                Ok(id) => {
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        query,
                        collected = ids.len(),
                        error = %e,
                        "search failed, keeping partial results"
                    );
                    break;
                }
            }
        }

        tracing::debug!(query, found = ids.len(), "search discovery finished");
        ids
    }
}
