//! Shared types and streaming infrastructure for the YouTube API client.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

/// One page of items plus the token that continues after it.
pub type Page<T> = (VecDeque<T>, Option<String>);

type PendingPage<'a, F, T> = Pin<Box<dyn Future<Output = eyre::Result<(F, Page<T>)>> + Send + 'a>>;

/// What a [`PagedStream`] asks its fetcher for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Continuation token from the previous page, `None` for the first one.
    pub page_token: Option<String>,
    /// How many more items the stream will yield. Never zero.
    pub remaining: usize,
}

/// A stream over a cursor-paginated list endpoint that yields at most `limit` items.
///
/// Pages are fetched lazily: the next request only goes out once the buffered page is drained and
/// the consumer polls again. Each request carries the number of items the stream still wants, so
/// the fetcher can shrink its page size as the limit approaches. Surplus items in the last page
/// are discarded.
///
/// The stream ends when the limit is reached, when the fetcher returns no continuation token, or
/// right after yielding a fetch error.
pub struct PagedStream<'a, T, F> {
    buffered: VecDeque<T>,
    pending: Option<PendingPage<'a, F, T>>,
    /// Items left to yield.
    budget: usize,
}

fn request_page<'a, T, F, Fut>(fetcher: F, request: PageRequest) -> PendingPage<'a, F, T>
where
    F: Fn(PageRequest) -> Fut + Send + 'a,
    Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
{
    Box::pin(async move {
        let page = fetcher(request).await?;
        Ok((fetcher, page))
    })
}

impl<'a, T, F> PagedStream<'a, T, F> {
    pub fn new<Fut>(limit: usize, fetcher: F) -> Self
    where
        F: Fn(PageRequest) -> Fut + Send + 'a,
        Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
    {
        let pending = (limit > 0).then(|| {
            request_page(
                fetcher,
                PageRequest {
                    page_token: None,
                    remaining: limit,
                },
            )
        });
        Self {
            buffered: VecDeque::new(),
            pending,
            budget: limit,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(PageRequest) -> Fut + Send + 'a,
    Fut: Future<Output = eyre::Result<Page<T>>> + Send + 'a,
{
    type Item = eyre::Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.budget == 0 {
                self.buffered.clear();
                self.pending = None;
                return Poll::Ready(None);
            }
            if let Some(item) = self.buffered.pop_front() {
                self.budget -= 1;
                return Poll::Ready(Some(Ok(item)));
            }

            let Some(pending) = self.pending.as_mut() else {
                return Poll::Ready(None);
            };
            match pending.as_mut().poll(cx) {
                Poll::Ready(Ok((fetcher, (items, next_token)))) => {
                    self.buffered = items;
                    let remaining = self.budget.saturating_sub(self.buffered.len());
                    // queued, not polled, until the buffer is drained
                    self.pending = next_token.filter(|_| remaining > 0).map(|page_token| {
                        request_page(
                            fetcher,
                            PageRequest {
                                page_token: Some(page_token),
                                remaining,
                            },
                        )
                    });
                }
                Poll::Ready(Err(e)) => {
                    self.buffered.clear();
                    self.pending = None;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    /// The total number of results in the result set.
    ///
    /// For search results this is an approximation and never exceeds 1,000,000.
    #[serde(rename = "totalResults")]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

/// Error body returned by the YouTube Data API.
///
/// The API reports failures (quota exhaustion, bad key, invalid parameters) as a JSON object
/// with a top-level `error` key, usually together with a non-success HTTP status.
///
/// See: <https://developers.google.com/youtube/v3/docs/errors>
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// The `error` object of a failed YouTube API call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// The HTTP status code the API associated with the error.
    pub code: u16,
    /// Human readable description of the failure.
    pub message: String,
    /// Machine readable reasons, e.g. `quotaExceeded` or `keyInvalid`.
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorDetail {
    pub domain: String,
    pub reason: String,
    pub message: String,
}

impl ApiError {
    /// Returns the first machine readable reason, if the API gave one.
    pub fn reason(&self) -> Option<&str> {
        self.errors
            .iter()
            .map(|detail| detail.reason.as_str())
            .find(|reason| !reason.is_empty())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.message.is_empty() {
            "Unknown error"
        } else {
            &self.message
        };
        match self.reason() {
            Some(reason) => write!(f, "{message} ({reason}, code {})", self.code),
            None => write!(f, "{message} (code {})", self.code),
        }
    }
}

impl std::error::Error for ApiError {}
