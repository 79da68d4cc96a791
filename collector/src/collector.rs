//! The category quota collector.
//!
//! For one category and one phase, the collector repeatedly searches the category's terms,
//! enriches the results, and merges the videos that fall inside the phase's duration window into
//! a deduplicated accumulator. It stops as soon as the accumulator holds the target number of
//! videos, or when its attempt budget runs out, and then finalizes: the accumulator is filtered to
//! the phase's strict validity predicate and cut down to exactly the target count.
//!
//! The two phases use different policies:
//!
//! - **Short** (`1 ≤ minutes < 10`): unfiltered searches with a large overfetch, cycling through
//!   the term list up to `max_short_attempts` times. Popular uploads are mostly outside the short
//!   window, so convergence takes many searches.
//! - **Long** (`minutes > 20`): searches narrowed by the API's own long-duration filter, one pass
//!   over the term list.
//!
//! Falling short of the target is not an error. The [`PhaseReport`] records the shortfall and the
//! collection carries on with what it has.

use crate::config::{CategoryTarget, CollectorConfig};
use crate::record::VideoRecord;
use crate::youtube_api::{DurationBucket, YouTubeClient};
use std::collections::HashSet;

/// Where the collector gets its videos from.
///
/// Both operations are infallible by contract: a failing search or lookup yields fewer (possibly
/// zero) results, never an error, so one bad request never aborts a category.
#[allow(async_fn_in_trait)]
pub trait VideoSource {
    /// Up to `max_results` distinct candidate ids for `term`.
    async fn search(&self, term: &str, bucket: DurationBucket, max_results: usize) -> Vec<String>;

    /// Records for those of `ids` that belong to `category` and have a usable duration.
    async fn fetch_details(&self, ids: &[String], category: &CategoryTarget) -> Vec<VideoRecord>;
}

impl VideoSource for YouTubeClient {
    async fn search(&self, term: &str, bucket: DurationBucket, max_results: usize) -> Vec<String> {
        self.discover(term, bucket, max_results).await
    }

    async fn fetch_details(&self, ids: &[String], category: &CategoryTarget) -> Vec<VideoRecord> {
        YouTubeClient::fetch_details(self, ids, category).await
    }
}

/// The two duration classes the corpus compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Short,
    Long,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Short => "short",
            Phase::Long => "long",
        }
    }

    /// Whether a video of this length is kept while accumulating.
    pub fn in_window(self, duration_seconds: u64) -> bool {
        let minutes = duration_seconds as f64 / 60.0;
        match self {
            Phase::Short => (1.0..10.0).contains(&minutes),
            Phase::Long => minutes > 20.0,
        }
    }

    /// Whether a video of this length may appear in the final collection.
    ///
    /// Stricter than [`Phase::in_window`]: a video must also be longer than a minute, which
    /// excludes exactly-60-second uploads from the short class.
    pub fn is_valid(self, duration_seconds: u64) -> bool {
        self.in_window(duration_seconds) && duration_seconds > 60
    }
}

/// An insertion-ordered set of records keyed by video id.
///
/// This is the only place collection progress is tracked: every count and every termination
/// check reads [`VideoSet::len`].
#[derive(Debug, Clone, Default)]
pub struct VideoSet {
    ids: HashSet<String>,
    records: Vec<VideoRecord>,
}

impl VideoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` unless a record with the same id is already present.
    ///
    /// Returns whether the record was added. The first record seen for an id wins.
    pub fn merge(&mut self, record: VideoRecord) -> bool {
        if self.ids.contains(&record.id) {
            return false;
        }
        self.ids.insert(record.id.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records in the order they were first merged.
    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<VideoRecord> {
        self.records
    }
}

impl Extend<VideoRecord> for VideoSet {
    fn extend<I: IntoIterator<Item = VideoRecord>>(&mut self, iter: I) {
        for record in iter {
            self.merge(record);
        }
    }
}

/// How a phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The accumulator reached the target.
    Satisfied,
    /// The attempt or term budget ran out first.
    Exhausted,
}

/// The result of collecting one phase for one category.
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub category_id: String,
    pub category_name: String,
    pub phase: Phase,
    pub target: usize,
    /// Finalized records, at most `target` of them, in accumulation order.
    pub records: Vec<VideoRecord>,
    pub outcome: PhaseOutcome,
    /// Passes over the term list that were started.
    pub cycles: usize,
    /// Search calls made.
    pub searches: usize,
    /// Distinct in-window records accumulated before finalizing.
    pub accumulated: usize,
}

impl PhaseReport {
    /// How many records the phase is missing, if it ended under target.
    pub fn shortfall(&self) -> Option<usize> {
        self.target
            .checked_sub(self.records.len())
            .filter(|&missing| missing > 0)
    }
}

/// Search and accumulation settings for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhasePolicy {
    pub target: usize,
    /// Passes over the term list.
    pub max_cycles: usize,
    pub bucket: DurationBucket,
    /// Ids requested per search.
    pub fetch_size: usize,
}

impl PhasePolicy {
    pub fn for_phase(phase: Phase, config: &CollectorConfig) -> Self {
        match phase {
            Phase::Short => Self {
                target: config.target_count,
                max_cycles: config.max_short_attempts,
                bucket: DurationBucket::Any,
                fetch_size: config.short_overfetch,
            },
            Phase::Long => Self {
                target: config.target_count,
                max_cycles: 1,
                bucket: DurationBucket::Long,
                fetch_size: config.long_fetch,
            },
        }
    }
}

/// Drives a [`VideoSource`] until a category's phase reaches its target.
#[derive(Debug)]
pub struct QuotaCollector<'a, S> {
    source: &'a S,
    config: &'a CollectorConfig,
}

impl<'a, S: VideoSource> QuotaCollector<'a, S> {
    pub fn new(source: &'a S, config: &'a CollectorConfig) -> Self {
        Self { source, config }
    }

    /// Collects one phase of one category.
    #[tracing::instrument(skip(self, category), fields(category = %category.category_name))]
    pub async fn collect(&self, category: &CategoryTarget, phase: Phase) -> PhaseReport {
        let policy = PhasePolicy::for_phase(phase, self.config);
        let terms = category.terms(phase);
        let mut accumulated = VideoSet::new();
        let mut cycles = 0;
        let mut searches = 0;

        let outcome = loop {
            if accumulated.len() >= policy.target {
                break PhaseOutcome::Satisfied;
            }
            if cycles >= policy.max_cycles {
                break PhaseOutcome::Exhausted;
            }
            cycles += 1;

            for term in terms {
                if accumulated.len() >= policy.target {
                    break;
                }
                let before = accumulated.len();
                searches += 1;

                let ids = self
                    .source
                    .search(term, policy.bucket, policy.fetch_size)
                    .await;
                if ids.is_empty() {
                    tracing::info!(%term, cycle = cycles, current = before, "no search results");
                    continue;
                }

                let details = self.source.fetch_details(&ids, category).await;
                accumulated.extend(details.into_iter().filter(|record| {
                    record.category_id == category.category_id
                        && phase.in_window(record.duration_seconds)
                }));

                tracing::info!(
                    %term,
                    cycle = cycles,
                    candidates = ids.len(),
                    new = accumulated.len() - before,
                    current = accumulated.len(),
                    target = policy.target,
                    "searched term"
                );
            }
        };

        let accumulated_count = accumulated.len();
        let records = finalize(accumulated, phase, policy.target);
        let report = PhaseReport {
            category_id: category.category_id.clone(),
            category_name: category.category_name.clone(),
            phase,
            target: policy.target,
            records,
            outcome,
            cycles,
            searches,
            accumulated: accumulated_count,
        };

        match report.shortfall() {
            Some(missing) => tracing::warn!(
                phase = phase.label(),
                collected = report.records.len(),
                target = report.target,
                missing,
                cycles,
                searches,
                "category under target"
            ),
            None => tracing::info!(
                phase = phase.label(),
                collected = report.records.len(),
                cycles,
                searches,
                "category complete"
            ),
        }

        report
    }
}

/// Filters an accumulator to the phase's validity predicate and keeps the first `target` records.
pub fn finalize(accumulated: VideoSet, phase: Phase, target: usize) -> Vec<VideoRecord> {
    accumulated
        .into_records()
        .into_iter()
        .filter(|record| phase.is_valid(record.duration_seconds))
        .take(target)
        .collect()
}
