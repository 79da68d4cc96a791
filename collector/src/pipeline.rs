//! Runs both collection phases over every configured category and aggregates the result.

use crate::collector::{Phase, PhaseReport, QuotaCollector, VideoSource};
use crate::config::CollectorConfig;
use crate::corpus::Corpus;

/// Everything one collection run produced.
#[derive(Debug, Clone)]
pub struct Collection {
    pub short: Vec<PhaseReport>,
    pub long: Vec<PhaseReport>,
    pub corpus: Corpus,
}

impl Collection {
    /// Phase reports that ended under target.
    pub fn shortfalls(&self) -> impl Iterator<Item = &PhaseReport> {
        self.short
            .iter()
            .chain(&self.long)
            .filter(|report| report.shortfall().is_some())
    }
}

/// Collects the short phase for every category, then the long phase for every category.
///
/// Categories are visited strictly in configured order. Shortfalls are logged and tolerated; the
/// only failure is a run that collected nothing at all.
pub async fn run<S: VideoSource>(config: &CollectorConfig, source: &S) -> eyre::Result<Collection> {
    let collector = QuotaCollector::new(source, config);

    let short = collect_phase(&collector, config, Phase::Short).await;
    let long = collect_phase(&collector, config, Phase::Long).await;

    let corpus = Corpus::aggregate(
        short.iter().map(|report| report.records.clone()),
        long.iter().map(|report| report.records.clone()),
    );

    if corpus.is_empty() {
        eyre::bail!(
            "no data collected across {} categories",
            config.categories.len()
        );
    }

    Ok(Collection {
        short,
        long,
        corpus,
    })
}

async fn collect_phase<S: VideoSource>(
    collector: &QuotaCollector<'_, S>,
    config: &CollectorConfig,
    phase: Phase,
) -> Vec<PhaseReport> {
    tracing::info!(
        phase = phase.label(),
        target = config.target_count,
        categories = config.categories.len(),
        "starting collection phase"
    );

    let mut reports = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        reports.push(collector.collect(category, phase).await);
    }

    let collected: usize = reports.iter().map(|report| report.records.len()).sum();
    tracing::info!(phase = phase.label(), collected, "collection phase complete");
    reports
}

/// Logs the per-category distribution and the mean engagement of both duration classes.
pub fn log_summary(collection: &Collection) {
    let corpus = &collection.corpus;
    tracing::info!(total = corpus.len(), "corpus collected");
    for (category, count) in corpus.category_counts() {
        tracing::info!(category, count, "category distribution");
    }
    for report in collection.shortfalls() {
        tracing::warn!(
            category = %report.category_name,
            phase = report.phase.label(),
            collected = report.records.len(),
            target = report.target,
            "category ended under target"
        );
    }

    let summary = corpus.summary();
    for (phase, class) in [(Phase::Short, summary.short), (Phase::Long, summary.long)] {
        tracing::info!(
            phase = phase.label(),
            videos = class.count,
            like_rate = %format!("{:.4}", class.mean_like_rate),
            comment_rate = %format!("{:.4}", class.mean_comment_rate),
            engagement_rate = %format!("{:.4}", class.mean_engagement_rate),
            "average engagement"
        );
    }
}
