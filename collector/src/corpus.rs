//! The aggregated corpus and its CSV hand-off format.
//!
//! The CSV file is the only interface to the downstream statistical analysis, so its column names
//! and order are fixed by [`CorpusRow`] and must not change.

use crate::collector::Phase;
use crate::record::VideoRecord;
use eyre::Context;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "youtube_length_engagement.csv";

/// Per-view engagement ratios of one video.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngagementRatios {
    pub like_view: f64,
    pub comment_view: f64,
    /// Likes and comments together, per view.
    pub engagement: f64,
}

impl EngagementRatios {
    /// All ratios are 0 for a video without views.
    pub fn compute(views: u64, likes: u64, comments: u64) -> Self {
        if views == 0 {
            return Self::default();
        }
        let views = views as f64;
        Self {
            like_view: likes as f64 / views,
            comment_view: comments as f64 / views,
            engagement: (likes + comments) as f64 / views,
        }
    }
}

/// One row of the persisted corpus. Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusRow {
    pub video_id: String,
    pub title: String,
    /// The category id.
    pub category: String,
    pub category_name: String,
    pub duration_seconds: u64,
    pub duration_minutes: f64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub published_at: String,
    pub like_view_ratio: f64,
    pub comment_view_ratio: f64,
    pub engagement_rate: f64,
}

impl From<VideoRecord> for CorpusRow {
    fn from(record: VideoRecord) -> Self {
        let ratios = EngagementRatios::compute(record.views, record.likes, record.comments);
        Self {
            duration_minutes: record.duration_minutes(),
            video_id: record.id,
            title: record.title,
            category: record.category_id,
            category_name: record.category_name,
            duration_seconds: record.duration_seconds,
            views: record.views,
            likes: record.likes,
            comments: record.comments,
            published_at: record.published_at,
            like_view_ratio: ratios.like_view,
            comment_view_ratio: ratios.comment_view,
            engagement_rate: ratios.engagement,
        }
    }
}

/// Mean engagement of one duration class.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassSummary {
    pub count: usize,
    pub mean_like_rate: f64,
    pub mean_comment_rate: f64,
    pub mean_engagement_rate: f64,
}

impl ClassSummary {
    fn of<'a>(rows: impl Iterator<Item = &'a CorpusRow>) -> Self {
        let mut summary = Self::default();
        for row in rows {
            summary.count += 1;
            summary.mean_like_rate += row.like_view_ratio;
            summary.mean_comment_rate += row.comment_view_ratio;
            summary.mean_engagement_rate += row.engagement_rate;
        }
        if summary.count > 0 {
            let n = summary.count as f64;
            summary.mean_like_rate /= n;
            summary.mean_comment_rate /= n;
            summary.mean_engagement_rate /= n;
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngagementSummary {
    pub short: ClassSummary,
    pub long: ClassSummary,
}

/// All collected videos of every category and both duration classes.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    rows: Vec<CorpusRow>,
}

impl Corpus {
    /// Concatenates the per-category collections, short ones first, and derives the ratios.
    ///
    /// Records are not deduplicated across categories.
    pub fn aggregate<S, L>(short: S, long: L) -> Self
    where
        S: IntoIterator<Item = Vec<VideoRecord>>,
        L: IntoIterator<Item = Vec<VideoRecord>>,
    {
        let rows = short
            .into_iter()
            .chain(long)
            .flatten()
            .map(CorpusRow::from)
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[CorpusRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that fall in the given duration class.
    pub fn partition(&self, phase: Phase) -> impl Iterator<Item = &CorpusRow> {
        self.rows
            .iter()
            .filter(move |row| phase.is_valid(row.duration_seconds))
    }

    /// Row counts per category name, in first-seen order.
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for row in &self.rows {
            match counts
                .iter_mut()
                .find(|(name, _)| *name == row.category_name)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((row.category_name.as_str(), 1)),
            }
        }
        counts
    }

    pub fn summary(&self) -> EngagementSummary {
        EngagementSummary {
            short: ClassSummary::of(self.partition(Phase::Short)),
            long: ClassSummary::of(self.partition(Phase::Long)),
        }
    }

    /// Writes the corpus as CSV, header first.
    pub fn write_csv<W: Write>(&self, writer: W) -> eyre::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv.serialize(row)
                .with_context(|| format!("write row for video {}", row.video_id))?;
        }
        csv.flush().context("flush CSV output")?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("create output file {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("write corpus to {}", path.display()))
    }
}
