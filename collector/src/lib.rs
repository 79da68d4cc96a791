//! Collects a labeled corpus of short-form and long-form YouTube videos per topical category, for
//! comparing engagement between the two duration classes.
//!
//! The collection runs in two phases. For every configured [`config::CategoryTarget`], the
//! [`collector::QuotaCollector`] searches the category's terms, enriches the results with full
//! video metadata, and keeps the deduplicated videos whose length falls in the phase's window
//! until it has exactly the target count or runs out of attempts. The per-category collections
//! are then merged into a [`corpus::Corpus`] and written out as CSV for the statistical analysis.

pub mod collector;
pub mod config;
pub mod corpus;
pub mod discovery;
pub mod duration;
pub mod enrichment;
pub mod pipeline;
pub mod record;
pub mod youtube_api;

pub use collector::{Phase, PhaseReport, QuotaCollector, VideoSet, VideoSource};
pub use config::{CategoryTarget, CollectorConfig};
pub use corpus::Corpus;
pub use record::VideoRecord;
pub use youtube_api::YouTubeClient;
