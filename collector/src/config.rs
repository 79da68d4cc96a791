//! Collection configuration: which categories to collect, with which search terms, and how hard
//! to try.
//!
//! The built-in defaults reproduce the corpus the downstream analysis was designed around. A JSON
//! file can replace them; every field is optional and falls back to its default.

use crate::collector::Phase;
use eyre::Context;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// One topical category and the search terms used to find its videos.
///
/// Terms are tried in order, so the most productive ones should come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTarget {
    /// YouTube's numeric video category id, e.g. `"20"` for Gaming.
    pub category_id: String,
    pub category_name: String,
    pub short_terms: Vec<String>,
    pub long_terms: Vec<String>,
}

impl CategoryTarget {
    pub fn new<S, L>(
        category_id: impl Into<String>,
        category_name: impl Into<String>,
        short_terms: S,
        long_terms: L,
    ) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            category_id: category_id.into(),
            category_name: category_name.into(),
            short_terms: short_terms.into_iter().map(Into::into).collect(),
            long_terms: long_terms.into_iter().map(Into::into).collect(),
        }
    }

    /// The search terms used for the given phase.
    pub fn terms(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Short => &self.short_terms,
            Phase::Long => &self.long_terms,
        }
    }
}

/// Settings for talking to the YouTube Data API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint root. Only changed to point at a test server.
    pub base_url: String,
    /// Search only returns videos published after this instant.
    pub published_after: Timestamp,
    /// Minimum spacing between two consecutive API requests, in milliseconds.
    pub request_interval_ms: u64,
    /// Upper bound on a single HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            published_after: Timestamp::constant(1_704_067_200, 0), // 2024-01-01T00:00:00Z
            request_interval_ms: 300,
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Everything the collection pipeline needs besides the API credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Categories in the order they are collected.
    pub categories: Vec<CategoryTarget>,
    /// Records each category should end up with per phase.
    pub target_count: usize,
    /// How many times the short phase may cycle through a category's terms.
    pub max_short_attempts: usize,
    /// Ids requested per short-phase search.
    ///
    /// Unfiltered searches return plenty of videos outside the short window, so this is set
    /// well above the target.
    pub short_overfetch: usize,
    /// Ids requested per long-phase search.
    pub long_fetch: usize,
    pub api: ApiConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            target_count: 30,
            max_short_attempts: 10,
            short_overfetch: 80,
            long_fetch: 30,
            api: ApiConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values that would make collection meaningless or hang.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.target_count == 0 {
            eyre::bail!("target_count must be at least 1");
        }
        if self.max_short_attempts == 0 {
            eyre::bail!("max_short_attempts must be at least 1");
        }
        if self.short_overfetch == 0 || self.long_fetch == 0 {
            eyre::bail!("short_overfetch and long_fetch must be at least 1");
        }
        if self.api.request_interval_ms == 0 {
            eyre::bail!("api.request_interval_ms must be at least 1");
        }
        if self.api.request_timeout_secs == 0 {
            eyre::bail!("api.request_timeout_secs must be at least 1");
        }
        if self.categories.is_empty() {
            eyre::bail!("no categories configured");
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let id = category.category_id.trim();
            if id.is_empty() {
                eyre::bail!(
                    "category '{}' has an empty category_id",
                    category.category_name
                );
            }
            if category.category_name.trim().is_empty() {
                eyre::bail!("category {id} has an empty category_name");
            }
            if !seen.insert(id) {
                eyre::bail!("category {id} is configured more than once");
            }
            for phase in [Phase::Short, Phase::Long] {
                let terms = category.terms(phase);
                if terms.is_empty() {
                    eyre::bail!(
                        "category '{}' has no {} search terms",
                        category.category_name,
                        phase.label()
                    );
                }
                if terms.iter().any(|term| term.trim().is_empty()) {
                    eyre::bail!(
                        "category '{}' has a blank {} search term",
                        category.category_name,
                        phase.label()
                    );
                }
            }
        }

        Ok(())
    }
}

/// The categories collected when no configuration file is given.
///
/// Short-term lists lean on "short"/"clip" phrasing, since unfiltered popularity-ordered search
/// is otherwise dominated by long uploads in most categories.
pub fn default_categories() -> Vec<CategoryTarget> {
    vec![
        CategoryTarget::new(
            "20",
            "Gaming",
            [
                "gaming shorts",
                "gaming clip",
                "gaming clips short",
                "best gaming moments",
                "funny gaming short",
                "gaming fails short",
                "epic gaming short",
                "crazy gaming clip",
                "pro gameplay clip",
                "clutch moment",
                "minecraft short",
                "fortnite short",
                "valorant short",
                "roblox short",
                "gta short",
                "gaming meme short",
                "glitch moment",
                "viral gaming clip",
            ],
            [
                "full gameplay",
                "gaming stream",
                "complete walkthrough",
                "game review",
                "let's play",
                "gaming tutorial",
            ],
        ),
        CategoryTarget::new(
            "10",
            "Music",
            [
                "music video",
                "song",
                "cover",
                "performance",
                "live performance",
                "music clip",
                "acoustic",
            ],
            [
                "full album",
                "concert",
                "music documentary",
                "album review",
                "live concert",
                "music history",
            ],
        ),
        CategoryTarget::new(
            "26",
            "How-to & Style",
            [
                "makeup tips",
                "hair tips",
                "outfit ideas",
                "style hacks",
                "beauty hacks",
                "quick makeup",
                "quick hair",
                "easy outfit",
                "fashion hack",
                "simple makeup",
                "nail ideas",
                "easy hairstyle",
                "skincare tips",
                "quick beauty",
                "simple outfit",
                "hair hack",
                "makeup idea",
                "style idea",
                "closet tips",
                "basic makeup",
            ],
            [
                "full makeup tutorial",
                "hair transformation",
                "get ready with me",
                "fashion lookbook",
                "full beauty routine",
                "styling guide",
                "makeup collection",
                "wardrobe tour",
            ],
        ),
        CategoryTarget::new(
            "28",
            "Science & Technology",
            [
                "tech news",
                "gadget review",
                "tech tips",
                "new technology",
                "tech update",
                "device review",
                "tech explained",
            ],
            [
                "tech documentary",
                "in-depth review",
                "tech tutorial",
                "technology explained",
                "full tech review",
                "tech analysis",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_validate() {
        let config = CollectorConfig::default();
        config.validate().unwrap();
        let ids: Vec<_> = config
            .categories
            .iter()
            .map(|c| c.category_id.as_str())
            .collect();
        assert_eq!(ids, vec!["20", "10", "26", "28"]);
        assert_eq!(config.api.published_after.to_string(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn duplicate_category_rejected() {
        let mut config = CollectorConfig::default();
        let first = config.categories[0].clone();
        config.categories.push(first);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");
    }

    #[test]
    fn empty_terms_rejected() {
        let config = CollectorConfig {
            categories: vec![CategoryTarget::new("20", "Gaming", ["clip"], Vec::<String>::new())],
            ..CollectorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no long search terms"), "{err}");
    }

    #[test]
    fn zero_target_rejected() {
        let config = CollectorConfig {
            target_count: 0,
            ..CollectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: CollectorConfig = serde_json::from_str(
            r#"{
                "categories": [
                    {
                        "category_id": "24",
                        "category_name": "Entertainment",
                        "short_terms": ["comedy sketch"],
                        "long_terms": ["podcast"]
                    }
                ],
                "target_count": 5,
                "api": { "request_interval_ms": 10 }
            }"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.target_count, 5);
        assert_eq!(config.short_overfetch, 80);
        assert_eq!(config.api.request_interval(), Duration::from_millis(10));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, r#"{ "max_short_attempts": 3 }"#).unwrap();
        let config = CollectorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_short_attempts, 3);
        assert_eq!(config.categories, default_categories());
    }
}
