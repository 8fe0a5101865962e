//! Configuration loading from a TOML file.
//!
//! ```toml
//! [fetch]
//! domains = ["draftkings.com", "fanduel.com", "williamhill.com"]
//! days_offset = 2
//!
//! [majestic]
//! api_key = "..."
//!
//! [graph]
//! uri = "bolt://localhost:7687"
//! user = "neo4j"
//! password = "..."
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use backgraph_graph::GraphConfig;
use backgraph_majestic::MajesticConfig;

/// Root configuration, one section per external surface.
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub majestic: MajesticConfig,

    #[serde(default)]
    pub graph: GraphConfig,
}

/// What to fetch and how fresh it has to be.
#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    /// Tracked domains, in request order.
    #[serde(default)]
    pub domains: Vec<String>,

    /// Freshness window: rows last seen more than this many days ago are
    /// dropped.
    #[serde(default = "default_days_offset")]
    pub days_offset: i64,

    /// Optional cap on rows requested per domain.
    #[serde(default)]
    pub max_results: Option<u32>,
}

fn default_days_offset() -> i64 {
    2
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            days_offset: default_days_offset(),
            max_results: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// The freshness cutoff date derived from `days_offset`.
    pub fn cutoff_date(&self) -> chrono::NaiveDate {
        chrono::Local::now().date_naive() - chrono::Duration::days(self.fetch.days_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [fetch]
            domains = ["a.com", "b.com"]
            days_offset = 3

            [majestic]
            api_key = "secret"

            [graph]
            uri = "bolt://graph:7687"
            user = "neo4j"
            password = "pw"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.fetch.domains, ["a.com", "b.com"]);
        assert_eq!(config.fetch.days_offset, 3);
        assert_eq!(config.majestic.api_key, "secret");
        assert_eq!(config.graph.uri, "bolt://graph:7687");
    }

    #[test]
    fn test_sections_default_when_missing() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.fetch.domains.is_empty());
        assert_eq!(config.fetch.days_offset, 2);
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
        assert_eq!(
            config.majestic.base_url,
            "https://api.majestic.com/api/json"
        );
    }
}
