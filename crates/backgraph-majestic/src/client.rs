//! Majestic HTTP client and per-domain fetch loop.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use backgraph_core::BacklinkTable;

use crate::response::{MajesticResponse, RawBacklink};

/// Default Majestic API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.majestic.com/api/json";

/// Maximum rows Majestic returns for one `GetBackLinkData` call.
pub const MAX_RESULT_COUNT: u32 = 50_000;

const CMD_GET_BACKLINK_DATA: &str = "GetBackLinkData";
const DATASOURCE_FRESH: &str = "fresh";

/// How many per-domain requests may be in flight at once. Results are
/// aggregated in domain argument order regardless.
const FETCH_CONCURRENCY: usize = 4;

/// Configuration for the Majestic API.
#[derive(Debug, Clone, Deserialize)]
pub struct MajesticConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Result-count cap sent with every request.
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_count() -> u32 {
    MAX_RESULT_COUNT
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for MajesticConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            count: default_count(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Client for the Majestic `GetBackLinkData` command.
#[derive(Clone)]
pub struct MajesticClient {
    config: MajesticConfig,
    http: reqwest::Client,
}

impl MajesticClient {
    pub fn new(config: MajesticConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { config, http }
    }

    /// Fetch backlink data for every tracked domain and assemble the
    /// aggregate table.
    ///
    /// Rows whose `LastSeenDate` is before `cutoff` are dropped, survivors
    /// are tagged with the domain they were fetched for. A failure on one
    /// domain is logged and that domain contributes zero rows; the aggregate
    /// fetch itself never fails. Requests run concurrently behind a fixed
    /// limit; row order follows domain argument order, then provider
    /// response order.
    pub async fn fetch(
        &self,
        domains: &[String],
        cutoff: NaiveDate,
        max_results: Option<u32>,
    ) -> BacklinkTable {
        let cutoff = cutoff.format("%Y-%m-%d").to_string();
        let count = max_results
            .unwrap_or(self.config.count)
            .min(MAX_RESULT_COUNT);

        // `buffered` keeps output order aligned with input order, so the
        // aggregate table is deterministic for a given domain list.
        let results: Vec<Result<Vec<RawBacklink>>> =
            stream::iter(domains.iter().map(|domain| self.fetch_domain(domain, count)))
                .buffered(FETCH_CONCURRENCY)
                .collect()
                .await;

        let mut table = BacklinkTable::new();
        for (domain, result) in domains.iter().zip(results) {
            match result {
                Ok(rows) => {
                    let before = table.len();
                    table.extend(
                        rows.into_iter()
                            .filter(|row| row.is_fresh(&cutoff))
                            .filter_map(|row| row.into_record(domain)),
                    );
                    debug!(domain = %domain, rows = table.len() - before, "Domain fetched");
                }
                Err(err) => {
                    warn!(domain = %domain, error = %err, "Backlink fetch failed, domain contributes no rows");
                }
            }
        }

        info!(
            rows = table.len(),
            domains = domains.len(),
            cutoff = %cutoff,
            "Backlink fetch complete"
        );
        table
    }

    /// One `GetBackLinkData` request for one domain.
    async fn fetch_domain(&self, domain: &str, count: u32) -> Result<Vec<RawBacklink>> {
        debug!(domain = %domain, count, "Requesting backlink data");

        let count = count.to_string();
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("app_api_key", self.config.api_key.as_str()),
                ("cmd", CMD_GET_BACKLINK_DATA),
                ("datasource", DATASOURCE_FRESH),
                ("Count", count.as_str()),
                ("item", domain),
            ])
            .send()
            .await
            .context("Failed to reach Majestic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Majestic API error ({}): {}", status, body);
        }

        let parsed: MajesticResponse = response
            .json()
            .await
            .context("Failed to parse Majestic response")?;

        if !parsed.is_ok() {
            anyhow::bail!("Majestic rejected the request: {}", parsed.error_message());
        }

        Ok(parsed.into_rows())
    }
}
