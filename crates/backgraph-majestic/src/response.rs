//! Majestic response envelope and row-to-record conversion.

use serde::Deserialize;

use backgraph_core::{url, BacklinkRecord};

/// Top-level Majestic JSON envelope.
///
/// Error responses omit `DataTables` and carry a non-`OK` code, so parsing
/// plus the code check covers both transport-level and API-level failures.
#[derive(Debug, Deserialize)]
pub struct MajesticResponse {
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "DataTables")]
    data_tables: DataTables,
}

#[derive(Debug, Deserialize)]
struct DataTables {
    #[serde(rename = "BackLinks")]
    back_links: BackLinksTable,
}

#[derive(Debug, Deserialize)]
struct BackLinksTable {
    #[serde(rename = "Data")]
    data: Vec<RawBacklink>,
}

impl MajesticResponse {
    /// True when the API-level status code signals success. A missing code
    /// is treated as success; only an explicit non-`OK` code is an error.
    pub fn is_ok(&self) -> bool {
        self.code.as_deref().map_or(true, |c| c == "OK")
    }

    pub fn error_message(&self) -> &str {
        self.error_message.as_deref().unwrap_or("unknown Majestic error")
    }

    pub fn into_rows(self) -> Vec<RawBacklink> {
        self.data_tables.back_links.data
    }
}

/// One row of the `BackLinks` data table, as the provider reports it.
///
/// The field set doubles as the column allowlist: anything else in the
/// response row is dropped at parse time.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBacklink {
    #[serde(rename = "SourceURL", default)]
    pub source_url: Option<String>,
    #[serde(rename = "TargetURL", default)]
    pub target_url: Option<String>,
    #[serde(rename = "AnchorText", default)]
    pub anchor_text: Option<String>,
    #[serde(rename = "SourceTrustFlow", default)]
    pub source_trust_flow: Option<i64>,
    #[serde(rename = "SourceCitationFlow", default)]
    pub source_citation_flow: Option<i64>,
    #[serde(rename = "SourceTopicalTrustFlow_Topic_0", default)]
    pub topic: Option<String>,
    #[serde(rename = "LastSeenDate", default)]
    pub last_seen_date: Option<String>,
}

impl RawBacklink {
    /// True when the provider still sees the link on or after `cutoff`
    /// (`%Y-%m-%d`, compared lexically the way the provider formats dates).
    /// Rows without a last-seen date count as stale.
    pub fn is_fresh(&self, cutoff: &str) -> bool {
        self.last_seen_date.as_deref().is_some_and(|d| d >= cutoff)
    }

    /// Convert into a cleaned [`BacklinkRecord`] tagged with the tracked
    /// domain it was fetched for.
    ///
    /// Returns `None` for rows missing a source URL; those are dropped from
    /// the aggregate table. The topic stays absent when the provider row
    /// carried no topical-flow label.
    pub fn into_record(self, target_domain: &str) -> Option<BacklinkRecord> {
        let source_url = self.source_url.filter(|s| !s.is_empty())?;
        if target_domain.is_empty() {
            return None;
        }

        let source_domain = url::host_of(&source_url).to_string();
        let target_link = url::path_of(self.target_url.as_deref().unwrap_or(""));

        Some(BacklinkRecord {
            source_link: url::normalize(&source_url),
            source_domain: url::normalize(&source_domain),
            target_link,
            anchor_text: self.anchor_text.unwrap_or_default(),
            source_trust_flow: self.source_trust_flow.unwrap_or(0),
            source_citation_flow: self.source_citation_flow.unwrap_or(0),
            topic: self.topic.as_deref().map(url::normalize_topic),
            last_seen_date: self.last_seen_date.unwrap_or_default(),
            target_domain: target_domain.to_string(),
        })
    }
}
