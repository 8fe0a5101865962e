//! Backlink records and the in-memory table they aggregate into.

use serde::{Deserialize, Serialize};

use crate::scope::GraphScope;

/// One inbound link observed by the provider.
///
/// Created by the fetcher from a provider response row and immutable after
/// that. `source_link` and `source_domain` are canonicalized (scheme/www
/// stripped); `target_link` is the path component only. Rows older than the
/// freshness cutoff or missing a source link never become records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklinkRecord {
    /// Canonicalized URL of the page carrying the backlink.
    pub source_link: String,
    /// Path of the linked page on the tracked domain (no domain prefix).
    pub target_link: String,
    /// Anchor text of the link, possibly empty.
    pub anchor_text: String,
    /// Provider trust score for the source page.
    pub source_trust_flow: i64,
    /// Provider citation score for the source page.
    pub source_citation_flow: i64,
    /// Topical classification, underscore-normalized. Absent when the
    /// provider row carried no topical-flow label.
    pub topic: Option<String>,
    /// Provider-reported last-seen date, ISO-like and lexically comparable.
    pub last_seen_date: String,
    /// The tracked domain this record was fetched for.
    pub target_domain: String,
    /// Canonicalized domain of `source_link`.
    pub source_domain: String,
}

impl BacklinkRecord {
    /// The topic label used for graph identity; records without a topical
    /// classification share the empty label.
    pub fn topic_label(&self) -> &str {
        self.topic.as_deref().unwrap_or("")
    }
}

/// Ordered collection of backlink records for one fetch run.
///
/// Rows keep arrival order: domain request order first, provider response
/// order within a domain. No sort is imposed anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacklinkTable {
    records: Vec<BacklinkRecord>,
}

impl BacklinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<BacklinkRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: BacklinkRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = BacklinkRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[BacklinkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose target domain equals `domain`, arrival order preserved.
    pub fn for_domain(&self, domain: &str) -> BacklinkTable {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.target_domain == domain)
                .cloned()
                .collect(),
        }
    }

    /// Rows whose target domain is inside `scope`, arrival order preserved.
    pub fn scoped(&self, scope: &GraphScope) -> BacklinkTable {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| scope.contains(&r.target_domain))
                .cloned()
                .collect(),
        }
    }

    /// Distinct target links in first-seen order.
    pub fn distinct_target_links(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.target_link.as_str()))
    }

    /// Distinct source domains in first-seen order.
    pub fn distinct_source_domains(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.source_domain.as_str()))
    }
}

impl IntoIterator for BacklinkTable {
    type Item = BacklinkRecord;
    type IntoIter = std::vec::IntoIter<BacklinkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
