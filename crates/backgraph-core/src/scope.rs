//! Graph scope: the set of target domains one projection run visualizes.

use serde::{Deserialize, Serialize};

/// A set of tracked domains selected for visualization.
///
/// Drives table filtering and determines which top-level `Domain` nodes are
/// created. Iteration order follows construction order; duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphScope {
    domains: Vec<String>,
}

impl GraphScope {
    /// Scope covering a single domain.
    pub fn single(domain: impl Into<String>) -> Self {
        Self {
            domains: vec![domain.into()],
        }
    }

    /// Scope covering several domains, order-preserving, duplicates dropped.
    pub fn many<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scope = Self { domains: Vec::new() };
        for domain in domains {
            let domain = domain.into();
            if !scope.contains(&domain) {
                scope.domains.push(domain);
            }
        }
        scope
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
