//! Deterministic projection plans.
//!
//! A plan is the ordered list of mutation statements one projection run will
//! issue. Building the plan is pure and happens before anything touches the
//! store, so identity validation rejects bad values before the destructive
//! reset runs. Apply order matters: relationship statements MATCH nodes
//! created by earlier statements.

use std::collections::HashSet;

use neo4rs::Query;

use backgraph_core::{BackgraphError, BackgraphResult, BacklinkTable, GraphScope};

const RESET: &str = "MATCH (n) DETACH DELETE n";

const MERGE_DOMAIN: &str = "MERGE (d:Domain {url: $url})";

const MERGE_LINK: &str = "MERGE (l:Link {url: $url})";

const LINK_OF_DOMAIN: &str = "MATCH (l:Link {url: $link}), (d:Domain {url: $domain}) \
     MERGE (l)-[:IS_LINK_OF]->(d)";

const MERGE_BACKLINK_DOMAIN: &str = "MERGE (b:BacklinkDomain {url: $url})";

const MERGE_BACKLINK: &str = "MERGE (b:Backlink {url: $url, topic: $topic}) \
     SET b.anchor_text = $anchor_text, \
         b.trust_flow = $trust_flow, \
         b.citation_flow = $citation_flow";

const BACKLINK_OF_DOMAIN: &str =
    "MATCH (b:Backlink {url: $url, topic: $topic}), (d:BacklinkDomain {url: $domain}) \
     MERGE (b)-[:BELONGS_TO_DOMAIN]->(d)";

const BACKLINK_REFERS_LINK: &str =
    "MATCH (b:Backlink {url: $url, topic: $topic}), (l:Link {url: $link}) \
     MERGE (b)-[:REFERS_TO]->(l)";

const BACKLINK_REFERS_DOMAIN: &str =
    "MATCH (b:Backlink {url: $url, topic: $topic}), (d:Domain {url: $domain}) \
     MERGE (b)-[:REFERS_TO]->(d)";

const BACKLINK_DOMAIN_REFERS_DOMAIN: &str =
    "MATCH (b:BacklinkDomain {url: $source}), (d:Domain {url: $target}) \
     MERGE (b)-[:REFERS_TO]->(d)";

/// Characters never allowed in node identity values. Identity values must
/// stay quote- and control-free to remain usable in ad-hoc browser queries.
const FORBIDDEN_IDENTITY_CHARS: &[char] = &['\'', '"', '\\'];

/// A parameter value bound into a mutation statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

/// What a mutation does, for stats and ordering assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Reset,
    Node,
    Relationship,
}

/// One parameterized mutation statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    kind: MutationKind,
    cypher: &'static str,
    params: Vec<(&'static str, ParamValue)>,
}

impl Mutation {
    fn reset() -> Self {
        Self {
            kind: MutationKind::Reset,
            cypher: RESET,
            params: Vec::new(),
        }
    }

    fn node(cypher: &'static str, params: Vec<(&'static str, ParamValue)>) -> Self {
        Self {
            kind: MutationKind::Node,
            cypher,
            params,
        }
    }

    fn relationship(cypher: &'static str, params: Vec<(&'static str, ParamValue)>) -> Self {
        Self {
            kind: MutationKind::Relationship,
            cypher,
            params,
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn cypher(&self) -> &str {
        self.cypher
    }

    pub fn params(&self) -> &[(&'static str, ParamValue)] {
        &self.params
    }

    /// Bind into an executable neo4rs query.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new(self.cypher.to_string());
        for (name, value) in &self.params {
            query = match value {
                ParamValue::Str(s) => query.param(name, s.as_str()),
                ParamValue::Int(i) => query.param(name, *i),
            };
        }
        query
    }
}

/// Counts of what a plan will create once applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    pub nodes_created: usize,
    pub relationships_created: usize,
}

/// Ordered mutation sequence for one projection run.
///
/// Always starts with the full-store reset; rerunning an unchanged plan
/// rebuilds an identical graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPlan {
    mutations: Vec<Mutation>,
}

impl ProjectionPlan {
    fn new() -> Self {
        Self {
            mutations: vec![Mutation::reset()],
        }
    }

    fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn stats(&self) -> ProjectionStats {
        let mut stats = ProjectionStats::default();
        for mutation in &self.mutations {
            match mutation.kind {
                MutationKind::Node => stats.nodes_created += 1,
                MutationKind::Relationship => stats.relationships_created += 1,
                MutationKind::Reset => {}
            }
        }
        stats
    }
}

/// Validate a node identity value and turn it into a bound parameter.
fn identity(field: &'static str, value: &str) -> BackgraphResult<ParamValue> {
    match value
        .chars()
        .find(|c| FORBIDDEN_IDENTITY_CHARS.contains(c) || c.is_control())
    {
        Some(offender) => Err(BackgraphError::InvalidValue { field, offender }),
        None => Ok(ParamValue::Str(value.to_string())),
    }
}

/// Single-domain detail projection.
///
/// Hierarchy: domain ← links on the domain ← backlinks ← backlink domains.
/// Backlink node identity is (topic, url): rows sharing both merge into one
/// node, each distinct target link still gets its own REFERS_TO edge.
pub fn domain_detail_plan(domain: &str, table: &BacklinkTable) -> BackgraphResult<ProjectionPlan> {
    let scoped = table.for_domain(domain);
    let mut plan = ProjectionPlan::new();

    plan.push(Mutation::node(
        MERGE_DOMAIN,
        vec![("url", identity("domain", domain)?)],
    ));

    // Links on the tracked domain. Relationship statements MATCH the domain
    // node created above.
    for link in scoped.distinct_target_links() {
        plan.push(Mutation::node(
            MERGE_LINK,
            vec![("url", identity("target link", link)?)],
        ));
        plan.push(Mutation::relationship(
            LINK_OF_DOMAIN,
            vec![
                ("link", identity("target link", link)?),
                ("domain", identity("domain", domain)?),
            ],
        ));
    }

    for backlink_domain in scoped.distinct_source_domains() {
        plan.push(Mutation::node(
            MERGE_BACKLINK_DOMAIN,
            vec![("url", identity("source domain", backlink_domain)?)],
        ));
    }

    push_backlink_nodes(&mut plan, &scoped)?;

    // Referral edges last: they MATCH both the backlink and link nodes.
    let mut seen = HashSet::new();
    for record in scoped.records() {
        let key = (
            record.topic_label().to_string(),
            record.source_link.clone(),
            record.target_link.clone(),
        );
        if seen.insert(key) {
            plan.push(Mutation::relationship(
                BACKLINK_REFERS_LINK,
                vec![
                    ("url", identity("source link", &record.source_link)?),
                    ("topic", identity("topic", record.topic_label())?),
                    ("link", identity("target link", &record.target_link)?),
                ],
            ));
        }
    }

    Ok(plan)
}

/// Multi-domain link-level projection.
///
/// One domain node per scoped domain, no per-domain link layer; referral
/// edges connect backlinks straight to the domain they point at.
pub fn link_level_plan(scope: &GraphScope, table: &BacklinkTable) -> BackgraphResult<ProjectionPlan> {
    if scope.is_empty() {
        return Err(BackgraphError::EmptyScope);
    }
    let scoped = table.scoped(scope);
    let mut plan = ProjectionPlan::new();

    for domain in scope.domains() {
        plan.push(Mutation::node(
            MERGE_DOMAIN,
            vec![("url", identity("domain", domain)?)],
        ));
    }

    for backlink_domain in scoped.distinct_source_domains() {
        plan.push(Mutation::node(
            MERGE_BACKLINK_DOMAIN,
            vec![("url", identity("source domain", backlink_domain)?)],
        ));
    }

    push_backlink_nodes(&mut plan, &scoped)?;

    let mut seen = HashSet::new();
    for record in scoped.records() {
        let key = (
            record.topic_label().to_string(),
            record.source_link.clone(),
            record.target_domain.clone(),
        );
        if seen.insert(key) {
            plan.push(Mutation::relationship(
                BACKLINK_REFERS_DOMAIN,
                vec![
                    ("url", identity("source link", &record.source_link)?),
                    ("topic", identity("topic", record.topic_label())?),
                    ("domain", identity("domain", &record.target_domain)?),
                ],
            ));
        }
    }

    Ok(plan)
}

/// Multi-domain rollup projection: domain and backlink-domain nodes only.
///
/// Referral edges are deduplicated per (backlink domain, target domain)
/// pair, matching the merge-on-create identity of the nodes they connect.
pub fn summary_plan(scope: &GraphScope, table: &BacklinkTable) -> BackgraphResult<ProjectionPlan> {
    if scope.is_empty() {
        return Err(BackgraphError::EmptyScope);
    }
    let scoped = table.scoped(scope);
    let mut plan = ProjectionPlan::new();

    for domain in scope.domains() {
        plan.push(Mutation::node(
            MERGE_DOMAIN,
            vec![("url", identity("domain", domain)?)],
        ));
    }

    for backlink_domain in scoped.distinct_source_domains() {
        plan.push(Mutation::node(
            MERGE_BACKLINK_DOMAIN,
            vec![("url", identity("source domain", backlink_domain)?)],
        ));
    }

    let mut seen = HashSet::new();
    for record in scoped.records() {
        let key = (record.source_domain.clone(), record.target_domain.clone());
        if seen.insert(key) {
            plan.push(Mutation::relationship(
                BACKLINK_DOMAIN_REFERS_DOMAIN,
                vec![
                    ("source", identity("source domain", &record.source_domain)?),
                    ("target", identity("domain", &record.target_domain)?),
                ],
            ));
        }
    }

    Ok(plan)
}

/// Backlink nodes plus their BELONGS_TO_DOMAIN edges, one per distinct
/// (topic, source link) identity. The source domain is derived from the
/// source link, so the identity also pins the owning backlink domain.
fn push_backlink_nodes(plan: &mut ProjectionPlan, scoped: &BacklinkTable) -> BackgraphResult<()> {
    let mut seen = HashSet::new();
    for record in scoped.records() {
        let key = (record.topic_label().to_string(), record.source_link.clone());
        if !seen.insert(key) {
            continue;
        }

        plan.push(Mutation::node(
            MERGE_BACKLINK,
            vec![
                ("url", identity("source link", &record.source_link)?),
                ("topic", identity("topic", record.topic_label())?),
                ("anchor_text", ParamValue::Str(record.anchor_text.clone())),
                ("trust_flow", ParamValue::Int(record.source_trust_flow)),
                ("citation_flow", ParamValue::Int(record.source_citation_flow)),
            ],
        ));
        plan.push(Mutation::relationship(
            BACKLINK_OF_DOMAIN,
            vec![
                ("url", identity("source link", &record.source_link)?),
                ("topic", identity("topic", record.topic_label())?),
                ("domain", identity("source domain", &record.source_domain)?),
            ],
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backgraph_core::BacklinkRecord;

    fn record(source: &str, target_link: &str, target_domain: &str, topic: &str) -> BacklinkRecord {
        BacklinkRecord {
            source_link: source.to_string(),
            target_link: target_link.to_string(),
            anchor_text: "anchor".to_string(),
            source_trust_flow: 30,
            source_citation_flow: 40,
            topic: Some(topic.to_string()),
            last_seen_date: "2026-08-05".to_string(),
            target_domain: target_domain.to_string(),
            source_domain: source.split('/').next().unwrap_or("").to_string(),
        }
    }

    fn sample_table() -> BacklinkTable {
        BacklinkTable::from_records(vec![
            record("blog.org/post", "promo", "a.com", "News"),
            record("blog.org/post", "signup", "a.com", "News"),
            record("forum.net/thread", "promo", "a.com", "Sports"),
            record("other.org/x", "odds", "b.com", "News"),
        ])
    }

    fn count_cypher(plan: &ProjectionPlan, cypher: &str) -> usize {
        plan.mutations().iter().filter(|m| m.cypher() == cypher).count()
    }

    #[test]
    fn test_plans_start_with_reset() {
        let plan = domain_detail_plan("a.com", &sample_table()).unwrap();
        assert_eq!(plan.mutations()[0].kind(), MutationKind::Reset);
        assert_eq!(
            plan.mutations()
                .iter()
                .filter(|m| m.kind() == MutationKind::Reset)
                .count(),
            1
        );
    }

    #[test]
    fn test_domain_detail_plan_is_deterministic() {
        let table = sample_table();
        let first = domain_detail_plan("a.com", &table).unwrap();
        let second = domain_detail_plan("a.com", &table).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn test_shared_identity_merges_into_one_backlink_node() {
        // Two rows share (topic, source link) but point at different target
        // links: one backlink node, two referral edges.
        let plan = domain_detail_plan("a.com", &sample_table()).unwrap();

        let backlink_nodes: Vec<_> = plan
            .mutations()
            .iter()
            .filter(|m| m.cypher() == MERGE_BACKLINK)
            .filter(|m| {
                m.params()
                    .iter()
                    .any(|(k, v)| *k == "url" && *v == ParamValue::Str("blog.org/post".into()))
            })
            .collect();
        assert_eq!(backlink_nodes.len(), 1);

        let refers: Vec<_> = plan
            .mutations()
            .iter()
            .filter(|m| m.cypher() == BACKLINK_REFERS_LINK)
            .filter(|m| {
                m.params()
                    .iter()
                    .any(|(k, v)| *k == "url" && *v == ParamValue::Str("blog.org/post".into()))
            })
            .collect();
        assert_eq!(refers.len(), 2);
    }

    #[test]
    fn test_domain_detail_scopes_to_one_domain() {
        let plan = domain_detail_plan("a.com", &sample_table()).unwrap();
        for mutation in plan.mutations() {
            for (_, value) in mutation.params() {
                assert_ne!(*value, ParamValue::Str("other.org".into()));
                assert_ne!(*value, ParamValue::Str("b.com".into()));
            }
        }
    }

    #[test]
    fn test_relationships_follow_their_nodes() {
        let plan = domain_detail_plan("a.com", &sample_table()).unwrap();
        let last_node = plan
            .mutations()
            .iter()
            .rposition(|m| m.kind() == MutationKind::Node)
            .unwrap();
        let refers_after_nodes = plan.mutations()[last_node..]
            .iter()
            .filter(|m| m.cypher() == BACKLINK_REFERS_LINK)
            .count();
        // Every referral edge sits after the last node mutation.
        assert_eq!(refers_after_nodes, count_cypher(&plan, BACKLINK_REFERS_LINK));
        assert!(refers_after_nodes > 0);
    }

    #[test]
    fn test_link_level_plan_skips_link_layer() {
        let scope = GraphScope::many(["a.com", "b.com"]);
        let plan = link_level_plan(&scope, &sample_table()).unwrap();

        assert_eq!(count_cypher(&plan, MERGE_LINK), 0);
        assert_eq!(count_cypher(&plan, MERGE_DOMAIN), 2);
        assert!(count_cypher(&plan, BACKLINK_REFERS_DOMAIN) > 0);
    }

    #[test]
    fn test_summary_plan_creates_unreferenced_domains() {
        let table = BacklinkTable::from_records(vec![
            record("blog.org/post", "promo", "a.com", "News"),
        ]);
        let scope = GraphScope::many(["a.com", "b.com"]);
        let plan = summary_plan(&scope, &table).unwrap();

        // Both domain nodes exist even though only a.com has rows.
        assert_eq!(count_cypher(&plan, MERGE_DOMAIN), 2);

        // No edge references b.com.
        let edges_touching_b = plan
            .mutations()
            .iter()
            .filter(|m| m.kind() == MutationKind::Relationship)
            .filter(|m| {
                m.params()
                    .iter()
                    .any(|(_, v)| *v == ParamValue::Str("b.com".into()))
            })
            .count();
        assert_eq!(edges_touching_b, 0);
    }

    #[test]
    fn test_summary_plan_dedupes_domain_pairs() {
        let table = BacklinkTable::from_records(vec![
            record("blog.org/post", "promo", "a.com", "News"),
            record("blog.org/other", "signup", "a.com", "Sports"),
        ]);
        let scope = GraphScope::single("a.com");
        let plan = summary_plan(&scope, &table).unwrap();

        // Two rows, one (blog.org, a.com) pair, one edge.
        assert_eq!(count_cypher(&plan, BACKLINK_DOMAIN_REFERS_DOMAIN), 1);
    }

    #[test]
    fn test_empty_scope_is_rejected() {
        let scope = GraphScope::many(Vec::<String>::new());
        assert!(matches!(
            summary_plan(&scope, &sample_table()),
            Err(BackgraphError::EmptyScope)
        ));
        assert!(matches!(
            link_level_plan(&scope, &sample_table()),
            Err(BackgraphError::EmptyScope)
        ));
    }

    #[test]
    fn test_quote_in_identity_is_rejected_before_reset() {
        let table = BacklinkTable::from_records(vec![record(
            "evil.org/a'}) DETACH DELETE (n",
            "promo",
            "a.com",
            "News",
        )]);
        let err = domain_detail_plan("a.com", &table).unwrap_err();
        assert!(matches!(
            err,
            BackgraphError::InvalidValue { offender: '\'', .. }
        ));
    }

    #[test]
    fn test_missing_topic_uses_empty_label() {
        let mut r = record("blog.org/post", "promo", "a.com", "News");
        r.topic = None;
        let table = BacklinkTable::from_records(vec![r]);
        let plan = domain_detail_plan("a.com", &table).unwrap();

        let backlink = plan
            .mutations()
            .iter()
            .find(|m| m.cypher() == MERGE_BACKLINK)
            .unwrap();
        assert!(backlink
            .params()
            .iter()
            .any(|(k, v)| *k == "topic" && *v == ParamValue::Str(String::new())));
    }

    #[test]
    fn test_stats_count_nodes_and_relationships() {
        let table = BacklinkTable::from_records(vec![
            record("blog.org/post", "promo", "a.com", "News"),
        ]);
        let plan = domain_detail_plan("a.com", &table).unwrap();
        let stats = plan.stats();

        // Domain, link, backlink domain, backlink.
        assert_eq!(stats.nodes_created, 4);
        // IS_LINK_OF, BELONGS_TO_DOMAIN, REFERS_TO.
        assert_eq!(stats.relationships_created, 3);
    }
}
