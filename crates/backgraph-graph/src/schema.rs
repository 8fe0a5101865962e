//! Neo4j schema initialization (constraints and indexes).
//!
//! Backlink nodes carry their topic as an indexed property rather than a
//! label per topic value. Schema objects survive the per-run
//! `DETACH DELETE` reset.

use anyhow::Result;
use neo4rs::Query;
use tracing::info;

use crate::GraphClient;

/// Cypher statements for schema initialization.
const SCHEMA_STATEMENTS: &[&str] = &[
    // Uniqueness constraints on node identity
    "CREATE CONSTRAINT domain_url IF NOT EXISTS FOR (d:Domain) REQUIRE d.url IS UNIQUE",
    "CREATE CONSTRAINT link_url IF NOT EXISTS FOR (l:Link) REQUIRE l.url IS UNIQUE",
    "CREATE CONSTRAINT backlink_domain_url IF NOT EXISTS FOR (b:BacklinkDomain) REQUIRE b.url IS UNIQUE",
    // Backlink identity is (url, topic); composite node keys need enterprise,
    // plain indexes cover the MATCH patterns
    "CREATE INDEX backlink_url IF NOT EXISTS FOR (b:Backlink) ON (b.url)",
    "CREATE INDEX backlink_topic IF NOT EXISTS FOR (b:Backlink) ON (b.topic)",
];

/// Initialize the graph schema.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(client: &GraphClient) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        client.execute(Query::new(statement.to_string())).await?;
    }

    info!("Graph schema initialized ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}
