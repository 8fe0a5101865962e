//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "backgraph_dev".to_string(),
        }
    }
}

/// Client for the backlink visualization graph.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect and verify the connection.
    ///
    /// neo4rs pools lazily, so `Graph::connect` succeeds even when Neo4j is
    /// down. A `RETURN 1` ping forces the bolt handshake so an unreachable
    /// store fails here instead of mid-projection, after the destructive
    /// reset would already have been issued.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db("neo4j")
            .max_connections(2)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self { graph })
    }

    /// Execute one mutation statement. Each statement is its own unit; no
    /// transaction spans more than one.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph
            .run(query)
            .await
            .context("Neo4j mutation failed")?;
        Ok(())
    }

    /// Node and relationship counts of the current graph.
    pub async fn counts(&self) -> Result<GraphCounts> {
        let nodes = self
            .scalar_count("MATCH (n) RETURN count(n) AS count")
            .await?;
        let relationships = self
            .scalar_count("MATCH ()-[r]->() RETURN count(r) AS count")
            .await?;

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
        })
    }

    async fn scalar_count(&self, cypher: &str) -> Result<i64> {
        let mut result = self
            .graph
            .execute(Query::new(cypher.to_string()))
            .await
            .context("Neo4j count query failed")?;

        match result.next().await {
            Ok(Some(row)) => row
                .get("count")
                .map_err(|e| anyhow::anyhow!("Malformed count row: {:?}", e)),
            _ => Ok(0),
        }
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
