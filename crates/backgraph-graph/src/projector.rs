//! Plan application against the live store.
//!
//! Mutations are issued strictly in plan order, one statement at a time.
//! The first store error aborts the run and surfaces as-is: the reset has
//! already committed by then and there is no rollback.

use anyhow::Result;
use tracing::{debug, info};

use backgraph_core::{BacklinkTable, GraphScope};

use crate::client::GraphClient;
use crate::plan::{self, ProjectionPlan, ProjectionStats};

/// Project one domain with full link-level detail.
pub async fn project_domain(
    client: &GraphClient,
    domain: &str,
    table: &BacklinkTable,
) -> Result<ProjectionStats> {
    let plan = plan::domain_detail_plan(domain, table)?;
    info!(domain = %domain, "Projecting single-domain backlink graph");
    apply(client, &plan).await
}

/// Project several domains at link level, without the per-domain link layer.
pub async fn project_link_level(
    client: &GraphClient,
    scope: &GraphScope,
    table: &BacklinkTable,
) -> Result<ProjectionStats> {
    let plan = plan::link_level_plan(scope, table)?;
    info!(domains = scope.len(), "Projecting link-level backlink graph");
    apply(client, &plan).await
}

/// Project the domain-level rollup.
pub async fn project_summary(
    client: &GraphClient,
    scope: &GraphScope,
    table: &BacklinkTable,
) -> Result<ProjectionStats> {
    let plan = plan::summary_plan(scope, table)?;
    info!(domains = scope.len(), "Projecting domain rollup graph");
    apply(client, &plan).await
}

async fn apply(client: &GraphClient, plan: &ProjectionPlan) -> Result<ProjectionStats> {
    let stats = plan.stats();
    debug!(
        mutations = plan.mutations().len(),
        "Applying projection plan"
    );

    for mutation in plan.mutations() {
        client.execute(mutation.to_query()).await?;
    }

    info!(
        nodes = stats.nodes_created,
        relationships = stats.relationships_created,
        "Projection complete"
    );
    Ok(stats)
}
