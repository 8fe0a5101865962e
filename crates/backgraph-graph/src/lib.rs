//! # Backgraph Graph
//!
//! Neo4j integration: projects a [`backgraph_core::BacklinkTable`] into a
//! domain → link → backlink-domain → backlink graph for visual inspection.
//!
//! Every projection run clears the store first (full-replace semantics), then
//! applies a deterministic, strictly ordered plan of parameterized mutation
//! statements. Rerunning a projection with the same table rebuilds the same
//! graph.

pub mod client;
pub mod plan;
pub mod projector;
pub mod schema;

pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use plan::{
    domain_detail_plan, link_level_plan, summary_plan, Mutation, MutationKind, ParamValue,
    ProjectionPlan, ProjectionStats,
};
pub use projector::{project_domain, project_link_level, project_summary};
pub use schema::initialize_schema;
