//! CLI command definitions and handlers.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use backgraph_core::{BacklinkTable, GraphScope};
use backgraph_graph::{GraphClient, ProjectionStats};
use backgraph_majestic::MajesticClient;

use crate::config::AppConfig;

/// Backlink graph visualization
#[derive(Parser)]
#[command(name = "backgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "backgraph.toml")]
    pub config: PathBuf,

    /// Cap on rows requested per domain (defaults to the configured count)
    #[arg(long, global = true)]
    pub max_results: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Visualize one domain: links, backlinks, and backlink domains
    Domain {
        /// Tracked domain to visualize
        domain: String,
    },

    /// Visualize several domains at link level, to compare overlapping
    /// backlink sources
    Links {
        /// Tracked domains (defaults to the configured list)
        domains: Vec<String>,
    },

    /// Visualize the domain-level rollup only
    Summary {
        /// Tracked domains (defaults to the configured list)
        domains: Vec<String>,
    },

    /// Show node/relationship counts of the current graph
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        debug!(path = %self.config.display(), "Loading configuration");
        let config = AppConfig::load(&self.config)?;
        let client = GraphClient::connect(&config.graph).await?;

        match self.command {
            Commands::Domain { domain } => {
                let table = fetch_table(&config, std::slice::from_ref(&domain), self.max_results).await;
                backgraph_graph::initialize_schema(&client).await?;
                let stats = backgraph_graph::project_domain(&client, &domain, &table).await?;
                print_stats(&stats);
            }
            Commands::Links { domains } => {
                let scope = resolve_scope(&config, domains)?;
                let table = fetch_table(&config, scope.domains(), self.max_results).await;
                backgraph_graph::initialize_schema(&client).await?;
                let stats = backgraph_graph::project_link_level(&client, &scope, &table).await?;
                print_stats(&stats);
            }
            Commands::Summary { domains } => {
                let scope = resolve_scope(&config, domains)?;
                let table = fetch_table(&config, scope.domains(), self.max_results).await;
                backgraph_graph::initialize_schema(&client).await?;
                let stats = backgraph_graph::project_summary(&client, &scope, &table).await?;
                print_stats(&stats);
            }
            Commands::Status => {
                let counts = client.counts().await?;
                println!("{}", "Graph status:".bold());
                println!("  Nodes: {}", counts.nodes);
                println!("  Relationships: {}", counts.relationships);
            }
        }

        Ok(())
    }
}

/// Domains given on the command line win over the configured list.
fn resolve_scope(config: &AppConfig, domains: Vec<String>) -> Result<GraphScope> {
    let domains = if domains.is_empty() {
        config.fetch.domains.clone()
    } else {
        domains
    };
    if domains.is_empty() {
        bail!("No domains given and none configured under [fetch]");
    }
    Ok(GraphScope::many(domains))
}

async fn fetch_table(
    config: &AppConfig,
    domains: &[String],
    max_results: Option<u32>,
) -> BacklinkTable {
    let majestic = MajesticClient::new(config.majestic.clone());
    let max_results = max_results.or(config.fetch.max_results);
    let table = majestic
        .fetch(domains, config.cutoff_date(), max_results)
        .await;

    println!(
        "Fetched {} backlink rows across {} domain(s)",
        table.len(),
        domains.len()
    );
    table
}

fn print_stats(stats: &ProjectionStats) {
    println!("\n{}", "Projection complete:".green().bold());
    println!("  Nodes created: {}", stats.nodes_created);
    println!("  Relationships created: {}", stats.relationships_created);
    println!(
        "\nOpen the Neo4j browser and run {} to display the graph",
        "MATCH (n) RETURN n".cyan()
    );
}
