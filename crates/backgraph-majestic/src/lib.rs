//! # Backgraph Majestic
//!
//! Client for the Majestic `GetBackLinkData` API command. Fetches one bounded
//! page of backlink data per tracked domain, filters stale rows against a
//! freshness cutoff, and assembles the surviving rows into a
//! [`backgraph_core::BacklinkTable`].
//!
//! Per-domain failures are logged and swallowed: a domain that cannot be
//! fetched contributes zero rows, and the aggregate fetch always succeeds.

pub mod client;
pub mod response;

pub use client::{MajesticClient, MajesticConfig};
pub use response::{MajesticResponse, RawBacklink};
