//! Backgraph Core Library
//!
//! Shared data model for the backlink visualization pipeline: the backlink
//! record and table types, URL canonicalization, and error types.

pub mod error;
pub mod record;
pub mod scope;
pub mod url;

pub use error::{BackgraphError, BackgraphResult};
pub use record::{BacklinkRecord, BacklinkTable};
pub use scope::GraphScope;
