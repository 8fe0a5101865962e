//! Centralized error types for backgraph.

use thiserror::Error;

/// Main error type for backgraph operations.
#[derive(Error, Debug)]
pub enum BackgraphError {
    #[error("Invalid value for {field}: contains forbidden character {offender:?}")]
    InvalidValue { field: &'static str, offender: char },

    #[error("Empty graph scope: at least one target domain is required")]
    EmptyScope,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backgraph operations.
pub type BackgraphResult<T> = Result<T, BackgraphError>;

impl BackgraphError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
