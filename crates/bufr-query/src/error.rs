//! Error types for query parsing and query sets.

use thiserror::Error;

/// Errors that can occur when parsing queries or building a query set.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query string is malformed.
    #[error("invalid query \"{query}\": {reason}")]
    InvalidQuery {
        query: String,
        reason: String,
    },

    /// No queries are registered under the requested name.
    #[error("no queries registered under the name \"{0}\"")]
    UnknownName(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
