//! Error types for result-set extraction.

use thiserror::Error;

/// Errors that can occur when extracting dense arrays from a result set.
#[derive(Error, Debug)]
pub enum ResultSetError {
    /// The result set contains no data frames.
    #[error("this result set is empty (does not contain any data)")]
    EmptyResultSet,

    /// The requested field is not present in the result set.
    #[error("this result set does not contain a field named \"{0}\"")]
    UnknownField(String),

    /// Target and group-by fields do not share a common path.
    #[error(
        "the group-by path \"{group_by_path}\" and target path \"{target_path}\" \
         do not share a common path"
    )]
    BadGroupByPath {
        target_path: String,
        group_by_path: String,
    },

    /// The requested conversion crosses the string/numeric boundary.
    #[error("conversions between numbers and strings are not supported (field \"{0}\")")]
    BadConversion(String),

    /// The override type token is not recognized.
    #[error("unknown or unsupported type \"{0}\"")]
    BadOverrideType(String),
}

/// Result type for result-set operations.
pub type Result<T> = std::result::Result<T, ResultSetError>;
