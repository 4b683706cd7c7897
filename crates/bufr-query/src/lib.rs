//! Path expressions and query sets for BUFR field extraction.
//!
//! A query names one node of the hierarchical observation tree inside a BUFR
//! message, scoped to a message subset (or to any subset via the `*`
//! wildcard). A [`QuerySet`] collects named queries and tracks which subsets
//! the caller cares about, so the decoder can skip messages wholesale.

pub mod error;
pub mod parser;
pub mod query;
pub mod query_set;

pub use error::{QueryError, Result};
pub use parser::parse;
pub use query::{Query, SubsetFilter};
pub use query_set::QuerySet;
