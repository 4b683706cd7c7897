//! Query value types for addressing nodes in decoded observation trees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which message subsets a query applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsetFilter {
    /// Match any subset.
    Any,
    /// Match only the named subset.
    Name(String),
}

impl SubsetFilter {
    /// Check if this filter is the `*` wildcard.
    pub fn is_any(&self) -> bool {
        matches!(self, SubsetFilter::Any)
    }

    /// Get the subset name if this filter is a literal.
    pub fn name(&self) -> Option<&str> {
        match self {
            SubsetFilter::Any => None,
            SubsetFilter::Name(name) => Some(name),
        }
    }
}

/// A parsed path expression addressing one node of the observation tree.
///
/// The textual form is `/`-separated: the first component selects the subset
/// (`*` for any), the rest name nodes from the root down. `Display` renders
/// the same form back, so a query round-trips through [`crate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// Subset selector from the leading path component.
    pub subset: SubsetFilter,
    /// Node names below the subset, in order.
    pub path: Vec<String>,
}

impl Query {
    /// Create a query from its parts.
    pub fn new(subset: SubsetFilter, path: Vec<String>) -> Self {
        Self { subset, path }
    }

    /// Node components below the subset selector.
    pub fn components(&self) -> &[String] {
        &self.path
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subset {
            SubsetFilter::Any => write!(f, "*")?,
            SubsetFilter::Name(name) => write!(f, "{}", name)?,
        }
        for component in &self.path {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}
