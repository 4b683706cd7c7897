//! Named collections of queries with subset admission tracking.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{QueryError, Result};
use crate::parser;
use crate::query::{Query, SubsetFilter};

/// A named collection of queries, plus the admission state that decides
/// which incoming message subsets need to be decoded at all.
///
/// A query set is built once (constructor plus zero or more [`add`] calls)
/// and then only read. An unrestricted set admits every subset until the
/// first `add`; from then on admission follows the subsets the added queries
/// actually mention, with a `*` selector admitting everything again. A
/// restricted set never admits subsets outside its limit.
///
/// [`add`]: QuerySet::add
#[derive(Debug, Clone)]
pub struct QuerySet {
    includes_all_subsets: bool,
    add_has_been_called: bool,
    limit_subsets: BTreeSet<String>,
    present_subsets: BTreeSet<String>,
    query_map: BTreeMap<String, Vec<Query>>,
}

impl QuerySet {
    /// Create an unrestricted query set that admits every subset.
    pub fn new() -> Self {
        Self {
            includes_all_subsets: true,
            add_has_been_called: false,
            limit_subsets: BTreeSet::new(),
            present_subsets: BTreeSet::new(),
            query_map: BTreeMap::new(),
        }
    }

    /// Create a query set restricted to the given subsets.
    ///
    /// An empty list behaves exactly like [`QuerySet::new`].
    pub fn with_subsets<I, S>(subsets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let limit: BTreeSet<String> = subsets.into_iter().map(Into::into).collect();

        Self {
            includes_all_subsets: limit.is_empty(),
            add_has_been_called: false,
            limit_subsets: limit,
            present_subsets: BTreeSet::new(),
            query_map: BTreeMap::new(),
        }
    }

    /// Parse `query_str` and register the resulting queries under `name`.
    ///
    /// Queries added under an existing name are appended, never deduplicated.
    /// Admission state is updated from each parsed query's subset selector; a
    /// wildcard selector saturates the admission set (within the limit, when
    /// one was given).
    pub fn add(&mut self, name: &str, query_str: &str) -> Result<()> {
        if !self.add_has_been_called {
            self.add_has_been_called = true;
            self.includes_all_subsets = false;
        }

        let queries = parser::parse(query_str)?;

        for query in &queries {
            if self.limit_subsets.is_empty() {
                match &query.subset {
                    SubsetFilter::Any => self.includes_all_subsets = true,
                    SubsetFilter::Name(subset) => {
                        self.present_subsets.insert(subset.clone());
                    }
                }
            } else {
                match &query.subset {
                    SubsetFilter::Any => {
                        // Wildcard saturates within the limit.
                        self.present_subsets = self.limit_subsets.clone();
                    }
                    SubsetFilter::Name(subset) => {
                        self.present_subsets.insert(subset.clone());
                        let limit = &self.limit_subsets;
                        self.present_subsets.retain(|s| limit.contains(s));
                    }
                }
            }
        }

        self.query_map.entry(name.to_string()).or_default().extend(queries);
        Ok(())
    }

    /// Whether messages belonging to `subset` must be processed.
    pub fn includes_subset(&self, subset: &str) -> bool {
        if self.includes_all_subsets {
            return true;
        }

        if self.query_map.is_empty() {
            self.limit_subsets.contains(subset)
        } else {
            self.present_subsets.contains(subset)
        }
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.query_map.keys().cloned().collect()
    }

    /// Queries registered under `name`.
    pub fn queries_for(&self, name: &str) -> Result<&[Query]> {
        self.query_map
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| QueryError::UnknownName(name.to_string()))
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.query_map.len()
    }

    /// Whether any queries have been added.
    pub fn is_empty(&self) -> bool {
        self.query_map.is_empty()
    }
}

impl Default for QuerySet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_set_admits_everything() {
        let set = QuerySet::new();
        assert!(set.includes_subset("NC000007"));
        assert!(set.includes_subset("ANYTHING"));
    }

    #[test]
    fn test_empty_limit_behaves_unrestricted() {
        let set = QuerySet::with_subsets(Vec::<String>::new());
        assert!(set.includes_subset("NC000007"));
    }

    #[test]
    fn test_first_add_narrows_admission() {
        let mut set = QuerySet::new();
        set.add("lat", "NC000007/CLAT").unwrap();

        assert!(set.includes_subset("NC000007"));
        assert!(!set.includes_subset("NC000008"));
    }

    #[test]
    fn test_wildcard_add_keeps_admitting_everything() {
        let mut set = QuerySet::new();
        set.add("temp", "*/BRPSQ1/TMDB").unwrap();

        assert!(set.includes_subset("NC000007"));
        assert!(set.includes_subset("ANYTHING"));
    }

    #[test]
    fn test_wildcard_saturation_is_sticky() {
        let mut set = QuerySet::new();
        set.add("temp", "*/BRPSQ1/TMDB").unwrap();
        set.add("lat", "NC000007/CLAT").unwrap();

        // A later literal add must not revoke the wildcard admission.
        assert!(set.includes_subset("NC000008"));
    }

    #[test]
    fn test_restricted_set_before_any_add() {
        let set = QuerySet::with_subsets(["NC001", "NC002"]);
        assert!(set.includes_subset("NC001"));
        assert!(set.includes_subset("NC002"));
        assert!(!set.includes_subset("NC003"));
    }

    #[test]
    fn test_restricted_set_tracks_added_subsets() {
        let mut set = QuerySet::with_subsets(["NC001", "NC002"]);
        set.add("lat", "NC001/CLAT").unwrap();

        assert!(set.includes_subset("NC001"));
        assert!(!set.includes_subset("NC002"));
        assert!(!set.includes_subset("NC003"));
    }

    #[test]
    fn test_restricted_set_ignores_subsets_outside_limit() {
        let mut set = QuerySet::with_subsets(["NC001", "NC002"]);
        set.add("lat", "NC009/CLAT").unwrap();

        assert!(!set.includes_subset("NC009"));
        assert!(!set.includes_subset("NC001"));
    }

    #[test]
    fn test_wildcard_saturates_within_limit() {
        let mut set = QuerySet::with_subsets(["NC001", "NC002"]);
        set.add("temp", "*/BRPSQ1/TMDB").unwrap();

        assert!(set.includes_subset("NC001"));
        assert!(set.includes_subset("NC002"));
        assert!(!set.includes_subset("NC003"));
    }

    #[test]
    fn test_add_appends_under_existing_name() {
        let mut set = QuerySet::new();
        set.add("temp", "*/BRPSQ1/TMDB").unwrap();
        set.add("temp", "*/BRPSQ2/TMDB").unwrap();

        let queries = set.queries_for("temp").unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].path, vec!["BRPSQ1", "TMDB"]);
        assert_eq!(queries[1].path, vec!["BRPSQ2", "TMDB"]);
    }

    #[test]
    fn test_alternative_list_registers_all_queries() {
        let mut set = QuerySet::new();
        set.add("temp", "[*/BRPSQ1/TMDB, */BRPSQ2/TMDB]").unwrap();

        assert_eq!(set.queries_for("temp").unwrap().len(), 2);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut set = QuerySet::new();
        set.add("zulu", "*/A/B").unwrap();
        set.add("alpha", "*/C/D").unwrap();

        assert_eq!(set.names(), vec!["alpha", "zulu"]);
    }

    #[test]
    fn test_queries_for_unknown_name() {
        let set = QuerySet::new();
        assert!(matches!(
            set.queries_for("missing"),
            Err(QueryError::UnknownName(_))
        ));
    }

    #[test]
    fn test_invalid_query_leaves_map_unchanged() {
        let mut set = QuerySet::new();
        assert!(set.add("bad", "*").is_err());
        assert!(set.is_empty());
    }
}
