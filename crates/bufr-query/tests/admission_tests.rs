//! Integration tests for subset admission across parser and query set.

use bufr_query::{parse, QuerySet, SubsetFilter};

#[test]
fn test_unrestricted_set_with_wildcard_add() {
    let mut set = QuerySet::new();
    assert!(set.includes_subset("ANY"));

    set.add("x", "*/A/B").unwrap();
    assert!(set.includes_subset("ANY"));
}

#[test]
fn test_restricted_set_admits_only_added_limit_subsets() {
    let mut set = QuerySet::with_subsets(["NC001", "NC002"]);
    set.add("x", "NC001/A").unwrap();

    assert!(set.includes_subset("NC001"));
    assert!(!set.includes_subset("NC002"));
}

#[test]
fn test_admission_is_intersection_of_limit_and_added() {
    // For a restricted set, a subset is admitted iff it is in the limit AND
    // was mentioned by an added query.
    let limit = ["NC001", "NC002", "NC003"];
    let added = ["NC002", "NC009"];

    let mut set = QuerySet::with_subsets(limit);
    for (i, subset) in added.iter().enumerate() {
        set.add(&format!("q{}", i), &format!("{}/NODE", subset)).unwrap();
    }

    for subset in ["NC001", "NC002", "NC003", "NC009"] {
        let expected = limit.contains(&subset) && added.contains(&subset);
        assert_eq!(set.includes_subset(subset), expected, "subset {}", subset);
    }
}

#[test]
fn test_parsed_queries_round_trip_into_set() {
    let mut set = QuerySet::new();
    set.add("temp", "[NC000007/BRPSQ1/TMDB, NC000008/BRPSQ2/TMDB]").unwrap();

    let queries = set.queries_for("temp").unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(
        queries[0].subset,
        SubsetFilter::Name("NC000007".to_string())
    );

    // Stored queries render back to parseable strings.
    for query in queries {
        assert_eq!(parse(&query.to_string()).unwrap()[0], *query);
    }

    assert!(set.includes_subset("NC000007"));
    assert!(set.includes_subset("NC000008"));
    assert!(!set.includes_subset("NC000009"));
}
