//! Parser for textual path expressions.
//!
//! The grammar is deliberately narrow. A single query is a `/`-separated
//! path whose first component selects the subset (`*` for any); node
//! components are mnemonic tokens with an optional occurrence subscript like
//! `TMDB[2]`. Several queries can be combined into a bracketed list:
//!
//! ```text
//! */BRPSQ1/TMDB
//! NC000007/CLAT
//! [*/BRPSQ1/TMDB, */BRPSQ2/TMDB]
//! ```
//!
//! The parser is pure; it never touches descriptor tables or message data.

use crate::error::{QueryError, Result};
use crate::query::{Query, SubsetFilter};

/// Parse a query string into one or more queries.
///
/// A plain path yields exactly one query; a bracketed list yields one query
/// per alternative, in order. Malformed input yields
/// [`QueryError::InvalidQuery`].
pub fn parse(query_str: &str) -> Result<Vec<Query>> {
    let trimmed = query_str.trim();
    if trimmed.is_empty() {
        return Err(invalid(query_str, "query string is empty"));
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| invalid(query_str, "unbalanced '[' in query list"))?;

        let mut queries = Vec::new();
        for alternative in inner.split(',') {
            queries.push(parse_single(query_str, alternative)?);
        }
        return Ok(queries);
    }

    Ok(vec![parse_single(query_str, trimmed)?])
}

fn parse_single(raw: &str, expr: &str) -> Result<Query> {
    let components: Vec<&str> = expr
        .split('/')
        .map(str::trim)
        .filter(|component| !component.is_empty())
        .collect();

    if components.len() < 2 {
        return Err(invalid(
            raw,
            "expected a subset selector and at least one node",
        ));
    }

    let subset = match components[0] {
        "*" => SubsetFilter::Any,
        name => {
            if !is_mnemonic(name) {
                return Err(invalid(raw, format!("invalid subset name \"{}\"", name)));
            }
            SubsetFilter::Name(name.to_string())
        }
    };

    let mut path = Vec::with_capacity(components.len() - 1);
    for component in &components[1..] {
        if !is_node_component(component) {
            return Err(invalid(
                raw,
                format!("invalid path component \"{}\"", component),
            ));
        }
        path.push((*component).to_string());
    }

    Ok(Query::new(subset, path))
}

/// Check a mnemonic token: ASCII alphanumerics and underscores only.
fn is_mnemonic(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

/// Check a node component: a mnemonic, optionally with an occurrence
/// subscript like `TMDB[2]`. Occurrence numbers start at 1.
fn is_node_component(component: &str) -> bool {
    match component.find('[') {
        None => is_mnemonic(component),
        Some(bracket) => {
            let (name, subscript) = component.split_at(bracket);
            let digits = match subscript
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                Some(digits) => digits,
                None => return false,
            };

            is_mnemonic(name)
                && digits.parse::<u32>().map(|n| n >= 1).unwrap_or(false)
        }
    }
}

fn invalid(query: &str, reason: impl Into<String>) -> QueryError {
    QueryError::InvalidQuery {
        query: query.to_string(),
        reason: reason.into(),
    }
}
