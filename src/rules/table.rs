//! Redirect lookup table and path normalization.
//!
//! The table is an exact-match map from normalized source path to
//! rule. It is immutable once built; reloading the rule file builds a
//! whole new table (see `store`).

use hyper::StatusCode;
use std::collections::HashMap;

use super::parse::Rule;

/// Result of resolving a request path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the client to `target` with the given redirect status.
    Redirect { target: String, status: StatusCode },
    /// The path was intentionally removed (HTTP 410).
    Gone,
    /// No rule for this path; the caller falls through to static
    /// content or its own 404 handling.
    NotFound,
}

/// Normalize a path for table comparison.
///
/// Lower-cases the path and collapses every run of consecutive `/`
/// into a single `/`. The same transform is applied to rule sources at
/// build time and to request paths at lookup time, so the two sides
/// stay comparable; it is a fixed point on already-normalized input.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut prev_slash = false;
    for ch in path.chars().flat_map(char::to_lowercase) {
        if ch == '/' && prev_slash {
            continue;
        }
        prev_slash = ch == '/';
        normalized.push(ch);
    }
    normalized
}

/// Exact-match redirect table keyed by normalized source path.
#[derive(Debug, Default)]
pub struct RedirectTable {
    entries: HashMap<String, Rule>,
}

impl RedirectTable {
    /// Build a table from parsed rules.
    ///
    /// Rules are inserted in file order; a later rule with the same
    /// normalized source silently overwrites an earlier one.
    pub fn build<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut entries = HashMap::new();
        for rule in rules {
            entries.insert(normalize_path(rule.source()), rule);
        }
        Self { entries }
    }

    /// Look up a request path and decide the response.
    ///
    /// Pure lookup over the built map: no prefix matching, no IO, no
    /// failure mode beyond `NotFound`.
    pub fn resolve(&self, path: &str) -> Outcome {
        match self.entries.get(&normalize_path(path)) {
            None => Outcome::NotFound,
            Some(Rule::Gone { .. }) => Outcome::Gone,
            Some(Rule::Redirect { target, status, .. }) => Outcome::Redirect {
                target: target.clone(),
                status: *status,
            },
        }
    }

    /// Number of distinct source paths in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse::parse_rules;

    fn table_from(input: &str) -> RedirectTable {
        RedirectTable::build(parse_rules(input).unwrap())
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_path("/Foo/BAR"), "/foo/bar");
    }

    #[test]
    fn test_normalize_collapses_slash_runs() {
        assert_eq!(normalize_path("//a"), "/a");
        assert_eq!(normalize_path("/a///b////c"), "/a/b/c");
        assert_eq!(normalize_path("////"), "/");
    }

    #[test]
    fn test_normalize_is_a_fixed_point() {
        for path in ["/", "/a/b", "/Foo//Bar", "", "/a///"] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once);
        }
    }

    #[test]
    fn test_resolve_redirect() {
        let table = table_from("/old /new 301\n");
        assert_eq!(
            table.resolve("/old"),
            Outcome::Redirect {
                target: "/new".to_string(),
                status: StatusCode::MOVED_PERMANENTLY,
            }
        );
    }

    #[test]
    fn test_resolve_gone() {
        let table = table_from("/old -\n");
        assert_eq!(table.resolve("/old"), Outcome::Gone);
    }

    #[test]
    fn test_resolve_unknown_path() {
        let table = table_from("/old /new\n");
        assert_eq!(table.resolve("/nope"), Outcome::NotFound);
    }

    #[test]
    fn test_resolve_is_case_and_slash_insensitive() {
        let table = table_from("/Foo /bar\n");
        let expected = Outcome::Redirect {
            target: "/bar".to_string(),
            status: StatusCode::TEMPORARY_REDIRECT,
        };
        assert_eq!(table.resolve("/foo"), expected);
        assert_eq!(table.resolve("//foo"), expected);
        assert_eq!(table.resolve("/FOO"), expected);
    }

    #[test]
    fn test_last_rule_wins_on_duplicate_source() {
        let table = table_from("/a /b\n/a /c 301\n");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.resolve("/a"),
            Outcome::Redirect {
                target: "/c".to_string(),
                status: StatusCode::MOVED_PERMANENTLY,
            }
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = table_from("/a /b\n/gone -\n");
        for path in ["/a", "/gone", "/missing"] {
            assert_eq!(table.resolve(path), table.resolve(path));
        }
    }

    #[test]
    fn test_empty_table() {
        let table = RedirectTable::build(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.resolve("/anything"), Outcome::NotFound);
    }
}
