//! Statement-text matching seam.
//!
//! The resolver walks registry entries in insertion order and asks the
//! matcher whether each registered key answers the query; candidate
//! ordering is therefore registration order by construction, which the
//! first-match-wins rule depends on.

/// Decides whether a registered statement text matches an executed
/// query under the configured text policy.
pub trait StatementMatcher {
    /// `exact` requires full equality (modulo case when
    /// `case_sensitive` is off). Non-exact mode treats the registered
    /// key as a pattern the query must contain.
    fn matches(&self, registered: &str, query: &str, case_sensitive: bool, exact: bool) -> bool;
}

/// Default text policy: exact mode is string equality, substring mode
/// looks for the registered key inside the query. Case folding is
/// full-string Unicode lowercasing.
///
/// Registering `"select"` and executing `"select * from t"` matches in
/// substring mode; the registered key is the pattern, not the query.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl StatementMatcher for SubstringMatcher {
    fn matches(&self, registered: &str, query: &str, case_sensitive: bool, exact: bool) -> bool {
        if case_sensitive {
            if exact {
                registered == query
            } else {
                query.contains(registered)
            }
        } else {
            let registered = registered.to_lowercase();
            let query = query.to_lowercase();
            if exact {
                registered == query
            } else {
                query.contains(&registered)
            }
        }
    }
}
