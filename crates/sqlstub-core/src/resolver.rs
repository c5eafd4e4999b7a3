//! Expectation resolution: first registered match wins.
//!
//! Given an executed statement text and its actual parameter binding,
//! the resolver walks the selected registry's entries in key insertion
//! order, filters statement texts through the [`StatementMatcher`],
//! and tests each candidate's expectations in registration order
//! against the parameter policy. The first expectation whose binding
//! matches supplies the outcome; nothing after it is inspected.
//!
//! Resolution is a pure single-pass lookup: no retries, no mutation,
//! and "nothing registered" is a normal `None` result rather than an
//! error.

use sqlstub_types::{ParamValue, ParameterBinding};
use tracing::debug;

use crate::compare::{CoercingComparator, ValueComparator};
use crate::matcher::{StatementMatcher, SubstringMatcher};
use crate::store::{ExpectationStore, Registry};

/// The three independent matching switches.
///
/// `case_sensitive_text` and `exact_text` govern statement-text
/// matching and are passed through to the [`StatementMatcher`];
/// `exact_parameter_match` selects the parameter policy the resolver
/// itself applies. All default to off: case-insensitive substring text
/// matching with subset parameter matching.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchConfig {
    /// Statement-text comparison honors case.
    pub case_sensitive_text: bool,
    /// Statement text must match in full rather than as a pattern.
    pub exact_text: bool,
    /// Actual and expected bindings must have identical key sets
    /// (exact mode) instead of expected-is-a-subset (subset mode).
    pub exact_parameter_match: bool,
}

/// Finds the first registered expectation matching an execution.
///
/// Holds the two collaborator seams and the [`MatchConfig`]; the store
/// is passed in per call, so one resolver can serve several stores and
/// a store stays a plain data structure. Single-threaded usage model,
/// like the store.
pub struct ExpectationResolver {
    matcher: Box<dyn StatementMatcher>,
    comparator: Box<dyn ValueComparator>,
    config: MatchConfig,
}

impl Default for ExpectationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectationResolver {
    /// Resolver with the default substring matcher, coercing
    /// comparator, and all-off [`MatchConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: Box::new(SubstringMatcher),
            comparator: Box::new(CoercingComparator),
            config: MatchConfig::default(),
        }
    }

    /// Replace the statement-text matcher.
    pub fn set_matcher(&mut self, matcher: impl StatementMatcher + 'static) {
        self.matcher = Box::new(matcher);
    }

    /// Replace the value comparator.
    pub fn set_comparator(&mut self, comparator: impl ValueComparator + 'static) {
        self.comparator = Box::new(comparator);
    }

    /// Current matching configuration.
    #[must_use]
    pub const fn config(&self) -> MatchConfig {
        self.config
    }

    /// Statement-text matching honors case.
    pub fn set_case_sensitive_text(&mut self, case_sensitive: bool) {
        self.config.case_sensitive_text = case_sensitive;
    }

    /// Statement text must match in full.
    pub fn set_exact_text(&mut self, exact: bool) {
        self.config.exact_text = exact;
    }

    /// Parameter bindings must match exactly rather than by subset.
    pub fn set_exact_parameter_match(&mut self, exact: bool) {
        self.config.exact_parameter_match = exact;
    }

    /// First matching tabular result for this execution, if any.
    pub fn resolve_result_set<'a, R>(
        &self,
        store: &'a ExpectationStore<R>,
        query: &str,
        actual: &ParameterBinding,
    ) -> Option<&'a R> {
        self.resolve_in(store.result_sets(), query, actual)
    }

    /// First matching update count for this execution, if any.
    pub fn resolve_update_count<R>(
        &self,
        store: &ExpectationStore<R>,
        query: &str,
        actual: &ParameterBinding,
    ) -> Option<i64> {
        self.resolve_in(store.update_counts(), query, actual).copied()
    }

    fn resolve_in<'a, T>(
        &self,
        registry: &'a Registry<T>,
        query: &str,
        actual: &ParameterBinding,
    ) -> Option<&'a T> {
        for (statement, expectations) in registry.entries() {
            if !self.matcher.matches(
                statement,
                query,
                self.config.case_sensitive_text,
                self.config.exact_text,
            ) {
                continue;
            }
            for expectation in expectations {
                if self.parameters_match(expectation.binding(), actual) {
                    debug!(query, statement, "expectation matched");
                    return Some(expectation.outcome());
                }
            }
        }
        debug!(query, "no expectation matched");
        None
    }

    /// Test the actual binding against an expected binding.
    ///
    /// Exact mode: sizes must agree, then every actual key must exist
    /// in the expected binding with an equal value. Iterating actual
    /// keys (not expected) after the size precheck is deliberate and
    /// preserved from the historical semantics; with equal sizes and
    /// no foreign actual key it amounts to a full bijective match.
    ///
    /// Subset mode: every expected key must exist in the actual
    /// binding with an equal value; extra actual keys are ignored, and
    /// an empty expected binding matches anything.
    fn parameters_match(&self, expected: &ParameterBinding, actual: &ParameterBinding) -> bool {
        if self.config.exact_parameter_match {
            if actual.len() != expected.len() {
                return false;
            }
            actual.iter().all(|(key, actual_value)| {
                expected
                    .get(key)
                    .is_some_and(|expected_value| self.values_equal(actual_value, expected_value))
            })
        } else {
            expected.iter().all(|(key, expected_value)| {
                actual
                    .get(key)
                    .is_some_and(|actual_value| self.values_equal(actual_value, expected_value))
            })
        }
    }

    /// Comparator failures degrade to a mismatch so resolution stays
    /// total and side-effect-free.
    fn values_equal(&self, actual: &ParamValue, expected: &ParamValue) -> bool {
        match self.comparator.try_equal(actual, expected) {
            Ok(equal) => equal,
            Err(err) => {
                debug!(%err, "comparator failure treated as mismatch");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlstub_error::{Result, StubError};

    fn store_with<R>(entries: &[(&str, ParameterBinding, R)]) -> ExpectationStore<R>
    where
        R: Clone,
    {
        let mut store = ExpectationStore::new();
        for (sql, binding, outcome) in entries {
            store.register_result_set(*sql, binding.clone(), outcome.clone());
        }
        store
    }

    fn binding(pairs: &[(u32, ParamValue)]) -> ParameterBinding {
        let mut b = ParameterBinding::new();
        for (index, value) in pairs {
            b.set_index(*index, value.clone()).unwrap();
        }
        b
    }

    // P1: two matching expectations under one statement, first wins.
    #[test]
    fn first_registered_match_wins_within_a_statement() {
        let actual = binding(&[(1, ParamValue::Integer(5))]);
        let store = store_with(&[
            ("SELECT x", binding(&[(1, ParamValue::Integer(5))]), "E1"),
            ("SELECT x", binding(&[(1, ParamValue::Integer(5))]), "E2"),
        ]);
        let resolver = ExpectationResolver::new();
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), Some(&"E1"));
    }

    // Scenario: a later, "closer" match never beats an earlier match.
    #[test]
    fn first_match_beats_closer_later_match() {
        let store = store_with(&[
            ("SELECT x", binding(&[(1, ParamValue::Integer(5))]), "resultA"),
            (
                "SELECT x",
                binding(&[(1, ParamValue::Integer(5)), (2, ParamValue::Text("y".into()))]),
                "resultB",
            ),
        ]);
        let resolver = ExpectationResolver::new();
        let actual = binding(&[(1, ParamValue::Integer(5)), (2, ParamValue::Text("y".into()))]);
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &actual),
            Some(&"resultA")
        );
    }

    // P2: subset mode ignores extra actual parameters.
    #[test]
    fn subset_mode_ignores_extra_actual_parameters() {
        let store = store_with(&[("SELECT x", binding(&[(1, ParamValue::Text("x".into()))]), "r")]);
        let resolver = ExpectationResolver::new();
        let actual = binding(&[
            (1, ParamValue::Text("x".into())),
            (2, ParamValue::Text("y".into())),
        ]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), Some(&"r"));
    }

    // P3: exact mode fails on a size mismatch.
    #[test]
    fn exact_mode_rejects_size_mismatch() {
        let store = store_with(&[("SELECT x", binding(&[(1, ParamValue::Text("x".into()))]), "r")]);
        let mut resolver = ExpectationResolver::new();
        resolver.set_exact_parameter_match(true);
        let actual = binding(&[
            (1, ParamValue::Text("x".into())),
            (2, ParamValue::Text("y".into())),
        ]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), None);
    }

    // P3-variant: equal sizes but different key sets must still fail;
    // every actual key has to exist in the expected binding.
    #[test]
    fn exact_mode_rejects_disjoint_keys_of_equal_size() {
        let expected = binding(&[(1, ParamValue::Integer(1)), (2, ParamValue::Integer(2))]);
        let store = store_with(&[("SELECT x", expected, "r")]);
        let mut resolver = ExpectationResolver::new();
        resolver.set_exact_parameter_match(true);
        let actual = binding(&[(2, ParamValue::Integer(2)), (3, ParamValue::Integer(3))]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), None);
    }

    #[test]
    fn exact_mode_accepts_identical_key_sets() {
        let expected = binding(&[(1, ParamValue::Integer(1)), (2, ParamValue::Integer(2))]);
        let store = store_with(&[("SELECT x", expected, "r")]);
        let mut resolver = ExpectationResolver::new();
        resolver.set_exact_parameter_match(true);
        let actual = binding(&[(2, ParamValue::Integer(2)), (1, ParamValue::Integer(1))]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), Some(&"r"));
    }

    // P4: an empty expected binding is an "any parameters" stub.
    #[test]
    fn empty_expected_binding_matches_any_actual() {
        let store = store_with(&[("SELECT x", ParameterBinding::new(), "wildcard")]);
        let resolver = ExpectationResolver::new();

        let empty = ParameterBinding::new();
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &empty),
            Some(&"wildcard")
        );
        let populated = binding(&[(1, ParamValue::Integer(9))]);
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &populated),
            Some(&"wildcard")
        );
    }

    #[test]
    fn empty_expected_binding_fails_exact_mode_against_populated_actual() {
        let store = store_with(&[("SELECT x", ParameterBinding::new(), "wildcard")]);
        let mut resolver = ExpectationResolver::new();
        resolver.set_exact_parameter_match(true);
        let populated = binding(&[(1, ParamValue::Integer(9))]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &populated), None);
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &ParameterBinding::new()),
            Some(&"wildcard")
        );
    }

    // P6: case sensitivity is delegated to the statement matcher.
    #[test]
    fn case_sensitivity_controls_text_matching() {
        let store = store_with(&[("select * from t", ParameterBinding::new(), "rows")]);
        let mut resolver = ExpectationResolver::new();
        let empty = ParameterBinding::new();

        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT * FROM t", &empty),
            Some(&"rows")
        );
        resolver.set_case_sensitive_text(true);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT * FROM t", &empty), None);
    }

    #[test]
    fn exact_text_rejects_superstring_queries() {
        let store = store_with(&[("SELECT x", ParameterBinding::new(), "rows")]);
        let mut resolver = ExpectationResolver::new();
        let empty = ParameterBinding::new();

        // Substring mode: registered key is a pattern inside the query.
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x FROM t", &empty),
            Some(&"rows")
        );
        resolver.set_exact_text(true);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x FROM t", &empty), None);
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &empty),
            Some(&"rows")
        );
    }

    // Candidate statement keys are visited in registration order.
    #[test]
    fn candidates_are_visited_in_registration_order() {
        let store = store_with(&[
            ("FROM t WHERE a", ParameterBinding::new(), "first"),
            ("FROM t", ParameterBinding::new(), "second"),
        ]);
        let resolver = ExpectationResolver::new();
        let empty = ParameterBinding::new();
        // Both keys are substrings of the query; the earlier registration wins.
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT * FROM t WHERE a = 1", &empty),
            Some(&"first")
        );
    }

    #[test]
    fn update_counts_resolve_independently_of_result_sets() {
        let mut store: ExpectationStore<&str> = ExpectationStore::new();
        store.register_result_set("UPDATE t", ParameterBinding::new(), "rows");
        store.register_update_count("UPDATE t", ParameterBinding::new(), 4);
        let resolver = ExpectationResolver::new();
        let empty = ParameterBinding::new();

        assert_eq!(resolver.resolve_update_count(&store, "UPDATE t SET a = ?", &empty), Some(4));
        assert_eq!(
            resolver.resolve_result_set(&store, "UPDATE t SET a = ?", &empty),
            Some(&"rows")
        );
    }

    #[test]
    fn missing_expected_key_fails_subset_mode() {
        let expected = binding(&[(2, ParamValue::Integer(7))]);
        let store = store_with(&[("SELECT x", expected, "r")]);
        let resolver = ExpectationResolver::new();
        let actual = binding(&[(1, ParamValue::Integer(7))]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), None);
    }

    #[test]
    fn bound_null_matches_expected_null_but_not_absence() {
        let expected = binding(&[(1, ParamValue::Null)]);
        let store = store_with(&[("SELECT x", expected, "r")]);
        let resolver = ExpectationResolver::new();

        let actual = binding(&[(1, ParamValue::Null)]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), Some(&"r"));
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &ParameterBinding::new()),
            None
        );
    }

    #[test]
    fn named_parameters_participate_in_matching() {
        let mut expected = ParameterBinding::new();
        expected.set_name("id", 5i64);
        let store = store_with(&[("CALL p", expected, "r")]);
        let resolver = ExpectationResolver::new();

        let mut actual = ParameterBinding::new();
        actual.set_name("id", 5i64);
        actual.set_index(1, "extra").unwrap();
        assert_eq!(resolver.resolve_result_set(&store, "CALL p", &actual), Some(&"r"));
    }

    #[test]
    fn numeric_coercion_applies_during_resolution() {
        let expected = binding(&[(1, ParamValue::Integer(5))]);
        let store = store_with(&[("SELECT x", expected, "r")]);
        let resolver = ExpectationResolver::new();
        let actual = binding(&[(1, ParamValue::Float(5.0))]);
        assert_eq!(resolver.resolve_result_set(&store, "SELECT x", &actual), Some(&"r"));
    }

    /// Comparator that always fails, to prove failures degrade to a
    /// mismatch instead of aborting resolution.
    struct FailingComparator;

    impl ValueComparator for FailingComparator {
        fn try_equal(&self, actual: &ParamValue, expected: &ParamValue) -> Result<bool> {
            Err(StubError::UnsupportedComparison {
                actual: actual.kind().to_owned(),
                expected: expected.kind().to_owned(),
            })
        }
    }

    #[test]
    fn comparator_failure_degrades_to_mismatch() {
        let with_params = binding(&[(1, ParamValue::Integer(5))]);
        let store = store_with(&[
            ("SELECT x", with_params.clone(), "guarded"),
            ("SELECT x", ParameterBinding::new(), "fallback"),
        ]);
        let mut resolver = ExpectationResolver::new();
        resolver.set_comparator(FailingComparator);

        // The failing comparator rules out the parameterized expectation;
        // the empty-binding wildcard still answers (no values to compare).
        assert_eq!(
            resolver.resolve_result_set(&store, "SELECT x", &with_params),
            Some(&"fallback")
        );
    }
}
