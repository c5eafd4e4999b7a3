use sqlstub_core::{ExpectationResolver, ExpectationStore, MatchConfig, StatementMatcher, ValueComparator};
use sqlstub_types::{ParamValue, ParameterBinding};

/// The handler surface a test fixture works with.
///
/// Owns one [`ExpectationStore`] and one [`ExpectationResolver`]; each
/// fixture creates its own instance (no process-wide registry), and
/// the usage model is single-threaded per instance.
///
/// Registration comes in three shapes per outcome kind: with an
/// explicit [`ParameterBinding`], with a positional value sequence
/// (position `i` binds parameter `i + 1`), or with no parameters at
/// all — the last registers an empty expected binding, which in the
/// default subset mode acts as an "any parameters" stub.
pub struct StatementStubs<R> {
    store: ExpectationStore<R>,
    resolver: ExpectationResolver,
}

impl<R> Default for StatementStubs<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StatementStubs<R> {
    /// Empty stub set with default matching configuration:
    /// case-insensitive substring text matching, subset parameter
    /// matching.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: ExpectationStore::new(),
            resolver: ExpectationResolver::new(),
        }
    }

    // -------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------

    /// Register a tabular result for a statement, matching any
    /// parameters (empty expected binding).
    pub fn prepare_result_set(&mut self, sql: impl Into<String>, result: R) {
        self.store
            .register_result_set(sql, ParameterBinding::new(), result);
    }

    /// Register a tabular result for a statement and positional
    /// parameters. `values[0]` answers for the statement's first
    /// placeholder.
    pub fn prepare_result_set_positional<I, V>(&mut self, sql: impl Into<String>, result: R, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.store
            .register_result_set(sql, ParameterBinding::from_positional(values), result);
    }

    /// Register a tabular result for a statement and an explicit
    /// parameter binding (positional and/or named keys).
    pub fn prepare_result_set_binding(
        &mut self,
        sql: impl Into<String>,
        result: R,
        binding: ParameterBinding,
    ) {
        self.store.register_result_set(sql, binding, result);
    }

    /// Register an update count for a statement, matching any
    /// parameters.
    pub fn prepare_update_count(&mut self, sql: impl Into<String>, count: i64) {
        self.store
            .register_update_count(sql, ParameterBinding::new(), count);
    }

    /// Register an update count for a statement and positional
    /// parameters.
    pub fn prepare_update_count_positional<I, V>(&mut self, sql: impl Into<String>, count: i64, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.store
            .register_update_count(sql, ParameterBinding::from_positional(values), count);
    }

    /// Register an update count for a statement and an explicit
    /// parameter binding.
    pub fn prepare_update_count_binding(
        &mut self,
        sql: impl Into<String>,
        count: i64,
        binding: ParameterBinding,
    ) {
        self.store.register_update_count(sql, binding, count);
    }

    // -------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------

    /// First registered tabular result matching this execution, or
    /// `None` when no stub answers it.
    pub fn result_set(&self, sql: &str, actual: &ParameterBinding) -> Option<&R> {
        self.resolver.resolve_result_set(&self.store, sql, actual)
    }

    /// First registered update count matching this execution, or
    /// `None` when no stub answers it.
    pub fn update_count(&self, sql: &str, actual: &ParameterBinding) -> Option<i64> {
        self.resolver.resolve_update_count(&self.store, sql, actual)
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Drop all tabular-result expectations. Update counts survive.
    pub fn clear_result_sets(&mut self) {
        self.store.clear_result_sets();
    }

    /// Drop all update-count expectations. Tabular results survive.
    pub fn clear_update_counts(&mut self) {
        self.store.clear_update_counts();
    }

    // -------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------

    /// Statement-text matching honors case. Defaults to off.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.resolver.set_case_sensitive_text(case_sensitive);
    }

    /// Statement text must match in full instead of as a substring
    /// pattern. Defaults to off.
    pub fn set_exact_match(&mut self, exact: bool) {
        self.resolver.set_exact_text(exact);
    }

    /// Parameter bindings must match exactly (identical key sets)
    /// instead of by subset. Defaults to off.
    pub fn set_exact_match_parameter(&mut self, exact: bool) {
        self.resolver.set_exact_parameter_match(exact);
    }

    /// Current matching configuration.
    #[must_use]
    pub const fn config(&self) -> MatchConfig {
        self.resolver.config()
    }

    /// Replace the statement-text matcher collaborator.
    pub fn set_matcher(&mut self, matcher: impl StatementMatcher + 'static) {
        self.resolver.set_matcher(matcher);
    }

    /// Replace the value-comparator collaborator.
    pub fn set_comparator(&mut self, comparator: impl ValueComparator + 'static) {
        self.resolver.set_comparator(comparator);
    }
}
