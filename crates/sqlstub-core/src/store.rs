//! Append-only bookkeeping of registered expectations.
//!
//! One [`Registry`] per outcome kind, keyed by statement text. Keys
//! are kept in insertion order: "first match wins" across candidate
//! statements is only deterministic if candidate order is, so the
//! registry is an ordered vector of entries rather than a hash map.

use smallvec::SmallVec;
use sqlstub_types::ParameterBinding;
use tracing::debug;

/// One registered expectation: an expected parameter binding paired
/// with the outcome to return when it matches. Immutable once created.
#[derive(Clone, Debug)]
pub struct Expectation<T> {
    binding: ParameterBinding,
    outcome: T,
}

impl<T> Expectation<T> {
    /// Pair an expected binding with its outcome.
    pub fn new(binding: ParameterBinding, outcome: T) -> Self {
        Self { binding, outcome }
    }

    /// The expected parameter binding.
    pub fn binding(&self) -> &ParameterBinding {
        &self.binding
    }

    /// The canned outcome.
    pub fn outcome(&self) -> &T {
        &self.outcome
    }
}

/// Statement text → ordered expectations, in registration order.
///
/// Statement text is stored exactly as registered (no normalization);
/// text-matching policy is applied at resolution time, not storage
/// time. Duplicates are allowed; the earlier registration takes
/// precedence on lookup.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    entries: Vec<(String, SmallVec<[Expectation<T>; 2]>)>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append an expectation under a statement text, creating the
    /// entry if this is the first registration for that text.
    pub fn register(&mut self, statement: impl Into<String>, binding: ParameterBinding, outcome: T) {
        let statement = statement.into();
        let expectation = Expectation::new(binding, outcome);
        if let Some((_, expectations)) =
            self.entries.iter_mut().find(|(key, _)| *key == statement)
        {
            expectations.push(expectation);
        } else {
            self.entries.push((statement, SmallVec::from_iter([expectation])));
        }
    }

    /// Remove every registered expectation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in statement-key insertion order; each entry's
    /// expectations are in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[Expectation<T>])> {
        self.entries
            .iter()
            .map(|(key, expectations)| (key.as_str(), expectations.as_slice()))
    }

    /// Number of distinct statement texts registered.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two registries of a statement stub, partitioned by outcome
/// kind. Their lifecycles are independent: clearing one leaves the
/// other intact.
///
/// All state is in-process and unsynchronized; the usage model is one
/// store per test fixture, single-threaded. Callers sharing a store
/// across threads must wrap it in their own lock.
#[derive(Clone, Debug)]
pub struct ExpectationStore<R> {
    result_sets: Registry<R>,
    update_counts: Registry<i64>,
}

impl<R> Default for ExpectationStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ExpectationStore<R> {
    /// Create a store with both registries empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            result_sets: Registry::new(),
            update_counts: Registry::new(),
        }
    }

    /// Register a tabular-result expectation.
    pub fn register_result_set(
        &mut self,
        statement: impl Into<String>,
        binding: ParameterBinding,
        result: R,
    ) {
        let statement = statement.into();
        debug!(statement = %statement, params = binding.len(), "register result set");
        self.result_sets.register(statement, binding, result);
    }

    /// Register an update-count expectation.
    pub fn register_update_count(
        &mut self,
        statement: impl Into<String>,
        binding: ParameterBinding,
        count: i64,
    ) {
        let statement = statement.into();
        debug!(statement = %statement, params = binding.len(), count, "register update count");
        self.update_counts.register(statement, binding, count);
    }

    /// Drop all tabular-result expectations. Update counts survive.
    pub fn clear_result_sets(&mut self) {
        self.result_sets.clear();
    }

    /// Drop all update-count expectations. Tabular results survive.
    pub fn clear_update_counts(&mut self) {
        self.update_counts.clear();
    }

    /// The tabular-result registry.
    pub fn result_sets(&self) -> &Registry<R> {
        &self.result_sets
    }

    /// The update-count registry.
    pub fn update_counts(&self) -> &Registry<i64> {
        &self.update_counts
    }
}
