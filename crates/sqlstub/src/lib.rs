//! Deterministic test double for parameterized SQL statements.
//!
//! Tests pre-register canned outcomes — a tabular result of any type
//! `R`, or an affected-row count — per statement text and parameter
//! binding. [`StatementStubs`] then answers executions without a real
//! database, honoring configurable statement-text and parameter
//! matching policies with first-match-wins semantics.
//!
//! ```
//! use sqlstub::{ParameterBinding, StatementStubs};
//!
//! let mut stubs: StatementStubs<&str> = StatementStubs::new();
//! stubs.prepare_result_set_positional("SELECT name FROM users WHERE id = ?", "alice", [1i64]);
//!
//! let actual = ParameterBinding::from_positional([1i64]);
//! assert_eq!(stubs.result_set("SELECT name FROM users WHERE id = ?", &actual), Some(&"alice"));
//! ```

mod stubs;

pub use sqlstub_core::{
    CoercingComparator, Expectation, ExpectationResolver, ExpectationStore, MatchConfig, Registry,
    StatementMatcher, SubstringMatcher, ValueComparator,
};
pub use sqlstub_error::{Result, StubError};
pub use sqlstub_types::{ParamValue, ParameterBinding, ParameterKey};
pub use stubs::StatementStubs;
