//! The sqlstub matching engine.
//!
//! Two components: the [`store::ExpectationStore`] keeps registered
//! expectations, partitioned by outcome kind (tabular result vs update
//! count), and the [`resolver::ExpectationResolver`] answers "which
//! registered outcome does this execution get?" by reconciling two
//! independent matching policies — statement-text matching (delegated
//! to a [`matcher::StatementMatcher`]) and parameter-list matching
//! (owned by the resolver, with per-value equality delegated to a
//! [`compare::ValueComparator`]).
//!
//! First match wins everywhere: candidate statement keys are visited
//! in registration order, and each key's expectations in registration
//! order, so resolution is deterministic by construction.

pub mod compare;
pub mod matcher;
pub mod resolver;
pub mod store;

pub use compare::{CoercingComparator, ValueComparator};
pub use matcher::{StatementMatcher, SubstringMatcher};
pub use resolver::{ExpectationResolver, MatchConfig};
pub use store::{Expectation, ExpectationStore, Registry};
