//! Error types for the sqlstub workspace.
//!
//! The taxonomy is deliberately narrow. "No expectation registered for
//! this call" is a normal lookup result expressed as `Option::None` by
//! the resolver, never an error. `StubError` covers genuine misuse
//! caught at registration time and comparator failures that the
//! resolver downgrades to a mismatch.

use thiserror::Error;

/// Primary error type for sqlstub operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StubError {
    /// A positional parameter index outside the valid 1-based range.
    ///
    /// Bound-statement parameter numbering starts at 1; index 0 at
    /// registration time is a caller bug and fails fast instead of
    /// being silently stored as an unmatchable expectation.
    #[error("invalid parameter index {index}: positional parameters are numbered from 1")]
    InvalidParameterIndex { index: u32 },

    /// The value comparator could not compare a pair of values.
    ///
    /// The resolver treats this as "not equal" so that resolution
    /// stays total; the variant exists so custom comparators have a
    /// typed failure channel.
    #[error("cannot compare parameter values: actual {actual}, expected {expected}")]
    UnsupportedComparison { actual: String, expected: String },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StubError>;
