//! Per-value equality seam.
//!
//! Registered expected values and actually-bound values may differ in
//! representation while meaning the same thing (an id registered as
//! `Integer(5)` and bound as `Float(5.0)`). The comparator owns that
//! judgement; the resolver only asks yes/no and treats a comparator
//! failure as "not equal" so resolution stays total.

use std::cmp::Ordering;

use sqlstub_error::Result;
use sqlstub_types::{ParamValue, int_float_cmp};

/// Equality notion over parameter values.
///
/// Implementations must be total, reflexive, and symmetric. Two NULLs
/// are equal; NULL never equals a non-NULL value. An `Err` return is
/// treated by the resolver as a mismatch, never a crash.
pub trait ValueComparator {
    fn try_equal(&self, actual: &ParamValue, expected: &ParamValue) -> Result<bool>;
}

/// Default comparator: per-variant equality with numeric coercion.
///
/// Integer↔Float pairs compare by logical value, precision-correct at
/// the i64/f64 boundary. All other cross-kind pairs are unequal.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoercingComparator;

impl ValueComparator for CoercingComparator {
    fn try_equal(&self, actual: &ParamValue, expected: &ParamValue) -> Result<bool> {
        use ParamValue::{Blob, Float, Integer, Null, Text, Timestamp};
        let equal = match (actual, expected) {
            (Null, Null) => true,
            (Integer(a), Integer(b)) | (Timestamp(a), Timestamp(b)) => a == b,
            // NaN equals nothing, including itself.
            (Float(a), Float(b)) => a == b,
            (Integer(i), Float(f)) | (Float(f), Integer(i)) => {
                int_float_cmp(*i, *f) == Ordering::Equal
            }
            (Text(a), Text(b)) => a == b,
            (Blob(a), Blob(b)) => a == b,
            _ => false,
        };
        Ok(equal)
    }
}
