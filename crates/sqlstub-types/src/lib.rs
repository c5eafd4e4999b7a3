//! Core type definitions for sqlstub.
//!
//! The data model mirrors the parameter space of a bound database
//! statement: a closed tagged value type ([`ParamValue`]), a parameter
//! address ([`ParameterKey`], positional or named), and the set of
//! values bound at execution time ([`ParameterBinding`]).

pub mod binding;
pub mod value;

pub use binding::{ParameterBinding, ParameterKey};
pub use value::{ParamValue, int_float_cmp};
