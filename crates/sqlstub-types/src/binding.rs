use std::collections::HashMap;
use std::fmt;

use sqlstub_error::{Result, StubError};

use crate::value::ParamValue;

/// Address of one bound parameter within a statement.
///
/// Positional parameters are numbered from 1, matching bound-statement
/// conventions (the first `?` placeholder is parameter 1). Named keys
/// are used by call-style statements.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParameterKey {
    /// 1-based positional parameter index.
    Index(u32),
    /// Named parameter of a call-style statement.
    Name(String),
}

impl ParameterKey {
    /// Create a positional key, rejecting the invalid index 0.
    pub fn index(index: u32) -> Result<Self> {
        if index == 0 {
            return Err(StubError::InvalidParameterIndex { index });
        }
        Ok(Self::Index(index))
    }

    /// Create a named key.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "?{i}"),
            Self::Name(n) => write!(f, ":{n}"),
        }
    }
}

/// The set of values bound to a parameterized statement.
///
/// Order-irrelevant: a binding is a map from [`ParameterKey`] to
/// [`ParamValue`]. Keys are unique; binding the same key twice keeps
/// the later value. A bound `ParamValue::Null` is present in the map
/// and distinct from an absent key.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterBinding {
    values: HashMap<ParameterKey, ParamValue>,
}

impl ParameterBinding {
    /// Create an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Build a binding from a positional sequence.
    ///
    /// The element at 0-based position `i` binds to the 1-based key
    /// `i + 1`, so `values[0]` answers for the statement's first
    /// placeholder.
    pub fn from_positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        let values = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let index = u32::try_from(i + 1).unwrap_or(u32::MAX);
                (ParameterKey::Index(index), v.into())
            })
            .collect();
        Self { values }
    }

    /// Bind a positional parameter.
    ///
    /// # Errors
    /// Returns [`StubError::InvalidParameterIndex`] for index 0.
    pub fn set_index(&mut self, index: u32, value: impl Into<ParamValue>) -> Result<()> {
        let key = ParameterKey::index(index)?;
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Bind a named parameter.
    pub fn set_name(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(ParameterKey::Name(name.into()), value.into());
    }

    /// Look up the value bound at a key.
    #[must_use]
    pub fn get(&self, key: &ParameterKey) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Whether a key has a bound value (including a bound NULL).
    #[must_use]
    pub fn contains(&self, key: &ParameterKey) -> bool {
        self.values.contains_key(key)
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the bound keys (no defined order).
    pub fn keys(&self) -> impl Iterator<Item = &ParameterKey> {
        self.values.keys()
    }

    /// Iterate over key/value pairs (no defined order).
    pub fn iter(&self) -> impl Iterator<Item = (&ParameterKey, &ParamValue)> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a ParameterBinding {
    type Item = (&'a ParameterKey, &'a ParamValue);
    type IntoIter = std::collections::hash_map::Iter<'a, ParameterKey, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<V: Into<ParamValue>> FromIterator<(ParameterKey, V)> for ParameterBinding {
    fn from_iter<I: IntoIterator<Item = (ParameterKey, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}
