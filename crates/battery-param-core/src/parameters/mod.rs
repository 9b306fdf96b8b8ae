//! Parameter containers.
//!
//! [`ParameterSet`] is the owned, insertion-ordered mapping a pipeline
//! accumulates into. Stages only ever see a [`ParameterView`], which borrows
//! the set and exposes lookups without any way to mutate it.

use crate::domain::{ParamError, ParamResult, ParameterFunction, ParameterValue};
use indexmap::IndexMap;
use indexmap::map::Iter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: IndexMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Option<ParameterValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, ParameterValue> {
        self.values.iter()
    }

    pub fn view(&self) -> ParameterView<'_> {
        ParameterView { backing: self }
    }

    /// First key of `other` that is already present in `self`, in `other`'s order.
    pub fn first_conflict<'a>(&self, other: &'a ParameterSet) -> Option<&'a str> {
        other.keys().find(|key| self.contains_key(key))
    }

    pub(crate) fn absorb(&mut self, other: ParameterSet) {
        self.values.extend(other.values);
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParameterValue);
    type IntoIter = Iter<'a, String, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Read-only window onto a [`ParameterSet`] owned by someone else.
///
/// The view is live: it borrows the backing set rather than copying it.
#[derive(Debug, Clone, Copy)]
pub struct ParameterView<'a> {
    backing: &'a ParameterSet,
}

impl<'a> ParameterView<'a> {
    pub fn get(&self, key: &str) -> ParamResult<&'a ParameterValue> {
        self.backing
            .get(key)
            .ok_or_else(|| ParamError::key_not_found(key))
    }

    pub fn number(&self, key: &str) -> ParamResult<f64> {
        self.get(key)?.as_number().ok_or_else(|| {
            ParamError::input_validation(
                "INPUT.PARAMETER_TYPE",
                format!("parameter '{}' is a function, expected a number", key),
            )
        })
    }

    pub fn function(&self, key: &str) -> ParamResult<&'a ParameterFunction> {
        self.get(key)?.as_function().ok_or_else(|| {
            ParamError::input_validation(
                "INPUT.PARAMETER_TYPE",
                format!("parameter '{}' is a number, expected a function", key),
            )
        })
    }

    pub fn evaluate(&self, key: &str, args: &[f64]) -> ParamResult<f64> {
        self.get(key)?.evaluate(args)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.backing.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.backing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backing.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.backing.keys()
    }

    pub fn iter(&self) -> Iter<'a, String, ParameterValue> {
        self.backing.iter()
    }

    /// Always fails: writes never go through a view.
    pub fn try_insert(&self, key: &str, _value: impl Into<ParameterValue>) -> ParamResult<()> {
        Err(ParamError::immutable_write(key))
    }

    pub fn to_owned_set(&self) -> ParameterSet {
        self.backing.clone()
    }
}

impl<'a> IntoIterator for ParameterView<'a> {
    type Item = (&'a String, &'a ParameterValue);
    type IntoIter = Iter<'a, String, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.backing.iter()
    }
}
