//! Raw filter input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request-scoped raw input: parameter name to submitted values.
///
/// Repeated parameters (`?status=active&status=planned`) keep every value
/// in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Vec<String>>);

impl FormData {
    /// Creates empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `(name, value)` pairs, keeping repeated names.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = Self::new();
        for (name, value) in pairs {
            data.insert(name, value);
        }
        data
    }

    /// Converts typed argument values (e.g. GraphQL arguments) to raw input.
    ///
    /// Lists become repeated values, booleans `true`/`false`, numbers their
    /// decimal text. Null and nested objects are treated as absent.
    pub fn from_json_args(args: &serde_json::Map<String, Value>) -> Self {
        let mut data = Self::new();
        for (name, value) in args {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(raw) = scalar_to_raw(item) {
                            data.insert(name.clone(), raw);
                        }
                    }
                }
                other => {
                    if let Some(raw) = scalar_to_raw(other) {
                        data.insert(name.clone(), raw);
                    }
                }
            }
        }
        data
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Appends a value for a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Replaces all values of a parameter.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.0.insert(name.into(), values);
    }

    /// Returns the values of a parameter.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Removes a parameter and returns its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.0.remove(name)
    }

    /// Returns the last non-blank value of a parameter, trimmed.
    pub fn last_value(&self, name: &str) -> Option<&str> {
        last_nonblank(self.get(name)?)
    }

    /// Returns true if no parameters were submitted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Returns the last non-blank value, trimmed.
pub(crate) fn last_nonblank(values: &[String]) -> Option<&str> {
    values.iter().rev().map(|v| v.trim()).find(|v| !v.is_empty())
}

/// Returns the trimmed non-blank values without duplicates, in first-seen order.
pub(crate) fn distinct_nonblank(values: &[String]) -> Vec<&str> {
    let mut seen = Vec::new();
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn scalar_to_raw(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
