// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Persistent slice-name to slice-value map
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CompositeState {
    slices: im::HashMap<String, Value>,
}

/// Raised when a JSON value cannot be read as a composite
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a JSON object for the composite state, found {found}")]
pub struct StateShapeError {
    pub found: &'static str,
}

/// Short name of a JSON value's kind, used in messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl CompositeState {
    /// An empty composite
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slice: &str) -> Option<&Value> {
        self.slices.get(slice)
    }

    /// Get a nested value using dot notation (e.g., "session.user.id")
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.slices.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    pub fn contains_key(&self, slice: &str) -> bool {
        self.slices.contains_key(slice)
    }

    /// Slice names present in the composite, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.slices.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// A new composite with `slice` set to `value`; `self` is left untouched
    pub fn update(&self, slice: impl Into<String>, value: Value) -> Self {
        Self {
            slices: self.slices.update(slice.into(), value),
        }
    }

    /// A new composite without `slice`
    pub fn without(&self, slice: &str) -> Self {
        Self {
            slices: self.slices.without(slice),
        }
    }

    /// Whether both composites share the same root in memory.
    ///
    /// Content equality is `==`; this is identity.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.slices.ptr_eq(&other.slices)
    }

    pub(crate) fn set_in_place(&mut self, slice: &str, value: Value) {
        self.slices.insert(slice.to_string(), value);
    }

    /// Convert the composite to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.slices
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Read a JSON object as a composite
    pub fn from_json(value: Value) -> Result<Self, StateShapeError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(StateShapeError {
                found: json_kind(&other),
            }),
        }
    }
}

impl From<im::HashMap<String, Value>> for CompositeState {
    fn from(slices: im::HashMap<String, Value>) -> Self {
        Self { slices }
    }
}

impl FromIterator<(String, Value)> for CompositeState {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            slices: iter.into_iter().collect(),
        }
    }
}
