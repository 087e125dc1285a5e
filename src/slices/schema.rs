// SPDX-License-Identifier: MIT

//! Slice schema definitions

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use super::declarative::DeclarativeSlice;
use crate::combine::ReducerMap;

/// Schema describing every slice of a composite
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SliceSchema {
    /// Slice definitions by name
    #[serde(flatten)]
    pub slices: HashMap<String, SliceDef>,
}

/// Definition of a single slice
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SliceDef {
    /// Type of the slice value
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// How payloads are folded in
    #[serde(default)]
    pub reducer: MergeStrategy,
    /// Initial value; the type's empty value when absent
    pub default: Option<Value>,
    /// Action types this slice reacts to
    #[serde(default)]
    pub on: Vec<String>,
    /// Action field carrying the value to fold in
    #[serde(default = "default_payload_field")]
    pub payload: String,
}

fn default_payload_field() -> String {
    "payload".to_string()
}

/// Supported slice value types
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// Whether `value` is of this type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// The value a slice of this type starts from when no default is given
    pub fn empty_value(self) -> Value {
        match self {
            Self::String => json!(""),
            Self::Number => json!(0),
            Self::Boolean => json!(false),
            Self::Array => json!([]),
            Self::Object => json!({}),
        }
    }
}

/// Strategies for folding a payload into a slice
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Replace the value (default)
    #[default]
    Overwrite,
    /// Append to array
    Append,
    /// Keep maximum value
    Max,
    /// Keep minimum value
    Min,
    /// Shallow merge objects
    Merge,
}

impl SliceDef {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            reducer: MergeStrategy::default(),
            default: None,
            on: Vec::new(),
            payload: default_payload_field(),
        }
    }

    /// The initial slice value
    pub fn initial_value(&self) -> Value {
        self.default
            .clone()
            .unwrap_or_else(|| self.field_type.empty_value())
    }
}

impl SliceSchema {
    /// Build the reducer map, registering slices in name order
    pub fn into_reducer_map(self) -> ReducerMap {
        let mut slices: Vec<_> = self.slices.into_iter().collect();
        slices.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut map = ReducerMap::new();
        for (name, def) in slices {
            map.insert(name, DeclarativeSlice::new(def));
        }
        map
    }
}
