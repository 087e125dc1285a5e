// SPDX-License-Identifier: MIT

//! Schema-driven slice reducer

use serde_json::{Map, Value};

use super::schema::{MergeStrategy, SliceDef};
use crate::combine::{Action, SliceReducer};

/// A slice reducer described by a [`SliceDef`]
#[derive(Debug, Clone)]
pub struct DeclarativeSlice {
    def: SliceDef,
}

impl DeclarativeSlice {
    pub fn new(def: SliceDef) -> Self {
        Self { def }
    }

    pub fn def(&self) -> &SliceDef {
        &self.def
    }

    fn handles(&self, action: &Action) -> bool {
        self.def.on.iter().any(|t| *t == action.action_type)
    }
}

impl SliceReducer for DeclarativeSlice {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Option<Value> {
        let current = state
            .cloned()
            .unwrap_or_else(|| self.def.initial_value());

        if !self.handles(action) {
            return Some(current);
        }
        match action.field(&self.def.payload) {
            Some(payload) => Some(fold(self.def.reducer, current, payload.clone())),
            None => Some(current),
        }
    }
}

/// Fold `value` into `current` with `strategy`.
///
/// Values of the wrong kind for a strategy leave `current` unchanged.
fn fold(strategy: MergeStrategy, current: Value, value: Value) -> Value {
    match strategy {
        MergeStrategy::Overwrite => value,
        MergeStrategy::Append => {
            let mut items = match current {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => return other,
            };
            match value {
                Value::Array(new_items) => items.extend(new_items),
                other => items.push(other),
            }
            Value::Array(items)
        }
        MergeStrategy::Max => match (current.as_f64(), value.as_f64()) {
            (Some(cur), Some(new)) if new > cur => value,
            (None, Some(_)) => value,
            _ => current,
        },
        MergeStrategy::Min => match (current.as_f64(), value.as_f64()) {
            (Some(cur), Some(new)) if new < cur => value,
            (None, Some(_)) => value,
            _ => current,
        },
        MergeStrategy::Merge => {
            let mut merged = match current {
                Value::Object(obj) => obj,
                Value::Null => Map::new(),
                other => return other,
            };
            match value {
                Value::Object(new_obj) => {
                    for (k, v) in new_obj {
                        merged.insert(k, v);
                    }
                    Value::Object(merged)
                }
                _ => Value::Object(merged),
            }
        }
    }
}
