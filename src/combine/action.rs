// SPDX-License-Identifier: MIT

//! Actions dispatched through a combined reducer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Namespace reserved for actions the combinator dispatches itself.
pub const RESERVED_PREFIX: &str = "@@slices/";

/// Action used to probe reducers for their initial state.
pub const INIT: &str = "@@slices/INIT";

/// Action signalling that the reducer set has been replaced.
pub const REPLACE: &str = "@@slices/REPLACE";

const PROBE_UNKNOWN_ACTION: &str = "@@slices/PROBE_UNKNOWN_ACTION";

/// An opaque event with a `type` discriminant.
///
/// Every other field is kept verbatim and handed to each slice reducer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Action {
    /// Discriminant
    #[serde(rename = "type")]
    pub action_type: String,
    /// Remaining fields of the action record
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The initialization probe
    pub fn init() -> Self {
        Self::new(INIT)
    }

    /// The reducer-replacement notification
    pub fn replace() -> Self {
        Self::new(REPLACE)
    }

    /// A probe whose type no reducer can know about.
    ///
    /// A fresh type is generated on every call.
    pub fn probe_unknown() -> Self {
        Self::new(format!(
            "{}.{}",
            PROBE_UNKNOWN_ACTION,
            uuid::Uuid::new_v4().simple()
        ))
    }

    /// Whether the type lives in the reserved namespace
    pub fn is_reserved(&self) -> bool {
        self.action_type.starts_with(RESERVED_PREFIX)
    }

    pub fn is_init(&self) -> bool {
        self.action_type == INIT
    }

    pub fn is_replace(&self) -> bool {
        self.action_type == REPLACE
    }
}
