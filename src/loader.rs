// SPDX-License-Identifier: MIT

//! Schema, action and state loading
//!
//! Schemas and action lists are YAML (JSON is accepted as a YAML subset).
//! State files are JSON objects.

use std::fs;
use std::path::Path;

use crate::combine::Action;
use crate::error::{Error, Result};
use crate::slices::SliceSchema;
use crate::state::{json_kind, CompositeState};

/// Load a slice schema from a YAML or JSON file
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<SliceSchema> {
    let content = fs::read_to_string(path)?;
    parse_schema(&content)
}

/// Parse a slice schema from a YAML string.
///
/// Every explicit `default` must match its slice's type.
pub fn parse_schema(content: &str) -> Result<SliceSchema> {
    let schema: SliceSchema = serde_yaml::from_str(content)?;

    let mut names: Vec<_> = schema.slices.keys().collect();
    names.sort();
    for name in names {
        let def = &schema.slices[name];
        if let Some(default) = &def.default {
            if !def.field_type.matches(default) {
                return Err(Error::config(format!(
                    "slice \"{}\" has type {:?} but its default is {}",
                    name,
                    def.field_type,
                    json_kind(default)
                )));
            }
        }
    }
    Ok(schema)
}

/// Load a sequence of actions from a YAML or JSON file
pub fn load_actions<P: AsRef<Path>>(path: P) -> Result<Vec<Action>> {
    let content = fs::read_to_string(path)?;
    parse_actions(&content)
}

/// Parse a sequence of actions from a YAML string
pub fn parse_actions(content: &str) -> Result<Vec<Action>> {
    let actions: Vec<Action> = serde_yaml::from_str(content)?;
    Ok(actions)
}

/// Load a composite state from a JSON file
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<CompositeState> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    Ok(CompositeState::from_json(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::{FieldType, MergeStrategy};
    use serde_json::json;

    #[test]
    fn test_parse_schema() {
        let yaml = r#"
counter:
  type: number
  reducer: overwrite
  on: [SET_COUNTER]
tags:
  type: array
  reducer: append
  on: [TAG]
"#;
        let schema = parse_schema(yaml).unwrap();
        assert_eq!(schema.slices.len(), 2);
        assert_eq!(schema.slices["counter"].field_type, FieldType::Number);
        assert_eq!(schema.slices["tags"].reducer, MergeStrategy::Append);
    }

    #[test]
    fn test_parse_schema_from_json() {
        let schema = parse_schema(r#"{"name": {"type": "string", "default": "anon"}}"#).unwrap();
        assert_eq!(schema.slices["name"].initial_value(), json!("anon"));
    }

    #[test]
    fn test_parse_schema_rejects_mistyped_default() {
        let err = parse_schema("count: { type: number, default: lots }").unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: slice \"count\" has type Number but its default is string"
        );
    }

    #[test]
    fn test_parse_actions() {
        let yaml = r#"
- type: TAG
  payload: urgent
- type: SET_COUNTER
  payload: 3
- { type: NOOP }
"#;
        let actions = parse_actions(yaml).unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].action_type, "TAG");
        assert_eq!(actions[1].field("payload"), Some(&json!(3)));
        assert!(actions[2].fields.is_empty());
    }

    #[test]
    fn test_parse_actions_requires_type() {
        let err = parse_actions("- payload: 1").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_schema("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_state_rejects_arrays() {
        let path = std::env::temp_dir().join(format!(
            "combine-slices-state-{}.json",
            uuid::Uuid::new_v4().simple()
        ));
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = load_state(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, Error::StateShape(_)));
    }

    #[test]
    fn test_load_state_object() {
        let path = std::env::temp_dir().join(format!(
            "combine-slices-state-{}.json",
            uuid::Uuid::new_v4().simple()
        ));
        fs::write(&path, r#"{"counter": 4}"#).unwrap();

        let state = load_state(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(state.get("counter"), Some(&json!(4)));
    }
}
