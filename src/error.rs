// SPDX-License-Identifier: MIT

//! Typed error handling for combine-slices
//!
//! [`CombineError`] covers the fatal failures of a combined reducer. [`Error`]
//! wraps it together with the I/O and parsing failures of the loader and CLI.

use thiserror::Error;

use crate::state::StateShapeError;

/// Fatal failures of a combined reducer.
///
/// Cloneable so a construction failure can be reproduced verbatim on every
/// later invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    /// A reducer produced no value for the initialization probe
    #[error(
        "Reducer \"{slice}\" returned no value during initialization. If the state passed \
         to the reducer is absent, you must explicitly return the initial state. The \
         initial state may not be absent; use null if the slice has nothing to hold."
    )]
    InitProbe { slice: String },

    /// A reducer produced no value for a random, unknown action type
    #[error(
        "Reducer \"{slice}\" returned no value when probed with a random type. Don't try \
         to handle \"@@slices/INIT\" or other actions in the \"@@slices/\" namespace. \
         They are considered private. Instead, you must return the current state for \
         any unknown action, unless it is absent, in which case you must return the \
         initial state, regardless of the action type."
    )]
    UnknownActionProbe { slice: String },

    /// A reducer produced no value for a real action
    #[error(
        "Reducer \"{slice}\" returned no value when handling \"{action_type}\" action. \
         To ignore an action, you must explicitly return the previous state."
    )]
    UndefinedResult { slice: String, action_type: String },

    /// A nested combined reducer failed inside `slice`
    #[error("Slice \"{slice}\" failed: {source}")]
    Nested {
        slice: String,
        source: Box<CombineError>,
    },
}

impl CombineError {
    /// Name of the slice whose reducer misbehaved.
    ///
    /// For nested failures this is the innermost slice.
    pub fn slice(&self) -> &str {
        self.root_cause().outer_slice()
    }

    fn outer_slice(&self) -> &str {
        match self {
            Self::InitProbe { slice }
            | Self::UnknownActionProbe { slice }
            | Self::UndefinedResult { slice, .. }
            | Self::Nested { slice, .. } => slice,
        }
    }

    /// Slice names from the outermost combinator down to the offending slice
    pub fn path(&self) -> Vec<&str> {
        let mut path = vec![self.outer_slice()];
        let mut current = self;
        while let Self::Nested { source, .. } = current {
            current = source;
            path.push(current.outer_slice());
        }
        path
    }

    /// The failure that started it all, looking through nesting
    pub fn root_cause(&self) -> &CombineError {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Wrap a failure raised inside the nested combinator at `slice`
    pub fn nested(slice: impl Into<String>, source: CombineError) -> Self {
        Self::Nested {
            slice: slice.into(),
            source: Box::new(source),
        }
    }

    /// Whether the failure was captured while probing at construction time
    pub fn is_sanity_failure(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::InitProbe { .. } | Self::UnknownActionProbe { .. }
        )
    }
}

/// Top-level error type for combine-slices
#[derive(Debug, Error)]
pub enum Error {
    /// Combined reducer failures
    #[error("Reducer error: {0}")]
    Combine(#[from] CombineError),

    /// Configuration errors (invalid schema, bad arguments)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A state file did not hold a composite
    #[error(transparent)]
    StateShape(#[from] StateShapeError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_result_message_names_slice_and_action() {
        let err = CombineError::UndefinedResult {
            slice: "counter".to_string(),
            action_type: "INC".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("Reducer \"counter\" returned no value when handling \"INC\""));
        assert_eq!(err.slice(), "counter");
        assert!(!err.is_sanity_failure());
    }

    #[test]
    fn test_probe_messages_are_distinct() {
        let init = CombineError::InitProbe {
            slice: "bad".to_string(),
        };
        let unknown = CombineError::UnknownActionProbe {
            slice: "bad".to_string(),
        };

        assert!(init.to_string().contains("during initialization"));
        assert!(unknown.to_string().contains("probed with a random type"));
        assert!(init.is_sanity_failure());
        assert!(unknown.is_sanity_failure());
    }

    #[test]
    fn test_nested_error_names_inner_slice() {
        let err = CombineError::nested(
            "outer",
            CombineError::nested(
                "inner",
                CombineError::UnknownActionProbe {
                    slice: "leaf".to_string(),
                },
            ),
        );

        assert_eq!(err.slice(), "leaf");
        assert_eq!(err.path(), vec!["outer", "inner", "leaf"]);
        assert!(err.is_sanity_failure());
        assert!(err
            .to_string()
            .starts_with("Slice \"outer\" failed: Slice \"inner\" failed: Reducer \"leaf\""));
    }

    #[test]
    fn test_error_wraps_combine_error() {
        let err: Error = CombineError::InitProbe {
            slice: "x".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Combine(_)));
        assert!(err.to_string().starts_with("Reducer error: Reducer \"x\""));
    }

    #[test]
    fn test_config_helper() {
        let err = Error::config("bad schema");
        assert_eq!(err.to_string(), "Configuration error: bad schema");
    }
}
