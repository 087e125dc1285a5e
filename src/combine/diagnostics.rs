// SPDX-License-Identifier: MIT

//! Non-fatal diagnostics emitted while building and running a combined reducer
//!
//! Diagnostics never abort a reduction. They are routed to a
//! [`DiagnosticSink`], which by default forwards them to the `log` facade.

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Mutex;

/// Environment variable read once per process to decide the diagnostic mode.
pub const ENV_VAR: &str = "COMBINE_SLICES_ENV";

static PROCESS_MODE: Lazy<DiagnosticMode> = Lazy::new(|| {
    let mode = DiagnosticMode::from_env_value(std::env::var(ENV_VAR).ok().as_deref());
    log::debug!("Diagnostic mode for this process: {:?}", mode);
    mode
});

/// Whether shape and key diagnostics are produced at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticMode {
    Enabled,
    Disabled,
}

impl DiagnosticMode {
    /// The mode fixed for this process from [`ENV_VAR`]
    pub fn process() -> Self {
        *PROCESS_MODE
    }

    /// `production` disables diagnostics, anything else enables them
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("production") => Self::Disabled,
            _ => Self::Enabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

impl Default for DiagnosticMode {
    fn default() -> Self {
        Self::process()
    }
}

/// A non-fatal finding about the reducer set or the state handed to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No usable reducer survived construction
    NoReducers,
    /// A slice name was registered without a reducer
    MissingReducer { slice: String },
    /// The state is not an associative container
    UnexpectedType {
        state_name: &'static str,
        found: String,
        expected: Vec<String>,
    },
    /// The state carries keys no reducer owns
    UnexpectedKeys {
        state_name: &'static str,
        keys: Vec<String>,
        expected: Vec<String>,
    },
}

impl Diagnostic {
    /// Slice names this diagnostic points at, if any
    pub fn keys(&self) -> &[String] {
        match self {
            Self::UnexpectedKeys { keys, .. } => keys,
            _ => &[],
        }
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("\"{}\"", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReducers => write!(
                f,
                "Store does not have a valid reducer. Make sure the map passed to \
                 combine_reducers holds at least one slice reducer."
            ),
            Self::MissingReducer { slice } => {
                write!(f, "No reducer provided for key \"{}\"", slice)
            }
            Self::UnexpectedType {
                state_name,
                found,
                expected,
            } => write!(
                f,
                "The {} has unexpected type of \"{}\". Expected argument to be an \
                 associative container with the following keys: {}",
                state_name,
                found,
                quoted(expected)
            ),
            Self::UnexpectedKeys {
                state_name,
                keys,
                expected,
            } => write!(
                f,
                "Unexpected {} {} found in {}. Expected to find one of the known \
                 reducer keys instead: {}. Unexpected keys are carried through untouched.",
                if keys.len() == 1 { "key" } else { "keys" },
                quoted(keys),
                state_name,
                quoted(expected)
            ),
        }
    }
}

/// Write-only, best-effort channel for diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `log::warn!`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        log::warn!(target: "combine_slices::diagnostics", "{}", diagnostic);
    }
}

/// Drops every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    recorded: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env_value() {
        assert_eq!(
            DiagnosticMode::from_env_value(Some("production")),
            DiagnosticMode::Disabled
        );
        assert_eq!(
            DiagnosticMode::from_env_value(Some(" Production ")),
            DiagnosticMode::Disabled
        );
        assert_eq!(
            DiagnosticMode::from_env_value(Some("development")),
            DiagnosticMode::Enabled
        );
        assert_eq!(DiagnosticMode::from_env_value(None), DiagnosticMode::Enabled);
    }

    #[test]
    fn test_process_mode_is_stable() {
        assert_eq!(DiagnosticMode::process(), DiagnosticMode::process());
    }

    #[test]
    fn test_missing_reducer_message() {
        let d = Diagnostic::MissingReducer {
            slice: "todos".to_string(),
        };
        assert_eq!(d.to_string(), "No reducer provided for key \"todos\"");
    }

    #[test]
    fn test_unexpected_keys_message() {
        let single = Diagnostic::UnexpectedKeys {
            state_name: "previous state received by the reducer",
            keys: vec!["bogus".to_string()],
            expected: vec!["counter".to_string(), "name".to_string()],
        };
        let text = single.to_string();
        assert!(text.starts_with("Unexpected key \"bogus\" found in previous state"));
        assert!(text.contains("\"counter\", \"name\""));
        assert!(text.ends_with("Unexpected keys are carried through untouched."));

        let plural = Diagnostic::UnexpectedKeys {
            state_name: "initial state argument",
            keys: vec!["a".to_string(), "b".to_string()],
            expected: vec![],
        };
        assert!(plural
            .to_string()
            .starts_with("Unexpected keys \"a\", \"b\" found in initial state argument"));
    }

    #[test]
    fn test_unexpected_type_message() {
        let d = Diagnostic::UnexpectedType {
            state_name: "previous state received by the reducer",
            found: "array".to_string(),
            expected: vec!["counter".to_string()],
        };
        assert!(d.to_string().contains("unexpected type of \"array\""));
        assert!(d.keys().is_empty());
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.emit(&Diagnostic::NoReducers);
        sink.emit(&Diagnostic::MissingReducer {
            slice: "x".to_string(),
        });

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.diagnostics()[0], Diagnostic::NoReducers);
    }

    #[test]
    fn test_null_and_log_sinks_accept_everything() {
        NullSink.emit(&Diagnostic::NoReducers);
        LogSink.emit(&Diagnostic::NoReducers);
    }
}
