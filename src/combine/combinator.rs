// SPDX-License-Identifier: MIT

//! The combined reducer
//!
//! Construction filters the registered reducers and probes each one twice.
//! A failed probe is kept and reproduced on every invocation; the combined
//! reducer never recovers from it.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::action::Action;
use super::diagnostics::{Diagnostic, DiagnosticMode, DiagnosticSink, LogSink};
use super::reducer::{ReducerMap, SliceReducer};
use crate::error::CombineError;
use crate::state::CompositeState;

const INITIAL_STATE_NAME: &str = "initial state argument";
const PREVIOUS_STATE_NAME: &str = "previous state received by the reducer";

/// Where diagnostics go and whether they are produced
#[derive(Clone)]
pub struct CombineConfig {
    pub mode: DiagnosticMode,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl CombineConfig {
    pub fn with_mode(mut self, mode: DiagnosticMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    fn emit(&self, diagnostic: Diagnostic) {
        if self.mode.is_enabled() {
            self.sink.emit(&diagnostic);
        }
    }
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            mode: DiagnosticMode::process(),
            sink: Arc::new(LogSink),
        }
    }
}

impl std::fmt::Debug for CombineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombineConfig")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Combine `reducers` with the process-wide diagnostic settings
pub fn combine_reducers(reducers: ReducerMap) -> CombinedReducer {
    CombinedReducer::with_config(reducers, CombineConfig::default())
}

/// One reducer over a [`CompositeState`], dispatching to each slice reducer
pub struct CombinedReducer {
    slices: Vec<(String, Arc<dyn SliceReducer>)>,
    sanity: Result<(), CombineError>,
    config: CombineConfig,
    unexpected_keys: Mutex<HashSet<String>>,
}

impl CombinedReducer {
    /// Build a combined reducer.
    ///
    /// Never fails: a reducer that flunks its probes leaves the result
    /// permanently broken, and every call to [`CombinedReducer::reduce`]
    /// returns that failure.
    pub fn with_config(reducers: ReducerMap, config: CombineConfig) -> Self {
        let mut slices = Vec::with_capacity(reducers.len());
        for (name, reducer) in reducers.into_entries() {
            match reducer {
                Some(reducer) => slices.push((name, reducer)),
                None => config.emit(Diagnostic::MissingReducer { slice: name }),
            }
        }

        let sanity = probe_reducers(&slices);
        match &sanity {
            Ok(()) => log::debug!("Combined {} slice reducers", slices.len()),
            Err(e) => log::debug!("Combined reducer is unusable: {}", e),
        }

        Self {
            slices,
            sanity,
            config,
            unexpected_keys: Mutex::new(HashSet::new()),
        }
    }

    /// Build a combined reducer, surfacing a failed probe immediately
    pub fn try_new(reducers: ReducerMap, config: CombineConfig) -> Result<Self, CombineError> {
        let combined = Self::with_config(reducers, config);
        combined.sanity.clone()?;
        Ok(combined)
    }

    /// The failure captured at construction, if any
    pub fn sanity(&self) -> Result<(), &CombineError> {
        self.sanity.as_ref().map(|_| ())
    }

    /// Names of the slices that survived filtering, in registration order
    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(name, _)| name.as_str())
    }

    /// Apply `action` to every slice of `state`.
    ///
    /// An absent state is treated as an empty composite. The result is always
    /// a new composite, even when no slice changed.
    pub fn reduce(
        &self,
        state: Option<&CompositeState>,
        action: &Action,
    ) -> Result<CompositeState, CombineError> {
        self.sanity.clone()?;
        let input = state.cloned().unwrap_or_default();

        if self.config.mode.is_enabled() && self.check_not_empty() {
            self.check_unexpected_keys(&input, action);
        }

        self.apply(input, action)
    }

    /// Apply `action` to a composite given as arbitrary JSON.
    ///
    /// A JSON object is read as the composite. Anything else is reported as
    /// an unexpected type and the pass starts from an empty composite.
    pub fn reduce_json(
        &self,
        state: Value,
        action: &Action,
    ) -> Result<CompositeState, CombineError> {
        self.sanity.clone()?;

        let input = match CompositeState::from_json(state) {
            Ok(input) => {
                if self.config.mode.is_enabled() && self.check_not_empty() {
                    self.check_unexpected_keys(&input, action);
                }
                input
            }
            Err(shape) => {
                if self.check_not_empty() {
                    self.config.emit(Diagnostic::UnexpectedType {
                        state_name: state_name(action),
                        found: shape.found.to_string(),
                        expected: self.expected_names(),
                    });
                }
                CompositeState::new()
            }
        };

        self.apply(input, action)
    }

    fn apply(
        &self,
        input: CompositeState,
        action: &Action,
    ) -> Result<CompositeState, CombineError> {
        log::trace!(
            "Reducing {} slices for action {}",
            self.slices.len(),
            action.action_type
        );

        // Nothing will be written, so copy to keep the result distinct from
        // the caller's composite.
        if self.slices.is_empty() {
            return Ok(input.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
        }

        // `input` is our own handle on the persistent map; writes below copy
        // the touched paths and never reach the caller's composite.
        let mut next = input;
        for (name, reducer) in &self.slices {
            let value = reducer
                .try_reduce(next.get(name), action)
                .map_err(|e| CombineError::nested(name.as_str(), e))?
                .ok_or_else(|| CombineError::UndefinedResult {
                    slice: name.clone(),
                    action_type: action.action_type.clone(),
                })?;
            next.set_in_place(name, value);
        }
        Ok(next)
    }

    fn check_not_empty(&self) -> bool {
        if self.slices.is_empty() {
            self.config.emit(Diagnostic::NoReducers);
            return false;
        }
        true
    }

    fn check_unexpected_keys(&self, state: &CompositeState, action: &Action) {
        let mut unexpected: Vec<String> = {
            let mut seen = self
                .unexpected_keys
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state
                .keys()
                .filter(|key| !self.owns(key))
                .filter(|key| seen.insert((*key).clone()))
                .cloned()
                .collect()
        };

        if action.is_replace() || unexpected.is_empty() {
            return;
        }

        unexpected.sort();
        self.config.emit(Diagnostic::UnexpectedKeys {
            state_name: state_name(action),
            keys: unexpected,
            expected: self.expected_names(),
        });
    }

    fn owns(&self, key: &str) -> bool {
        self.slices.iter().any(|(name, _)| name == key)
    }

    fn expected_names(&self) -> Vec<String> {
        self.slices.iter().map(|(name, _)| name.clone()).collect()
    }
}

impl std::fmt::Debug for CombinedReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("slices", &self.expected_names())
            .field("sanity", &self.sanity)
            .field("config", &self.config)
            .finish()
    }
}

/// A combined reducer nests as the slice of a parent combinator
impl SliceReducer for CombinedReducer {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Option<Value> {
        match self.try_reduce(state, action) {
            Ok(next) => next,
            Err(e) => {
                log::error!("Nested combined reducer failed: {}", e);
                None
            }
        }
    }

    fn try_reduce(
        &self,
        state: Option<&Value>,
        action: &Action,
    ) -> Result<Option<Value>, CombineError> {
        let next = match state {
            Some(value) => self.reduce_json(value.clone(), action)?,
            None => CombinedReducer::reduce(self, None, action)?,
        };
        Ok(Some(next.to_json()))
    }
}

fn state_name(action: &Action) -> &'static str {
    if action.is_init() {
        INITIAL_STATE_NAME
    } else {
        PREVIOUS_STATE_NAME
    }
}

fn probe_reducers(slices: &[(String, Arc<dyn SliceReducer>)]) -> Result<(), CombineError> {
    for (name, reducer) in slices {
        let nested = |e| CombineError::nested(name.as_str(), e);
        if reducer.try_reduce(None, &Action::init()).map_err(nested)?.is_none() {
            return Err(CombineError::InitProbe { slice: name.clone() });
        }
        if reducer
            .try_reduce(None, &Action::probe_unknown())
            .map_err(nested)?
            .is_none()
        {
            return Err(CombineError::UnknownActionProbe { slice: name.clone() });
        }
    }
    Ok(())
}
