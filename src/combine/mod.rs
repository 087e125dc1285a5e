// SPDX-License-Identifier: MIT

//! Reducer composition
//!
//! This module provides:
//! - `SliceReducer` - a pure transition function for one slice
//! - `ReducerMap` - the registered slice reducers, in order
//! - `CombinedReducer` - one reducer over the whole composite state
//! - `Diagnostic` and its sinks - non-fatal warnings about shape and keys

pub mod action;
mod combinator;
pub mod diagnostics;
mod reducer;

pub use action::Action;
pub use combinator::{combine_reducers, CombineConfig, CombinedReducer};
pub use diagnostics::{
    Diagnostic, DiagnosticMode, DiagnosticSink, LogSink, MemorySink, NullSink,
};
pub use reducer::{reducer_fn, ReducerMap, SliceReducer};
