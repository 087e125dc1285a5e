// SPDX-License-Identifier: MIT

//! Reducer composition over a persistent composite state
//!
//! Register one [`SliceReducer`] per named slice, combine them, and the
//! resulting [`CombinedReducer`] folds actions over a [`CompositeState`]:
//!
//! ```
//! use combine_slices::{combine_reducers, reducer_fn, Action, ReducerMap};
//! use serde_json::{json, Value};
//!
//! let reducers = ReducerMap::new()
//!     .with("counter", reducer_fn(|state, action| {
//!         let n = state.and_then(Value::as_i64).unwrap_or(0);
//!         Some(json!(if action.action_type == "INC" { n + 1 } else { n }))
//!     }))
//!     .with("name", reducer_fn(|state, _| Some(state.cloned().unwrap_or(json!("")))));
//!
//! let combined = combine_reducers(reducers);
//! let state = combined.reduce(None, &Action::new("INC")).unwrap();
//! assert_eq!(state.to_json(), json!({"counter": 1, "name": ""}));
//! ```

pub mod combine;
pub mod error;
pub mod loader;
pub mod slices;
pub mod state;

pub use combine::{
    combine_reducers, reducer_fn, Action, CombineConfig, CombinedReducer, Diagnostic,
    DiagnosticMode, DiagnosticSink, ReducerMap, SliceReducer,
};
pub use error::{CombineError, Error};
pub use state::CompositeState;
