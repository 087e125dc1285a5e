// SPDX-License-Identifier: MIT

//! Declarative slice reducers
//!
//! This module provides:
//! - `SliceSchema` - slices described in YAML or JSON
//! - `DeclarativeSlice` - a `SliceReducer` built from one schema entry
//! - `MergeStrategy` - how an action payload is folded into a slice

mod declarative;
mod schema;

pub use declarative::DeclarativeSlice;
pub use schema::{FieldType, MergeStrategy, SliceDef, SliceSchema};
