// SPDX-License-Identifier: MIT

//! Composite state storage
//!
//! The composite is a persistent map from slice name to slice value. Every
//! update yields a new map that shares untouched structure with the old one.

mod composite;

pub use composite::{json_kind, CompositeState, StateShapeError};
