// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::sync::Arc;

use super::action::Action;
use crate::error::CombineError;

/// A pure transition function for one slice of the composite state.
///
/// `state` is `None` when the slice has no value yet; the reducer must then
/// produce its initial value. Returning `None` means "no value" and is
/// always a misuse: use `Value::Null` for an intentionally empty slice.
pub trait SliceReducer: Send + Sync {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Option<Value>;

    /// Like [`SliceReducer::reduce`], but lets a reducer that can fail on its
    /// own (a nested combinator) hand its error to the caller.
    fn try_reduce(
        &self,
        state: Option<&Value>,
        action: &Action,
    ) -> Result<Option<Value>, CombineError> {
        Ok(self.reduce(state, action))
    }
}

impl<F> SliceReducer for F
where
    F: Fn(Option<&Value>, &Action) -> Option<Value> + Send + Sync,
{
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Option<Value> {
        self(state, action)
    }
}

/// Pin a closure to the [`SliceReducer`] signature so its argument types
/// can be inferred.
pub fn reducer_fn<F>(f: F) -> F
where
    F: Fn(Option<&Value>, &Action) -> Option<Value> + Send + Sync,
{
    f
}

/// Registered slice reducers, in registration order.
///
/// A name may be registered without a reducer; such entries are reported and
/// dropped when the map is combined.
#[derive(Clone, Default)]
pub struct ReducerMap {
    entries: Vec<(String, Option<Arc<dyn SliceReducer>>)>,
}

impl ReducerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reducer` under `name`.
    ///
    /// Re-registering a name replaces its reducer in place.
    pub fn insert<R>(&mut self, name: impl Into<String>, reducer: R) -> &mut Self
    where
        R: SliceReducer + 'static,
    {
        self.put(name.into(), Some(Arc::new(reducer)))
    }

    /// Register a name with no reducer behind it
    pub fn insert_missing(&mut self, name: impl Into<String>) -> &mut Self {
        self.put(name.into(), None)
    }

    /// Builder-style variant of [`ReducerMap::insert`]
    pub fn with<R>(mut self, name: impl Into<String>, reducer: R) -> Self
    where
        R: SliceReducer + 'static,
    {
        self.insert(name, reducer);
        self
    }

    fn put(&mut self, name: String, reducer: Option<Arc<dyn SliceReducer>>) -> &mut Self {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = reducer,
            None => self.entries.push((name, reducer)),
        }
        self
    }

    /// All registered names, including those without a reducer
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Option<Arc<dyn SliceReducer>>)> {
        self.entries
    }
}

impl std::fmt::Debug for ReducerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(n, r)| (n, if r.is_some() { "<reducer>" } else { "<missing>" })),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keep(state: Option<&Value>, _action: &Action) -> Option<Value> {
        Some(state.cloned().unwrap_or(Value::Null))
    }

    #[test]
    fn test_closure_is_slice_reducer() {
        let reducer =
            reducer_fn(|state, _| Some(json!(state.and_then(Value::as_i64).unwrap_or(0) + 1)));
        assert_eq!(reducer.reduce(None, &Action::new("X")), Some(json!(1)));
        assert_eq!(
            reducer.reduce(Some(&json!(4)), &Action::new("X")),
            Some(json!(5))
        );
    }

    #[test]
    fn test_registration_order_is_kept() {
        let map = ReducerMap::new()
            .with("b", keep)
            .with("a", keep)
            .with("c", keep);

        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = ReducerMap::new();
        map.insert("first", keep).insert("second", keep);
        map.insert_missing("first");

        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(map.len(), 2);

        let entries = map.into_entries();
        assert!(entries[0].1.is_none());
        assert!(entries[1].1.is_some());
    }

    #[test]
    fn test_empty_map() {
        let map = ReducerMap::new();
        assert!(map.is_empty());
        assert_eq!(format!("{:?}", map), "{}");
    }
}
