//! Per-call traversal state.
//!
//! This module provides the [`State`] threaded through every validator call.
//! It carries the current path, an optional error sink, the binder for the
//! slot being examined and an optional list collecting proposed coercions.
//! Composite validators never mutate their parent's state from a child frame:
//! they derive a fresh `State` that reborrows the parent's sinks and overrides
//! the path and binder.

use std::fmt;

use tracing::trace;

use crate::coercion::{Coercion, CoercionEntry, Slot};
use crate::path::{compute_key, compute_value_key, PathKey};
use crate::value::Value;

/// Message pushed when coercion is requested without a binder for the slot.
pub const UNBOUND_COERCION: &str = "Unbound coercion result";

/// Traversal state shared by a validator and its children.
///
/// An empty state validates in fast-fail mode: validators stop at the first
/// failure and no message is ever formatted.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_string, Predicate, State, Value};
///
/// let mut errors = Vec::new();
/// let valid = is_string().test(&Value::from(42), &mut State::new().with_errors(&mut errors));
///
/// assert!(!valid);
/// assert_eq!(errors, vec![".: Expected a string (got 42)"]);
/// ```
#[derive(Default)]
pub struct State<'a> {
    path: Option<String>,
    errors: Option<&'a mut Vec<String>>,
    coercion: Option<Slot>,
    coercions: Option<&'a mut Vec<CoercionEntry>>,
}

impl<'a> State<'a> {
    /// Creates a state with no path, no error sink and coercion disabled.
    pub fn new() -> Self {
        Self {
            path: None,
            errors: None,
            coercion: None,
            coercions: None,
        }
    }

    /// Enables error collection into `errors`.
    pub fn with_errors(mut self, errors: &'a mut Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Enables coercion mode; proposals are pushed onto `coercions`.
    pub fn with_coercions(mut self, coercions: &'a mut Vec<CoercionEntry>) -> Self {
        self.coercions = Some(coercions);
        self
    }

    /// Sets the binder for the slot holding the value under test.
    pub fn with_coercion(mut self, slot: Slot) -> Self {
        self.coercion = Some(slot);
        self
    }

    /// Starts reporting at `path` instead of the root.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The current path, `None` at the root.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the path as rendered in messages (`.` at the root).
    pub fn display_path(&self) -> &str {
        self.path.as_deref().unwrap_or(".")
    }

    /// Returns true when errors are being collected.
    pub fn collects_errors(&self) -> bool {
        self.errors.is_some()
    }

    /// Returns true when coercions are being collected.
    pub fn is_coercing(&self) -> bool {
        self.coercions.is_some()
    }

    /// Returns true if a binder is installed for the current slot.
    pub fn is_bound(&self) -> bool {
        self.coercion.is_some()
    }

    /// The slot the value under test can be written back to.
    pub fn binder(&self) -> Option<&Slot> {
        self.coercion.as_ref()
    }

    /// Returns true when a failure should end the current loop: fast-fail
    /// mode has nothing more to report.
    pub fn should_stop(&self, valid: bool) -> bool {
        !valid && self.errors.is_none()
    }

    /// Paths are only observable through messages and coercion entries.
    fn tracks_paths(&self) -> bool {
        self.errors.is_some() || self.coercions.is_some()
    }

    /// Derives a child state with the same path and binder.
    pub fn derive(&mut self) -> State<'_> {
        State {
            path: self.path.clone(),
            errors: self.errors.as_deref_mut(),
            coercion: self.coercion.clone(),
            coercions: self.coercions.as_deref_mut(),
        }
    }

    /// Derives a child state for `key`, bound to `coercion`.
    pub fn descend(&mut self, key: PathKey<'_>, coercion: Option<Slot>) -> State<'_> {
        let path = self
            .tracks_paths()
            .then(|| compute_key(self.path.as_deref(), key));
        State {
            path,
            errors: self.errors.as_deref_mut(),
            coercion,
            coercions: self.coercions.as_deref_mut(),
        }
    }

    /// Derives a child state for an arbitrary map key.
    pub fn descend_value(&mut self, key: &Value, coercion: Option<Slot>) -> State<'_> {
        let path = self
            .tracks_paths()
            .then(|| compute_value_key(self.path.as_deref(), key));
        State {
            path,
            errors: self.errors.as_deref_mut(),
            coercion,
            coercions: self.coercions.as_deref_mut(),
        }
    }

    /// Derives a child state with the same path and a different binder.
    pub fn rebind(&mut self, coercion: Option<Slot>) -> State<'_> {
        State {
            path: self.path.clone(),
            errors: self.errors.as_deref_mut(),
            coercion,
            coercions: self.coercions.as_deref_mut(),
        }
    }

    /// Derives a child state reporting at `path` (the root when `None`).
    pub fn relocate(&mut self, path: Option<String>) -> State<'_> {
        State {
            path,
            errors: self.errors.as_deref_mut(),
            coercion: self.coercion.clone(),
            coercions: self.coercions.as_deref_mut(),
        }
    }

    /// Derives a child state that reports errors but cannot coerce.
    pub fn readonly(&mut self) -> State<'_> {
        State {
            path: self.path.clone(),
            errors: self.errors.as_deref_mut(),
            coercion: None,
            coercions: None,
        }
    }

    /// Derives a read-only child state for `key`.
    pub fn inspect(&mut self, key: PathKey<'_>) -> State<'_> {
        let path = self
            .errors
            .is_some()
            .then(|| compute_key(self.path.as_deref(), key));
        State {
            path,
            errors: self.errors.as_deref_mut(),
            coercion: None,
            coercions: None,
        }
    }

    /// Derives a child state that stages its coercions into `coercions`
    /// instead of the parent's list.
    pub fn stage<'b>(
        &'b mut self,
        coercion: Option<Slot>,
        coercions: &'b mut Vec<CoercionEntry>,
    ) -> State<'b> {
        State {
            path: self.path.clone(),
            errors: self.errors.as_deref_mut(),
            coercion,
            coercions: Some(coercions),
        }
    }

    /// Creates an isolated state for a union branch: own sinks, same binder.
    pub fn branch<'b>(
        &self,
        path: Option<String>,
        errors: Option<&'b mut Vec<String>>,
        coercions: Option<&'b mut Vec<CoercionEntry>>,
    ) -> State<'b> {
        State {
            path,
            errors,
            coercion: self.coercion.clone(),
            coercions,
        }
    }

    /// Records a failure and returns `false`.
    ///
    /// The message is only formatted when an error sink is present.
    pub fn fail(&mut self, message: fmt::Arguments<'_>) -> bool {
        if let Some(errors) = self.errors.as_mut() {
            errors.push(format!("{}: {}", self.path.as_deref().unwrap_or("."), message));
        }
        false
    }

    /// Records the internal-consistency failure of a missing binder.
    pub fn fail_unbound(&mut self) -> bool {
        self.fail(format_args!("{}", UNBOUND_COERCION))
    }

    /// Proposes `value` for the current slot.
    ///
    /// Fails with [`UNBOUND_COERCION`] when no binder is installed.
    pub fn propose(&mut self, value: Value) -> bool {
        match self.coercion.as_ref().map(|slot| slot.bind(value)) {
            Some(coercion) => self.record(coercion),
            None => self.fail_unbound(),
        }
    }

    /// Proposes a value computed at commit time for the current slot.
    pub(crate) fn propose_deferred<F>(&mut self, generate: F) -> bool
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        match self.coercion.as_ref().map(|slot| slot.bind_deferred(generate)) {
            Some(coercion) => self.record(coercion),
            None => self.fail_unbound(),
        }
    }

    fn record(&mut self, coercion: Coercion) -> bool {
        if let Some(coercions) = self.coercions.as_mut() {
            let path = self.path.as_deref().unwrap_or(".");
            trace!(path, "coercion proposed");
            coercions.push(CoercionEntry::new(path, coercion));
        }
        true
    }

    /// Appends already-vetted coercions to this state's list.
    pub fn push_coercions(&mut self, entries: impl IntoIterator<Item = CoercionEntry>) {
        if let Some(coercions) = self.coercions.as_mut() {
            coercions.extend(entries);
        }
    }

    /// Appends already-formatted messages to this state's sink.
    pub fn push_errors(&mut self, messages: impl IntoIterator<Item = String>) {
        if let Some(errors) = self.errors.as_mut() {
            errors.extend(messages);
        }
    }
}

impl fmt::Debug for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("path", &self.path)
            .field("errors", &self.errors)
            .field("coercion", &self.coercion)
            .field("coercions", &self.coercions.as_ref().map(|c| c.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::Cell;

    #[test]
    fn test_fail_formats_with_root_path() {
        let mut errors = Vec::new();
        let mut state = State::new().with_errors(&mut errors);
        assert!(!state.fail(format_args!("boom")));
        assert_eq!(errors, vec![".: boom"]);
    }

    #[test]
    fn test_fail_without_sink_is_silent() {
        let mut state = State::new();
        assert!(!state.fail(format_args!("boom")));
    }

    #[test]
    fn test_descend_computes_paths() {
        let mut errors = Vec::new();
        let mut state = State::new().with_errors(&mut errors);
        {
            let mut users = state.descend(PathKey::Field("users"), None);
            let mut first = users.descend(PathKey::Index(0), None);
            first.fail(format_args!("bad"));
        }
        assert_eq!(errors, vec![".users[0]: bad"]);
    }

    #[test]
    fn test_descend_skips_paths_in_fast_fail_mode() {
        let mut state = State::new();
        let child = state.descend(PathKey::Field("a"), None);
        assert!(child.path().is_none());
    }

    #[test]
    fn test_propose_without_binder_fails() {
        let mut errors = Vec::new();
        let mut coercions = Vec::new();
        let mut state = State::new()
            .with_errors(&mut errors)
            .with_coercions(&mut coercions);
        assert!(!state.propose(Value::from(1)));
        assert_eq!(errors, vec![".: Unbound coercion result"]);
        assert!(coercions.is_empty());
    }

    #[test]
    fn test_propose_records_entry() {
        let cell = Cell::new(Value::from("1"));
        let mut coercions = Vec::new();
        let mut state = State::new()
            .with_coercions(&mut coercions)
            .with_coercion(cell.slot());
        assert!(state.propose(Value::from(1)));
        assert_eq!(coercions.len(), 1);
        assert_eq!(coercions[0].path, ".");
        assert_eq!(cell.get(), Value::from("1"));
    }
}
