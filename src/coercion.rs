//! Reversible coercions.
//!
//! A [`Slot`] is a binder over exactly one place in a value: an array element,
//! an object property, or a scratch [`Cell`]. Binding a new value produces a
//! [`Coercion`] that is *proposed*, not applied. Applying a coercion installs
//! its pending value and returns the inverse coercion, so
//! `commit.apply().apply()` re-commits, forming an endless commit/revert chain.
//!
//! # Example
//!
//! ```rust
//! use sentinel::coercion::{Direction, Slot};
//! use sentinel::Value;
//! use serde_json::json;
//!
//! let value = Value::from(json!({"flag": "true"}));
//! let object = value.as_object().unwrap();
//!
//! let commit = Slot::property(object, "flag").bind(Value::from(true));
//! assert_eq!(value.to_json(), json!({"flag": "true"}));
//!
//! let revert = commit.apply();
//! assert_eq!(value.to_json(), json!({"flag": true}));
//! assert_eq!(revert.direction(), Direction::Revert);
//!
//! revert.apply();
//! assert_eq!(value.to_json(), json!({"flag": "true"}));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::value::{Array, Object, Value};

/// A shared single-value box.
///
/// Cells stage values that have no container of their own: the root of a
/// top-level validation, or a value provisionally coerced by a cascade.
#[derive(Debug, Clone, Default)]
pub struct Cell(Arc<RwLock<Value>>);

impl Cell {
    /// Creates a cell holding `value`.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Returns a clone of the current content.
    pub fn get(&self) -> Value {
        self.0.read().clone()
    }

    /// Stores `value` and returns the previous content.
    pub fn replace(&self, value: Value) -> Value {
        std::mem::replace(&mut *self.0.write(), value)
    }

    /// Returns a binder over this cell.
    pub fn slot(&self) -> Slot {
        Slot {
            target: Target::Cell(self.clone()),
        }
    }

    /// Returns true when both handles share one cell.
    pub fn ptr_eq(&self, other: &Cell) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone)]
enum Target {
    Element(Array, usize),
    Property(Object, String),
    Cell(Cell),
}

/// A binder over one slot of a value.
#[derive(Debug, Clone)]
pub struct Slot {
    target: Target,
}

impl Slot {
    /// Targets `array[index]`.
    pub fn element(array: &Array, index: usize) -> Self {
        Self {
            target: Target::Element(array.clone(), index),
        }
    }

    /// Targets the `key` property of `object`.
    pub fn property(object: &Object, key: impl Into<String>) -> Self {
        Self {
            target: Target::Property(object.clone(), key.into()),
        }
    }

    /// Returns the current content of the slot.
    pub fn read(&self) -> Value {
        match &self.target {
            Target::Element(array, index) => array.get(*index).unwrap_or_default(),
            Target::Property(object, key) => object.get(key).unwrap_or_default(),
            Target::Cell(cell) => cell.get(),
        }
    }

    /// Writes `value` into the slot and returns what was there.
    pub fn replace(&self, value: Value) -> Value {
        match &self.target {
            Target::Element(array, index) => array.set(*index, value),
            Target::Property(object, key) => object.insert(key.clone(), value),
            Target::Cell(cell) => cell.replace(value),
        }
    }

    /// Proposes `value` for this slot without writing it.
    pub fn bind(&self, value: Value) -> Coercion {
        Coercion {
            slot: self.clone(),
            pending: Pending::Ready(value),
            direction: Direction::Commit,
        }
    }

    /// Proposes a value computed when the coercion is first applied.
    ///
    /// Collections rebuilt from staged children use this, so that the
    /// children's own coercions (applied earlier in the list) are observed.
    pub(crate) fn bind_deferred<F>(&self, generate: F) -> Coercion
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Coercion {
            slot: self.clone(),
            pending: Pending::Deferred(Arc::new(generate)),
            direction: Direction::Commit,
        }
    }

    /// Returns true if this slot writes into `cell`.
    pub fn targets_cell(&self, cell: &Cell) -> bool {
        matches!(&self.target, Target::Cell(c) if c.ptr_eq(cell))
    }

    /// Redirects property writes on `from` to the same key on `to`.
    fn retarget(&self, from: &Object, to: &Object) -> Slot {
        match &self.target {
            Target::Property(object, key) if object.ptr_eq(from) => Slot::property(to, key.clone()),
            _ => self.clone(),
        }
    }
}

/// Which way a coercion moves its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Installs the coerced value.
    Commit,
    /// Restores the value that was there before.
    Revert,
}

impl Direction {
    fn flip(self) -> Self {
        match self {
            Direction::Commit => Direction::Revert,
            Direction::Revert => Direction::Commit,
        }
    }
}

type Generator = Arc<dyn Fn() -> Value + Send + Sync>;

#[derive(Clone)]
enum Pending {
    Ready(Value),
    Deferred(Generator),
}

impl Pending {
    fn resolve(&self) -> Value {
        match self {
            Pending::Ready(value) => value.clone(),
            Pending::Deferred(generate) => generate(),
        }
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pending::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Pending::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// A pending write to one slot, together with the direction it moves.
#[derive(Debug, Clone)]
pub struct Coercion {
    slot: Slot,
    pending: Pending,
    direction: Direction,
}

impl Coercion {
    /// Writes the pending value and returns the inverse coercion.
    ///
    /// Applying the same coercion twice writes the same value twice.
    pub fn apply(&self) -> Coercion {
        let next = self.pending.resolve();
        let previous = self.slot.replace(next);
        Coercion {
            slot: self.slot.clone(),
            pending: Pending::Ready(previous),
            direction: self.direction.flip(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }
}

/// A proposed coercion and the path of the slot it targets.
#[derive(Debug, Clone)]
pub struct CoercionEntry {
    pub path: String,
    pub coercion: Coercion,
}

impl CoercionEntry {
    /// Records `coercion` as proposed at `path`.
    pub fn new(path: impl Into<String>, coercion: Coercion) -> Self {
        Self {
            path: path.into(),
            coercion,
        }
    }

    /// Applies the coercion, returning its inverse.
    pub fn apply(&self) -> Coercion {
        self.coercion.apply()
    }

    pub(crate) fn retarget(self, from: &Object, to: &Object) -> Self {
        Self {
            path: self.path,
            coercion: Coercion {
                slot: self.coercion.slot.retarget(from, to),
                ..self.coercion
            },
        }
    }
}

/// Applies every entry in order and returns the inverses in the same order.
pub fn commit_all(entries: &[CoercionEntry]) -> Vec<Coercion> {
    entries.iter().map(CoercionEntry::apply).collect()
}

/// Applies a batch of coercions for as long as the guard lives.
///
/// Dropping the guard reverts the batch in reverse order, leaving every slot
/// exactly as it was before.
#[derive(Debug)]
pub struct ProvisionalCommit {
    inverses: Vec<Coercion>,
}

impl ProvisionalCommit {
    /// Applies `entries` until the guard is dropped.
    pub fn apply(entries: &[CoercionEntry]) -> Self {
        if !entries.is_empty() {
            trace!(count = entries.len(), "provisionally committing coercions");
        }
        Self {
            inverses: commit_all(entries),
        }
    }
}

impl Drop for ProvisionalCommit {
    fn drop(&mut self) {
        for inverse in self.inverses.drain(..).rev() {
            inverse.apply();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_does_not_write() {
        let array = Array::new(vec![Value::from("1")]);
        let _commit = Slot::element(&array, 0).bind(Value::from(1));
        assert_eq!(array.get(0), Some(Value::from("1")));
    }

    #[test]
    fn test_commit_revert_chain() {
        let cell = Cell::new(Value::from("a"));
        let commit = cell.slot().bind(Value::from("b"));
        assert_eq!(commit.direction(), Direction::Commit);

        let revert = commit.apply();
        assert_eq!(cell.get(), Value::from("b"));
        assert_eq!(revert.direction(), Direction::Revert);

        let recommit = revert.apply();
        assert_eq!(cell.get(), Value::from("a"));
        assert_eq!(recommit.direction(), Direction::Commit);

        recommit.apply();
        assert_eq!(cell.get(), Value::from("b"));
    }

    #[test]
    fn test_commit_twice_reapplies_forward() {
        let cell = Cell::new(Value::from(0));
        let commit = cell.slot().bind(Value::from(1));
        commit.apply();
        let revert = commit.apply();
        assert_eq!(cell.get(), Value::from(1));
        revert.apply();
        assert_eq!(cell.get(), Value::from(1));
    }

    #[test]
    fn test_revert_restores_absent_property() {
        let value = Value::from(json!({"a": 1}));
        let object = value.as_object().unwrap();
        let revert = Slot::property(object, "b").bind(Value::from(2)).apply();
        assert_eq!(value.to_json(), json!({"a": 1, "b": 2}));
        revert.apply();
        assert_eq!(value.to_json(), json!({"a": 1}));
    }

    #[test]
    fn test_deferred_value_is_computed_on_apply() {
        let source = Cell::new(Value::from(1));
        let target = Cell::new(Value::Null);
        let reader = source.clone();
        let commit = target.slot().bind_deferred(move || reader.get());
        source.replace(Value::from(2));
        commit.apply();
        assert_eq!(target.get(), Value::from(2));
    }

    #[test]
    fn test_provisional_commit_reverts_on_drop() {
        let array = Array::new(vec![Value::from("x")]);
        let entries = vec![
            CoercionEntry::new(".[0]", Slot::element(&array, 0).bind(Value::from("y"))),
            CoercionEntry::new(".[0]", Slot::element(&array, 0).bind(Value::from("z"))),
        ];
        {
            let _guard = ProvisionalCommit::apply(&entries);
            assert_eq!(array.get(0), Some(Value::from("z")));
        }
        assert_eq!(array.get(0), Some(Value::from("x")));
    }

    #[test]
    fn test_retarget_moves_property_writes() {
        let bag = Object::new();
        let real = Object::new();
        let entry = CoercionEntry::new(".x", Slot::property(&bag, "x").bind(Value::from(1)));
        entry.retarget(&bag, &real).apply();
        assert_eq!(real.get("x"), Some(Value::from(1)));
        assert!(bag.get("x").is_none());
    }
}
