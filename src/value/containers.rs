//! Shared mutable containers.
//!
//! Every container is a cheap handle over `Arc<RwLock<..>>`. Accessors return
//! owned clones of elements so no lock is held while a validator recurses.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::Value;

/// A shared, growable array.
#[derive(Debug, Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// Creates an array owning `items`.
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Returns a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Writes `value` at `index` and returns the previous element.
    ///
    /// Writing past the end pads the array with `Undefined`.
    pub fn set(&self, index: usize, value: Value) -> Value {
        let mut items = self.0.write();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        std::mem::replace(&mut items[index], value)
    }

    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Returns a snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Returns true if both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A shared object with insertion-ordered string keys.
///
/// An `Undefined` property is the same as an absent one: inserting
/// `Undefined` removes the key.
#[derive(Debug, Clone, Default)]
pub struct Object(Arc<RwLock<IndexMap<String, Value>>>);

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object, dropping `undefined` values.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let map = entries
            .into_iter()
            .filter(|(_, v)| !v.is_undefined())
            .collect();
        Self(Arc::new(RwLock::new(map)))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.read().keys().cloned().collect()
    }

    /// Returns a snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Sets `key` to `value` and returns the previous value (`Undefined`
    /// when the key was absent). Existing keys keep their position.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Value {
        let key = key.into();
        let mut map = self.0.write();
        if value.is_undefined() {
            map.shift_remove(&key).unwrap_or_default()
        } else {
            map.insert(key, value).unwrap_or_default()
        }
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A shared insertion-ordered set, unique by same-value-zero.
#[derive(Debug, Clone, Default)]
pub struct Set(Arc<RwLock<Vec<Value>>>);

impl Set {
    /// Creates a set, keeping the first of any equal items.
    pub fn new(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.iter().any(|u| u.same_value_zero(&item)) {
                unique.push(item);
            }
        }
        Self(Arc::new(RwLock::new(unique)))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.read().iter().any(|v| v.same_value_zero(value))
    }

    /// Adds `value`, returning false if it was already present.
    pub fn insert(&self, value: Value) -> bool {
        let mut items = self.0.write();
        if items.iter().any(|v| v.same_value_zero(&value)) {
            false
        } else {
            items.push(value);
            true
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    pub fn ptr_eq(&self, other: &Set) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A shared insertion-ordered map with arbitrary keys.
#[derive(Debug, Clone, Default)]
pub struct Map(Arc<RwLock<Vec<(Value, Value)>>>);

impl Map {
    /// Creates a map; a repeated key overwrites the earlier value in place.
    pub fn new(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = Self::default();
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .read()
            .iter()
            .find(|(k, _)| k.same_value_zero(key))
            .map(|(_, v)| v.clone())
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = self.0.write();
        match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.read().clone()
    }

    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_set_returns_previous() {
        let array = Array::new(vec![Value::from(1), Value::from(2)]);
        let previous = array.set(1, Value::from("x"));
        assert_eq!(previous, Value::from(2));
        assert_eq!(array.get(1), Some(Value::from("x")));
    }

    #[test]
    fn test_array_set_pads_past_end() {
        let array = Array::default();
        array.set(2, Value::from(true));
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(0), Some(Value::Undefined));
    }

    #[test]
    fn test_object_insert_keeps_position() {
        let object = Object::from_entries(vec![
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::from(2)),
        ]);
        object.insert("a", Value::from(3));
        assert_eq!(object.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_object_insert_undefined_removes() {
        let object = Object::new();
        assert!(object.insert("a", Value::from(1)).is_undefined());
        assert_eq!(object.insert("a", Value::Undefined), Value::from(1));
        assert!(!object.contains_key("a"));
    }

    #[test]
    fn test_set_deduplicates() {
        let set = Set::new(vec![Value::from(1), Value::from(1), Value::Number(f64::NAN), Value::Number(f64::NAN)]);
        assert_eq!(set.len(), 2);
        assert!(!set.insert(Value::from(1)));
    }

    #[test]
    fn test_map_overwrites_in_place() {
        let map = Map::new(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::from("a")), Some(Value::from(3)));
        assert_eq!(map.entries()[0].0, Value::from("a"));
    }
}
