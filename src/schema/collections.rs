//! Set and map validation.
//!
//! Native sets and maps are validated element-wise. In coercion mode their
//! elements are staged in a scratch array first; the collection is rebuilt
//! when the coercion is committed, and only if an element actually changed.
//! Other inputs (arrays, delimited strings, arrays of pairs, plain objects)
//! are validated as such and wrapped into a new collection on commit.

use crate::coercion::Cell;
use crate::state::State;
use crate::value::{printable, Array, Map, Set, Value};

use super::array::{check_elements, is_array, is_tuple, ArrayValidator, Delimiter};
use super::record::{is_record, RecordValidator};
use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// Returns true if any element of `staged` is no longer strictly equal to
/// the element it was copied from.
fn changed(original: &[Value], staged: &Array) -> bool {
    original
        .iter()
        .enumerate()
        .any(|(i, item)| !staged.get(i).unwrap_or_default().strict_eq(item))
}

/// Validates every element of a set.
///
/// # Example
///
/// ```rust
/// use sentinel::{as_type, is_number, is_set, AsOptions, Value};
///
/// let validator = is_set(is_number()).delimiter(",");
/// let options = AsOptions { coerce: true, ..AsOptions::default() };
///
/// let set = as_type(&Value::from("1,2,2"), &validator, options).into_result().unwrap();
/// assert_eq!(set.type_name(), "set");
/// ```
#[derive(Debug, Clone)]
pub struct SetValidator {
    item: Validator,
    elements: ArrayValidator,
}

/// Creates a set validator checking every element with `item`.
pub fn is_set(item: impl IntoValidator) -> SetValidator {
    let item = item.into_validator();
    SetValidator {
        elements: is_array(item.clone()),
        item,
    }
}

impl SetValidator {
    /// Splits string input on `delimiter` in coercion mode.
    pub fn delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.elements = self.elements.delimiter(delimiter);
        self
    }

    fn test_native(&self, set: &Set, state: &mut State<'_>) -> bool {
        let items = set.to_vec();

        if !state.is_coercing() {
            let mut valid = true;
            for item in &items {
                valid = self.item.test(item, &mut state.derive()) && valid;
                if state.should_stop(valid) {
                    break;
                }
            }
            return valid;
        }

        if !state.is_bound() {
            return state.fail_unbound();
        }
        let staged = Array::new(items.clone());
        if !check_elements(&staged, staged.len(), move |_| &self.item, state) {
            return false;
        }

        let original = set.clone();
        state.propose_deferred(move || {
            if changed(&items, &staged) {
                Value::Set(Set::new(staged.to_vec()))
            } else {
                Value::Set(original.clone())
            }
        })
    }
}

impl Predicate for SetValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if let Value::Set(set) = value {
            return self.test_native(set, state);
        }

        if !state.is_coercing() {
            return state.fail(format_args!("Expected a set (got {})", printable(value)));
        }
        if !state.is_bound() {
            return state.fail_unbound();
        }

        let store = Cell::new(value.clone());
        if !self.elements.test(value, &mut state.rebind(Some(store.slot()))) {
            return false;
        }
        state.propose_deferred(move || {
            let items = match store.get() {
                Value::Array(array) => array.to_vec(),
                _ => Vec::new(),
            };
            Value::Set(Set::new(items))
        })
    }
}

/// Validates the keys and values of a map.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_map, is_number, is_string, Predicate, Value, Map};
///
/// let validator = is_map(is_string(), is_number());
/// let map = Value::Map(Map::new([(Value::from("a"), Value::from("x"))]));
/// assert_eq!(validator.errors(&map), vec![r#".a: Expected a number (got "x")"#]);
/// ```
#[derive(Debug, Clone)]
pub struct MapValidator {
    key: Validator,
    value: Validator,
    pairs: ArrayValidator,
    record: RecordValidator,
}

/// Creates a map validator checking keys with `key` and values with `value`.
pub fn is_map(key: impl IntoValidator, value: impl IntoValidator) -> MapValidator {
    let key = key.into_validator();
    let value = value.into_validator();
    MapValidator {
        pairs: is_array(is_tuple([key.clone(), value.clone()])),
        record: is_record(value.clone()).keys(key.clone()),
        key,
        value,
    }
}

impl MapValidator {
    fn test_native(&self, map: &Map, state: &mut State<'_>) -> bool {
        let entries = map.entries();

        if !state.is_coercing() {
            let mut valid = true;
            for (key, item) in &entries {
                valid = self.key.test(key, &mut state.derive()) && valid;
                if state.should_stop(valid) {
                    break;
                }
                valid = self.value.test(item, &mut state.descend_value(key, None)) && valid;
                if state.should_stop(valid) {
                    break;
                }
            }
            return valid;
        }

        if !state.is_bound() {
            return state.fail_unbound();
        }
        let staged = Array::new(
            entries
                .iter()
                .map(|(k, v)| Value::array([k.clone(), v.clone()]))
                .collect(),
        );
        if !self
            .pairs
            .test(&Value::Array(staged.clone()), &mut state.rebind(None))
        {
            return false;
        }

        let original = map.clone();
        state.propose_deferred(move || {
            let rebuilt = pairs_of(&staged);
            let unchanged = rebuilt.len() == entries.len()
                && rebuilt
                    .iter()
                    .zip(&entries)
                    .all(|((k, v), (ok, ov))| k.strict_eq(ok) && v.strict_eq(ov));
            if unchanged {
                Value::Map(original.clone())
            } else {
                Value::Map(Map::new(rebuilt))
            }
        })
    }
}

/// Reads `[key, value]` pairs out of an array of arrays.
fn pairs_of(pairs: &Array) -> Vec<(Value, Value)> {
    pairs
        .to_vec()
        .into_iter()
        .filter_map(|pair| match pair {
            Value::Array(pair) => Some((
                pair.get(0).unwrap_or_default(),
                pair.get(1).unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

impl Predicate for MapValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if let Value::Map(map) = value {
            return self.test_native(map, state);
        }

        if !state.is_coercing() {
            return state.fail(format_args!("Expected a map (got {})", printable(value)));
        }
        if !state.is_bound() {
            return state.fail_unbound();
        }

        if let Value::Array(pairs) = value {
            if !self.pairs.test(value, &mut state.rebind(None)) {
                return false;
            }
            let pairs = pairs.clone();
            return state.propose_deferred(move || Value::Map(Map::new(pairs_of(&pairs))));
        }

        let store = Cell::new(value.clone());
        if !self.record.test(value, &mut state.rebind(Some(store.slot()))) {
            return false;
        }
        state.propose_deferred(move || {
            let entries = match store.get() {
                Value::Object(object) => object
                    .entries()
                    .into_iter()
                    .map(|(k, v)| (Value::from(k), v))
                    .collect(),
                _ => Vec::new(),
            };
            Value::Map(Map::new(entries))
        })
    }
}

impl_into_validator!(SetValidator, MapValidator);
