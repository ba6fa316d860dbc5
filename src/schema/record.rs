//! Record (dictionary) validation.

use crate::coercion::Slot;
use crate::path::PathKey;
use crate::state::State;
use crate::value::{printable, raw, Array, Object, Value};

use super::array::{is_array, is_tuple};
use super::string::is_string;
use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// Property names rejected on every object, coerced or not.
const UNSAFE_KEYS: [&str; 2] = ["__proto__", "constructor"];

pub(crate) fn is_unsafe_key(key: &str) -> bool {
    UNSAFE_KEYS.contains(&key)
}

/// Validates an object whose values all share one validator.
///
/// In coercion mode an array of `[key, value]` pairs is accepted too: it is
/// validated as such and then assembled into an object when the coercion is
/// committed, so the coerced pairs end up in the object.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_number, is_record, Predicate, Value};
/// use serde_json::json;
///
/// let scores = is_record(is_number());
/// assert!(scores.check(&Value::from(json!({"alice": 1, "bob": 2}))));
/// assert_eq!(
///     scores.errors(&Value::from(json!({"alice": 1, "bob": "two"}))),
///     vec![r#".bob: Expected a number (got "two")"#]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RecordValidator {
    value: Validator,
    keys: Option<Validator>,
}

/// Creates a record validator checking every value with `value`.
pub fn is_record(value: impl IntoValidator) -> RecordValidator {
    RecordValidator {
        value: value.into_validator(),
        keys: None,
    }
}

/// Alias of [`is_record`].
pub fn is_dict(value: impl IntoValidator) -> RecordValidator {
    is_record(value)
}

impl RecordValidator {
    /// Validates every key, at the key's own path, with `keys`.
    pub fn keys(mut self, keys: impl IntoValidator) -> Self {
        self.keys = Some(keys.into_validator());
        self
    }

    fn test_pairs(&self, pairs: &Array, state: &mut State<'_>) -> bool {
        let key = self
            .keys
            .clone()
            .unwrap_or_else(|| is_string().into_validator());
        let validator = is_array(is_tuple([key, self.value.clone()]));
        if !validator.test(&Value::Array(pairs.clone()), &mut state.rebind(None)) {
            return false;
        }

        let mut valid = true;
        for pair in pairs.to_vec() {
            let Value::Array(pair) = pair else { continue };
            let key = raw(&pair.get(0).unwrap_or_default()).to_string();
            if is_unsafe_key(&key) {
                valid = state
                    .descend(PathKey::Field(&key), None)
                    .fail(format_args!("Unsafe property name"));
                if state.should_stop(valid) {
                    break;
                }
            }
        }
        if !valid {
            return false;
        }

        let pairs = pairs.clone();
        state.propose_deferred(move || Value::Object(assemble(&pairs)))
    }
}

/// Builds an object from `[key, value]` pairs as they are at call time.
fn assemble(pairs: &Array) -> Object {
    let object = Object::new();
    for pair in pairs.to_vec() {
        if let Value::Array(pair) = pair {
            let key = pair.get(0).unwrap_or_default();
            object.insert(raw(&key).to_string(), pair.get(1).unwrap_or_default());
        }
    }
    object
}

impl Predicate for RecordValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if let Value::Array(pairs) = value {
            if state.is_coercing() {
                if !state.is_bound() {
                    return state.fail_unbound();
                }
                return self.test_pairs(pairs, state);
            }
        }

        let Value::Object(object) = value else {
            return state.fail(format_args!("Expected an object (got {})", printable(value)));
        };

        let mut valid = true;
        for (key, item) in object.entries() {
            if is_unsafe_key(&key) {
                valid = state
                    .descend(PathKey::Field(&key), None)
                    .fail(format_args!("Unsafe property name"));
            } else {
                let key_valid = match &self.keys {
                    Some(keys) => {
                        keys.test(&Value::string(&key), &mut state.inspect(PathKey::Field(&key)))
                    }
                    None => true,
                };
                valid = key_valid && test_entry(&self.value, object, &key, &item, state) && valid;
            }
            if state.should_stop(valid) {
                break;
            }
        }
        valid
    }
}

fn test_entry(
    spec: &Validator,
    object: &Object,
    key: &str,
    item: &Value,
    state: &mut State<'_>,
) -> bool {
    let binder = state.is_coercing().then(|| Slot::property(object, key));
    spec.test(item, &mut state.descend(PathKey::Field(key), binder))
}

impl_into_validator!(RecordValidator);
