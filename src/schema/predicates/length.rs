//! Length and uniqueness refinements for strings and collections.

use std::fmt;
use std::sync::Arc;

use crate::state::State;
use crate::value::{printable, Set, Value};

use crate::schema::traits::{impl_into_validator, Predicate};

/// Returns the length of a string (in characters) or a collection.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(a) => Some(a.len()),
        Value::Set(s) => Some(s.len()),
        Value::Map(m) => Some(m.len()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum LengthBound {
    AtLeast(usize),
    AtMost(usize),
    Exactly(usize),
}

/// Checks the length of a string or collection.
///
/// # Example
///
/// ```rust
/// use sentinel::{has_min_length, Predicate, Value};
///
/// assert!(has_min_length(2).check(&Value::from("ab")));
/// assert_eq!(
///     has_min_length(2).errors(&Value::from("a")),
///     vec![".: Expected to have a length of at least 2 elements (got 1)"]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LengthValidator {
    bound: LengthBound,
}

/// Requires a length of at least `min`.
pub fn has_min_length(min: usize) -> LengthValidator {
    LengthValidator {
        bound: LengthBound::AtLeast(min),
    }
}

/// Requires a length of at most `max`.
pub fn has_max_length(max: usize) -> LengthValidator {
    LengthValidator {
        bound: LengthBound::AtMost(max),
    }
}

/// Requires a length of exactly `length`.
pub fn has_exact_length(length: usize) -> LengthValidator {
    LengthValidator {
        bound: LengthBound::Exactly(length),
    }
}

impl Predicate for LengthValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let Some(len) = length_of(value) else {
            return state.fail(format_args!(
                "Expected a value with a length (got {})",
                printable(value)
            ));
        };

        match self.bound {
            LengthBound::AtLeast(min) if len < min => state.fail(format_args!(
                "Expected to have a length of at least {} elements (got {})",
                min, len
            )),
            LengthBound::AtMost(max) if len > max => state.fail(format_args!(
                "Expected to have a length of at most {} elements (got {})",
                max, len
            )),
            LengthBound::Exactly(exact) if len != exact => state.fail(format_args!(
                "Expected to have a length of exactly {} elements (got {})",
                exact, len
            )),
            _ => true,
        }
    }
}

type KeyFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Rejects arrays containing the same element twice.
///
/// Each duplicated element is reported once, however many times it repeats.
#[derive(Clone, Default)]
pub struct UniqueItemsValidator {
    key: Option<KeyFn>,
}

/// Requires every element to be distinct.
pub fn has_unique_items() -> UniqueItemsValidator {
    UniqueItemsValidator::default()
}

impl UniqueItemsValidator {
    /// Compares elements by `key(element)` instead of by the elements
    /// themselves.
    pub fn by<F>(mut self, key: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.key = Some(Arc::new(key));
        self
    }
}

impl Predicate for UniqueItemsValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let Value::Array(array) = value else {
            return state.fail(format_args!("Expected an array (got {})", printable(value)));
        };

        let seen = Set::default();
        let duplicated = Set::default();
        for item in array.to_vec() {
            let key = match &self.key {
                Some(key) => key(&item),
                None => item.clone(),
            };
            if seen.insert(key.clone()) || !duplicated.insert(key) {
                continue;
            }
            state.fail(format_args!(
                "Expected to contain unique elements; got a duplicate with {}",
                printable(&item)
            ));
            if !state.collects_errors() {
                return false;
            }
        }
        duplicated.is_empty()
    }
}

impl fmt::Debug for UniqueItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueItemsValidator")
            .field("keyed", &self.key.is_some())
            .finish()
    }
}

impl_into_validator!(LengthValidator, UniqueItemsValidator);
