//! Array and tuple validation.
//!
//! This module provides [`ArrayValidator`], which checks every element against
//! one item validator, and [`TupleValidator`], which checks each position
//! against its own validator and requires an exact length. Both can split a
//! delimited string into an array in coercion mode; the split is proposed
//! against the container's own path, after the element coercions.

use regex::Regex;

use crate::coercion::Slot;
use crate::path::PathKey;
use crate::state::State;
use crate::value::{printable, Array, Value};

use super::predicates::has_exact_length;
use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// How a string is split into array elements.
#[derive(Debug, Clone)]
pub enum Delimiter {
    /// A literal separator. The empty string splits into characters.
    Text(String),
    /// A regular expression matching separators.
    Pattern(Regex),
}

impl Delimiter {
    /// Splits `text` into string elements.
    pub fn split(&self, text: &str) -> Vec<Value> {
        match self {
            Delimiter::Text(sep) if sep.is_empty() => {
                text.chars().map(|c| Value::string(c.to_string())).collect()
            }
            Delimiter::Text(sep) => text.split(sep.as_str()).map(Value::string).collect(),
            Delimiter::Pattern(regex) => regex.split(text).map(Value::string).collect(),
        }
    }
}

impl From<&str> for Delimiter {
    fn from(sep: &str) -> Self {
        Delimiter::Text(sep.to_string())
    }
}

impl From<String> for Delimiter {
    fn from(sep: String) -> Self {
        Delimiter::Text(sep)
    }
}

impl From<Regex> for Delimiter {
    fn from(regex: Regex) -> Self {
        Delimiter::Pattern(regex)
    }
}

/// Resolves the array to validate.
///
/// Returns the array and whether it was produced by splitting a string, or
/// `Err(valid)` when validation already ended.
pub(crate) fn resolve_array(
    value: &Value,
    delimiter: Option<&Delimiter>,
    state: &mut State<'_>,
) -> Result<Option<(Array, bool)>, bool> {
    let splits = delimiter.is_some() && state.is_coercing();
    if splits && !state.is_bound() {
        return Err(state.fail_unbound());
    }
    match (value, delimiter) {
        (Value::Array(array), _) => Ok(Some((array.clone(), false))),
        (Value::String(text), Some(delimiter)) if splits => {
            Ok(Some((Array::new(delimiter.split(text)), true)))
        }
        _ => Ok(None),
    }
}

/// Validates elements `0..count` of `array`, each against `spec_for(i)`.
///
/// Elements are cloned out one at a time so that no lock is held while a
/// child validator runs. Fast-fail mode stops at the first failure.
pub(crate) fn check_elements<'s>(
    array: &Array,
    count: usize,
    spec_for: impl Fn(usize) -> &'s Validator,
    state: &mut State<'_>,
) -> bool {
    let mut valid = true;
    for index in 0..count {
        let element = array.get(index).unwrap_or_default();
        let binder = state.is_coercing().then(|| Slot::element(array, index));
        valid = spec_for(index).test(&element, &mut state.descend(PathKey::Index(index), binder))
            && valid;
        if state.should_stop(valid) {
            break;
        }
    }
    valid
}

/// Validates every element of an array against one validator.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_array, is_number, Predicate, Value};
/// use serde_json::json;
///
/// let validator = is_array(is_number());
/// assert!(validator.check(&Value::from(json!([1, 2, 3]))));
/// assert_eq!(
///     validator.errors(&Value::from(json!([1, "two", 3]))),
///     vec![r#".[1]: Expected a number (got "two")"#]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ArrayValidator {
    item: Validator,
    delimiter: Option<Delimiter>,
}

/// Creates an array validator checking every element with `item`.
pub fn is_array(item: impl IntoValidator) -> ArrayValidator {
    ArrayValidator {
        item: item.into_validator(),
        delimiter: None,
    }
}

impl ArrayValidator {
    /// Splits string input on `delimiter` in coercion mode.
    pub fn delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }
}

impl Predicate for ArrayValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let (array, split) = match resolve_array(value, self.delimiter.as_ref(), state) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                return state.fail(format_args!("Expected an array (got {})", printable(value)))
            }
            Err(valid) => return valid,
        };

        let valid = check_elements(&array, array.len(), |_| &self.item, state);
        if valid && split {
            return state.propose(Value::Array(array));
        }
        valid
    }
}

/// Validates a fixed-length array, one validator per position.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_number, is_string, is_tuple, IntoValidator, Predicate, Value};
/// use serde_json::json;
///
/// let validator = is_tuple([is_string().into_validator(), is_number().into_validator()]);
/// assert!(validator.check(&Value::from(json!(["a", 1]))));
/// assert_eq!(
///     validator.errors(&Value::from(json!(["a", 1, 2]))),
///     vec![".: Expected to have a length of exactly 2 elements (got 3)"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TupleValidator {
    specs: Vec<Validator>,
    delimiter: Option<Delimiter>,
}

/// Creates a tuple validator, one validator per position.
pub fn is_tuple(specs: impl IntoIterator<Item = Validator>) -> TupleValidator {
    TupleValidator {
        specs: specs.into_iter().collect(),
        delimiter: None,
    }
}

impl TupleValidator {
    /// Splits string input on `delimiter` in coercion mode.
    pub fn delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }
}

impl Predicate for TupleValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let (array, split) = match resolve_array(value, self.delimiter.as_ref(), state) {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                return state.fail(format_args!("Expected a tuple (got {})", printable(value)))
            }
            Err(valid) => return valid,
        };

        let length = Value::Array(array.clone());
        let mut valid =
            has_exact_length(self.specs.len()).test(&length, &mut state.relocate(None));
        if state.should_stop(valid) {
            return false;
        }

        let count = array.len().min(self.specs.len());
        valid = check_elements(&array, count, |i| &self.specs[i], state) && valid;
        if valid && split {
            return state.propose(Value::Array(array));
        }
        valid
    }
}

impl_into_validator!(ArrayValidator, TupleValidator);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{commit_all, Cell};
    use crate::schema::{is_boolean, is_number, is_string};
    use serde_json::json;

    #[test]
    fn test_rejects_non_arrays() {
        assert_eq!(
            is_array(is_string()).errors(&Value::from("a,b")),
            vec![r#".: Expected an array (got "a,b")"#]
        );
    }

    #[test]
    fn test_collects_every_element_error() {
        let errors = is_array(is_string()).errors(&Value::from(json!([1, "a", true])));
        assert_eq!(
            errors,
            vec![
                ".[0]: Expected a string (got 1)",
                ".[2]: Expected a string (got true)",
            ]
        );
    }

    #[test]
    fn test_splits_delimited_strings_under_coercion() {
        let input = Value::from("1,0,true");
        let cell = Cell::new(input.clone());
        let mut coercions = Vec::new();
        let valid = is_array(is_boolean()).delimiter(",").test(
            &input,
            &mut State::new()
                .with_coercions(&mut coercions)
                .with_coercion(cell.slot()),
        );
        assert!(valid);
        assert_eq!(coercions.last().map(|c| c.path.as_str()), Some("."));
        commit_all(&coercions);
        assert_eq!(cell.get().to_json(), json!([true, false, true]));
    }

    #[test]
    fn test_split_is_not_proposed_when_elements_fail() {
        let input = Value::from("1,x");
        let cell = Cell::new(input.clone());
        let mut coercions = Vec::new();
        let valid = is_array(is_number()).delimiter(Regex::new(r"\s*,\s*").unwrap()).test(
            &input,
            &mut State::new()
                .with_coercions(&mut coercions)
                .with_coercion(cell.slot()),
        );
        assert!(!valid);
        assert!(coercions.iter().all(|c| c.path != "."));
    }

    #[test]
    fn test_delimiter_requires_binder_for_any_input() {
        for input in [Value::from("1,0"), Value::from(json!([true]))] {
            let mut errors = Vec::new();
            let mut coercions = Vec::new();
            let valid = is_array(is_boolean()).delimiter(",").test(
                &input,
                &mut State::new()
                    .with_errors(&mut errors)
                    .with_coercions(&mut coercions),
            );
            assert!(!valid);
            assert_eq!(errors, vec![".: Unbound coercion result"]);
            assert!(coercions.is_empty());
        }
    }

    #[test]
    fn test_empty_delimiter_splits_characters() {
        let parts = Delimiter::from("").split("abc");
        assert_eq!(parts, vec![Value::from("a"), Value::from("b"), Value::from("c")]);
    }

    #[test]
    fn test_tuple_visits_only_declared_positions() {
        let validator = is_tuple([is_string().into_validator()]);
        let mut errors = Vec::new();
        validator.test(
            &Value::from(json!([1, 2])),
            &mut State::new().with_errors(&mut errors).with_path(".args"),
        );
        assert_eq!(
            errors,
            vec![
                ".: Expected to have a length of exactly 1 elements (got 2)",
                ".args[0]: Expected a string (got 1)",
            ]
        );
    }
}
