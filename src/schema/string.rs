//! String validation.

use crate::state::State;
use crate::value::{printable, Value};

use super::traits::{impl_into_validator, Predicate};

/// Accepts strings. Never coerces.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_string, Predicate, Value};
///
/// assert!(is_string().check(&Value::from("hello")));
/// assert_eq!(is_string().errors(&Value::from(42)), vec![".: Expected a string (got 42)"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

/// Creates a string validator.
pub fn is_string() -> StringValidator {
    StringValidator
}

impl Predicate for StringValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        match value {
            Value::String(_) => true,
            _ => state.fail(format_args!("Expected a string (got {})", printable(value))),
        }
    }
}

impl_into_validator!(StringValidator);
