//! Boolean validation.

use crate::state::State;
use crate::value::{printable, Value};

use super::traits::{impl_into_validator, Predicate};

/// Accepts booleans.
///
/// In coercion mode the values `"true"`, `"True"`, `"1"` and `1` coerce to
/// `true`; `"false"`, `"False"`, `"0"` and `0` coerce to `false`. Nothing
/// else does.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

/// Creates a boolean validator.
pub fn is_boolean() -> BooleanValidator {
    BooleanValidator
}

impl Predicate for BooleanValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if let Value::Bool(_) = value {
            return true;
        }

        if state.is_coercing() {
            if !state.is_bound() {
                return state.fail_unbound();
            }
            if let Some(coerced) = coerce_boolean(value) {
                return state.propose(Value::Bool(coerced));
            }
        }

        state.fail(format_args!("Expected a boolean (got {})", printable(value)))
    }
}

impl_into_validator!(BooleanValidator);

fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) => match s.as_ref() {
            "true" | "True" | "1" => Some(true),
            "false" | "False" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) if *n == 1.0 => Some(true),
        Value::Number(n) if *n == 0.0 => Some(false),
        _ => None,
    }
}
