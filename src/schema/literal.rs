//! Literal and enumeration validation.

use crate::state::State;
use crate::value::{printable, printable_list, Set, Value};

use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// Accepts exactly one value, compared with strict equality.
#[derive(Debug, Clone)]
pub struct LiteralValidator {
    expected: Value,
}

/// Accepts only values strictly equal to `expected`.
pub fn is_literal(expected: impl Into<Value>) -> LiteralValidator {
    LiteralValidator {
        expected: expected.into(),
    }
}

impl Predicate for LiteralValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if value.strict_eq(&self.expected) {
            return true;
        }
        state.fail(format_args!(
            "Expected {} (got {})",
            printable(&self.expected),
            printable(value)
        ))
    }
}

/// Accepts members of a fixed set of values.
#[derive(Debug, Clone)]
pub struct EnumValidator {
    listed: Vec<Value>,
    members: Set,
    alphanumeric: bool,
}

impl EnumValidator {
    fn build(listed: Vec<Value>) -> Validator {
        let members = Set::new(listed.iter().cloned());
        if members.len() == 1 {
            let only = members.to_vec().remove(0);
            return is_literal(only).into_validator();
        }
        let alphanumeric = listed
            .iter()
            .all(|v| matches!(v, Value::String(_) | Value::Number(_)));
        EnumValidator {
            listed,
            members,
            alphanumeric,
        }
        .into_validator()
    }
}

impl Predicate for EnumValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if self.members.contains(value) {
            return true;
        }
        if self.alphanumeric {
            state.fail(format_args!(
                "Expected one of {} (got {})",
                printable_list(&self.listed, "or"),
                printable(value)
            ))
        } else {
            state.fail(format_args!(
                "Expected a valid enumeration value (got {})",
                printable(value)
            ))
        }
    }
}

/// Builds an enumeration from a list of allowed values.
///
/// A single distinct value degrades to [`is_literal`].
///
/// # Example
///
/// ```rust
/// use sentinel::{is_enum_values, Predicate, Value};
///
/// let color = is_enum_values(["red", "green", "blue"]);
/// assert!(color.check(&Value::from("green")));
/// assert_eq!(
///     color.errors(&Value::from("pink")),
///     vec![r#".: Expected one of "red", "green", or "blue" (got "pink")"#]
/// );
/// ```
pub fn is_enum_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Validator {
    EnumValidator::build(values.into_iter().map(Into::into).collect())
}

/// Builds an enumeration from a name to value mapping. Only the values
/// define membership.
pub fn is_enum_mapping<K, V>(mapping: impl IntoIterator<Item = (K, V)>) -> Validator
where
    K: Into<String>,
    V: Into<Value>,
{
    EnumValidator::build(mapping.into_iter().map(|(_, v)| v.into()).collect())
}

impl_into_validator!(LiteralValidator, EnumValidator);
