//! Number validation.
//!
//! This module provides [`NumberValidator`]. In coercion mode it converts
//! strings written in JSON number grammar, provided the conversion is exact:
//! re-rendering the parsed number must reproduce the input character for
//! character, so `"1.5"` coerces while `"1e3"`, `"01"` and integers beyond
//! double precision are rejected.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::State;
use crate::value::{format_number, printable, Value};

use super::traits::{impl_into_validator, Predicate};

/// Largest integer a double represents exactly, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

static JSON_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?$").expect("json number regex")
});

/// Accepts numbers; coerces exact numeric strings.
///
/// # Example
///
/// ```rust
/// use sentinel::{as_type, is_number, AsOptions, Value};
///
/// let options = AsOptions { coerce: true, ..AsOptions::default() };
/// let result = as_type(&Value::from("42"), &is_number(), options);
/// assert_eq!(result.into_result().unwrap(), Value::from(42));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidator;

/// Creates a number validator.
pub fn is_number() -> NumberValidator {
    NumberValidator
}

impl Predicate for NumberValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if let Value::Number(_) = value {
            return true;
        }

        if state.is_coercing() {
            if !state.is_bound() {
                return state.fail_unbound();
            }
            if let Value::String(text) = value {
                if let Some(n) = parse_json_number(text) {
                    if format_number(n) == **text {
                        return state.propose(Value::Number(n));
                    }
                    return state.fail(format_args!(
                        "Received a number that can't be safely represented by the runtime ({})",
                        text
                    ));
                }
            }
        }

        state.fail(format_args!("Expected a number (got {})", printable(value)))
    }
}

impl_into_validator!(NumberValidator);

/// Parses `text` with JSON number grammar, surrounding JSON whitespace
/// allowed. Magnitudes beyond `f64` parse to an infinity.
pub(crate) fn parse_json_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'));
    if !JSON_NUMBER.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Returns true for integers a double represents exactly.
pub(crate) fn is_safe_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{Cell, CoercionEntry};

    fn coerce(input: Value) -> (bool, Vec<String>, Vec<CoercionEntry>, Cell) {
        let cell = Cell::new(input.clone());
        let mut errors = Vec::new();
        let mut coercions = Vec::new();
        let valid = is_number().test(
            &input,
            &mut State::new()
                .with_errors(&mut errors)
                .with_coercions(&mut coercions)
                .with_coercion(cell.slot()),
        );
        (valid, errors, coercions, cell)
    }

    #[test]
    fn test_accepts_numbers() {
        assert!(is_number().check(&Value::from(42)));
        assert!(is_number().check(&Value::from(-1.5)));
        assert!(is_number().check(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_rejects_strings_without_coercion() {
        assert_eq!(
            is_number().errors(&Value::from("42")),
            vec![r#".: Expected a number (got "42")"#]
        );
    }

    #[test]
    fn test_coerces_exact_strings() {
        for (text, expected) in [("42", 42.0), ("-7", -7.0), ("1.5", 1.5), ("0", 0.0)] {
            let (valid, errors, coercions, cell) = coerce(Value::from(text));
            assert!(valid, "{} should coerce: {:?}", text, errors);
            assert_eq!(coercions.len(), 1);
            assert_eq!(cell.get(), Value::from(text));
            coercions[0].apply();
            assert_eq!(cell.get(), Value::Number(expected));
        }
    }

    #[test]
    fn test_rejects_lossy_strings() {
        let (valid, errors, coercions, cell) =
            coerce(Value::from("123456789123456789123456789123456789123456789"));
        assert!(!valid);
        assert!(coercions.is_empty());
        assert_eq!(
            errors,
            vec![".: Received a number that can't be safely represented by the runtime (123456789123456789123456789123456789123456789)"]
        );
        assert_eq!(
            cell.get(),
            Value::from("123456789123456789123456789123456789123456789")
        );
    }

    #[test]
    fn test_rejects_out_of_range_strings() {
        for text in ["1e400", "-1e400"] {
            let (valid, errors, coercions, cell) = coerce(Value::from(text));
            assert!(!valid);
            assert!(coercions.is_empty());
            assert_eq!(
                errors,
                vec![format!(
                    ".: Received a number that can't be safely represented by the runtime ({})",
                    text
                )]
            );
            assert_eq!(cell.get(), Value::from(text));
        }
    }

    #[test]
    fn test_parse_json_number_grammar() {
        assert_eq!(parse_json_number("42"), Some(42.0));
        assert_eq!(parse_json_number(" 1.5\n"), Some(1.5));
        assert_eq!(parse_json_number("1e400"), Some(f64::INFINITY));
        assert_eq!(parse_json_number("01"), None);
        assert_eq!(parse_json_number("+1"), None);
        assert_eq!(parse_json_number(".5"), None);
        assert_eq!(parse_json_number("inf"), None);
        assert_eq!(parse_json_number(""), None);
    }

    #[test]
    fn test_rejects_non_canonical_spellings() {
        for text in ["1e3", "1.0", "-0"] {
            let (valid, _, coercions, _) = coerce(Value::from(text));
            assert!(!valid, "{} should not coerce", text);
            assert!(coercions.is_empty());
        }
    }

    #[test]
    fn test_rejects_non_numeric_strings() {
        let (valid, errors, _, _) = coerce(Value::from("abc"));
        assert!(!valid);
        assert_eq!(errors, vec![r#".: Expected a number (got "abc")"#]);
    }

    #[test]
    fn test_unbound_coercion() {
        let mut errors = Vec::new();
        let mut coercions = Vec::new();
        let valid = is_number().test(
            &Value::from("1"),
            &mut State::new()
                .with_errors(&mut errors)
                .with_coercions(&mut coercions),
        );
        assert!(!valid);
        assert_eq!(errors, vec![".: Unbound coercion result"]);
    }

    #[test]
    fn test_safe_integer() {
        assert!(is_safe_integer(MAX_SAFE_INTEGER));
        assert!(!is_safe_integer(MAX_SAFE_INTEGER + 1.0));
        assert!(!is_safe_integer(1.5));
        assert!(!is_safe_integer(f64::INFINITY));
    }
}
