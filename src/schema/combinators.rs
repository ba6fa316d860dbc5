//! Combinators for composing validators.
//!
//! This module provides:
//! - [`is_one_of`]: the first (or, when exclusive, the only) matching
//!   alternative wins
//! - [`is_optional`]: `Undefined` passes, anything else is delegated
//! - [`is_nullable`]: `Null` passes, anything else is delegated
//! - [`is_unknown`]: everything passes
//!
//! # Example
//!
//! ```rust
//! use sentinel::{is_number, is_one_of, is_string, IntoValidator, Predicate, Value};
//!
//! let id = is_one_of([is_string().into_validator(), is_number().into_validator()]);
//! assert!(id.check(&Value::from("abc")));
//! assert!(id.check(&Value::from(42)));
//! assert_eq!(
//!     id.errors(&Value::from(true)),
//!     vec![
//!         ".#1: Expected a string (got true)",
//!         ".#2: Expected a number (got true)",
//!     ]
//! );
//! ```

use tracing::trace;

use crate::coercion::CoercionEntry;
use crate::state::State;
use crate::value::Value;

use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// A union of alternatives.
///
/// Each alternative runs against its own error and coercion buffers, so a
/// failing alternative leaks nothing. Only the coercions of the accepted
/// alternative reach the parent.
#[derive(Debug, Clone)]
pub struct OneOfValidator {
    specs: Vec<Validator>,
    exclusive: bool,
}

/// Creates a union accepting values that match any of `specs`.
pub fn is_one_of(specs: impl IntoIterator<Item = Validator>) -> OneOfValidator {
    OneOfValidator {
        specs: specs.into_iter().collect(),
        exclusive: false,
    }
}

impl OneOfValidator {
    /// Requires exactly one alternative to match. Every alternative is
    /// evaluated.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

impl Predicate for OneOfValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let collect = state.collects_errors();
        let coercing = state.is_coercing();
        let mut matches: Vec<(usize, Vec<CoercionEntry>)> = Vec::new();
        let mut first_errors: Vec<String> = Vec::new();

        for (index, spec) in self.specs.iter().enumerate() {
            let mut errors = Vec::new();
            let mut coercions = Vec::new();
            let path = (collect || coercing)
                .then(|| format!("{}#{}", state.display_path(), index + 1));

            let matched = spec.test(
                value,
                &mut state.branch(
                    path,
                    collect.then_some(&mut errors),
                    coercing.then_some(&mut coercions),
                ),
            );

            if matched {
                matches.push((index, coercions));
                if !self.exclusive {
                    break;
                }
            } else if let Some(first) = errors.into_iter().next() {
                first_errors.push(first);
            }
        }

        match matches.len() {
            1 => {
                if let Some((index, coercions)) = matches.pop() {
                    trace!(branch = index + 1, "union alternative accepted");
                    state.push_coercions(coercions);
                }
                true
            }
            0 => {
                state.push_errors(first_errors);
                false
            }
            _ => {
                let matched = matches
                    .iter()
                    .map(|(index, _)| format!("#{}", index + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                state.fail(format_args!(
                    "Expected to match exactly a single predicate (matched {})",
                    matched
                ))
            }
        }
    }
}

/// Lets `Undefined` through; delegates anything else.
#[derive(Debug, Clone)]
pub struct OptionalValidator {
    spec: Validator,
}

/// Accepts `undefined`, otherwise defers to `spec`.
pub fn is_optional(spec: impl IntoValidator) -> OptionalValidator {
    OptionalValidator {
        spec: spec.into_validator(),
    }
}

impl Predicate for OptionalValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        value.is_undefined() || self.spec.test(value, state)
    }
}

/// Lets `Null` through; delegates anything else.
#[derive(Debug, Clone)]
pub struct NullableValidator {
    spec: Validator,
}

/// Accepts `null`, otherwise defers to `spec`.
pub fn is_nullable(spec: impl IntoValidator) -> NullableValidator {
    NullableValidator {
        spec: spec.into_validator(),
    }
}

impl Predicate for NullableValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        value.is_null() || self.spec.test(value, state)
    }
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownValidator;

/// Accepts any value.
pub fn is_unknown() -> UnknownValidator {
    UnknownValidator
}

impl Predicate for UnknownValidator {
    fn test(&self, _value: &Value, _state: &mut State<'_>) -> bool {
        true
    }
}

impl_into_validator!(OneOfValidator, OptionalValidator, NullableValidator, UnknownValidator);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{commit_all, Cell};
    use crate::schema::{is_boolean, is_literal, is_number, is_string};

    fn union() -> OneOfValidator {
        is_one_of([is_boolean().into_validator(), is_number().into_validator()])
    }

    #[test]
    fn test_first_match_wins() {
        let input = Value::from("1");
        let cell = Cell::new(input.clone());
        let mut coercions = Vec::new();
        assert!(union().test(
            &input,
            &mut State::new()
                .with_coercions(&mut coercions)
                .with_coercion(cell.slot()),
        ));
        assert_eq!(coercions.len(), 1);
        assert_eq!(coercions[0].path, ".#1");
        commit_all(&coercions);
        assert_eq!(cell.get(), Value::from(true));
    }

    #[test]
    fn test_exclusive_rejects_multiple_matches() {
        let validator = union().exclusive();
        let input = Value::from("1");
        let cell = Cell::new(input.clone());
        let mut errors = Vec::new();
        let mut coercions = Vec::new();
        assert!(!validator.test(
            &input,
            &mut State::new()
                .with_errors(&mut errors)
                .with_coercions(&mut coercions)
                .with_coercion(cell.slot()),
        ));
        assert_eq!(
            errors,
            vec![".: Expected to match exactly a single predicate (matched #1, #2)"]
        );
        assert!(coercions.is_empty());
        assert_eq!(cell.get(), Value::from("1"));
    }

    #[test]
    fn test_exclusive_accepts_single_match() {
        let validator = is_one_of([
            is_literal("a").into_validator(),
            is_literal("b").into_validator(),
        ])
        .exclusive();
        assert!(validator.check(&Value::from("b")));
    }

    #[test]
    fn test_failing_branch_errors_do_not_leak_on_success() {
        let validator = is_one_of([is_string().into_validator(), is_number().into_validator()]);
        assert!(validator.errors(&Value::from(1)).is_empty());
    }

    #[test]
    fn test_optional_and_nullable() {
        assert!(is_optional(is_string()).check(&Value::Undefined));
        assert!(!is_optional(is_string()).check(&Value::Null));
        assert!(is_nullable(is_string()).check(&Value::Null));
        assert_eq!(
            is_nullable(is_string()).errors(&Value::Undefined),
            vec![".: Expected a string (got undefined)"]
        );
        assert!(is_unknown().check(&Value::Undefined));
    }
}
