//! Numeric refinements.

use crate::state::State;
use crate::value::{format_number, printable, raw, Value};

use crate::schema::number::is_safe_integer;
use crate::schema::traits::{impl_into_validator, Predicate};

/// A bound applied to a number.
#[derive(Debug, Clone, Copy)]
enum Bound {
    AtLeast(f64),
    AtMost(f64),
    InclusiveRange(f64, f64),
    ExclusiveRange(f64, f64),
    Positive,
    Negative,
}

/// Checks a number against a bound. Never coerces.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_in_inclusive_range, Predicate, Value};
///
/// let percent = is_in_inclusive_range(0.0, 100.0);
/// assert!(percent.check(&Value::from(100)));
/// assert_eq!(
///     percent.errors(&Value::from(101)),
///     vec![".: Expected to be in the [0; 100] range (got 101)"]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NumberBound {
    bound: Bound,
}

/// Requires numbers `>= min`.
pub fn is_at_least(min: f64) -> NumberBound {
    NumberBound {
        bound: Bound::AtLeast(min),
    }
}

/// Requires numbers `<= max`.
pub fn is_at_most(max: f64) -> NumberBound {
    NumberBound {
        bound: Bound::AtMost(max),
    }
}

/// Accepts numbers in `[min; max]`.
pub fn is_in_inclusive_range(min: f64, max: f64) -> NumberBound {
    NumberBound {
        bound: Bound::InclusiveRange(min, max),
    }
}

/// Accepts numbers in `[min; max[`.
pub fn is_in_exclusive_range(min: f64, max: f64) -> NumberBound {
    NumberBound {
        bound: Bound::ExclusiveRange(min, max),
    }
}

/// Accepts numbers greater than or equal to zero.
pub fn is_positive() -> NumberBound {
    NumberBound {
        bound: Bound::Positive,
    }
}

/// Accepts numbers less than or equal to zero.
pub fn is_negative() -> NumberBound {
    NumberBound {
        bound: Bound::Negative,
    }
}

impl Predicate for NumberBound {
    // NaN fails every bound.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let Some(n) = value.as_f64() else {
            return state.fail(format_args!("Expected a number (got {})", printable(value)));
        };
        let got = raw(value);

        match self.bound {
            Bound::AtLeast(min) if !(n >= min) => state.fail(format_args!(
                "Expected to be at least {} (got {})",
                format_number(min),
                got
            )),
            Bound::AtMost(max) if !(n <= max) => state.fail(format_args!(
                "Expected to be at most {} (got {})",
                format_number(max),
                got
            )),
            Bound::InclusiveRange(min, max) if !(n >= min && n <= max) => state.fail(format_args!(
                "Expected to be in the [{}; {}] range (got {})",
                format_number(min),
                format_number(max),
                got
            )),
            Bound::ExclusiveRange(min, max) if !(n >= min && n < max) => state.fail(format_args!(
                "Expected to be in the [{}; {}[ range (got {})",
                format_number(min),
                format_number(max),
                got
            )),
            Bound::Positive if !(n >= 0.0) => {
                state.fail(format_args!("Expected to be positive (got {})", got))
            }
            Bound::Negative if !(n <= 0.0) => {
                state.fail(format_args!("Expected to be negative (got {})", got))
            }
            _ => true,
        }
    }
}

/// Accepts integral numbers, by default only within the safe integer range.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValidator {
    unsafe_allowed: bool,
}

/// Requires integral numbers.
pub fn is_integer() -> IntegerValidator {
    IntegerValidator::default()
}

impl IntegerValidator {
    /// Accepts integers beyond `2^53 - 1` as well.
    pub fn unsafe_allowed(mut self) -> Self {
        self.unsafe_allowed = true;
        self
    }
}

impl Predicate for IntegerValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let Some(n) = value.as_f64() else {
            return state.fail(format_args!("Expected a number (got {})", printable(value)));
        };
        if n.round() != n {
            return state.fail(format_args!(
                "Expected to be an integer (got {})",
                format_number(n)
            ));
        }
        if !self.unsafe_allowed && !is_safe_integer(n) {
            return state.fail(format_args!(
                "Expected to be a safe integer (got {})",
                format_number(n)
            ));
        }
        true
    }
}

impl_into_validator!(NumberBound, IntegerValidator);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(is_at_least(3.0).check(&Value::from(3)));
        assert_eq!(
            is_at_least(3.0).errors(&Value::from(2)),
            vec![".: Expected to be at least 3 (got 2)"]
        );
        assert_eq!(
            is_at_most(3.0).errors(&Value::from(3.5)),
            vec![".: Expected to be at most 3 (got 3.5)"]
        );
        assert!(!is_at_least(0.0).check(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_ranges() {
        assert!(is_in_exclusive_range(0.0, 10.0).check(&Value::from(0)));
        assert_eq!(
            is_in_exclusive_range(0.0, 10.0).errors(&Value::from(10)),
            vec![".: Expected to be in the [0; 10[ range (got 10)"]
        );
        assert!(is_in_inclusive_range(0.0, 10.0).check(&Value::from(10)));
    }

    #[test]
    fn test_sign() {
        assert!(is_positive().check(&Value::from(0)));
        assert!(is_negative().check(&Value::from(0)));
        assert_eq!(
            is_positive().errors(&Value::from(-1)),
            vec![".: Expected to be positive (got -1)"]
        );
        assert_eq!(
            is_negative().errors(&Value::from(1)),
            vec![".: Expected to be negative (got 1)"]
        );
    }

    #[test]
    fn test_integer() {
        assert!(is_integer().check(&Value::from(42)));
        assert_eq!(
            is_integer().errors(&Value::from(1.5)),
            vec![".: Expected to be an integer (got 1.5)"]
        );
        assert_eq!(
            is_integer().errors(&Value::from(1e20)),
            vec![".: Expected to be a safe integer (got 100000000000000000000)"]
        );
        assert!(is_integer().unsafe_allowed().check(&Value::from(1e20)));
    }

    #[test]
    fn test_non_numbers_are_rejected() {
        assert_eq!(
            is_positive().errors(&Value::from("1")),
            vec![r#".: Expected a number (got "1")"#]
        );
    }
}
