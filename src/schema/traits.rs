//! The validator contract.
//!
//! This module provides the [`Predicate`] trait implemented by every validator
//! and the type-erased, cheaply cloneable [`Validator`] that composites store.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use stillwater::Validation;

use crate::state::State;
use crate::value::Value;

/// A check over an untyped value.
///
/// `test` returns `true` when the value conforms. On failure it may push
/// path-qualified messages into the state's error sink; in coercion mode it
/// may propose coercions instead of failing. Implementations never panic and
/// never mutate the value directly.
///
/// The `Send + Sync` bounds let a composed validator be shared across threads
/// and reused by any number of concurrent validations.
pub trait Predicate: Send + Sync {
    /// Tests `value`, reporting through `state`.
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool;

    /// Tests `value` in fast-fail mode.
    fn check(&self, value: &Value) -> bool {
        self.test(value, &mut State::new())
    }

    /// Tests `value` and returns every collected error message.
    fn errors(&self, value: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        self.test(value, &mut State::new().with_errors(&mut errors));
        errors
    }
}

/// A type-erased validator.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_number, is_string, IntoValidator, Predicate, Validator, Value};
///
/// let validators: Vec<Validator> = vec![
///     is_string().into_validator(),
///     is_number().into_validator(),
/// ];
/// assert!(validators[1].check(&Value::from(42)));
/// ```
#[derive(Clone)]
pub struct Validator(Arc<dyn Predicate>);

impl Validator {
    /// Wraps `predicate` in a shareable validator.
    pub fn new<P: Predicate + 'static>(predicate: P) -> Self {
        Self(Arc::new(predicate))
    }

    /// Wraps a closure as a validator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sentinel::{Validator, Value, Predicate};
    ///
    /// let is_even = Validator::from_fn(|value, state| match value.as_f64() {
    ///     Some(n) if n % 2.0 == 0.0 => true,
    ///     _ => state.fail(format_args!("Expected an even number")),
    /// });
    /// assert!(is_even.check(&Value::from(4)));
    /// assert_eq!(is_even.errors(&Value::from(3)), vec![".: Expected an even number"]);
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value, &mut State<'_>) -> bool + Send + Sync + 'static,
    {
        Self::new(FnPredicate(f))
    }

    /// Validates `value`, returning it on success and the collected errors
    /// on failure.
    pub fn validate(&self, value: &Value) -> Validation<Value, Vec<String>> {
        let mut errors = Vec::new();
        if self.test(value, &mut State::new().with_errors(&mut errors)) {
            Validation::Success(value.clone())
        } else {
            Validation::Failure(errors)
        }
    }

    /// Checks many independent values in parallel with one validator.
    pub fn check_batch(&self, values: &[Value]) -> Vec<bool> {
        values.par_iter().map(|value| self.check(value)).collect()
    }
}

impl Predicate for Validator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        self.0.test(value, state)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

struct FnPredicate<F>(F);

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Value, &mut State<'_>) -> bool + Send + Sync,
{
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        (self.0)(value, state)
    }
}

/// Conversion into a type-erased [`Validator`].
///
/// Composite factories accept `impl IntoValidator`, so concrete validators
/// and already-erased ones can be mixed freely.
pub trait IntoValidator {
    fn into_validator(self) -> Validator;
}

impl IntoValidator for Validator {
    fn into_validator(self) -> Validator {
        self
    }
}

/// Implements [`IntoValidator`] for concrete predicate types.
macro_rules! impl_into_validator {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::schema::IntoValidator for $ty {
                fn into_validator(self) -> $crate::schema::Validator {
                    $crate::schema::Validator::new(self)
                }
            }
        )*
    };
}

pub(crate) use impl_into_validator;
