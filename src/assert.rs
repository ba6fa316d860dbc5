//! Entry helpers.
//!
//! Validators only ever answer `true` or `false`. The helpers in this module
//! turn that answer into a `Result` or a [`Validation`], commit coercions
//! once a whole tree has validated, and wrap functions so that their
//! arguments are checked before every call.

use stillwater::Validation;
use tracing::debug;

use crate::coercion::{commit_all, Cell};
use crate::error::TypeAssertionError;
use crate::schema::{is_tuple, Predicate, TupleValidator, Validator};
use crate::state::State;
use crate::value::Value;

/// Options for [`as_type`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsOptions {
    /// Lets validators coerce the value; coercions are committed on success.
    pub coerce: bool,
    /// Collects error messages on failure.
    pub errors: bool,
}

/// Why [`as_type`] rejected a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The value is invalid; no detail was requested.
    Invalid,
    /// The value is invalid, with every collected message.
    Errors(Vec<String>),
}

impl From<Rejection> for TypeAssertionError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Invalid => TypeAssertionError::mismatch(),
            Rejection::Errors(errors) => TypeAssertionError::with_errors(errors),
        }
    }
}

/// Validates `value`, optionally coercing it.
///
/// In coercion mode the value is validated against a root slot and every
/// recorded coercion is committed only if validation succeeds; the success
/// value is then the coerced value. On failure nothing is committed and the
/// input is left untouched.
///
/// # Example
///
/// ```rust
/// use sentinel::{as_type, is_object, is_boolean, AsOptions, Rejection, Value};
/// use serde_json::json;
///
/// let validator = is_object().field("enabled", is_boolean());
/// let input = Value::from(json!({"enabled": "true"}));
///
/// let plain = as_type(&input, &validator, AsOptions::default()).into_result();
/// assert_eq!(plain, Err(Rejection::Invalid));
///
/// let options = AsOptions { coerce: true, ..AsOptions::default() };
/// let value = as_type(&input, &validator, options).into_result().unwrap();
/// assert_eq!(value.to_json(), json!({"enabled": true}));
/// ```
pub fn as_type(
    value: &Value,
    validator: &impl Predicate,
    options: AsOptions,
) -> Validation<Value, Rejection> {
    let mut errors = Vec::new();
    let mut coercions = Vec::new();
    let root = Cell::new(value.clone());

    let valid = {
        let mut state = State::new();
        if options.errors {
            state = state.with_errors(&mut errors);
        }
        if options.coerce {
            state = state.with_coercions(&mut coercions).with_coercion(root.slot());
        }
        validator.test(value, &mut state)
    };

    if !valid {
        debug!(errors = errors.len(), "value rejected");
        return Validation::Failure(if options.errors {
            Rejection::Errors(errors)
        } else {
            Rejection::Invalid
        });
    }

    if !options.coerce {
        return Validation::Success(value.clone());
    }
    if !coercions.is_empty() {
        debug!(count = coercions.len(), "committing coercions");
        commit_all(&coercions);
    }
    Validation::Success(root.get())
}

/// Like [`as_type`], but returns the rejection as a [`TypeAssertionError`].
pub fn try_as_type(
    value: &Value,
    validator: &impl Predicate,
    options: AsOptions,
) -> Result<Value, TypeAssertionError> {
    as_type(value, validator, options)
        .into_result()
        .map_err(TypeAssertionError::from)
}

/// Fails with a detail-less [`TypeAssertionError`] if `value` is invalid.
///
/// # Example
///
/// ```rust
/// use sentinel::{assert_type, is_string, Value};
///
/// assert!(assert_type(&Value::from("ok"), &is_string()).is_ok());
/// let error = assert_type(&Value::from(1), &is_string()).unwrap_err();
/// assert_eq!(error.to_string(), "Type mismatch");
/// ```
pub fn assert_type(value: &Value, validator: &impl Predicate) -> Result<(), TypeAssertionError> {
    if validator.check(value) {
        Ok(())
    } else {
        debug!("assertion failed");
        Err(TypeAssertionError::mismatch())
    }
}

/// Fails with a [`TypeAssertionError`] itemizing every error if `value` is
/// invalid.
///
/// # Example
///
/// ```rust
/// use sentinel::{assert_with_errors, is_string, Value};
///
/// let error = assert_with_errors(&Value::from(1), &is_string()).unwrap_err();
/// assert_eq!(error.to_string(), "Type mismatch\n\n- .: Expected a string (got 1)");
/// ```
pub fn assert_with_errors(
    value: &Value,
    validator: &impl Predicate,
) -> Result<(), TypeAssertionError> {
    let mut errors = Vec::new();
    if validator.test(value, &mut State::new().with_errors(&mut errors)) {
        return Ok(());
    }
    debug!(errors = errors.len(), "assertion failed");
    Err(TypeAssertionError::with_errors(errors))
}

/// Returns whether `value` is valid.
pub fn soft_assert(value: &Value, validator: &impl Predicate) -> bool {
    validator.check(value)
}

/// Wraps `f` so that its argument list is checked before every call.
///
/// The arguments are validated as a tuple, one validator per position, so a
/// call with the wrong number of arguments is rejected as well.
///
/// # Example
///
/// ```rust
/// use sentinel::{checked_fn, is_number, IntoValidator, Value};
///
/// let add = checked_fn([is_number().into_validator(), is_number().into_validator()], |args| {
///     args.iter().filter_map(Value::as_f64).sum::<f64>()
/// });
///
/// assert_eq!(add(&[Value::from(1), Value::from(2)]).unwrap(), 3.0);
/// assert!(add(&[Value::from(1), Value::from("2")]).is_err());
/// assert!(add(&[Value::from(1)]).is_err());
/// ```
pub fn checked_fn<F, R>(
    validators: impl IntoIterator<Item = Validator>,
    f: F,
) -> impl Fn(&[Value]) -> Result<R, TypeAssertionError>
where
    F: Fn(&[Value]) -> R,
{
    let arguments: TupleValidator = is_tuple(validators);
    move |args: &[Value]| {
        if !arguments.check(&Value::array(args.iter().cloned())) {
            debug!(arity = args.len(), "arguments rejected");
            return Err(TypeAssertionError::mismatch());
        }
        Ok(f(args))
    }
}
