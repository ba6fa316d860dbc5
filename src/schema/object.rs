//! Object validation.
//!
//! This module provides [`ObjectValidator`] for validating objects with
//! declared properties. Undeclared properties are rejected unless an `extra`
//! validator is configured, in which case they are gathered into a bag and
//! validated together once every declared property has been checked.

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::coercion::{CoercionEntry, Slot};
use crate::path::PathKey;
use crate::state::State;
use crate::value::{printable, Object, Value};

use super::combinators::{is_optional, is_unknown};
use super::record::{is_record, is_unsafe_key};
use super::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

/// A validator for objects with declared properties.
///
/// Declared properties are visited first, in declaration order, followed by
/// the remaining keys of the input. A declared property missing from the
/// input is validated as `Undefined`.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_number, is_object, is_string, Predicate, Value};
/// use serde_json::json;
///
/// let validator = is_object()
///     .field("name", is_string())
///     .optional("age", is_number());
///
/// assert!(validator.check(&Value::from(json!({"name": "Alice"}))));
/// assert_eq!(
///     validator.errors(&Value::from(json!({"name": "Alice", "admin": true}))),
///     vec![".admin: Extraneous property (got true)"]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectValidator {
    fields: IndexMap<String, Validator>,
    extra: Option<Validator>,
}

/// Creates an object validator with no declared fields.
pub fn is_object() -> ObjectValidator {
    ObjectValidator::default()
}

/// An object validator accepting any undeclared property.
pub fn is_partial() -> ObjectValidator {
    is_object().extra(is_record(is_unknown()))
}

impl ObjectValidator {
    /// Declares a property.
    pub fn field(mut self, name: impl Into<String>, spec: impl IntoValidator) -> Self {
        self.fields.insert(name.into(), spec.into_validator());
        self
    }

    /// Declares a property that may be absent.
    pub fn optional(self, name: impl Into<String>, spec: impl IntoValidator) -> Self {
        self.field(name, is_optional(spec))
    }

    /// Validates undeclared properties, gathered into one object, with
    /// `spec`.
    ///
    /// Coercions `spec` proposes for the gathered properties write back to
    /// the validated object.
    pub fn extra(mut self, spec: impl IntoValidator) -> Self {
        self.extra = Some(spec.into_validator());
        self
    }

    fn test_extra(&self, spec: &Validator, object: &Object, bag: Object, state: &mut State<'_>) -> bool {
        let bag_value = Value::Object(bag.clone());
        if !state.is_coercing() {
            return spec.test(&bag_value, &mut state.derive());
        }

        let mut staged: Vec<CoercionEntry> = Vec::new();
        let binder = state.binder().cloned();
        let valid = spec.test(&bag_value, &mut state.stage(binder, &mut staged));
        if !staged.is_empty() {
            trace!(count = staged.len(), "redirecting extra property coercions");
        }
        state.push_coercions(staged.into_iter().map(|entry| entry.retarget(&bag, object)));
        valid
    }
}

impl Predicate for ObjectValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let Value::Object(object) = value else {
            return state.fail(format_args!("Expected an object (got {})", printable(value)));
        };

        let mut keys: IndexSet<String> = self.fields.keys().cloned().collect();
        keys.extend(object.keys());

        let bag = Object::new();
        let mut valid = true;
        for key in &keys {
            if is_unsafe_key(key) {
                valid = state
                    .descend(PathKey::Field(key), None)
                    .fail(format_args!("Unsafe property name"));
            } else {
                let item = object.get(key).unwrap_or_default();
                match (self.fields.get(key), &self.extra) {
                    (Some(spec), _) => {
                        let binder = state.is_coercing().then(|| Slot::property(object, key.as_str()));
                        valid = spec.test(&item, &mut state.descend(PathKey::Field(key), binder))
                            && valid;
                    }
                    (None, None) => {
                        valid = state
                            .descend(PathKey::Field(key), None)
                            .fail(format_args!("Extraneous property (got {})", printable(&item)));
                    }
                    (None, Some(_)) => {
                        bag.insert(key.clone(), item);
                    }
                }
            }
            if state.should_stop(valid) {
                break;
            }
        }

        if let Some(extra) = &self.extra {
            if valid || state.collects_errors() {
                valid = self.test_extra(extra, object, bag, state) && valid;
            }
        }
        valid
    }
}

impl_into_validator!(ObjectValidator);
