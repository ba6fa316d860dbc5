//! Refinements over the set of keys present on an object.

use crate::state::State;
use crate::value::{printable, printable_list, Object, Set, Value};

use crate::schema::traits::{impl_into_validator, Predicate};

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

fn quoted(keys: &[String]) -> Vec<Value> {
    keys.iter().map(Value::string).collect()
}

fn object_of<'v>(value: &'v Value, state: &mut State<'_>) -> Result<&'v Object, bool> {
    value
        .as_object()
        .ok_or_else(|| state.fail(format_args!("Expected an object (got {})", printable(value))))
}

#[derive(Debug, Clone)]
enum KeyRule {
    Required,
    Forbidden,
    MutuallyExclusive,
}

/// Checks which of a list of keys are present on an object.
///
/// # Example
///
/// ```rust
/// use sentinel::{has_required_keys, Predicate, Value};
/// use serde_json::json;
///
/// let validator = has_required_keys(["id", "name"]);
/// assert_eq!(
///     validator.errors(&Value::from(json!({"id": 1}))),
///     vec![r#".: Missing required property "name""#]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct KeysValidator {
    rule: KeyRule,
    keys: Vec<String>,
}

fn keys_validator<K: Into<String>>(rule: KeyRule, keys: impl IntoIterator<Item = K>) -> KeysValidator {
    KeysValidator {
        rule,
        keys: keys.into_iter().map(Into::into).collect(),
    }
}

/// Requires every key in `keys` to be present.
pub fn has_required_keys<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> KeysValidator {
    keys_validator(KeyRule::Required, keys)
}

/// Requires every key in `keys` to be absent.
pub fn has_forbidden_keys<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> KeysValidator {
    keys_validator(KeyRule::Forbidden, keys)
}

/// Accepts objects using at most one of `keys`.
pub fn has_mutually_exclusive_keys<K: Into<String>>(
    keys: impl IntoIterator<Item = K>,
) -> KeysValidator {
    keys_validator(KeyRule::MutuallyExclusive, keys)
}

impl Predicate for KeysValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let object = match object_of(value, state) {
            Ok(object) => object,
            Err(valid) => return valid,
        };

        let (present, absent): (Vec<String>, Vec<String>) = self
            .keys
            .iter()
            .cloned()
            .partition(|key| object.contains_key(key));

        match self.rule {
            KeyRule::Required if !absent.is_empty() => state.fail(format_args!(
                "Missing required {} {}",
                plural(absent.len(), "property", "properties"),
                printable_list(&quoted(&absent), "and")
            )),
            KeyRule::Forbidden if !present.is_empty() => state.fail(format_args!(
                "Forbidden {} {}",
                plural(present.len(), "property", "properties"),
                printable_list(&quoted(&present), "and")
            )),
            KeyRule::MutuallyExclusive if present.len() > 1 => state.fail(format_args!(
                "Mutually exclusive properties {}",
                printable_list(&quoted(&present), "and")
            )),
            _ => true,
        }
    }
}

/// How the presence of a subject key constrains other keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRelationship {
    /// The other keys must be present.
    Requires,
    /// The other keys must be absent.
    Forbids,
}

impl KeyRelationship {
    fn expects_present(self) -> bool {
        matches!(self, KeyRelationship::Requires)
    }

    fn verb(self) -> &'static str {
        match self {
            KeyRelationship::Requires => "requires using",
            KeyRelationship::Forbids => "forbids using",
        }
    }
}

/// When `subject` is present, requires or forbids a set of other keys.
///
/// Keys whose value is one of the ignored values count as absent.
///
/// # Example
///
/// ```rust
/// use sentinel::{has_key_relationship, KeyRelationship, Predicate, Value};
/// use serde_json::json;
///
/// let validator = has_key_relationship("start", KeyRelationship::Requires, ["end"]);
/// assert!(validator.check(&Value::from(json!({"start": 1, "end": 2}))));
/// assert_eq!(
///     validator.errors(&Value::from(json!({"start": 1}))),
///     vec![r#".: Property "start" requires using property "end""#]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct KeyRelationshipValidator {
    subject: String,
    relationship: KeyRelationship,
    others: Vec<String>,
    ignore: Set,
}

/// Ties the presence of `subject` to the keys in `others`.
pub fn has_key_relationship<K: Into<String>>(
    subject: impl Into<String>,
    relationship: KeyRelationship,
    others: impl IntoIterator<Item = K>,
) -> KeyRelationshipValidator {
    KeyRelationshipValidator {
        subject: subject.into(),
        relationship,
        others: others.into_iter().map(Into::into).collect(),
        ignore: Set::default(),
    }
}

impl KeyRelationshipValidator {
    /// Treats keys holding any of `values` as absent.
    pub fn ignore<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.ignore = Set::new(values.into_iter().map(Into::into));
        self
    }

    fn is_used(&self, object: &Object, key: &str) -> bool {
        object
            .get(key)
            .is_some_and(|value| !self.ignore.contains(&value))
    }
}

impl Predicate for KeyRelationshipValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let object = match object_of(value, state) {
            Ok(object) => object,
            Err(valid) => return valid,
        };

        if !self.is_used(object, &self.subject) {
            return true;
        }

        let problems: Vec<String> = self
            .others
            .iter()
            .filter(|other| self.is_used(object, other) != self.relationship.expects_present())
            .cloned()
            .collect();
        if problems.is_empty() {
            return true;
        }

        state.fail(format_args!(
            "Property \"{}\" {} {} {}",
            self.subject,
            self.relationship.verb(),
            plural(problems.len(), "property", "properties"),
            printable_list(&quoted(&problems), "and")
        ))
    }
}

impl_into_validator!(KeysValidator, KeyRelationshipValidator);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_keys() {
        let validator = has_required_keys(["a", "b", "c"]);
        assert!(validator.check(&Value::from(json!({"a": 1, "b": 2, "c": 3, "d": 4}))));
        assert_eq!(
            validator.errors(&Value::from(json!({"b": 2}))),
            vec![r#".: Missing required properties "a" and "c""#]
        );
    }

    #[test]
    fn test_forbidden_keys() {
        assert_eq!(
            has_forbidden_keys(["a", "b"]).errors(&Value::from(json!({"a": 1}))),
            vec![r#".: Forbidden property "a""#]
        );
    }

    #[test]
    fn test_mutually_exclusive_keys() {
        let validator = has_mutually_exclusive_keys(["a", "b", "c"]);
        assert!(validator.check(&Value::from(json!({"a": 1}))));
        assert_eq!(
            validator.errors(&Value::from(json!({"a": 1, "b": 2, "c": 3}))),
            vec![r#".: Mutually exclusive properties "a", "b", and "c""#]
        );
    }

    #[test]
    fn test_forbids_relationship_with_ignored_values() {
        let validator = has_key_relationship("a", KeyRelationship::Forbids, ["b", "c"])
            .ignore([Value::Null]);
        assert!(validator.check(&Value::from(json!({"a": 1, "b": null}))));
        assert!(validator.check(&Value::from(json!({"a": null, "b": 1}))));
        assert_eq!(
            validator.errors(&Value::from(json!({"a": 1, "b": 2, "c": 3}))),
            vec![r#".: Property "a" forbids using properties "b" and "c""#]
        );
    }

    #[test]
    fn test_rejects_non_objects() {
        assert_eq!(
            has_required_keys(["a"]).errors(&Value::from(json!([1]))),
            vec![".: Expected an object (got an array)"]
        );
    }
}
