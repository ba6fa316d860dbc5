//! Path rendering for locating values in nested structures.
//!
//! Paths are plain strings computed on demand as a validator descends: the
//! root renders as `.`, identifier keys append `.key`, indices append `[i]`
//! and any other key is JSON-quoted inside brackets.

use crate::value::{raw, Value};

/// A step taken when descending into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey<'a> {
    /// A property access (e.g. `user`, `"first name"`).
    Field(&'a str),
    /// An element access (e.g. `[0]`).
    Index(usize),
}

/// Computes the path of `key` under `parent`.
///
/// # Example
///
/// ```rust
/// use sentinel::path::{compute_key, PathKey};
///
/// assert_eq!(compute_key(None, PathKey::Field("users")), ".users");
/// assert_eq!(compute_key(Some(".users"), PathKey::Index(0)), ".users[0]");
/// assert_eq!(compute_key(None, PathKey::Index(3)), ".[3]");
/// assert_eq!(compute_key(Some(".a"), PathKey::Field("b-c")), ".a[\"b-c\"]");
/// ```
pub fn compute_key(parent: Option<&str>, key: PathKey<'_>) -> String {
    match key {
        PathKey::Index(index) => format!("{}[{}]", parent.unwrap_or("."), index),
        PathKey::Field(name) if is_identifier(name) => {
            format!("{}.{}", parent.unwrap_or(""), name)
        }
        PathKey::Field(name) => format!(
            "{}[{}]",
            parent.unwrap_or("."),
            serde_json::Value::String(name.to_string())
        ),
    }
}

/// Computes the path of an arbitrary map key under `parent`.
///
/// Non-negative integers render as indices, anything else as a field named
/// after the key's raw rendering.
pub fn compute_value_key(parent: Option<&str>, key: &Value) -> String {
    match key {
        Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= usize::MAX as f64 => {
            compute_key(parent, PathKey::Index(*n as usize))
        }
        Value::String(s) => compute_key(parent, PathKey::Field(s.as_ref())),
        other => compute_key(parent, PathKey::Field(&raw(other).to_string())),
    }
}

/// Returns true for keys matching `^[A-Za-z_][A-Za-z0-9_]*$`.
fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_field() {
        assert_eq!(compute_key(None, PathKey::Field("user")), ".user");
    }

    #[test]
    fn test_root_index() {
        assert_eq!(compute_key(None, PathKey::Index(0)), ".[0]");
    }

    #[test]
    fn test_nested_fields() {
        let user = compute_key(None, PathKey::Field("user"));
        assert_eq!(compute_key(Some(user.as_str()), PathKey::Field("email")), ".user.email");
    }

    #[test]
    fn test_field_with_index() {
        let users = compute_key(None, PathKey::Field("users"));
        let first = compute_key(Some(users.as_str()), PathKey::Index(0));
        assert_eq!(first, ".users[0]");
        assert_eq!(compute_key(Some(first.as_str()), PathKey::Field("email")), ".users[0].email");
    }

    #[test]
    fn test_special_keys_are_quoted() {
        assert_eq!(compute_key(None, PathKey::Field("first name")), r#".["first name"]"#);
        assert_eq!(compute_key(None, PathKey::Field("1abc")), r#".["1abc"]"#);
        assert_eq!(compute_key(None, PathKey::Field("")), r#".[""]"#);
        assert_eq!(compute_key(Some(".a"), PathKey::Field("x\"y")), r#".a["x\"y"]"#);
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("_private"));
        assert!(is_identifier("camelCase2"));
        assert!(!is_identifier("kebab-case"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("héllo"));
    }

    #[test]
    fn test_value_keys() {
        assert_eq!(compute_value_key(None, &Value::from(2)), ".[2]");
        assert_eq!(compute_value_key(None, &Value::from("id")), ".id");
        assert_eq!(compute_value_key(None, &Value::from(1.5)), r#".["1.5"]"#);
        assert_eq!(compute_value_key(None, &Value::from(true)), ".true");
    }
}
