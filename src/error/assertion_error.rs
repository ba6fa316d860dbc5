//! Assertion error type.

use thiserror::Error;

/// A value did not match the validator it was asserted against.
///
/// The message is `Type mismatch`, followed by one `- <error>` line per
/// collected error when detail was requested.
///
/// # Example
///
/// ```rust
/// use sentinel::TypeAssertionError;
///
/// let error = TypeAssertionError::with_errors(vec![".: Expected a string (got 42)".to_string()]);
/// assert_eq!(error.to_string(), "Type mismatch\n\n- .: Expected a string (got 42)");
///
/// assert_eq!(TypeAssertionError::mismatch().to_string(), "Type mismatch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_message(.errors))]
pub struct TypeAssertionError {
    /// The collected errors, empty when no detail was requested.
    pub errors: Vec<String>,
}

impl TypeAssertionError {
    /// Creates an error without detail.
    pub fn mismatch() -> Self {
        Self { errors: Vec::new() }
    }

    /// Creates an error itemizing `errors`.
    pub fn with_errors(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

fn render_message(errors: &[String]) -> String {
    let mut message = String::from("Type mismatch");
    if !errors.is_empty() {
        message.push('\n');
        for error in errors {
            message.push_str("\n- ");
            message.push_str(error);
        }
    }
    message
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<TypeAssertionError>();
    assert_sync::<TypeAssertionError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_has_no_detail() {
        let error = TypeAssertionError::mismatch();
        assert!(error.errors.is_empty());
        assert_eq!(error.to_string(), "Type mismatch");
    }

    #[test]
    fn test_errors_are_itemized_one_per_line() {
        let error = TypeAssertionError::with_errors(vec![
            ".a: Expected a string (got 1)".to_string(),
            ".b: Expected a number (got \"x\")".to_string(),
        ]);
        let display = error.to_string();
        let lines: Vec<_> = display.lines().collect();
        assert_eq!(lines[0], "Type mismatch");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "- .a: Expected a string (got 1)");
        assert_eq!(lines[3], "- .b: Expected a number (got \"x\")");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&TypeAssertionError::mismatch());
    }
}
