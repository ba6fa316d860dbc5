//! String format refinements.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::State;
use crate::value::{printable, raw, Value};

use crate::schema::date::parse_iso8601;
use crate::schema::traits::{impl_into_validator, IntoValidator, Predicate, Validator};

static UUID4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-f0-9]{8}-[a-f0-9]{4}-4[a-f0-9]{3}-[89ab][a-f0-9]{3}-[a-f0-9]{12}$")
        .expect("uuid4 regex")
});
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#[0-9a-f]{6}$").expect("hex color regex"));
static HEX_COLOR_ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#[0-9a-f]{6}(?:[0-9a-f]{2})?$").expect("hex color regex"));
static BASE64: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("base64 regex")
});

#[derive(Debug, Clone)]
enum Format {
    Pattern(Regex),
    LowerCase,
    UpperCase,
    Uuid4,
    Iso8601,
    HexColor { alpha: bool },
    Base64,
}

impl Format {
    fn accepts(&self, text: &str) -> bool {
        match self {
            Format::Pattern(regex) => regex.is_match(text),
            Format::LowerCase => text.chars().all(|c| c.to_lowercase().eq([c])),
            Format::UpperCase => text.chars().all(|c| c.to_uppercase().eq([c])),
            Format::Uuid4 => UUID4.is_match(text),
            Format::Iso8601 => parse_iso8601(text).is_some(),
            Format::HexColor { alpha: false } => HEX_COLOR.is_match(text),
            Format::HexColor { alpha: true } => HEX_COLOR_ALPHA.is_match(text),
            Format::Base64 => BASE64.is_match(text),
        }
    }

    fn reject(&self, value: &Value, state: &mut State<'_>) -> bool {
        let got = printable(value);
        match self {
            Format::Pattern(regex) => state.fail(format_args!(
                "Expected to match the pattern /{}/ (got {})",
                regex.as_str(),
                got
            )),
            Format::LowerCase => {
                state.fail(format_args!("Expected to be all-lowercase (got {})", raw(value)))
            }
            Format::UpperCase => {
                state.fail(format_args!("Expected to be all-uppercase (got {})", raw(value)))
            }
            Format::Uuid4 => {
                state.fail(format_args!("Expected to be a valid UUID v4 (got {})", got))
            }
            Format::Iso8601 => state.fail(format_args!(
                "Expected to be a valid ISO 8601 date string (got {})",
                got
            )),
            Format::HexColor { .. } => state.fail(format_args!(
                "Expected to be a valid hexadecimal color string (got {})",
                got
            )),
            Format::Base64 => state.fail(format_args!(
                "Expected to be a valid base 64 string (got {})",
                got
            )),
        }
    }
}

/// Checks the format of a string. Never coerces.
///
/// # Example
///
/// ```rust
/// use sentinel::{is_uuid4, Predicate, Value};
///
/// assert!(is_uuid4().check(&Value::from("f47ac10b-58cc-4372-a567-0e02b2c3d479")));
/// assert_eq!(
///     is_uuid4().errors(&Value::from("nope")),
///     vec![r#".: Expected to be a valid UUID v4 (got "nope")"#]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StringFormat {
    format: Format,
}

impl StringFormat {
    /// Also accepts the eight-digit `#rrggbbaa` form. Only meaningful on
    /// [`is_hex_color`].
    pub fn alpha(mut self) -> Self {
        if let Format::HexColor { alpha } = &mut self.format {
            *alpha = true;
        }
        self
    }
}

/// Requires strings matching `regex`.
pub fn matches_regex(regex: Regex) -> StringFormat {
    StringFormat {
        format: Format::Pattern(regex),
    }
}

/// Requires strings without upper-case characters.
pub fn is_lower_case() -> StringFormat {
    StringFormat {
        format: Format::LowerCase,
    }
}

/// Requires strings without lower-case characters.
pub fn is_upper_case() -> StringFormat {
    StringFormat {
        format: Format::UpperCase,
    }
}

/// Requires version 4 UUID strings.
pub fn is_uuid4() -> StringFormat {
    StringFormat {
        format: Format::Uuid4,
    }
}

/// Accepts ISO 8601 date-times denoting a real calendar date.
pub fn is_iso8601() -> StringFormat {
    StringFormat {
        format: Format::Iso8601,
    }
}

/// Accepts `#rrggbb` colors; see [`StringFormat::alpha`].
pub fn is_hex_color() -> StringFormat {
    StringFormat {
        format: Format::HexColor { alpha: false },
    }
}

/// Requires base 64 strings.
pub fn is_base64() -> StringFormat {
    StringFormat {
        format: Format::Base64,
    }
}

impl Predicate for StringFormat {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        match value {
            Value::String(text) if self.format.accepts(text) => true,
            Value::String(_) => self.format.reject(value, state),
            _ => state.fail(format_args!("Expected a string (got {})", printable(value))),
        }
    }
}

/// Parses a JSON string and validates the decoded value against `spec`.
///
/// The decoded value is a fresh structure, so `spec` runs without coercion.
#[derive(Debug, Clone)]
pub struct JsonValidator {
    spec: Validator,
}

/// Requires JSON strings whose decoded value passes `spec`.
pub fn is_json(spec: impl IntoValidator) -> JsonValidator {
    JsonValidator {
        spec: spec.into_validator(),
    }
}

impl Predicate for JsonValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        let decoded = value
            .as_str()
            .and_then(|text| serde_json::from_str::<serde_json::Value>(text).ok());
        match decoded {
            Some(json) => self.spec.test(&Value::from(json), &mut state.readonly()),
            None => state.fail(format_args!(
                "Expected to be a valid JSON string (got {})",
                printable(value)
            )),
        }
    }
}

impl_into_validator!(StringFormat, JsonValidator);
