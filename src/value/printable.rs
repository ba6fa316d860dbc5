//! Human-readable renderings of values for error messages.

use std::fmt::{self, Display, Write};

use super::{iso_string, Value};

/// Renders a value the way error messages quote it.
///
/// `null`, `undefined`, `an empty string`, `<Symbol(desc)>` and `an array`
/// are spelled out; everything else is serialized as JSON with JavaScript
/// number formatting.
///
/// # Example
///
/// ```rust
/// use sentinel::{printable, Value};
///
/// assert_eq!(printable(&Value::from(42)).to_string(), "42");
/// assert_eq!(printable(&Value::from("")).to_string(), "an empty string");
/// assert_eq!(printable(&Value::from("foo")).to_string(), "\"foo\"");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Printable<'a>(pub &'a Value);

/// Renders `value` for error messages.
pub fn printable(value: &Value) -> Printable<'_> {
    Printable(value)
}

impl Display for Printable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::String(s) if s.is_empty() => f.write_str("an empty string"),
            Value::Symbol(symbol) => write!(f, "<{}>", symbol),
            Value::Array(_) => f.write_str("an array"),
            other => write_json(f, other),
        }
    }
}

/// Renders a value the way string interpolation would: strings unquoted,
/// numbers in JavaScript notation, anything else as [`Printable`].
#[derive(Debug, Clone, Copy)]
pub struct Raw<'a>(pub &'a Value);

/// Renders `value` without quoting strings.
pub fn raw(value: &Value) -> Raw<'_> {
    Raw(value)
}

impl Display for Raw<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{}", b),
            other => Printable(other).fmt(f),
        }
    }
}

/// Joins printable renderings: `a`, `a or b`, `a, b, or c`.
pub fn printable_list(values: &[Value], conjunction: &str) -> String {
    match values {
        [] => "nothing".to_string(),
        [single] => Printable(single).to_string(),
        [rest @ .., last] => {
            let head = rest
                .iter()
                .map(|v| Printable(v).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let separator = if values.len() > 2 {
                format!(", {} ", conjunction)
            } else {
                format!(" {} ", conjunction)
            };
            format!("{}{}{}", head, separator, Printable(last))
        }
    }
}

fn write_json(f: &mut impl Write, value: &Value) -> fmt::Result {
    match value {
        Value::Undefined | Value::Null | Value::Symbol(_) => f.write_str("null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) if n.is_finite() => f.write_str(&format_number(*n)),
        Value::Number(_) => f.write_str("null"),
        Value::String(s) => write_json_string(f, s),
        Value::Date(d) => write_json_string(f, &iso_string(d)),
        Value::Set(_) | Value::Map(_) => f.write_str("{}"),
        Value::Array(items) => {
            f.write_char('[')?;
            for (i, item) in items.to_vec().iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write_json(f, item)?;
            }
            f.write_char(']')
        }
        Value::Object(object) => {
            f.write_char('{')?;
            let mut first = true;
            for (key, item) in object.entries() {
                if matches!(item, Value::Undefined | Value::Symbol(_)) {
                    continue;
                }
                if !first {
                    f.write_char(',')?;
                }
                first = false;
                write_json_string(f, &key)?;
                f.write_char(':')?;
                write_json(f, &item)?;
            }
            f.write_char('}')
        }
    }
}

fn write_json_string(f: &mut impl Write, s: &str) -> fmt::Result {
    write!(f, "{}", serde_json::Value::String(s.to_string()))
}

/// Formats a number the way `Number.prototype.toString` does.
///
/// ```rust
/// use sentinel::format_number;
///
/// assert_eq!(format_number(42.0), "42");
/// assert_eq!(format_number(0.1), "0.1");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(1.5e-7), "1.5e-7");
/// ```
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. "1.2345e3".
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let e = point - 1;
        let e_sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, e_sign, e.abs())
        }
    };

    format!("{}{}", sign, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Map, Set, Symbol};
    use serde_json::json;

    #[test]
    fn test_printable_special_cases() {
        assert_eq!(printable(&Value::Null).to_string(), "null");
        assert_eq!(printable(&Value::Undefined).to_string(), "undefined");
        assert_eq!(printable(&Value::from("")).to_string(), "an empty string");
        assert_eq!(printable(&Value::from(json!([1]))).to_string(), "an array");
        let symbol = Value::Symbol(Symbol::new("tag"));
        assert_eq!(printable(&symbol).to_string(), "<Symbol(tag)>");
    }

    #[test]
    fn test_printable_json() {
        assert_eq!(printable(&Value::from("test")).to_string(), "\"test\"");
        assert_eq!(printable(&Value::from(true)).to_string(), "true");
        assert_eq!(
            printable(&Value::from(json!({"a": [1, "b"]}))).to_string(),
            r#"{"a":[1,"b"]}"#
        );
        assert_eq!(printable(&Value::Set(Set::default())).to_string(), "{}");
        assert_eq!(printable(&Value::Map(Map::default())).to_string(), "{}");
        assert_eq!(printable(&Value::Number(f64::NAN)).to_string(), "null");
    }

    #[test]
    fn test_raw_leaves_strings_unquoted() {
        assert_eq!(raw(&Value::from("abc")).to_string(), "abc");
        assert_eq!(raw(&Value::from(1.5)).to_string(), "1.5");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(-42.5), "-42.5");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(0.0000001), "1e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1.2345678912345679e44), "1.2345678912345679e+44");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_printable_list() {
        let values = vec![Value::from("a"), Value::from("b"), Value::from("c")];
        assert_eq!(printable_list(&values, "or"), r#""a", "b", or "c""#);
        assert_eq!(printable_list(&values[..2], "and"), r#""a" and "b""#);
        assert_eq!(printable_list(&values[..1], "or"), r#""a""#);
        assert_eq!(printable_list(&[], "or"), "nothing");
    }
}
