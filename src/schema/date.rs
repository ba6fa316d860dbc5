//! Date validation.
//!
//! In coercion mode [`DateValidator`] converts ISO 8601 date-times and
//! seconds-since-epoch timestamps, given either as numbers or as strings in
//! JSON number grammar. A timestamp is only converted when both the seconds
//! and the derived milliseconds are safe integers; otherwise validation fails
//! with a dedicated message instead of truncating.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::State;
use crate::value::{printable, raw, Value};

use super::number::{is_safe_integer, parse_json_number};
use super::traits::{impl_into_validator, Predicate};

/// Calendar date, `T`, time with optional seconds and fraction, then `Z` or
/// an offset. Separator consistency is checked after matching.
static ISO8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})(-?)(\d{2})(-?)(\d{2})T(\d{2})(:?)(\d{2})(?:(:?)(\d{2})(?:\.(\d{1,9}))?)?(Z|([+-])(\d{2})(?::?(\d{2}))?)$",
    )
    .expect("iso8601 regex")
});

/// Accepts dates.
///
/// # Example
///
/// ```rust
/// use sentinel::{as_type, is_date, AsOptions, Value};
///
/// let options = AsOptions { coerce: true, ..AsOptions::default() };
/// let date = as_type(&Value::from("2021-03-04T05:06:07Z"), &is_date(), options)
///     .into_result()
///     .unwrap();
/// assert_eq!(date.type_name(), "date");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DateValidator;

/// Creates a date validator.
pub fn is_date() -> DateValidator {
    DateValidator
}

impl Predicate for DateValidator {
    fn test(&self, value: &Value, state: &mut State<'_>) -> bool {
        if let Value::Date(_) = value {
            return true;
        }

        if state.is_coercing() {
            if !state.is_bound() {
                return state.fail_unbound();
            }

            if let Some(date) = value.as_str().and_then(parse_iso8601) {
                return state.propose(Value::Date(date));
            }

            let timestamp = match value {
                Value::Number(n) => Some(*n),
                Value::String(s) => parse_json_number(s),
                _ => None,
            };
            if let Some(seconds) = timestamp {
                return match from_timestamp(seconds) {
                    Some(date) => state.propose(Value::Date(date)),
                    None => state.fail(format_args!(
                        "Received a timestamp that can't be safely be represented by the runtime ({})",
                        raw(value)
                    )),
                };
            }
        }

        state.fail(format_args!("Expected a date (got {})", printable(value)))
    }
}

impl_into_validator!(DateValidator);

fn from_timestamp(seconds: f64) -> Option<DateTime<Utc>> {
    let millis = seconds * 1000.0;
    if !is_safe_integer(seconds) || !is_safe_integer(millis) {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Parses an ISO 8601 date-time, rejecting impossible calendar dates.
pub(crate) fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    let caps = ISO8601.captures(text)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str());
    let number = |i: usize| group(i).and_then(|s| s.parse::<u32>().ok());

    // Basic and extended formats cannot be mixed within a part.
    if group(2) != group(4) {
        return None;
    }
    if group(9).is_some_and(|sep| Some(sep) != group(7)) {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(number(1)? as i32, number(3)?, number(5)?)?;

    let nanos = match group(11) {
        Some(fraction) => {
            let padded = format!("{:0<9}", fraction);
            padded.parse::<u32>().ok()?
        }
        None => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(number(6)?, number(8)?, number(10).unwrap_or(0), nanos)?;

    let offset = match group(13) {
        None => FixedOffset::east_opt(0)?,
        Some(sign) => {
            let hours = number(14)? as i32;
            let minutes = number(15).unwrap_or(0) as i32;
            if hours > 23 || minutes > 59 {
                return None;
            }
            let seconds = (hours * 60 + minutes) * 60;
            FixedOffset::east_opt(if sign == "-" { -seconds } else { seconds })?
        }
    };

    let local = offset.from_local_datetime(&date.and_time(time)).single()?;
    let utc = local.with_timezone(&Utc);
    // Dates carry millisecond precision.
    DateTime::from_timestamp_millis(utc.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{commit_all, Cell};

    fn coerce(input: Value) -> (bool, Vec<String>, Cell) {
        let cell = Cell::new(input.clone());
        let mut errors = Vec::new();
        let mut coercions = Vec::new();
        let valid = is_date().test(
            &input,
            &mut State::new()
                .with_errors(&mut errors)
                .with_coercions(&mut coercions)
                .with_coercion(cell.slot()),
        );
        commit_all(&coercions);
        (valid, errors, cell)
    }

    #[test]
    fn test_accepts_dates() {
        assert!(is_date().check(&Value::Date(Utc::now())));
        assert_eq!(
            is_date().errors(&Value::from("2021-01-01T00:00:00Z")),
            vec![r#".: Expected a date (got "2021-01-01T00:00:00Z")"#]
        );
    }

    #[test]
    fn test_coerces_iso_strings() {
        let (valid, errors, cell) = coerce(Value::from("2021-03-04T05:06:07.890+01:00"));
        assert!(valid, "{:?}", errors);
        let expected = Utc.with_ymd_and_hms(2021, 3, 4, 4, 6, 7).unwrap()
            + chrono::Duration::milliseconds(890);
        assert_eq!(cell.get(), Value::Date(expected));
    }

    #[test]
    fn test_coerces_timestamps() {
        let expected = Value::Date(Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap());

        let (valid, _, cell) = coerce(Value::from(1_000_000_000));
        assert!(valid);
        assert_eq!(cell.get(), expected);

        let (valid, _, cell) = coerce(Value::from("1000000000"));
        assert!(valid);
        assert_eq!(cell.get(), expected);
    }

    #[test]
    fn test_rejects_unsafe_timestamps() {
        let (valid, errors, cell) = coerce(Value::from(9_007_199_254_740_991.0));
        assert!(!valid);
        assert_eq!(
            errors,
            vec![".: Received a timestamp that can't be safely be represented by the runtime (9007199254740991)"]
        );
        assert_eq!(cell.get(), Value::from(9_007_199_254_740_991.0));

        let (valid, _, _) = coerce(Value::from(1.5));
        assert!(!valid);
    }

    #[test]
    fn test_rejects_out_of_range_timestamp_strings() {
        let (valid, errors, cell) = coerce(Value::from("1e400"));
        assert!(!valid);
        assert_eq!(
            errors,
            vec![".: Received a timestamp that can't be safely be represented by the runtime (1e400)"]
        );
        assert_eq!(cell.get(), Value::from("1e400"));
    }

    #[test]
    fn test_rejects_garbage_strings() {
        let (valid, errors, cell) = coerce(Value::from("yesterday"));
        assert!(!valid);
        assert_eq!(errors, vec![r#".: Expected a date (got "yesterday")"#]);
        assert_eq!(cell.get(), Value::from("yesterday"));
    }

    #[test]
    fn test_parse_iso8601() {
        assert!(parse_iso8601("2020-02-29T12:00:00Z").is_some());
        assert!(parse_iso8601("20200229T1200Z").is_some());
        assert!(parse_iso8601("2020-02-29T12:00+0530").is_some());
        assert!(parse_iso8601("2021-02-29T12:00:00Z").is_none());
        assert!(parse_iso8601("2021-13-01T12:00:00Z").is_none());
        assert!(parse_iso8601("2021-01-01").is_none());
        assert!(parse_iso8601("2021-0101T12:00:00Z").is_none());
        assert!(parse_iso8601("2021-01-01T24:00:00Z").is_none());
    }
}
