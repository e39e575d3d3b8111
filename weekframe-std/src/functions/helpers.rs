//! Argument extraction shared by the standard functions
//!
//! Every helper returns the ready-made error `Value` on failure so callers
//! can use `?` inside a `Result<Value, Value>` body.

use weekframe_core::{CalendarDate, Value, WeekframeError};
use weekframe_range::{ColumnScheme, Timeframe, ValidTimeframes};

pub(crate) fn check_arity(func: &str, args: &[Value], min: usize, max: usize) -> Result<(), Value> {
    if args.len() < min {
        return Err(Value::Error(WeekframeError::arg_count(func, min, args.len())));
    }
    if args.len() > max {
        return Err(Value::Error(WeekframeError::arg_count(func, max, args.len())));
    }
    Ok(())
}

/// Optional argument at `index`; `Null` counts as absent
pub(crate) fn optional(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index).filter(|v| !v.is_null())
}

pub(crate) fn get_i32(value: &Value, func: &str, arg: &str) -> Result<i32, Value> {
    match value {
        Value::Int(n) => i32::try_from(*n).map_err(|_| {
            Value::Error(WeekframeError::arg_type(func, arg, "32-bit integer", "out of range integer"))
        }),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(WeekframeError::arg_type(func, arg, "Int", other.type_name()))),
    }
}

pub(crate) fn get_u32(value: &Value, func: &str, arg: &str) -> Result<u32, Value> {
    match value {
        Value::Int(n) => u32::try_from(*n).map_err(|_| {
            Value::Error(WeekframeError::arg_type(func, arg, "non-negative integer", "negative integer"))
        }),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(WeekframeError::arg_type(func, arg, "Int", other.type_name()))),
    }
}

/// A date, or text holding an ISO date or datetime
pub(crate) fn get_date(value: &Value, func: &str, arg: &str) -> Result<CalendarDate, Value> {
    match value {
        Value::Date(d) => Ok(*d),
        Value::Text(s) => CalendarDate::from_datetime_str(s).map_err(|e| Value::Error(e.into())),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(WeekframeError::arg_type(func, arg, "Date", other.type_name()))),
    }
}

pub(crate) fn get_bool(value: &Value, func: &str, arg: &str) -> Result<bool, Value> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(WeekframeError::arg_type(func, arg, "Bool", other.type_name()))),
    }
}

fn get_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, Value> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(Value::Error(e.clone())),
        other => Err(Value::Error(WeekframeError::arg_type(func, arg, "Text", other.type_name()))),
    }
}

pub(crate) fn get_timeframe(value: &Value, func: &str, arg: &str) -> Result<Timeframe, Value> {
    get_text(value, func, arg)?
        .parse()
        .map_err(|e: weekframe_range::RangeError| Value::Error(e.into()))
}

/// Scheme argument, falling back to the context default when absent
pub(crate) fn get_scheme(value: Option<&Value>, default: ColumnScheme, func: &str) -> Result<ColumnScheme, Value> {
    match value {
        None => Ok(default),
        Some(v) => get_text(v, func, "scheme")?
            .parse()
            .map_err(|e: weekframe_range::RangeError| Value::Error(e.into())),
    }
}

/// Allowed timeframes as a comma list or a list of names
pub(crate) fn get_valid_timeframes(
    value: Option<&Value>,
    default: ValidTimeframes,
    func: &str,
) -> Result<ValidTimeframes, Value> {
    let parsed = match value {
        None => return Ok(default),
        Some(Value::List(items)) => items.iter().try_fold(ValidTimeframes::none(), |acc, item| {
            Ok::<_, Value>(acc.with(get_timeframe(item, func, "valid")?))
        })?,
        Some(v) => get_text(v, func, "valid")?
            .parse()
            .map_err(|e: weekframe_range::RangeError| Value::Error(e.into()))?,
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekframe_core::codes;

    fn error_code(v: Value) -> String {
        match v {
            Value::Error(e) => e.code,
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_arity() {
        let args = [Value::Int(1)];
        assert!(check_arity("f", &args, 1, 2).is_ok());
        assert_eq!(error_code(check_arity("f", &args, 2, 3).unwrap_err()), codes::ARG_COUNT);
        assert_eq!(error_code(check_arity("f", &args, 0, 0).unwrap_err()), codes::ARG_COUNT);
    }

    #[test]
    fn test_optional_skips_null() {
        let args = [Value::Int(1), Value::Null];
        assert!(optional(&args, 0).is_some());
        assert!(optional(&args, 1).is_none());
        assert!(optional(&args, 2).is_none());
    }

    #[test]
    fn test_get_date_accepts_text_and_datetime() {
        let d = CalendarDate::from_ymd(2024, 12, 1).unwrap();
        assert_eq!(get_date(&Value::from("2024-12-01"), "f", "date").unwrap(), d);
        assert_eq!(get_date(&Value::from("2024-12-01T10:30:00Z"), "f", "date").unwrap(), d);
        assert_eq!(get_date(&Value::Date(d), "f", "date").unwrap(), d);
        assert_eq!(error_code(get_date(&Value::Int(3), "f", "date").unwrap_err()), codes::ARG_TYPE);
        assert_eq!(
            error_code(get_date(&Value::from("2024-02-30"), "f", "date").unwrap_err()),
            codes::INVALID_DATE
        );
    }

    #[test]
    fn test_get_integers() {
        assert_eq!(get_i32(&Value::Int(2024), "f", "year").unwrap(), 2024);
        assert!(get_i32(&Value::Int(i64::MAX), "f", "year").is_err());
        assert!(get_u32(&Value::Int(-1), "f", "week").is_err());
        assert_eq!(error_code(get_u32(&Value::from("3"), "f", "week").unwrap_err()), codes::ARG_TYPE);
    }

    #[test]
    fn test_get_valid_timeframes() {
        let all = ValidTimeframes::all();
        assert_eq!(get_valid_timeframes(None, all, "f").unwrap(), all);
        let v = get_valid_timeframes(Some(&Value::from("week,month")), all, "f").unwrap();
        assert_eq!(v.allowed(), vec![Timeframe::Week, Timeframe::Month]);
        let list = Value::from(vec!["day", "year"]);
        let v = get_valid_timeframes(Some(&list), all, "f").unwrap();
        assert_eq!(v.allowed(), vec![Timeframe::Day, Timeframe::Year]);
        assert_eq!(
            error_code(get_valid_timeframes(Some(&Value::from("decade")), all, "f").unwrap_err()),
            codes::INVALID_TIMEFRAME
        );
    }

    #[test]
    fn test_get_scheme_defaults() {
        assert_eq!(get_scheme(None, ColumnScheme::Iso, "f").unwrap(), ColumnScheme::Iso);
        assert_eq!(get_scheme(Some(&Value::from("ikea")), ColumnScheme::Iso, "f").unwrap(), ColumnScheme::Ikea);
        assert_eq!(error_code(get_scheme(Some(&Value::from("x")), ColumnScheme::Iso, "f").unwrap_err()), codes::INVALID_SCHEME);
    }
}
