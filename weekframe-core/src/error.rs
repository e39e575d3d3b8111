//! Structured errors for tool consumers
//!
//! Typed errors (`DateError`, `WeekError`, ...) are what library callers
//! match on. At the plugin and server boundary they are flattened into a
//! `WeekframeError` that carries a machine-readable code and a hint.

use crate::{DateError, WeekError};
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_DATE: &str = "INVALID_DATE";
    pub const DATE_PARSE_ERROR: &str = "DATE_PARSE_ERROR";
    pub const INVALID_WEEK: &str = "INVALID_WEEK";
    pub const INVALID_RANGE: &str = "INVALID_RANGE";
    pub const INVALID_TIMEFRAME: &str = "INVALID_TIMEFRAME";
    pub const INVALID_SCHEME: &str = "INVALID_SCHEME";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Structured error with a machine-readable code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekframeError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl WeekframeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn invalid_date(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_DATE, format!("Invalid date: {}", details.into()))
            .with_suggestion("Check date components (year, month 1-12, day 1-31)")
    }

    pub fn date_parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::DATE_PARSE_ERROR, format!("Date parse error: {}", details.into()))
            .with_suggestion("Use ISO 8601 format (YYYY-MM-DD)")
    }

    pub fn invalid_week(year: i32, week: u32) -> Self {
        Self::new(codes::INVALID_WEEK, format!("Week {}-W{:02} does not exist", year, week))
            .with_suggestion("Weeks run from 1 to 52, or 53 in long years")
    }

    pub fn invalid_range(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_RANGE, format!("Invalid range: {}", details.into()))
            .with_suggestion("'from' must not be after 'to'")
    }

    pub fn invalid_timeframe(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_TIMEFRAME, details)
            .with_suggestion("Use one of: day, week, month, year")
    }

    pub fn invalid_scheme(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_SCHEME, details).with_suggestion("Use one of: ikea, iso")
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use tools/list to see available functions")
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(
            codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got),
        )
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(
            codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got),
        )
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for WeekframeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for WeekframeError {}

impl From<DateError> for WeekframeError {
    fn from(err: DateError) -> Self {
        match err {
            DateError::InvalidMonth(m) => Self::invalid_date(format!("month {} out of range 1-12", m)),
            DateError::InvalidDay { year, month, day } => {
                Self::invalid_date(format!("day {} invalid for {}-{:02}", day, year, month))
            }
            e @ (DateError::YearOutOfRange(_) | DateError::DaysOutOfRange(_)) => {
                Self::invalid_date(e.to_string()).with_suggestion("Use dates between 0000-01-01 and 9999-12-31")
            }
            DateError::Parse(s) => Self::date_parse_error(s),
        }
    }
}

impl From<WeekError> for WeekframeError {
    fn from(err: WeekError) -> Self {
        match err {
            WeekError::InvalidWeek { year, week } => Self::invalid_week(year, week),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_date_error() {
        let err: WeekframeError = DateError::InvalidMonth(13).into();
        assert_eq!(err.code, codes::INVALID_DATE);
        assert!(err.message.contains("13"));

        let err: WeekframeError = DateError::Parse("bad".to_string()).into();
        assert_eq!(err.code, codes::DATE_PARSE_ERROR);

        let err: WeekframeError = DateError::YearOutOfRange(10000).into();
        assert_eq!(err.code, codes::INVALID_DATE);
        assert_eq!(err.message, "Invalid date: Year 10000 is outside the supported range 0-9999");
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_from_week_error() {
        let err: WeekframeError = WeekError::InvalidWeek { year: 2015, week: 53 }.into();
        assert_eq!(err.code, codes::INVALID_WEEK);
        assert_eq!(err.message, "Week 2015-W53 does not exist");
    }

    #[test]
    fn test_display_includes_suggestion() {
        let err = WeekframeError::invalid_range("2025-01-02 is after 2025-01-01");
        assert_eq!(
            err.to_string(),
            "[INVALID_RANGE] Invalid range: 2025-01-02 is after 2025-01-01 (suggestion: 'from' must not be after 'to')"
        );
    }

    #[test]
    fn test_serialize_skips_missing_suggestion() {
        let err = WeekframeError::arg_count("ikea_week", 1, 2);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "ARG_COUNT");
        assert!(json.get("suggestion").is_none());
    }
}
