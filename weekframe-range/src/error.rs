use crate::Timeframe;
use thiserror::Error;
use weekframe_core::{codes, CalendarDate, DateError, WeekError, WeekframeError};

/// Errors from range validation and timeframe/scheme parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid range: from {from} is after to {to}")]
    FromAfterTo { from: CalendarDate, to: CalendarDate },

    #[error("Timeframe '{0}' is not allowed here")]
    TimeframeNotAllowed(Timeframe),

    #[error("Unknown timeframe: '{0}'")]
    UnknownTimeframe(String),

    #[error("Unknown column scheme: '{0}'")]
    UnknownScheme(String),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Week(#[from] WeekError),
}

impl From<RangeError> for WeekframeError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::FromAfterTo { .. } => WeekframeError::new(codes::INVALID_RANGE, err.to_string())
                .with_suggestion("Swap 'from' and 'to' so that from <= to"),
            RangeError::TimeframeNotAllowed(_) => {
                WeekframeError::new(codes::INVALID_TIMEFRAME, err.to_string())
            }
            RangeError::UnknownTimeframe(_) => WeekframeError::invalid_timeframe(err.to_string())
                .with_suggestion("Use one of: day, week, month, year"),
            RangeError::UnknownScheme(_) => WeekframeError::invalid_scheme(err.to_string())
                .with_suggestion("Use one of: ikea, iso"),
            RangeError::Date(e) => e.into(),
            RangeError::Week(e) => e.into(),
        }
    }
}
