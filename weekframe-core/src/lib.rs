//! Weekframe Core - Fundamental types
//!
//! This crate provides the calendar primitives used throughout Weekframe:
//! - `CalendarDate`: Gregorian dates with ISO 8601 (de)serialization
//! - `ikea_week` / `ikea_week_first_day`: Sunday-start week numbering and its inverse
//! - `financial_year`: September-start financial years
//! - `Value`: Runtime values exchanged with function plugins
//! - `WeekframeError`: Structured errors for tool consumers

mod date;
mod week;
mod fiscal;
mod value;
mod error;

pub use date::{
    CalendarDate, DateComponents, DateError, Weekday, MAX_YEAR, MIN_YEAR, days_in_month, is_leap_year,
    is_supported_year,
};
pub use week::{WeekKey, WeekError, ikea_week, ikea_week_first_day, ikea_weeks_in_year, iso_week_first_day};
pub use fiscal::{FINANCIAL_YEAR_START_MONTH, financial_year, financial_year_start};
pub use value::Value;
pub use error::{WeekframeError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalendarDate, Value, WeekKey, Weekday, WeekframeError};
    pub use crate::{financial_year, ikea_week, ikea_week_first_day};
    pub use crate::error::codes;
}
