//! Standard functions

mod helpers;
mod week;
mod fiscal;
mod range;

pub use week::{IkeaWeekFn, WeekFirstDayFn, IsoWeekFn, DateComponentsFn};
pub use fiscal::FinancialYearFn;
pub use range::{TimeColumnsFn, WhereClauseFn, TimeBucketFn, ValidateRangeFn};
