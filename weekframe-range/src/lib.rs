//! Weekframe Range - Timeframes and SQL range predicates
//!
//! Turns a `from..=to` pair of dates plus a timeframe into the filter over
//! denormalized date columns that selects exactly the rows in range:
//!
//! ```
//! use weekframe_core::CalendarDate;
//! use weekframe_range::{ColumnScheme, Timeframe};
//!
//! let from = CalendarDate::parse("2024-12-01").unwrap();
//! let to = CalendarDate::parse("2024-12-10").unwrap();
//! let p = Timeframe::Week.where_clause(ColumnScheme::Ikea, from, to);
//! assert_eq!(p.template, "ikea_year = ? AND ikea_week BETWEEN ? AND ?");
//! assert_eq!(p.to_sql(), "ikea_year = 2024 AND ikea_week BETWEEN 49 AND 50");
//! ```

mod error;
mod predicate;
mod builder;
mod timeframe;
mod range;
mod bucket;

pub use error::RangeError;
pub use predicate::{Predicate, SqlParam};
pub use builder::{between, RangePredicateBuilder};
pub use timeframe::{ColumnScheme, Timeframe};
pub use range::{BasicDateRange, DateRange, ValidTimeframes};
pub use bucket::{buckets_between, TimeBucket};
