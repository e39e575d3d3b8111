//! Validated date ranges

use crate::error::RangeError;
use crate::predicate::Predicate;
use crate::timeframe::{ColumnScheme, Timeframe};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use weekframe_core::CalendarDate;

/// An inclusive `from..=to` pair of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicDateRange {
    pub from: CalendarDate,
    pub to: CalendarDate,
}

impl BasicDateRange {
    pub fn new(from: CalendarDate, to: CalendarDate) -> Self {
        Self { from, to }
    }

    pub fn validate(&self) -> Result<(), RangeError> {
        if self.from > self.to {
            return Err(RangeError::FromAfterTo {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    /// Number of days covered, both ends included
    pub fn len_days(&self) -> i64 {
        self.to.days_since(&self.from) + 1
    }
}

/// A date range at a given granularity, stored under a given column scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: CalendarDate,
    pub to: CalendarDate,
    pub timeframe: Timeframe,
    #[serde(default)]
    pub scheme: ColumnScheme,
}

impl DateRange {
    pub fn new(from: CalendarDate, to: CalendarDate, timeframe: Timeframe) -> Self {
        Self {
            from,
            to,
            timeframe,
            scheme: ColumnScheme::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: ColumnScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn basic(&self) -> BasicDateRange {
        BasicDateRange::new(self.from, self.to)
    }

    /// Check ordering, then that the timeframe is one the caller accepts
    pub fn validate(&self, valid: &ValidTimeframes) -> Result<(), RangeError> {
        self.basic().validate()?;
        if !valid.allows(self.timeframe) {
            return Err(RangeError::TimeframeNotAllowed(self.timeframe));
        }
        Ok(())
    }

    pub fn time_columns(&self, use_alias: bool) -> Vec<&'static str> {
        self.timeframe.time_columns(self.scheme, use_alias)
    }

    pub fn where_clause(&self) -> Predicate {
        self.timeframe.where_clause(self.scheme, self.from, self.to)
    }
}

/// Timeframes an endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidTimeframes {
    pub day: bool,
    pub week: bool,
    pub month: bool,
    pub year: bool,
}

impl ValidTimeframes {
    pub fn all() -> Self {
        Self {
            day: true,
            week: true,
            month: true,
            year: true,
        }
    }

    pub fn none() -> Self {
        Self {
            day: false,
            week: false,
            month: false,
            year: false,
        }
    }

    pub fn with(mut self, timeframe: Timeframe) -> Self {
        match timeframe {
            Timeframe::Day => self.day = true,
            Timeframe::Week => self.week = true,
            Timeframe::Month => self.month = true,
            Timeframe::Year => self.year = true,
        }
        self
    }

    pub fn allows(&self, timeframe: Timeframe) -> bool {
        match timeframe {
            Timeframe::Day => self.day,
            Timeframe::Week => self.week,
            Timeframe::Month => self.month,
            Timeframe::Year => self.year,
        }
    }

    pub fn allowed(&self) -> Vec<Timeframe> {
        Timeframe::ALL.into_iter().filter(|tf| self.allows(*tf)).collect()
    }
}

impl Default for ValidTimeframes {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for ValidTimeframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.allowed().iter().map(|tf| tf.as_str()).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Parse a comma list such as `week,month`
impl FromStr for ValidTimeframes {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Self::none(), |acc, part| Ok(acc.with(part.parse()?)))
    }
}
