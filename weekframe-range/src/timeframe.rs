//! Timeframes and the column schemes that store them

use crate::builder::{between, RangePredicateBuilder};
use crate::error::RangeError;
use crate::predicate::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use weekframe_core::{ikea_week, CalendarDate, WeekKey};

/// Aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Timeframe::Day, Timeframe::Week, Timeframe::Month, Timeframe::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
        }
    }

    /// Columns to select for this timeframe, aliased to `year`/`week`/`month`
    /// when `use_alias` is set and the scheme needs it
    pub fn time_columns(&self, scheme: ColumnScheme, use_alias: bool) -> Vec<&'static str> {
        let columns: &[&'static str] = match (scheme, self, use_alias) {
            (_, Timeframe::Day, _) => &["date"],
            (ColumnScheme::Ikea, Timeframe::Week, false) => &["ikea_year", "ikea_week"],
            (ColumnScheme::Ikea, Timeframe::Week, true) => &["ikea_year AS year", "ikea_week AS week"],
            (ColumnScheme::Ikea, Timeframe::Month, false) => &["iso_year", "iso_month"],
            (ColumnScheme::Ikea, Timeframe::Month, true) => &["iso_year AS year", "iso_month AS month"],
            (ColumnScheme::Ikea, Timeframe::Year, false) => &["financial_year"],
            (ColumnScheme::Ikea, Timeframe::Year, true) => &["financial_year AS year"],
            (ColumnScheme::Iso, Timeframe::Week, _) => &["year", "week"],
            (ColumnScheme::Iso, Timeframe::Month, _) => &["year", "month"],
            (ColumnScheme::Iso, Timeframe::Year, _) => &["year"],
        };
        columns.to_vec()
    }

    /// Predicate selecting rows from `from` to `to` inclusive at this granularity
    ///
    /// Callers guarantee `from <= to`; see `DateRange::validate`.
    pub fn where_clause(&self, scheme: ColumnScheme, from: CalendarDate, to: CalendarDate) -> Predicate {
        let columns = self.time_columns(scheme, false);
        match self {
            Timeframe::Day => between(columns[0], from, to),
            Timeframe::Week => {
                let (f, t) = (scheme.week_key(from), scheme.week_key(to));
                RangePredicateBuilder::new(columns[0], columns[1])
                    .span((f.year, f.week), (t.year, t.week))
            }
            Timeframe::Month => RangePredicateBuilder::new(columns[0], columns[1])
                .span((from.year(), from.month()), (to.year(), to.month())),
            Timeframe::Year => between(columns[0], scheme.year_of(from), scheme.year_of(to)),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            _ => Err(RangeError::UnknownTimeframe(s.to_string())),
        }
    }
}

/// Which denormalized columns a table carries
///
/// `Ikea` tables store Sunday-start weeks and financial years next to ISO
/// months; `Iso` tables store plain `year`/`week`/`month` with ISO weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnScheme {
    #[default]
    Ikea,
    Iso,
}

impl ColumnScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnScheme::Ikea => "ikea",
            ColumnScheme::Iso => "iso",
        }
    }

    /// Week of `date` under this scheme's week numbering
    pub fn week_key(&self, date: CalendarDate) -> WeekKey {
        match self {
            ColumnScheme::Ikea => ikea_week(date),
            ColumnScheme::Iso => {
                let (year, week) = date.iso_week();
                WeekKey::new(year, week)
            }
        }
    }

    /// Value of the year column for `date`: financial year or calendar year
    pub fn year_of(&self, date: CalendarDate) -> i32 {
        match self {
            ColumnScheme::Ikea => date.financial_year(),
            ColumnScheme::Iso => date.year(),
        }
    }
}

impl fmt::Display for ColumnScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnScheme {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ikea" => Ok(ColumnScheme::Ikea),
            "iso" => Ok(ColumnScheme::Iso),
            _ => Err(RangeError::UnknownScheme(s.to_string())),
        }
    }
}
