//! Grouping keys for aggregating rows by timeframe

use crate::error::RangeError;
use crate::timeframe::{ColumnScheme, Timeframe};
use std::fmt;
use weekframe_core::{financial_year_start, iso_week_first_day, CalendarDate, WeekKey};

/// The period a date falls into at some granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeBucket {
    Day(CalendarDate),
    Week { key: WeekKey, scheme: ColumnScheme },
    Month { year: i32, month: u32 },
    /// Financial year under `Ikea`, calendar year under `Iso`
    Year { year: i32, scheme: ColumnScheme },
}

impl TimeBucket {
    pub fn of(date: CalendarDate, timeframe: Timeframe, scheme: ColumnScheme) -> Self {
        match timeframe {
            Timeframe::Day => TimeBucket::Day(date),
            Timeframe::Week => TimeBucket::Week {
                key: scheme.week_key(date),
                scheme,
            },
            Timeframe::Month => TimeBucket::Month {
                year: date.year(),
                month: date.month(),
            },
            Timeframe::Year => TimeBucket::Year {
                year: scheme.year_of(date),
                scheme,
            },
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        match self {
            TimeBucket::Day(_) => Timeframe::Day,
            TimeBucket::Week { .. } => Timeframe::Week,
            TimeBucket::Month { .. } => Timeframe::Month,
            TimeBucket::Year { .. } => Timeframe::Year,
        }
    }

    /// First calendar day of the period
    pub fn first_day(&self) -> Result<CalendarDate, RangeError> {
        match *self {
            TimeBucket::Day(date) => Ok(date),
            TimeBucket::Week { key, scheme: ColumnScheme::Ikea } => Ok(key.first_day()?),
            TimeBucket::Week { key, scheme: ColumnScheme::Iso } => Ok(iso_week_first_day(key.year, key.week)?),
            TimeBucket::Month { year, month } => Ok(CalendarDate::first_of_month(year, month)?),
            TimeBucket::Year { year, scheme: ColumnScheme::Ikea } => Ok(financial_year_start(year)?),
            TimeBucket::Year { year, scheme: ColumnScheme::Iso } => Ok(CalendarDate::first_of_year(year)?),
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Day(date) => write!(f, "{}", date),
            TimeBucket::Week { key, .. } => write!(f, "{}", key),
            TimeBucket::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            TimeBucket::Year { year, .. } => write!(f, "{}", year),
        }
    }
}

/// Distinct buckets touched by `from..=to`, in order
pub fn buckets_between(
    from: CalendarDate,
    to: CalendarDate,
    timeframe: Timeframe,
    scheme: ColumnScheme,
) -> Vec<TimeBucket> {
    let mut out: Vec<TimeBucket> = Vec::new();
    for date in from.iter_days_to(to) {
        let bucket = TimeBucket::of(date, timeframe, scheme);
        if out.last() != Some(&bucket) {
            out.push(bucket);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekframe_core::Weekday;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_display() {
        let d = date(2024, 12, 1);
        assert_eq!(TimeBucket::of(d, Timeframe::Day, ColumnScheme::Ikea).to_string(), "2024-12-01");
        assert_eq!(TimeBucket::of(d, Timeframe::Week, ColumnScheme::Ikea).to_string(), "2024-W49");
        assert_eq!(TimeBucket::of(d, Timeframe::Week, ColumnScheme::Iso).to_string(), "2024-W48");
        assert_eq!(TimeBucket::of(d, Timeframe::Month, ColumnScheme::Ikea).to_string(), "2024-12");
        assert_eq!(TimeBucket::of(d, Timeframe::Year, ColumnScheme::Ikea).to_string(), "2025");
        assert_eq!(TimeBucket::of(d, Timeframe::Year, ColumnScheme::Iso).to_string(), "2024");
    }

    #[test]
    fn test_first_day() {
        let d = date(2024, 12, 10);
        let first = |tf, scheme| TimeBucket::of(d, tf, scheme).first_day().unwrap();
        assert_eq!(first(Timeframe::Day, ColumnScheme::Ikea), d);
        assert_eq!(first(Timeframe::Week, ColumnScheme::Ikea), date(2024, 12, 8));
        assert_eq!(first(Timeframe::Week, ColumnScheme::Iso), date(2024, 12, 9));
        assert_eq!(first(Timeframe::Month, ColumnScheme::Iso), date(2024, 12, 1));
        assert_eq!(first(Timeframe::Year, ColumnScheme::Ikea), date(2024, 9, 1));
        assert_eq!(first(Timeframe::Year, ColumnScheme::Iso), date(2024, 1, 1));
    }

    #[test]
    fn test_iso_week_first_day_across_years() {
        // 2021-01-01 is a Friday in ISO 2020-W53, which opened Mon 2020-12-28
        let b = TimeBucket::of(date(2021, 1, 1), Timeframe::Week, ColumnScheme::Iso);
        assert_eq!(b.first_day().unwrap(), date(2020, 12, 28));
        assert_eq!(b.first_day().unwrap().weekday(), Weekday::Monday);

        let bogus = TimeBucket::Week {
            key: WeekKey::new(2021, 53),
            scheme: ColumnScheme::Iso,
        };
        assert!(bogus.first_day().is_err());
    }

    #[test]
    fn test_invalid_buckets() {
        let b = TimeBucket::Month { year: 2024, month: 13 };
        assert!(matches!(b.first_day(), Err(RangeError::Date(_))));
        let b = TimeBucket::Week {
            key: WeekKey::new(2024, 60),
            scheme: ColumnScheme::Ikea,
        };
        assert!(matches!(b.first_day(), Err(RangeError::Week(_))));
    }

    #[test]
    fn test_buckets_outside_supported_years() {
        for scheme in [ColumnScheme::Ikea, ColumnScheme::Iso] {
            let week = TimeBucket::Week { key: WeekKey::new(i32::MAX, 53), scheme };
            assert!(matches!(week.first_day(), Err(RangeError::Week(_))), "{:?}", scheme);
            let year = TimeBucket::Year { year: i32::MIN, scheme };
            assert!(matches!(year.first_day(), Err(RangeError::Date(_))), "{:?}", scheme);
        }
        let month = TimeBucket::Month { year: 10000, month: 1 };
        assert!(matches!(month.first_day(), Err(RangeError::Date(_))));
    }

    #[test]
    fn test_buckets_at_range_ends() {
        let last = CalendarDate::MAX;
        let fy = TimeBucket::of(last, Timeframe::Year, ColumnScheme::Ikea);
        assert_eq!(fy.to_string(), "10000");
        assert_eq!(fy.first_day().unwrap(), date(9999, 9, 1));
        let week = TimeBucket::of(last, Timeframe::Week, ColumnScheme::Iso);
        assert_eq!(week.first_day().unwrap(), date(9999, 12, 27));

        // 0000-01-01 closes week 52 of year -1, which has no first day in range
        let first = TimeBucket::of(CalendarDate::MIN, Timeframe::Week, ColumnScheme::Ikea);
        assert_eq!(first.to_string(), "-001-W52");
        assert!(first.first_day().is_err());
    }

    #[test]
    fn test_buckets_between() {
        let weeks = buckets_between(date(2024, 12, 1), date(2024, 12, 10), Timeframe::Week, ColumnScheme::Ikea);
        let names: Vec<String> = weeks.iter().map(|b| b.to_string()).collect();
        assert_eq!(names, vec!["2024-W49", "2024-W50"]);

        let months = buckets_between(date(2024, 11, 30), date(2025, 1, 1), Timeframe::Month, ColumnScheme::Iso);
        assert_eq!(months.len(), 3);
        assert_eq!(months[2].to_string(), "2025-01");

        let years = buckets_between(date(2024, 8, 31), date(2024, 9, 1), Timeframe::Year, ColumnScheme::Ikea);
        let names: Vec<String> = years.iter().map(|b| b.to_string()).collect();
        assert_eq!(names, vec!["2024", "2025"]);
    }

    #[test]
    fn test_every_week_bucket_starts_at_its_first_day() {
        for d in date(2014, 12, 1).iter_days_to(date(2016, 1, 31)) {
            for scheme in [ColumnScheme::Ikea, ColumnScheme::Iso] {
                let bucket = TimeBucket::of(d, Timeframe::Week, scheme);
                let first = bucket.first_day().unwrap();
                assert!(first <= d && d.days_since(&first) < 7, "date {} {:?}", d, scheme);
                assert_eq!(TimeBucket::of(first, Timeframe::Week, scheme), bucket);
            }
        }
    }
}
