//! Calendar dates for Weekframe
//!
//! A `CalendarDate` is a plain Gregorian (proleptic) day with no time of day
//! and no timezone: everything is UTC and day-precise.
//!
//! Design principles:
//! - No external datetime crates
//! - Immutable `Copy` values, ordered by calendar order
//! - Construction validates; every accessor is total
//! - Years stay within `MIN_YEAR..=MAX_YEAR`, the range `YYYY-MM-DD` can spell

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from 0000-03-01 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// Earliest supported year
pub const MIN_YEAR: i32 = 0;

/// Latest supported year
pub const MAX_YEAR: i32 = 9999;

/// Epoch days of 0000-01-01 and 9999-12-31
const MIN_EPOCH_DAYS: i64 = days_from_civil(MIN_YEAR, 1, 1);
const MAX_EPOCH_DAYS: i64 = days_from_civil(MAX_YEAR, 12, 31);

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// ISO 8601 numbering: Monday = 1 ... Sunday = 7
    pub fn number_from_monday(self) -> u32 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
            Weekday::Sunday => 7,
        }
    }

    /// Days elapsed since the most recent Sunday (Sunday = 0)
    pub fn days_since_sunday(self) -> u32 {
        self.number_from_monday() % 7
    }

    fn from_epoch_days(days: i64) -> Self {
        // 1970-01-01 was a Thursday
        match (days + 3).rem_euclid(7) {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            _ => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// CalendarDate
// ============================================================================

/// A Gregorian calendar date (year, month, day)
///
/// Field order matters: the derived `Ord` compares year, then month, then day,
/// which is calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

/// Day, IKEA week, month and year of a date, as stored in denormalized tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateComponents {
    pub day: u32,
    /// IKEA week number; may belong to the neighbouring week-year near Jan 1st
    pub week: u32,
    pub month: u32,
    pub year: i32,
}

impl CalendarDate {
    /// 0000-01-01
    pub const MIN: CalendarDate = CalendarDate::from_ymd_unchecked(MIN_YEAR, 1, 1);

    /// 9999-12-31
    pub const MAX: CalendarDate = CalendarDate::from_ymd_unchecked(MAX_YEAR, 12, 31);

    // ========== Construction ==========

    /// Create a date, validating year, month and day
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        if !is_supported_year(year) {
            return Err(DateError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Create a date from days since 1970-01-01
    pub fn from_epoch_days(days: i64) -> Result<Self, DateError> {
        if !(MIN_EPOCH_DAYS..=MAX_EPOCH_DAYS).contains(&days) {
            return Err(DateError::DaysOutOfRange(days));
        }
        Ok(Self::from_epoch_days_unchecked(days))
    }

    /// `days` must lie within a few years of the supported range
    fn from_epoch_days_unchecked(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self { year, month, day }
    }

    /// Callers guarantee the components form a valid date (fixed days like Jan 1st)
    pub(crate) const fn from_ymd_unchecked(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// January 4th of `year`; the anchor day of both ISO and IKEA week 1
    ///
    /// Week math looks one year past either end of the supported range, so
    /// the result is not validated.
    pub(crate) fn jan4(year: i32) -> Self {
        Self::from_ymd_unchecked(year, 1, 4)
    }

    /// First day of `year`
    pub fn first_of_year(year: i32) -> Result<Self, DateError> {
        Self::from_ymd(year, 1, 1)
    }

    /// First day of `month` in `year`
    pub fn first_of_month(year: i32, month: u32) -> Result<Self, DateError> {
        Self::from_ymd(year, month, 1)
    }

    // ========== Accessors ==========

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month (1-31)
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Days since 1970-01-01 (negative before the epoch)
    pub fn epoch_days(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from_epoch_days(self.epoch_days())
    }

    /// Day of year (1-366)
    pub fn ordinal(&self) -> u32 {
        (self.epoch_days() - days_from_civil(self.year, 1, 1)) as u32 + 1
    }

    /// ISO 8601 week-year and week number (weeks start Monday, week 1 holds Jan 4th)
    pub fn iso_week(&self) -> (i32, u32) {
        // The Thursday of the same ISO week decides the year
        let offset = 4 - self.weekday().number_from_monday() as i64;
        let thursday = self.shifted(offset);
        (thursday.year, (thursday.ordinal() - 1) / 7 + 1)
    }

    /// Financial year this date belongs to (starts in September)
    pub fn financial_year(&self) -> i32 {
        crate::fiscal::financial_year(self.year, self.month)
    }

    /// Break the date into day, IKEA week, month and year
    pub fn components(&self) -> DateComponents {
        DateComponents {
            day: self.day,
            week: crate::week::ikea_week(*self).week,
            month: self.month,
            year: self.year,
        }
    }

    // ========== Arithmetic ==========

    /// Move by `days`, or `None` when that leaves the supported range
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        let target = self.epoch_days().checked_add(days)?;
        Self::from_epoch_days(target).ok()
    }

    /// Move by `days`, clamped to `CalendarDate::MIN..=CalendarDate::MAX`
    pub fn add_days(&self, days: i64) -> Self {
        let target = self
            .epoch_days()
            .saturating_add(days)
            .clamp(MIN_EPOCH_DAYS, MAX_EPOCH_DAYS);
        Self::from_epoch_days_unchecked(target)
    }

    /// The following day (`MAX` stays put)
    pub fn succ(&self) -> Self {
        self.add_days(1)
    }

    /// The preceding day (`MIN` stays put)
    pub fn pred(&self) -> Self {
        self.add_days(-1)
    }

    /// Unclamped move for week math, which may step just outside the range
    pub(crate) fn shifted(&self, days: i64) -> Self {
        Self::from_epoch_days_unchecked(self.epoch_days() + days)
    }

    /// Signed number of days from `other` to `self`
    pub fn days_since(&self, other: &CalendarDate) -> i64 {
        self.epoch_days() - other.epoch_days()
    }

    /// The Sunday on or before this date
    pub(crate) fn previous_sunday(&self) -> Self {
        self.shifted(-(self.weekday().days_since_sunday() as i64))
    }

    /// The Sunday on or after this date
    pub(crate) fn next_sunday(&self) -> Self {
        let ahead = (7 - self.weekday().days_since_sunday()) % 7;
        self.shifted(ahead as i64)
    }

    /// Iterate every day from `self` to `end`, both inclusive
    pub fn iter_days_to(self, end: CalendarDate) -> impl Iterator<Item = CalendarDate> {
        let start = self.epoch_days();
        (start..=end.epoch_days()).map(CalendarDate::from_epoch_days_unchecked)
    }
}

// ============================================================================
// Parsing & formatting
// ============================================================================

impl CalendarDate {
    /// Parse an ISO 8601 calendar date: `YYYY-MM-DD`
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
            return Err(DateError::Parse(format!("expected YYYY-MM-DD, got '{}'", s)));
        }
        if !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
            return Err(DateError::Parse(format!("non-numeric date component in '{}'", s)));
        }

        let year: i32 = parts[0]
            .parse()
            .map_err(|_| DateError::Parse("Invalid year".to_string()))?;
        let month: u32 = parts[1]
            .parse()
            .map_err(|_| DateError::Parse("Invalid month".to_string()))?;
        let day: u32 = parts[2]
            .parse()
            .map_err(|_| DateError::Parse("Invalid day".to_string()))?;

        Self::from_ymd(year, month, day)
    }

    /// Parse the date part of an ISO 8601 datetime, dropping the time
    ///
    /// `2024-12-01T10:15:00Z` and `2024-12-01` both give 2024-12-01.
    pub fn from_datetime_str(s: &str) -> Result<Self, DateError> {
        let date_part = s.trim().split('T').next().unwrap_or_default();
        if date_part.is_empty() {
            return Err(DateError::Parse("datetime is empty".to_string()));
        }
        Self::parse(date_part)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CalendarDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// DateError
// ============================================================================

/// Errors raised while constructing or parsing a date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid month: {0} (must be 1-12)")]
    InvalidMonth(u32),
    #[error("Invalid day: {day} for {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[error("Year {0} is outside the supported range {min}-{max}", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange(i32),
    #[error("Day {0} since 1970-01-01 is outside the supported range")]
    DaysOutOfRange(i64),
    #[error("Parse error: {0}")]
    Parse(String),
}

// ============================================================================
// Calendar Utilities (Gregorian proleptic)
// ============================================================================

/// Whether `year` lies in `MIN_YEAR..=MAX_YEAR`
pub fn is_supported_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Get days in a month (0 for an invalid month)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

/// Convert civil date to days since Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
const fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146097 + doe - UNIX_EPOCH_DAYS
}

/// Convert days since Unix epoch to civil date
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year as i32, m as u32, d as u32)
}
