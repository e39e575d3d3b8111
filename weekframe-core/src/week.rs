//! IKEA week numbering
//!
//! Weeks start on Sunday and week 1 is the week holding January 4th, which
//! matches the US CDC epiweeks. The scheme is derived from ISO 8601 with
//! corrections near year boundaries: a year whose January 4th falls on a
//! Sunday pulls the preceding days into a week 53 of the previous year.
//!
//! Inverses only accept week-years in `MIN_YEAR..=MAX_YEAR`. The first days
//! of 0000 still map forward to week 52 of year -1.

use crate::date::{is_supported_year, CalendarDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Upper bound on candidate Sundays visited by `ikea_week_first_day`
const MAX_SEARCH_WEEKS: usize = 54;

/// A week-owning year and a week number (1-53)
///
/// `year` is the year the week belongs to, which differs from the calendar
/// year of dates at the very start or end of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Sunday that opens this week
    pub fn first_day(&self) -> Result<CalendarDate, WeekError> {
        ikea_week_first_day(self.year, self.week)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// Errors from inverting the week numbering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekError {
    #[error("Invalid week: {year}-W{week:02} does not exist in the IKEA week calendar")]
    InvalidWeek { year: i32, week: u32 },
}

/// Week-year and week number of `date` under the IKEA scheme
pub fn ikea_week(date: CalendarDate) -> WeekKey {
    let (mut year, mut week) = date.iso_week();
    let is_sunday = date.weekday() == Weekday::Sunday;

    // A Sunday opens the next week instead of closing the current ISO one
    if is_sunday {
        if week < 52 {
            week += 1;
        } else if week == 52 {
            // Next week is either 53 or week 1 of the next year
            (year, week) = date.shifted(1).iso_week();
        } else {
            week = 1;
            year += 1;
        }
    }

    // Years whose Jan 4th is a Sunday already start their weeks on Sunday,
    // so the shift above overshoots by one for the whole year
    let jan4 = CalendarDate::jan4(year);
    if jan4.weekday() == Weekday::Sunday
        || (date.year() != year && is_sunday && date.month() == 1)
    {
        week -= 1;
    }

    // The days right before a Sunday Jan 4th form week 53 of the previous year
    if date.month() == 12 || date.month() == 1 {
        let jan4_year = if date.month() == 12 { date.year() + 1 } else { date.year() };
        let jan4 = CalendarDate::jan4(jan4_year);
        if jan4.weekday() == Weekday::Sunday && date > jan4.shifted(-8) && date < jan4 {
            week = 53;
            year = jan4_year - 1;
        }
    }

    WeekKey { year, week }
}

/// First day (a Sunday) of IKEA week `week` of `year`
///
/// The forward mapping is not affine near year boundaries, so the inverse is a
/// bounded walk over candidate Sundays. Pairs that `ikea_week` never produces
/// yield `WeekError::InvalidWeek`.
pub fn ikea_week_first_day(year: i32, week: u32) -> Result<CalendarDate, WeekError> {
    if !is_supported_year(year) || !(1..=53).contains(&week) {
        return Err(WeekError::InvalidWeek { year, week });
    }

    let jan4 = CalendarDate::jan4(year);

    // Week 1 holds Jan 4th, so unless that is itself a Sunday it started in
    // the days before
    if week == 1 && jan4.weekday() != Weekday::Sunday {
        return Ok(jan4.previous_sunday());
    }

    let target = WeekKey { year, week };
    let mut candidate = jan4.next_sunday();
    for _ in 0..MAX_SEARCH_WEEKS {
        if ikea_week(candidate) == target {
            return Ok(candidate);
        }
        candidate = candidate.shifted(7);
    }

    Err(WeekError::InvalidWeek { year, week })
}

/// Number of IKEA weeks in `year` (52 or 53), `None` outside the supported years
pub fn ikea_weeks_in_year(year: i32) -> Option<u32> {
    if !is_supported_year(year) {
        return None;
    }
    // Dec 28th is always in the last week of its own year
    let dec28 = CalendarDate::from_ymd_unchecked(year, 12, 28);
    Some(ikea_week(dec28).week)
}

/// Monday that opens ISO 8601 week `week` of week-year `year`
pub fn iso_week_first_day(year: i32, week: u32) -> Result<CalendarDate, WeekError> {
    let invalid = WeekError::InvalidWeek { year, week };
    if !is_supported_year(year) || !(1..=53).contains(&week) {
        return Err(invalid);
    }
    let jan4 = CalendarDate::jan4(year);
    let week1 = jan4.shifted(1 - jan4.weekday().number_from_monday() as i64);
    let monday = week1.shifted(7 * (week as i64 - 1));
    if monday.iso_week() != (year, week) {
        return Err(invalid);
    }
    Ok(monday)
}
