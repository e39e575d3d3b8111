//! IKEA financial year
//!
//! The financial year starts on September 1st and is named after the
//! calendar year it ends in: FY2025 runs from 2024-09-01 to 2025-08-31.

use crate::date::{CalendarDate, DateError};

/// First month of the financial year
pub const FINANCIAL_YEAR_START_MONTH: u32 = 9;

/// Financial year for the given calendar year and month
///
/// Saturates at `i32::MAX`; callers holding unchecked input validate the
/// year through `CalendarDate::from_ymd` first.
pub fn financial_year(year: i32, month: u32) -> i32 {
    if month >= FINANCIAL_YEAR_START_MONTH {
        return year.saturating_add(1);
    }
    year
}

/// First day of financial year `fy` (September 1st of `fy - 1`)
pub fn financial_year_start(fy: i32) -> Result<CalendarDate, DateError> {
    let year = fy.checked_sub(1).ok_or(DateError::YearOutOfRange(fy))?;
    CalendarDate::from_ymd(year, FINANCIAL_YEAR_START_MONTH, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_year() {
        let tests = [
            // (name, year, month, want)
            ("financial year different iso year", 2024, 9, 2025),
            ("financial year same iso year", 2024, 8, 2024),
            ("january", 2025, 1, 2025),
            ("december", 2024, 12, 2025),
        ];
        for (name, y, m, want) in tests {
            assert_eq!(financial_year(y, m), want, "{}", name);
        }
    }

    #[test]
    fn test_financial_year_start() {
        let start = financial_year_start(2025).unwrap();
        assert_eq!(start.to_string(), "2024-09-01");
        assert_eq!(start.financial_year(), 2025);
        assert_eq!(start.pred().financial_year(), 2024);
    }

    #[test]
    fn test_financial_year_at_range_ends() {
        // The last months of 9999 belong to FY10000, which still starts in range
        let last = CalendarDate::MAX;
        assert_eq!(last.financial_year(), 10000);
        assert_eq!(financial_year_start(10000).unwrap().to_string(), "9999-09-01");
        assert_eq!(financial_year_start(1).unwrap(), CalendarDate::from_ymd(0, 9, 1).unwrap());

        assert_eq!(financial_year_start(0), Err(DateError::YearOutOfRange(-1)));
        assert_eq!(financial_year_start(10001), Err(DateError::YearOutOfRange(10000)));
        assert_eq!(financial_year_start(i32::MIN), Err(DateError::YearOutOfRange(i32::MIN)));
        assert_eq!(financial_year(i32::MAX, 12), i32::MAX);
    }
}
