//! Predicate construction over denormalized date columns
//!
//! Tables carry the calendar breakdown of each row's date in separate integer
//! columns (`ikea_year`, `ikea_week`, ...). A range of weeks or months can
//! cross year boundaries, so it is decomposed into three disjoint pieces:
//! whole years strictly between the endpoints, the tail of the first year and
//! the head of the last one.

use crate::predicate::{Predicate, SqlParam};

/// `column BETWEEN ? AND ?`
pub fn between(column: &str, from: impl Into<SqlParam>, to: impl Into<SqlParam>) -> Predicate {
    Predicate::new(
        format!("{} BETWEEN ? AND ?", column),
        vec![from.into(), to.into()],
    )
}

/// Builds range predicates over a `(year, unit)` column pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePredicateBuilder<'a> {
    year_column: &'a str,
    unit_column: &'a str,
}

impl<'a> RangePredicateBuilder<'a> {
    pub fn new(year_column: &'a str, unit_column: &'a str) -> Self {
        Self {
            year_column,
            unit_column,
        }
    }

    /// Predicate matching every `(year, unit)` key from `from` to `to` inclusive
    ///
    /// Keys order lexicographically. The multi-year form always emits the
    /// middle-years clause, even when no year lies strictly between.
    pub fn span(&self, from: (i32, u32), to: (i32, u32)) -> Predicate {
        let (y, u) = (self.year_column, self.unit_column);
        let (from_year, from_unit) = from;
        let (to_year, to_unit) = to;

        if from_year == to_year {
            return Predicate::new(
                format!("{y} = ? AND {u} BETWEEN ? AND ?"),
                vec![from_year.into(), SqlParam::unit(from_unit), SqlParam::unit(to_unit)],
            );
        }

        Predicate::new(
            format!("({y} > ? AND {y} < ?) OR ({y} = ? AND {u} >= ?) OR ({y} = ? AND {u} <= ?)"),
            vec![
                from_year.into(),
                to_year.into(),
                from_year.into(),
                SqlParam::unit(from_unit),
                to_year.into(),
                SqlParam::unit(to_unit),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between() {
        let p = between("financial_year", 2024, 2026);
        assert_eq!(p.template, "financial_year BETWEEN ? AND ?");
        assert_eq!(p.params, vec![SqlParam::Int(2024), SqlParam::Int(2026)]);
    }

    #[test]
    fn test_same_year_span() {
        let p = RangePredicateBuilder::new("ikea_year", "ikea_week").span((2024, 49), (2024, 50));
        assert_eq!(p.template, "ikea_year = ? AND ikea_week BETWEEN ? AND ?");
        assert_eq!(p.params, vec![SqlParam::Int(2024), SqlParam::Int(49), SqlParam::Int(50)]);
    }

    #[test]
    fn test_adjacent_years_keep_middle_clause() {
        let p = RangePredicateBuilder::new("y", "m").span((2024, 7), (2025, 12));
        assert_eq!(p.to_sql(), "(y > 2024 AND y < 2025) OR (y = 2024 AND m >= 7) OR (y = 2025 AND m <= 12)");
        assert_eq!(p.placeholder_count(), p.params.len());
    }
}
