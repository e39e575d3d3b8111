//! Financial year functions

use super::helpers::{check_arity, get_date, get_i32, get_u32, optional};
use weekframe_core::{CalendarDate, WeekframeError};
use weekframe_plugin::prelude::*;

pub struct FinancialYearFn;

static FY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("date", "Date|Int", "Date, or a calendar year when month is given"),
    ArgMeta::optional("month", "Int", "Month (1-12) of the calendar year", "none"),
];
static FY_EXAMPLES: [&str; 3] = [
    "financial_year('2024-12-01') → 2025",
    "financial_year(2024, 9) → 2025",
    "financial_year(2024, 8) → 2024",
];
static FY_RELATED: [&str; 1] = ["time_bucket"];

impl FunctionPlugin for FinancialYearFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "financial_year",
            description: "Financial year (September to August), named after the year it ends in",
            usage: "financial_year(date) or financial_year(year, month)",
            args: &FY_ARGS,
            returns: "Int",
            examples: &FY_EXAMPLES,
            category: "fiscal",
            related: &FY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("financial_year", args, 1, 2)?;
            match optional(args, 1) {
                None => Ok(Value::from(get_date(&args[0], "financial_year", "date")?.financial_year())),
                Some(month) => {
                    let year = get_i32(&args[0], "financial_year", "year")?;
                    let month = get_u32(month, "financial_year", "month")?;
                    let first = CalendarDate::first_of_month(year, month)
                        .map_err(|e| Value::Error(WeekframeError::from(e)))?;
                    Ok(Value::from(first.financial_year()))
                }
            }
        };
        eval().unwrap_or_else(|e| e)
    }
}
