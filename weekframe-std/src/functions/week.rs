//! Week numbering functions

use super::helpers::{check_arity, get_date, get_i32, get_u32};
use std::collections::HashMap;
use weekframe_core::{ikea_week, ikea_week_first_day, WeekKey};
use weekframe_plugin::prelude::*;

pub struct IkeaWeekFn;
pub struct WeekFirstDayFn;
pub struct IsoWeekFn;
pub struct DateComponentsFn;

static DATE_ARG: [ArgMeta; 1] = [ArgMeta::required("date", "Date", "Date as YYYY-MM-DD (a trailing time is ignored)")];

static IKEA_WEEK_EXAMPLES: [&str; 2] = ["ikea_week('2024-01-14') → 2024-W03", "ikea_week('2015-01-01') → 2014-W53"];
static IKEA_WEEK_RELATED: [&str; 2] = ["week_first_day", "iso_week"];

static FIRST_DAY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("year", "Int", "Week-owning year"),
    ArgMeta::required("week", "Int", "Week number (1-53)"),
];
static FIRST_DAY_EXAMPLES: [&str; 2] = ["week_first_day(2024, 3) → 2024-01-14", "week_first_day(2014, 53) → 2014-12-28"];
static FIRST_DAY_RELATED: [&str; 1] = ["ikea_week"];

static ISO_WEEK_EXAMPLES: [&str; 1] = ["iso_week('2021-01-01') → 2020-W53"];
static ISO_WEEK_RELATED: [&str; 1] = ["ikea_week"];

static COMPONENTS_EXAMPLES: [&str; 1] = ["date_components('2015-01-01') → {day: 1, week: 53, month: 1, year: 2015}"];
static COMPONENTS_RELATED: [&str; 2] = ["ikea_week", "financial_year"];

fn week_object(key: WeekKey) -> Value {
    let mut obj = HashMap::new();
    obj.insert("year".to_string(), Value::from(key.year));
    obj.insert("week".to_string(), Value::from(key.week));
    obj.insert("key".to_string(), Value::Text(key.to_string()));
    Value::Object(obj)
}

impl FunctionPlugin for IkeaWeekFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ikea_week",
            description: "Sunday-start week of a date: week 1 holds January 4th",
            usage: "ikea_week(date)",
            args: &DATE_ARG,
            returns: "Object {year, week, key}",
            examples: &IKEA_WEEK_EXAMPLES,
            category: "week",
            related: &IKEA_WEEK_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("ikea_week", args, 1, 1)?;
            let date = get_date(&args[0], "ikea_week", "date")?;
            Ok(week_object(ikea_week(date)))
        };
        eval().unwrap_or_else(|e| e)
    }
}

impl FunctionPlugin for WeekFirstDayFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "week_first_day",
            description: "Sunday that opens an IKEA week",
            usage: "week_first_day(year, week)",
            args: &FIRST_DAY_ARGS,
            returns: "Date",
            examples: &FIRST_DAY_EXAMPLES,
            category: "week",
            related: &FIRST_DAY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("week_first_day", args, 2, 2)?;
            let year = get_i32(&args[0], "week_first_day", "year")?;
            let week = get_u32(&args[1], "week_first_day", "week")?;
            ikea_week_first_day(year, week)
                .map(Value::Date)
                .map_err(|e| Value::Error(e.into()))
        };
        eval().unwrap_or_else(|e| e)
    }
}

impl FunctionPlugin for IsoWeekFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "iso_week",
            description: "ISO 8601 week of a date (Monday start)",
            usage: "iso_week(date)",
            args: &DATE_ARG,
            returns: "Object {year, week, key}",
            examples: &ISO_WEEK_EXAMPLES,
            category: "week",
            related: &ISO_WEEK_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("iso_week", args, 1, 1)?;
            let (year, week) = get_date(&args[0], "iso_week", "date")?.iso_week();
            Ok(week_object(WeekKey::new(year, week)))
        };
        eval().unwrap_or_else(|e| e)
    }
}

impl FunctionPlugin for DateComponentsFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "date_components",
            description: "Day, IKEA week number, month and calendar year of a date",
            usage: "date_components(date)",
            args: &DATE_ARG,
            returns: "Object {day, week, month, year}",
            examples: &COMPONENTS_EXAMPLES,
            category: "week",
            related: &COMPONENTS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("date_components", args, 1, 1)?;
            let c = get_date(&args[0], "date_components", "date")?.components();
            let mut obj = HashMap::new();
            obj.insert("day".to_string(), Value::from(c.day));
            obj.insert("week".to_string(), Value::from(c.week));
            obj.insert("month".to_string(), Value::from(c.month));
            obj.insert("year".to_string(), Value::from(c.year));
            Ok(Value::Object(obj))
        };
        eval().unwrap_or_else(|e| e)
    }
}
