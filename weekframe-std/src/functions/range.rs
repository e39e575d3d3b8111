//! Timeframe, predicate and bucket functions

use super::helpers::{check_arity, get_bool, get_date, get_scheme, get_timeframe, get_valid_timeframes, optional};
use std::collections::HashMap;
use weekframe_plugin::prelude::*;
use weekframe_range::{BasicDateRange, DateRange, Predicate, RangeError, SqlParam, TimeBucket};

pub struct TimeColumnsFn;
pub struct WhereClauseFn;
pub struct TimeBucketFn;
pub struct ValidateRangeFn;

static TIME_COLUMNS_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("timeframe", "Text", "day, week, month or year"),
    ArgMeta::optional("scheme", "Text", "Column scheme: ikea or iso", "server default"),
    ArgMeta::optional("alias", "Bool", "Alias columns to year/week/month", "false"),
];
static TIME_COLUMNS_EXAMPLES: [&str; 2] = [
    "time_columns('week') → [ikea_year, ikea_week]",
    "time_columns('year', 'ikea', true) → [financial_year AS year]",
];
static TIME_COLUMNS_RELATED: [&str; 1] = ["where_clause"];

static WHERE_ARGS: [ArgMeta; 5] = [
    ArgMeta::required("from", "Date", "First date of the range"),
    ArgMeta::required("to", "Date", "Last date of the range (inclusive)"),
    ArgMeta::required("timeframe", "Text", "day, week, month or year"),
    ArgMeta::optional("scheme", "Text", "Column scheme: ikea or iso", "server default"),
    ArgMeta::optional("valid", "Text|List", "Accepted timeframes, e.g. 'week,month'", "server default"),
];
static WHERE_EXAMPLES: [&str; 2] = [
    "where_clause('2024-12-01', '2024-12-10', 'week') → ikea_year = 2024 AND ikea_week BETWEEN 49 AND 50",
    "where_clause('2024-07-01', '2025-12-10', 'year') → financial_year BETWEEN 2024 AND 2026",
];
static WHERE_RELATED: [&str; 2] = ["time_columns", "validate_range"];

static BUCKET_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("date", "Date", "Date to group"),
    ArgMeta::required("timeframe", "Text", "day, week, month or year"),
    ArgMeta::optional("scheme", "Text", "Column scheme: ikea or iso", "server default"),
];
static BUCKET_EXAMPLES: [&str; 2] = [
    "time_bucket('2024-12-10', 'week') → {key: 2024-W50, first_day: 2024-12-08}",
    "time_bucket('2024-12-10', 'year') → {key: 2025, first_day: 2024-09-01}",
];
static BUCKET_RELATED: [&str; 2] = ["ikea_week", "financial_year"];

static VALIDATE_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("from", "Date", "First date of the range"),
    ArgMeta::required("to", "Date", "Last date of the range (inclusive)"),
    ArgMeta::optional("timeframe", "Text", "Timeframe to check against 'valid'", "none"),
    ArgMeta::optional("valid", "Text|List", "Accepted timeframes, e.g. 'week,month'", "server default"),
];
static VALIDATE_EXAMPLES: [&str; 2] = [
    "validate_range('2024-12-01', '2024-12-10') → {valid: true}",
    "validate_range('2024-12-10', '2024-12-01') → INVALID_RANGE",
];
static VALIDATE_RELATED: [&str; 1] = ["where_clause"];

fn range_error(e: RangeError) -> Value {
    Value::Error(e.into())
}

fn predicate_object(p: &Predicate) -> Value {
    let params = p
        .params
        .iter()
        .map(|param| match param {
            SqlParam::Int(n) => Value::from(*n),
            SqlParam::Date(d) => Value::Date(*d),
        })
        .collect();

    let mut obj = HashMap::new();
    obj.insert("template".to_string(), Value::Text(p.template.clone()));
    obj.insert("params".to_string(), Value::List(params));
    obj.insert("sql".to_string(), Value::Text(p.to_sql()));
    Value::Object(obj)
}

impl FunctionPlugin for TimeColumnsFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "time_columns",
            description: "Column names to select for a timeframe",
            usage: "time_columns(timeframe, [scheme], [alias])",
            args: &TIME_COLUMNS_ARGS,
            returns: "List",
            examples: &TIME_COLUMNS_EXAMPLES,
            category: "range",
            related: &TIME_COLUMNS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("time_columns", args, 1, 3)?;
            let timeframe = get_timeframe(&args[0], "time_columns", "timeframe")?;
            let scheme = get_scheme(optional(args, 1), ctx.scheme, "time_columns")?;
            let alias = match optional(args, 2) {
                Some(v) => get_bool(v, "time_columns", "alias")?,
                None => false,
            };
            Ok(Value::from(timeframe.time_columns(scheme, alias)))
        };
        eval().unwrap_or_else(|e| e)
    }
}

impl FunctionPlugin for WhereClauseFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "where_clause",
            description: "Parameterized SQL filter selecting a date range at a timeframe",
            usage: "where_clause(from, to, timeframe, [scheme], [valid])",
            args: &WHERE_ARGS,
            returns: "Object {template, params, sql}",
            examples: &WHERE_EXAMPLES,
            category: "range",
            related: &WHERE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("where_clause", args, 3, 5)?;
            let from = get_date(&args[0], "where_clause", "from")?;
            let to = get_date(&args[1], "where_clause", "to")?;
            let timeframe = get_timeframe(&args[2], "where_clause", "timeframe")?;
            let scheme = get_scheme(optional(args, 3), ctx.scheme, "where_clause")?;
            let valid = get_valid_timeframes(optional(args, 4), ctx.valid_timeframes, "where_clause")?;

            let range = DateRange::new(from, to, timeframe).with_scheme(scheme);
            range.validate(&valid).map_err(range_error)?;
            Ok(predicate_object(&range.where_clause()))
        };
        eval().unwrap_or_else(|e| e)
    }
}

impl FunctionPlugin for TimeBucketFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "time_bucket",
            description: "Grouping key and first day of the period a date falls into",
            usage: "time_bucket(date, timeframe, [scheme])",
            args: &BUCKET_ARGS,
            returns: "Object {key, first_day}",
            examples: &BUCKET_EXAMPLES,
            category: "range",
            related: &BUCKET_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("time_bucket", args, 2, 3)?;
            let date = get_date(&args[0], "time_bucket", "date")?;
            let timeframe = get_timeframe(&args[1], "time_bucket", "timeframe")?;
            let scheme = get_scheme(optional(args, 2), ctx.scheme, "time_bucket")?;

            let bucket = TimeBucket::of(date, timeframe, scheme);
            let first_day = bucket.first_day().map_err(range_error)?;
            let mut obj = HashMap::new();
            obj.insert("key".to_string(), Value::Text(bucket.to_string()));
            obj.insert("first_day".to_string(), Value::Date(first_day));
            Ok(Value::Object(obj))
        };
        eval().unwrap_or_else(|e| e)
    }
}

impl FunctionPlugin for ValidateRangeFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "validate_range",
            description: "Check that from <= to and, if given, that the timeframe is accepted",
            usage: "validate_range(from, to, [timeframe], [valid])",
            args: &VALIDATE_ARGS,
            returns: "Object {valid, days}",
            examples: &VALIDATE_EXAMPLES,
            category: "range",
            related: &VALIDATE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &CallContext) -> Value {
        let eval = || -> Result<Value, Value> {
            check_arity("validate_range", args, 2, 4)?;
            let from = get_date(&args[0], "validate_range", "from")?;
            let to = get_date(&args[1], "validate_range", "to")?;
            let range = BasicDateRange::new(from, to);

            let checked = match optional(args, 2) {
                Some(tf) => {
                    let timeframe = get_timeframe(tf, "validate_range", "timeframe")?;
                    let valid = get_valid_timeframes(optional(args, 3), ctx.valid_timeframes, "validate_range")?;
                    DateRange::new(from, to, timeframe).validate(&valid)
                }
                None => range.validate(),
            };
            checked.map_err(range_error)?;

            let mut obj = HashMap::new();
            obj.insert("valid".to_string(), Value::Bool(true));
            obj.insert("days".to_string(), Value::Int(range.len_days()));
            Ok(Value::Object(obj))
        };
        eval().unwrap_or_else(|e| e)
    }
}
