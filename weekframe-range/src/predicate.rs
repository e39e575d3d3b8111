//! Parameterized SQL predicates

use serde::{Deserialize, Serialize};
use std::fmt;
use weekframe_core::CalendarDate;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i32),
    Date(CalendarDate),
}

impl SqlParam {
    /// Literal SQL form: integers verbatim, dates as quoted `'YYYY-MM-DD'`
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlParam::Int(n) => n.to_string(),
            SqlParam::Date(d) => format!("'{}'", d),
        }
    }
}

impl From<i32> for SqlParam {
    fn from(n: i32) -> Self {
        SqlParam::Int(n)
    }
}

impl SqlParam {
    /// A week or month number
    pub(crate) fn unit(n: u32) -> Self {
        debug_assert!(i32::try_from(n).is_ok(), "unit {n} does not fit a column value");
        SqlParam::Int(i32::try_from(n).unwrap_or(i32::MAX))
    }
}

impl From<CalendarDate> for SqlParam {
    fn from(d: CalendarDate) -> Self {
        SqlParam::Date(d)
    }
}

/// A boolean filter expression with `?` placeholders and its ordered values
///
/// The template only ever contains column names and operators; every value
/// travels in `params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub template: String,
    pub params: Vec<SqlParam>,
}

impl Predicate {
    pub fn new(template: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            template: template.into(),
            params,
        }
    }

    /// Wrap the template in parentheses so it can be AND-ed with other filters
    pub fn parenthesized(self) -> Self {
        Self {
            template: format!("({})", self.template),
            params: self.params,
        }
    }

    /// Render with every placeholder replaced by its literal value
    ///
    /// Safe because params are typed integers and validated dates; prefer
    /// binding `template` + `params` when the driver supports it.
    pub fn to_sql(&self) -> String {
        let mut params = self.params.iter();
        let mut out = String::with_capacity(self.template.len() + 8 * self.params.len());
        for c in self.template.chars() {
            if c == '?' {
                if let Some(p) = params.next() {
                    out.push_str(&p.to_sql_literal());
                    continue;
                }
            }
            out.push(c);
        }
        out
    }

    /// Number of `?` placeholders in the template
    pub fn placeholder_count(&self) -> usize {
        self.template.matches('?').count()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}
