//! FILENAME: core/pivot-table/src/value.rs
//! Source data model: scalar values, records and datasets.
//!
//! A dataset is an ordered list of records; each record maps a field name to
//! a scalar. Values are deserialized untagged, so a JSON array of objects is
//! a valid dataset.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A single scalar from the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PivotValue {
    Empty,
    Boolean(bool),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

/// One row of source data.
pub type Record = FxHashMap<String, PivotValue>;

/// The whole source data, in source order.
pub type Dataset = Vec<Record>;

/// Text layouts accepted as dates.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

impl PivotValue {
    pub fn text(s: impl Into<String>) -> Self {
        PivotValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PivotValue::Empty => true,
            PivotValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Renders the value as a grouping key.
    pub fn label(&self) -> String {
        match self {
            PivotValue::Empty => String::new(),
            PivotValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            PivotValue::Number(n) => format_key_number(*n),
            PivotValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            PivotValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            PivotValue::Text(s) => s.clone(),
        }
    }

    /// Numeric reading of the value. `None` for empty and non-numeric values.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            PivotValue::Number(n) => Some(*n),
            PivotValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            PivotValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Calendar date held by the value, parsing text when needed.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PivotValue::Date(d) => Some(*d),
            PivotValue::DateTime(dt) => Some(dt.date()),
            PivotValue::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Integral numbers render without a decimal point so that `2024.0`
/// groups under the key `2024`.
pub(crate) fn format_key_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Orders two grouping keys: numeric keys first (compared as numbers),
/// then text keys (compared lexically).
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(na), Some(nb)) => na.total_cmp(&nb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Finite numbers only: "NaN" or "Infinity" are text keys.
fn numeric_key(key: &str) -> Option<f64> {
    key.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Builds a record from `(field, value)` pairs.
pub fn record<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<PivotValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl From<f64> for PivotValue {
    fn from(value: f64) -> Self {
        PivotValue::Number(value)
    }
}

impl From<i64> for PivotValue {
    fn from(value: i64) -> Self {
        PivotValue::Number(value as f64)
    }
}

impl From<i32> for PivotValue {
    fn from(value: i32) -> Self {
        PivotValue::Number(value as f64)
    }
}

impl From<bool> for PivotValue {
    fn from(value: bool) -> Self {
        PivotValue::Boolean(value)
    }
}

impl From<&str> for PivotValue {
    fn from(value: &str) -> Self {
        PivotValue::Text(value.to_string())
    }
}

impl From<String> for PivotValue {
    fn from(value: String) -> Self {
        PivotValue::Text(value)
    }
}

impl From<NaiveDate> for PivotValue {
    fn from(value: NaiveDate) -> Self {
        PivotValue::Date(value)
    }
}

impl<T: Into<PivotValue>> From<Option<T>> for PivotValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PivotValue::Empty, Into::into)
    }
}
