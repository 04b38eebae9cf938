//! FILENAME: core/pivot-table/src/field.rs
//! Pivot Field - how a record becomes a grouping key or a data value.
//!
//! A field names a source column of the dataset and carries the rules that
//! turn the raw scalar into:
//! - a grouping key plus display title (row/column fields), or
//! - a number (the data field).
//!
//! Calendar kinds bucket dates (Year, Semester, Quarter, Month). Custom
//! transforms run on the raw value before the kind is applied.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PivotError, PivotResult};
use crate::value::{format_key_number, PivotValue, Record};

/// Display title used for records whose grouping value is empty.
pub const BLANK_TITLE: &str = "(blank)";

/// Custom key transform: raw value -> value to group by.
pub type KeyTransform = Arc<dyn Fn(&PivotValue) -> PivotValue + Send + Sync>;

/// Custom value transform applied to the numeric data value.
pub type ValueTransform = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

// ============================================================================
// FIELD KIND / SORT ORDER
// ============================================================================

/// How the raw value is bucketed into a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FieldKind {
    /// Raw value as is.
    #[default]
    Default,
    /// Truncated to an integer.
    Integer,
    /// Parsed as a float.
    Float,
    Year,
    Semester,
    Quarter,
    Month,
}

/// Sort order for the items of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
    /// Order of first appearance in the dataset.
    #[serde(alias = "None")]
    DataSourceOrder,
}

// ============================================================================
// FIELD KEY
// ============================================================================

/// Grouping key of one record for one field, with its display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub key: String,
    pub title: String,
}

impl FieldKey {
    fn same(label: String) -> Self {
        FieldKey {
            title: label.clone(),
            key: label,
        }
    }

    fn blank() -> Self {
        FieldKey {
            key: String::new(),
            title: BLANK_TITLE.to_string(),
        }
    }
}

// ============================================================================
// PIVOT FIELD
// ============================================================================

/// A source column used as a row field, column field, key field or data field.
#[derive(Clone, Serialize)]
pub struct PivotField {
    name: String,
    title: String,
    kind: FieldKind,
    sort_order: SortOrder,
    #[serde(skip)]
    key_transform: Option<KeyTransform>,
    #[serde(skip)]
    value_transform: Option<ValueTransform>,
}

impl fmt::Debug for PivotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PivotField")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("sort_order", &self.sort_order)
            .field("key_transform", &self.key_transform.is_some())
            .field("value_transform", &self.value_transform.is_some())
            .finish()
    }
}

impl PivotField {
    /// Creates a field reading `name`. The name must not be blank.
    pub fn new(name: impl Into<String>) -> PivotResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PivotError::InvalidArgument(
                "pivot field name must not be empty".to_string(),
            ));
        }
        Ok(PivotField {
            title: name.clone(),
            name,
            kind: FieldKind::Default,
            sort_order: SortOrder::Ascending,
            key_transform: None,
            value_transform: None,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_key_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&PivotValue) -> PivotValue + Send + Sync + 'static,
    {
        self.key_transform = Some(Arc::new(transform));
        self
    }

    pub fn with_value_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.value_transform = Some(Arc::new(transform));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn has_key_transform(&self) -> bool {
        self.key_transform.is_some()
    }

    pub fn has_value_transform(&self) -> bool {
        self.value_transform.is_some()
    }

    /// Raw value of this field in `record` (record index is for error reporting).
    pub fn raw<'r>(&self, record: &'r Record, index: usize) -> PivotResult<&'r PivotValue> {
        record.get(&self.name).ok_or_else(|| PivotError::MissingField {
            field: self.name.clone(),
            record: index,
        })
    }

    /// Grouping key and title of `record` for this field.
    pub fn key(&self, record: &Record, index: usize) -> PivotResult<FieldKey> {
        let raw = self.raw(record, index)?;
        let transformed;
        let value = match &self.key_transform {
            Some(transform) => {
                transformed = transform(raw);
                &transformed
            }
            None => raw,
        };

        if value.is_empty() {
            return Ok(FieldKey::blank());
        }

        match self.kind {
            FieldKind::Default => Ok(FieldKey::same(value.label())),
            FieldKind::Integer => {
                let n = self.number(value, index)?;
                Ok(FieldKey::same(format_key_number(n.trunc())))
            }
            FieldKind::Float => {
                let n = self.number(value, index)?;
                Ok(FieldKey::same(format_key_number(n)))
            }
            FieldKind::Year | FieldKind::Semester | FieldKind::Quarter | FieldKind::Month => {
                let date = value.as_date().ok_or_else(|| PivotError::NotADate {
                    field: self.name.clone(),
                    value: value.label(),
                })?;
                Ok(calendar_key(self.kind, date))
            }
        }
    }

    /// Numeric data value of `record`. `None` when the value is empty.
    pub fn value(&self, record: &Record, index: usize) -> PivotResult<Option<f64>> {
        let raw = self.raw(record, index)?;
        if raw.is_empty() {
            return Ok(None);
        }

        let mut n = self.number(raw, index)?;
        if self.kind == FieldKind::Integer {
            n = n.trunc();
        }
        if let Some(transform) = &self.value_transform {
            n = transform(n);
        }
        Ok(Some(n))
    }

    fn number(&self, value: &PivotValue, index: usize) -> PivotResult<f64> {
        value.to_number().ok_or_else(|| PivotError::NotNumeric {
            field: self.name.clone(),
            record: index,
            value: value.label(),
        })
    }
}

fn calendar_key(kind: FieldKind, date: NaiveDate) -> FieldKey {
    let year = date.year();
    match kind {
        FieldKind::Semester => {
            let semester = if date.month() <= 6 { 1 } else { 2 };
            let ordinal = if semester == 1 { "1st" } else { "2nd" };
            FieldKey {
                key: format!("{}-S{}", year, semester),
                title: format!("{} semester {}", ordinal, year),
            }
        }
        FieldKind::Quarter => {
            let quarter = (date.month() - 1) / 3 + 1;
            FieldKey {
                key: format!("{}-Q{}", year, quarter),
                title: format!("Q{} {}", quarter, year),
            }
        }
        FieldKind::Month => FieldKey {
            key: date.format("%Y-%m").to_string(),
            title: date.format("%B %Y").to_string(),
        },
        _ => FieldKey::same(year.to_string()),
    }
}
