//! FILENAME: core/pivot-table/src/definition.rs
//! Pivot Table Definition - the serializable configuration.
//!
//! A `PivotDefinition` describes a pivot table without the data: which
//! fields go on which axis, how they are bucketed and sorted, how the data
//! field is aggregated and how results are formatted. It is loaded from JSON
//! and turned into a `PivotTableFactory` with `PivotTableFactory::from_definition`.
//!
//! Custom key/value transforms are code, not configuration; attach them to
//! the fields after loading if needed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::aggregator::AggregationType;
use crate::error::PivotResult;
use crate::field::{FieldKind, PivotField, SortOrder};
use crate::format::NumberFormat;
use crate::table::DEFAULT_PATH_SEPARATOR;

// ============================================================================
// FIELD DEFINITION
// ============================================================================

/// Configuration of one field.
///
/// In JSON either a plain source column name (`"state"`) or an object
/// (`{"name": "date", "kind": "Quarter", "sort_order": "Descending"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSpec")]
pub struct FieldDefinition {
    pub name: String,
    pub title: Option<String>,
    pub kind: FieldKind,
    pub sort_order: SortOrder,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpec {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        kind: FieldKind,
        #[serde(default)]
        sort_order: SortOrder,
    },
}

impl From<FieldSpec> for FieldDefinition {
    fn from(parsed: FieldSpec) -> Self {
        match parsed {
            FieldSpec::Name(name) => FieldDefinition::new(name),
            FieldSpec::Full {
                name,
                title,
                kind,
                sort_order,
            } => FieldDefinition {
                name,
                title,
                kind,
                sort_order,
            },
        }
    }
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        FieldDefinition {
            name: name.into(),
            title: None,
            kind: FieldKind::Default,
            sort_order: SortOrder::Ascending,
        }
    }

    pub fn to_field(&self) -> PivotResult<PivotField> {
        let mut field = PivotField::new(self.name.clone())?
            .with_kind(self.kind)
            .with_sort_order(self.sort_order);
        if let Some(title) = &self.title {
            field = field.with_title(title.clone());
        }
        Ok(field)
    }
}

impl From<&PivotField> for FieldDefinition {
    fn from(field: &PivotField) -> Self {
        FieldDefinition {
            name: field.name().to_string(),
            title: (field.title() != field.name()).then(|| field.title().to_string()),
            kind: field.kind(),
            sort_order: field.sort_order(),
        }
    }
}

// ============================================================================
// PIVOT DEFINITION
// ============================================================================

/// Complete, data-free description of a pivot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotDefinition {
    #[serde(default)]
    pub title: Option<String>,

    /// Label of the grand total.
    #[serde(default)]
    pub total_title: Option<String>,

    #[serde(default)]
    pub column_fields: Vec<FieldDefinition>,

    #[serde(default)]
    pub row_fields: Vec<FieldDefinition>,

    /// Records with an already seen value of this field are skipped.
    #[serde(default)]
    pub key_field: Option<FieldDefinition>,

    #[serde(default)]
    pub data_field: Option<FieldDefinition>,

    /// Aggregation name, case-insensitive (`"sum"`, `"Average"`, `"avg"`, ...).
    #[serde(default, deserialize_with = "deserialize_aggregation")]
    pub aggregation: AggregationType,

    #[serde(default = "default_path_separator")]
    pub path_separator: String,

    #[serde(default)]
    pub number_format: NumberFormat,
}

impl Default for PivotDefinition {
    fn default() -> Self {
        PivotDefinition {
            title: None,
            total_title: None,
            column_fields: Vec::new(),
            row_fields: Vec::new(),
            key_field: None,
            data_field: None,
            aggregation: AggregationType::default(),
            path_separator: default_path_separator(),
            number_format: NumberFormat::default(),
        }
    }
}

fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.to_string()
}

fn deserialize_aggregation<'de, D>(deserializer: D) -> Result<AggregationType, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

impl PivotDefinition {
    pub fn from_json(json: &str) -> PivotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PivotResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> PivotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn column_fields(&self) -> PivotResult<Vec<PivotField>> {
        self.column_fields.iter().map(FieldDefinition::to_field).collect()
    }

    pub fn row_fields(&self) -> PivotResult<Vec<PivotField>> {
        self.row_fields.iter().map(FieldDefinition::to_field).collect()
    }

    pub fn key_field(&self) -> PivotResult<Option<PivotField>> {
        self.key_field.as_ref().map(FieldDefinition::to_field).transpose()
    }

    pub fn data_field(&self) -> PivotResult<Option<PivotField>> {
        self.data_field.as_ref().map(FieldDefinition::to_field).transpose()
    }
}
