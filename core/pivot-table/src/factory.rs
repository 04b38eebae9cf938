//! FILENAME: core/pivot-table/src/factory.rs
//! Pivot Table Factory - validates a configuration and builds the table.
//!
//! Algorithm (one pass over the dataset):
//! 1. Check the record carries the key field (when one is set)
//! 2. Resolve the column-field keys into a column path, creating nodes on demand
//! 3. Resolve the row-field keys into a row path the same way
//! 4. Find or create the cell at (column leaf, row leaf)
//! 5. Feed the data value to the cell, both leaves and their ancestors, and the table

use log::{debug, trace, warn};
use rustc_hash::FxHashSet;

use crate::aggregator::AggregationType;
use crate::definition::PivotDefinition;
use crate::error::{PivotError, PivotResult};
use crate::field::{FieldKey, PivotField};
use crate::node::{NodeId, PivotAxis};
use crate::table::{PivotTable, DEFAULT_PATH_SEPARATOR};
use crate::value::{Dataset, Record};

/// Builder for a `PivotTable` over one dataset.
#[derive(Debug, Clone)]
pub struct PivotTableFactory {
    dataset: Dataset,
    column_fields: Vec<PivotField>,
    row_fields: Vec<PivotField>,
    key_field: Option<PivotField>,
    data_field: Option<PivotField>,
    aggregation: AggregationType,
    title: Option<String>,
    total_title: Option<String>,
    path_separator: String,
}

impl PivotTableFactory {
    /// Starts a configuration over `dataset`. Aggregation defaults to Sum.
    pub fn instance(dataset: Dataset) -> Self {
        PivotTableFactory {
            dataset,
            column_fields: Vec::new(),
            row_fields: Vec::new(),
            key_field: None,
            data_field: None,
            aggregation: AggregationType::default(),
            title: None,
            total_title: None,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
        }
    }

    /// Builds a factory from a JSON-loadable definition.
    pub fn from_definition(definition: &PivotDefinition, dataset: Dataset) -> PivotResult<Self> {
        let mut factory = PivotTableFactory::instance(dataset)
            .with_column_fields(definition.column_fields()?)?
            .with_row_fields(definition.row_fields()?)?
            .with_aggregation(definition.aggregation)
            .with_path_separator(definition.path_separator.clone());
        if let Some(field) = definition.key_field()? {
            factory = factory.with_key_field(field);
        }
        if let Some(field) = definition.data_field()? {
            factory = factory.with_data_field(field);
        }
        if let Some(title) = &definition.title {
            factory = factory.with_title(title.clone());
        }
        if let Some(total_title) = &definition.total_title {
            factory = factory.with_total_title(total_title.clone());
        }
        Ok(factory)
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn with_column_fields(mut self, fields: Vec<PivotField>) -> PivotResult<Self> {
        check_fields("column", &fields)?;
        self.column_fields = fields;
        Ok(self)
    }

    pub fn with_row_fields(mut self, fields: Vec<PivotField>) -> PivotResult<Self> {
        check_fields("row", &fields)?;
        self.row_fields = fields;
        Ok(self)
    }

    pub fn with_key_field(mut self, field: PivotField) -> Self {
        self.key_field = Some(field);
        self
    }

    pub fn with_data_field(mut self, field: PivotField) -> Self {
        self.data_field = Some(field);
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationType) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_total_title(mut self, total_title: impl Into<String>) -> Self {
        self.total_title = Some(total_title.into());
        self
    }

    pub fn with_path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }

    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    pub fn column_fields(&self) -> &[PivotField] {
        &self.column_fields
    }

    pub fn row_fields(&self) -> &[PivotField] {
        &self.row_fields
    }

    pub fn key_field(&self) -> Option<&PivotField> {
        self.key_field.as_ref()
    }

    pub fn data_field(&self) -> Option<&PivotField> {
        self.data_field.as_ref()
    }

    pub fn aggregation(&self) -> AggregationType {
        self.aggregation
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn total_title(&self) -> Option<&str> {
        self.total_title.as_deref()
    }

    pub fn path_separator(&self) -> &str {
        &self.path_separator
    }

    // ------------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------------

    fn invalid_reason(&self) -> Option<&'static str> {
        if self.dataset.is_empty() {
            Some("dataset is empty")
        } else if self.data_field.is_none() {
            Some("no data field configured")
        } else if self.column_fields.is_empty() && self.row_fields.is_empty() {
            Some("no column or row fields configured")
        } else {
            None
        }
    }

    /// Whether `create` will build a table.
    pub fn is_valid(&self) -> bool {
        self.invalid_reason().is_none()
    }

    /// Builds the table. `Ok(None)` when the configuration is not valid or
    /// the dataset is empty; errors come from malformed records.
    pub fn create(&self) -> PivotResult<Option<PivotTable>> {
        if let Some(reason) = self.invalid_reason() {
            if self.dataset.is_empty() {
                debug!("pivot table not created: {}", reason);
            } else {
                warn!("pivot table not created: {}", reason);
            }
            return Ok(None);
        }
        let Some(data_field) = self.data_field.as_ref() else {
            return Ok(None);
        };

        debug!(
            "building pivot table: {} records, {} column fields, {} row fields, {}",
            self.dataset.len(),
            self.column_fields.len(),
            self.row_fields.len(),
            self.aggregation
        );

        let mut table = PivotTable::new(
            self.aggregation,
            self.column_fields.clone(),
            self.row_fields.clone(),
        )
        .with_title(self.title.clone())
        .with_total_title(self.total_title.clone())
        .with_key_field(self.key_field.clone())
        .with_data_field(Some(data_field.clone()))
        .with_path_separator(self.path_separator.clone());

        let mut empty_values = 0usize;

        for (index, record) in self.dataset.iter().enumerate() {
            // The key field identifies records; it is not a grouping level.
            if let Some(key_field) = &self.key_field {
                key_field.raw(record, index)?;
            }

            let value = data_field.value(record, index)?;
            let column = resolve_path(table.columns_mut(), &self.column_fields, record, index)?;
            let row = resolve_path(table.rows_mut(), &self.row_fields, record, index)?;

            let cell = table.cell_for(column, row).ok_or_else(|| {
                PivotError::InvalidArgument(format!("record {} resolved to an unknown node", index))
            })?;

            match value {
                Some(v) => {
                    cell.add_value(v);
                    table.columns_mut().add_value(column, v);
                    table.rows_mut().add_value(row, v);
                    table.add_total_value(v);
                }
                None => {
                    trace!("record {}: empty '{}' not aggregated", index, data_field.name());
                    empty_values += 1;
                }
            }
        }

        debug!(
            "pivot table built: {} column nodes, {} row nodes, {} cells, {} empty values",
            table.columns().len(),
            table.rows().len(),
            table.cells().len(),
            empty_values
        );

        Ok(Some(table))
    }
}

/// A field list may not use the same source field twice.
fn check_fields(area: &str, fields: &[PivotField]) -> PivotResult<()> {
    let mut names = FxHashSet::default();
    for field in fields {
        if !names.insert(field.name()) {
            return Err(PivotError::InvalidArgument(format!(
                "{} field '{}' is configured more than once",
                area,
                field.name()
            )));
        }
    }
    Ok(())
}

/// Walks (and extends) `axis` along the keys of `record`; returns the leaf.
fn resolve_path(
    axis: &mut PivotAxis,
    fields: &[PivotField],
    record: &Record,
    index: usize,
) -> PivotResult<NodeId> {
    let mut node = NodeId::ROOT;
    for (level, field) in fields.iter().enumerate() {
        let FieldKey { key, title } = field.key(record, index)?;
        node = axis.find_or_add(node, &key, &title)?;
        // Children of this level are ordered by the next field.
        if let Some(next) = fields.get(level + 1) {
            axis.set_sort_order(node, next.sort_order())?;
        }
    }
    Ok(node)
}
