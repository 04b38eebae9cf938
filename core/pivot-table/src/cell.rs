//! FILENAME: core/pivot-table/src/cell.rs
//! Pivot Cell - one (column leaf, row leaf) intersection.

use crate::aggregator::{AggregationType, Aggregator};
use crate::format::{format_number, NumberFormat};
use crate::node::{NodeId, NodeRef};

/// Aggregate of all records that resolve to one column path and one row path.
///
/// The cell keeps the keys and paths of its two nodes so it can be matched
/// without going back to the axes.
#[derive(Debug, Clone)]
pub struct PivotCell {
    aggregator: Aggregator,
    column: NodeId,
    row: NodeId,
    column_key: Option<String>,
    row_key: Option<String>,
    column_path: String,
    row_path: String,
}

impl PivotCell {
    /// Creates an empty cell for the given nodes. Paths are joined with `separator`.
    pub fn new(
        aggregation: AggregationType,
        column: NodeRef<'_>,
        row: NodeRef<'_>,
        separator: &str,
    ) -> Self {
        PivotCell {
            aggregator: Aggregator::new(aggregation),
            column: column.id(),
            row: row.id(),
            column_key: column.key().map(str::to_string),
            row_key: row.key().map(str::to_string),
            column_path: column.path(separator),
            row_path: row.path(separator),
        }
    }

    pub fn add_value(&mut self, value: f64) {
        self.aggregator.add(value);
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn result(&self) -> f64 {
        self.aggregator.result()
    }

    pub fn formatted_result(&self, format: &NumberFormat) -> String {
        format_number(self.result(), format)
    }

    pub fn count(&self) -> u64 {
        self.aggregator.count()
    }

    pub fn column(&self) -> NodeId {
        self.column
    }

    pub fn row(&self) -> NodeId {
        self.row
    }

    pub fn column_key(&self) -> Option<&str> {
        self.column_key.as_deref()
    }

    pub fn row_key(&self) -> Option<&str> {
        self.row_key.as_deref()
    }

    pub fn column_path(&self) -> &str {
        &self.column_path
    }

    pub fn row_path(&self) -> &str {
        &self.row_path
    }

    pub fn equals_key(&self, column_key: Option<&str>, row_key: Option<&str>) -> bool {
        self.column_key.as_deref() == column_key && self.row_key.as_deref() == row_key
    }

    pub fn equals_node(&self, column: NodeId, row: NodeId) -> bool {
        self.column == column && self.row == row
    }

    pub fn equals_path(&self, column_path: &str, row_path: &str) -> bool {
        self.column_path == column_path && self.row_path == row_path
    }
}
