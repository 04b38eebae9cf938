//! FILENAME: core/pivot-table/src/view.rs
//! Pivot View - serializable snapshot of a built table.
//!
//! The view flattens the arena into owned, nested structures a renderer
//! (or a JSON consumer) can walk without access to the axes:
//! - column and row trees with per-node totals
//! - the flat list of cells addressed by path
//! - the grand total
//!
//! Every result is carried both raw and formatted with the requested
//! `NumberFormat`.

use serde::{Deserialize, Serialize};

use crate::aggregator::AggregationType;
use crate::cell::PivotCell;
use crate::format::{format_number, NumberFormat};
use crate::node::NodeRef;
use crate::table::PivotTable;

// ============================================================================
// NODE VIEW
// ============================================================================

/// One node of a column or row tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    /// `None` for the root.
    pub key: Option<String>,
    pub title: String,
    /// Keys from the root to this node, joined by the table's separator.
    pub path: String,
    pub depth: usize,
    pub result: f64,
    pub formatted_result: String,
    /// Number of aggregated values.
    pub count: u64,
    pub children: Vec<NodeView>,
}

impl NodeView {
    fn from_node(node: NodeRef<'_>, separator: &str, format: &NumberFormat) -> Self {
        NodeView {
            key: node.key().map(str::to_string),
            title: node.title().to_string(),
            path: node.path(separator),
            depth: node.depth(),
            result: node.result(),
            formatted_result: format_number(node.result(), format),
            count: node.count(),
            children: node
                .children()
                .map(|child| NodeView::from_node(child, separator, format))
                .collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaves below this node in display order (the node itself if it is one).
    pub fn leaves(&self) -> Vec<&NodeView> {
        if self.is_leaf() {
            return vec![self];
        }
        self.children.iter().flat_map(NodeView::leaves).collect()
    }
}

// ============================================================================
// CELL VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub column_key: Option<String>,
    pub row_key: Option<String>,
    pub column_path: String,
    pub row_path: String,
    pub result: f64,
    pub formatted_result: String,
    pub count: u64,
}

impl CellView {
    fn from_cell(cell: &PivotCell, format: &NumberFormat) -> Self {
        CellView {
            column_key: cell.column_key().map(str::to_string),
            row_key: cell.row_key().map(str::to_string),
            column_path: cell.column_path().to_string(),
            row_path: cell.row_path().to_string(),
            result: cell.result(),
            formatted_result: cell.formatted_result(format),
            count: cell.count(),
        }
    }
}

// ============================================================================
// TABLE VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTableView {
    pub title: Option<String>,
    pub total_title: Option<String>,
    pub aggregation: AggregationType,
    /// Titles of the column fields, outermost first.
    pub column_fields: Vec<String>,
    pub row_fields: Vec<String>,
    pub data_field: Option<String>,
    pub result: f64,
    pub formatted_result: String,
    pub columns: NodeView,
    pub rows: NodeView,
    /// Cells in creation order.
    pub cells: Vec<CellView>,
}

impl PivotTableView {
    pub fn from_table(table: &PivotTable, format: &NumberFormat) -> Self {
        let separator = table.path_separator();
        PivotTableView {
            title: table.title().map(str::to_string),
            total_title: table.total_title().map(str::to_string),
            aggregation: table.aggregation(),
            column_fields: table.column_fields().iter().map(|f| f.title().to_string()).collect(),
            row_fields: table.row_fields().iter().map(|f| f.title().to_string()).collect(),
            data_field: table.data_field().map(|f| f.title().to_string()),
            result: table.result(),
            formatted_result: table.formatted_result(format),
            columns: NodeView::from_node(table.root_column(), separator, format),
            rows: NodeView::from_node(table.root_row(), separator, format),
            cells: table
                .cells()
                .iter()
                .map(|cell| CellView::from_cell(cell, format))
                .collect(),
        }
    }

    pub fn cell(&self, column_path: &str, row_path: &str) -> Option<&CellView> {
        self.cells
            .iter()
            .find(|c| c.column_path == column_path && c.row_path == row_path)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
