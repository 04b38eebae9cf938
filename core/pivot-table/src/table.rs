//! FILENAME: core/pivot-table/src/table.rs
//! Pivot Table - the built cross-tabulation.
//!
//! Holds both axes, the flat cell list and the table-level aggregate, plus
//! the configuration it was built from. Cells are only added during the
//! build pass; afterwards the table is read-only.

use rustc_hash::FxHashMap;

use crate::aggregator::{AggregationType, Aggregator};
use crate::cell::PivotCell;
use crate::field::PivotField;
use crate::format::{format_number, NumberFormat};
use crate::node::{NodeId, NodeRef, PivotAxis};
use crate::view::PivotTableView;

/// Separator used for cell paths unless configured otherwise.
pub const DEFAULT_PATH_SEPARATOR: &str = "/";

#[derive(Debug, Clone)]
pub struct PivotTable {
    aggregator: Aggregator,
    title: Option<String>,
    total_title: Option<String>,
    columns: PivotAxis,
    rows: PivotAxis,
    cells: Vec<PivotCell>,
    /// (column, row) -> position in `cells`.
    cell_index: FxHashMap<(NodeId, NodeId), usize>,
    column_fields: Vec<PivotField>,
    row_fields: Vec<PivotField>,
    key_field: Option<PivotField>,
    data_field: Option<PivotField>,
    path_separator: String,
}

impl PivotTable {
    /// Creates an empty table with root nodes on both axes. The roots order
    /// their children by the first column/row field.
    pub fn new(
        aggregation: AggregationType,
        column_fields: Vec<PivotField>,
        row_fields: Vec<PivotField>,
    ) -> Self {
        let first_order = |fields: &[PivotField]| {
            fields.first().map(PivotField::sort_order).unwrap_or_default()
        };
        let columns = PivotAxis::new("Columns", aggregation)
            .with_root_sort_order(first_order(column_fields.as_slice()));
        let rows = PivotAxis::new("Rows", aggregation)
            .with_root_sort_order(first_order(row_fields.as_slice()));

        PivotTable {
            aggregator: Aggregator::new(aggregation),
            title: None,
            total_title: None,
            columns,
            rows,
            cells: Vec::new(),
            cell_index: FxHashMap::default(),
            column_fields,
            row_fields,
            key_field: None,
            data_field: None,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_total_title(mut self, total_title: Option<String>) -> Self {
        self.total_title = total_title;
        self
    }

    pub fn with_key_field(mut self, key_field: Option<PivotField>) -> Self {
        self.key_field = key_field;
        self
    }

    pub fn with_data_field(mut self, data_field: Option<PivotField>) -> Self {
        self.data_field = data_field;
        self
    }

    pub fn with_path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }

    // ------------------------------------------------------------------------
    // Build-time mutation
    // ------------------------------------------------------------------------

    pub(crate) fn columns_mut(&mut self) -> &mut PivotAxis {
        &mut self.columns
    }

    pub(crate) fn rows_mut(&mut self) -> &mut PivotAxis {
        &mut self.rows
    }

    /// Feeds the table-level aggregate.
    pub(crate) fn add_total_value(&mut self, value: f64) {
        self.aggregator.add(value);
    }

    /// Appends a cell. No duplicate check: the first cell for a node pair
    /// stays the one returned by `find_cell_by_node`.
    pub fn add_cell(&mut self, cell: PivotCell) {
        self.cell_index
            .entry((cell.column(), cell.row()))
            .or_insert(self.cells.len());
        self.cells.push(cell);
    }

    /// Creates an empty cell for the given nodes and returns it.
    /// `None` if either id does not belong to its axis.
    pub fn add_cell_value(&mut self, column: NodeId, row: NodeId) -> Option<&mut PivotCell> {
        let cell = PivotCell::new(
            self.aggregator.kind(),
            self.columns.node(column)?,
            self.rows.node(row)?,
            &self.path_separator,
        );
        self.add_cell(cell);
        self.cells.last_mut()
    }

    /// Existing cell for the node pair, or a new one.
    pub(crate) fn cell_for(&mut self, column: NodeId, row: NodeId) -> Option<&mut PivotCell> {
        let existing = self.cell_index.get(&(column, row)).copied();
        match existing {
            Some(i) => self.cells.get_mut(i),
            None => self.add_cell_value(column, row),
        }
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn find_cell_by_key(&self, column_key: Option<&str>, row_key: Option<&str>) -> Option<&PivotCell> {
        self.cells.iter().find(|c| c.equals_key(column_key, row_key))
    }

    pub fn find_cell_by_node(&self, column: NodeId, row: NodeId) -> Option<&PivotCell> {
        self.cell_index
            .get(&(column, row))
            .and_then(|&i| self.cells.get(i))
    }

    pub fn find_cell_by_path(&self, column_path: &str, row_path: &str) -> Option<&PivotCell> {
        self.cells.iter().find(|c| c.equals_path(column_path, row_path))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn root_column(&self) -> NodeRef<'_> {
        self.columns.root()
    }

    pub fn root_row(&self) -> NodeRef<'_> {
        self.rows.root()
    }

    pub fn columns(&self) -> &PivotAxis {
        &self.columns
    }

    pub fn rows(&self) -> &PivotAxis {
        &self.rows
    }

    pub fn cells(&self) -> &[PivotCell] {
        &self.cells
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

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn total_title(&self) -> Option<&str> {
        self.total_title.as_deref()
    }

    pub fn path_separator(&self) -> &str {
        &self.path_separator
    }

    pub fn aggregation(&self) -> AggregationType {
        self.aggregator.kind()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Grand total over every aggregated record.
    pub fn result(&self) -> f64 {
        self.aggregator.result()
    }

    pub fn formatted_result(&self, format: &NumberFormat) -> String {
        format_number(self.result(), format)
    }

    /// Serializable snapshot for renderers.
    pub fn view(&self, format: &NumberFormat) -> PivotTableView {
        PivotTableView::from_table(self, format)
    }
}
