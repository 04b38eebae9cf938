//! FILENAME: core/pivot-table/src/lib.rs
//! Pivot table engine over in-memory tabular data.
//!
//! A dataset (a list of records) is cross-tabulated into a column tree, a
//! row tree and a set of cells, each holding an aggregate of a numeric data
//! field. Trees and cells are built in a single pass by `PivotTableFactory`.
//!
//! Layers:
//! - `value`, `field`, `field_factory`: how records become keys and numbers
//! - `aggregator`: running aggregates (Sum, Count, Average, ...)
//! - `node`, `cell`, `table`: the built table (arena trees + cells)
//! - `factory`: configuration, validation and the build pass
//! - `definition`: JSON configuration
//! - `format`, `view`: formatted, serializable output

pub mod aggregator;
pub mod cell;
pub mod definition;
pub mod error;
pub mod factory;
pub mod field;
pub mod field_factory;
pub mod format;
pub mod node;
pub mod table;
pub mod value;
pub mod view;

pub use aggregator::{AggregationType, Aggregator};
pub use cell::PivotCell;
pub use definition::{FieldDefinition, PivotDefinition};
pub use error::{PivotError, PivotResult};
pub use factory::PivotTableFactory;
pub use field::{FieldKey, FieldKind, KeyTransform, PivotField, SortOrder, ValueTransform, BLANK_TITLE};
pub use field_factory::PivotFieldFactory;
pub use format::{format_number, presets, CurrencyPosition, NumberFormat};
pub use node::{NodeId, NodeRef, PivotAxis, PivotNode};
pub use table::{PivotTable, DEFAULT_PATH_SEPARATOR};
pub use value::{compare_keys, record, Dataset, PivotValue, Record};
pub use view::{CellView, NodeView, PivotTableView};
