//! Generic record table
//!
//! Maps a list of field descriptors and a list of records onto a grid with a
//! trailing per-row action column. The grid model is a pure function of its
//! inputs; `RecordTable` adds selection and terminal rendering on top.

pub mod grid;
pub mod priority;
pub mod widget;

pub use grid::{build_grid, GridCell, GridRow, GridView, TableConfig};
pub use priority::{classify, CellStyle};
pub use widget::{RecordTable, RowActionHandler};
