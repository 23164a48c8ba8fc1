//! Grid component - a headless data grid with filtering, search, sorting,
//! pagination, selection, and column layout.
//!
//! The Grid owns six state slices and one pure derivation pipeline
//! (`filter → search → sort → paginate`); rendering, charting, and export
//! serialization stay with the host. Every slice can be host-controlled or
//! internally owned.
//!
//! # Example
//!
//! ```ignore
//! use verdant_grid::prelude::*;
//!
//! #[derive(Clone)]
//! struct Holding {
//!     id: String,
//!     project: String,
//!     status: String,
//!     total_value: Decimal,
//! }
//!
//! impl GridRow for Holding {
//!     fn id(&self) -> String { self.id.clone() }
//!
//!     fn cell(&self, key: &str) -> CellValue {
//!         match key {
//!             "project" => self.project.as_str().into(),
//!             "status" => self.status.as_str().into(),
//!             "total_value" => self.total_value.into(),
//!             _ => CellValue::Empty,
//!         }
//!     }
//! }
//!
//! let columns = vec![
//!     Column::new("project", "Project", 220).sortable().filterable(FilterKind::Text),
//!     Column::new("status", "Status", 120).filterable(FilterKind::Select {
//!         options: vec!["pending".into(), "approved".into()],
//!     }),
//!     Column::new("total_value", "Total Value", 140)
//!         .kind(ColumnKind::Number)
//!         .sortable(),
//! ];
//! let grid = Grid::with_rows(columns, holdings).selectable(true);
//!
//! grid.set_filter("status", FilterValue::Select("pending".into()));
//! grid.toggle_sort("total_value");
//! let view = grid.view();
//! ```

mod events;
mod filter;
mod item;
mod layout;
mod page;
mod pipeline;
mod sort;
mod state;

pub use events::{ExportFormat, GridHandlers, Handler};
pub use filter::{FilterSet, FilterValue};
pub use item::{
    Alignment, Column, ColumnKind, FilterKind, GridRow, MIN_COLUMN_WIDTH, validate_columns,
};
pub use layout::ResizeSession;
pub use page::{DEFAULT_PAGE_SIZE, PageConfig};
pub use pipeline::{DerivedView, derive_rows, derive_view};
pub use sort::{SortConfig, SortDirection, next_sort};
pub use state::{Grid, GridId};
