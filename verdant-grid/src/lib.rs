pub mod controlled;
pub mod error;
pub mod grid;
pub mod selection;
pub mod value;

pub use grid::Grid;

pub mod prelude {
    pub use crate::controlled::StateCell;
    pub use crate::error::{ParseExportFormatError, SchemaError};
    pub use crate::grid::{
        Alignment, Column, ColumnKind, DerivedView, ExportFormat, FilterKind, FilterSet,
        FilterValue, Grid, GridHandlers, GridId, GridRow, PageConfig, ResizeSession, SortConfig,
        SortDirection, validate_columns,
    };
    pub use crate::selection::{SelectAllState, Selection};
    pub use crate::value::CellValue;
}
