//! Error types

/// Column-schema validation failures.
///
/// The engine logs schema problems and proceeds; hosts that want a hard
/// failure call [`validate_columns`](crate::grid::validate_columns) before
/// constructing a grid.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// Two columns share an id.
    #[error("Duplicate column id '{id}'")]
    DuplicateColumnId { id: String },

    /// A column's minimum width exceeds its maximum.
    #[error("Column '{id}' min width {min} exceeds max width {max}")]
    WidthBounds { id: String, min: u16, max: u16 },
}

impl SchemaError {
    /// Creates a duplicate-id error.
    pub fn duplicate_column_id(id: impl Into<String>) -> Self {
        Self::DuplicateColumnId { id: id.into() }
    }

    /// Creates a width-bounds error.
    pub fn width_bounds(id: impl Into<String>, min: u16, max: u16) -> Self {
        Self::WidthBounds {
            id: id.into(),
            min,
            max,
        }
    }
}

/// Failure to parse an export format name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown export format '{0}', expected csv, excel, or pdf")]
pub struct ParseExportFormatError(pub String);
