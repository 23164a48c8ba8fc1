//! Column schema and the GridRow trait.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::CellValue;

/// Default minimum width for a resizable column, in pixels.
pub const MIN_COLUMN_WIDTH: u16 = 40;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Declared cell kind of a column.
///
/// Drives the default search scope (`Text` columns) and lets hosts pick
/// appropriate filter editors; the pipeline itself dispatches on resolved
/// [`CellValue`]s, so a mismatched declaration degrades rather than fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    Custom,
}

/// Filter descriptor attached to a filterable column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum FilterKind {
    /// Case-insensitive substring match.
    Text,
    /// Exact value or inclusive `{min, max}` range.
    Number,
    /// Exact match against one of the options.
    Select { options: Vec<String> },
    /// Inclusive date interval.
    Date,
}

/// Column configuration.
///
/// `id` identifies the column in filter/sort/layout state; `key` is the data
/// key rows resolve (defaults to the id). The runtime column list carried by
/// a grid is a copy of this schema whose `hidden` and `width` fields double
/// as the layout overrides.
///
/// # Examples
///
/// ```ignore
/// let columns = vec![
///     Column::new("project", "Project", 220).sortable().filterable(FilterKind::Text),
///     Column::new("total_value", "Total Value", 140)
///         .kind(ColumnKind::Number)
///         .align(Alignment::Right)
///         .sortable(),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Unique identifier within a registry.
    pub id: String,
    /// Data key rows resolve for this column.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Current width in pixels.
    pub width: u16,
    /// Lower resize bound.
    pub min_width: u16,
    /// Upper resize bound; unbounded when absent.
    pub max_width: Option<u16>,
    pub align: Alignment,
    pub kind: ColumnKind,
    /// Whether header clicks may sort by this column.
    pub sortable: bool,
    /// Whether this column may receive a filter entry.
    pub filterable: bool,
    /// Whether resize sessions may target this column.
    pub resizable: bool,
    /// Hidden columns are excluded from the visible set and from search.
    pub hidden: bool,
    /// Optional header group label.
    pub group: Option<String>,
    /// Filter editor descriptor, when filterable.
    pub filter: Option<FilterKind>,
}

impl Column {
    /// Create a new column with explicit width.
    ///
    /// Width carries no default. The data key starts out equal to the id;
    /// override it with [`key`](Column::key) when they differ.
    pub fn new(id: impl Into<String>, title: impl Into<String>, width: u16) -> Self {
        let id = id.into();
        Self {
            key: id.clone(),
            id,
            title: title.into(),
            width,
            min_width: MIN_COLUMN_WIDTH,
            max_width: None,
            align: Alignment::Left,
            kind: ColumnKind::Text,
            sortable: false,
            filterable: false,
            resizable: false,
            hidden: false,
            group: None,
            filter: None,
        }
    }

    /// Bind a data key different from the column id.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the declared cell kind.
    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column filterable with the given descriptor.
    pub fn filterable(mut self, filter: FilterKind) -> Self {
        self.filterable = true;
        self.filter = Some(filter);
        self
    }

    /// Make the column resizable.
    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    /// Start the column hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the header group label.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the lower resize bound.
    pub fn min_width(mut self, min: u16) -> Self {
        self.min_width = min;
        self
    }

    /// Set the upper resize bound.
    pub fn max_width(mut self, max: u16) -> Self {
        self.max_width = Some(max);
        self
    }
}

/// Check a column schema for duplicate ids and inverted width bounds.
///
/// Grids accept any schema and only log problems; hosts call this when they
/// want the hard check.
pub fn validate_columns(columns: &[Column]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for col in columns {
        if !seen.insert(col.id.as_str()) {
            return Err(SchemaError::duplicate_column_id(&col.id));
        }
        if let Some(max) = col.max_width
            && col.min_width > max
        {
            return Err(SchemaError::width_bounds(&col.id, col.min_width, max));
        }
    }
    Ok(())
}

/// Trait for records displayed as grid rows.
///
/// # Examples
///
/// ```ignore
/// #[derive(Clone)]
/// struct Holding {
///     id: String,
///     project: String,
///     total_value: Decimal,
/// }
///
/// impl GridRow for Holding {
///     fn id(&self) -> String {
///         self.id.clone()
///     }
///
///     fn cell(&self, key: &str) -> CellValue {
///         match key {
///             "project" => self.project.as_str().into(),
///             "total_value" => self.total_value.into(),
///             _ => CellValue::Empty,
///         }
///     }
/// }
/// ```
pub trait GridRow: Send + Sync + Clone + 'static {
    /// Stable unique identifier for this row.
    ///
    /// Selection is keyed by it, so it must survive re-fetches of the data.
    fn id(&self) -> String;

    /// Resolve a bound column key.
    ///
    /// Unknown keys resolve to [`CellValue::Empty`], never an error.
    fn cell(&self, key: &str) -> CellValue;

    /// Formatting hook for display and search text.
    ///
    /// Defaults to the cell's `Display`; override per key for custom
    /// rendering (currency symbols, percentage formatting, and so on).
    fn display(&self, key: &str) -> String {
        self.cell(key).to_string()
    }
}
