//! Export formats and handler composition for the Grid.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ParseExportFormatError;

use super::filter::FilterSet;
use super::item::{Column, GridRow};
use super::page::PageConfig;
use super::sort::SortConfig;

/// Export formats the host can be asked to fulfill.
///
/// The engine never serializes; it hands the filtered+sorted row set to the
/// host's export handler together with the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = ParseExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ParseExportFormatError(s.to_string())),
        }
    }
}

/// Shared handler slot.
pub type Handler<V> = Arc<dyn Fn(&V) + Send + Sync>;

/// Handler composition for a grid.
///
/// This struct holds all notifications a host can subscribe to. Any slot can
/// be set; unset slots are never called. Mutations fire their slot with the
/// next value whether the slice is controlled or not - for controlled slices
/// that call is the host's cue to adopt the change.
pub struct GridHandlers<T: GridRow> {
    /// Selection changed; payload is the full selected-id list.
    pub on_selection_change: Option<Handler<Vec<String>>>,
    /// Sort state changed (`None` payload means "unsorted").
    pub on_sort_change: Option<Handler<Option<SortConfig>>>,
    /// A per-column filter was set or cleared.
    pub on_filter_change: Option<Handler<FilterSet>>,
    /// The free-text query changed.
    pub on_search_change: Option<Handler<String>>,
    /// Page or page size changed; `total` is refreshed before firing.
    pub on_pagination_change: Option<Handler<PageConfig>>,
    /// Column layout changed (visibility, width, or order).
    pub on_columns_change: Option<Handler<Vec<Column>>>,
    /// Export requested; rows are the filtered+sorted, unpaginated set.
    pub on_export: Option<Arc<dyn Fn(ExportFormat, &[T]) + Send + Sync>>,
    /// A row was activated (clicked/entered).
    pub on_row_activate: Option<Arc<dyn Fn(&T) + Send + Sync>>,
}

impl<T: GridRow> Default for GridHandlers<T> {
    fn default() -> Self {
        Self {
            on_selection_change: None,
            on_sort_change: None,
            on_filter_change: None,
            on_search_change: None,
            on_pagination_change: None,
            on_columns_change: None,
            on_export: None,
            on_row_activate: None,
        }
    }
}

impl<T: GridRow> Clone for GridHandlers<T> {
    fn clone(&self) -> Self {
        Self {
            on_selection_change: self.on_selection_change.clone(),
            on_sort_change: self.on_sort_change.clone(),
            on_filter_change: self.on_filter_change.clone(),
            on_search_change: self.on_search_change.clone(),
            on_pagination_change: self.on_pagination_change.clone(),
            on_columns_change: self.on_columns_change.clone(),
            on_export: self.on_export.clone(),
            on_row_activate: self.on_row_activate.clone(),
        }
    }
}

impl<T: GridRow> fmt::Debug for GridHandlers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridHandlers")
            .field("on_selection_change", &self.on_selection_change.is_some())
            .field("on_sort_change", &self.on_sort_change.is_some())
            .field("on_filter_change", &self.on_filter_change.is_some())
            .field("on_search_change", &self.on_search_change.is_some())
            .field("on_pagination_change", &self.on_pagination_change.is_some())
            .field("on_columns_change", &self.on_columns_change.is_some())
            .field("on_export", &self.on_export.is_some())
            .field("on_row_activate", &self.on_row_activate.is_some())
            .finish()
    }
}
