//! The derivation pipeline: rows → filtered → searched → sorted → paginated.

use super::filter::{FilterSet, row_matches_filters, row_matches_search, search_keys};
use super::item::{Column, GridRow};
use super::page::PageConfig;
use super::sort::{SortConfig, sort_rows};

/// One derived view of the data.
#[derive(Debug, Clone)]
pub struct DerivedView<T> {
    /// Rows of the current page, in display order.
    pub rows: Vec<T>,
    /// Post-filter row count; the `total` all pagination math uses.
    pub total: usize,
    /// Current page, 1-based.
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
}

impl<T: GridRow> DerivedView<T> {
    /// Ids of the rows on this page, in display order.
    pub fn row_ids(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.id()).collect()
    }
}

/// Filter, search, and sort without paginating.
///
/// This is the row set exports see: the user's filter context minus
/// pagination truncation. Pure over its inputs; the same inputs always
/// produce the same set, and re-filtering a result by the same state is a
/// fixed point.
pub fn derive_rows<T: GridRow>(
    data: &[T],
    columns: &[Column],
    query: &str,
    search_scope: Option<&[String]>,
    filters: &FilterSet,
    sort: Option<&SortConfig>,
) -> Vec<T> {
    let keys = search_keys(columns, search_scope);
    let mut rows: Vec<T> = data
        .iter()
        .filter(|row| row_matches_filters(*row, columns, filters))
        .filter(|row| query.is_empty() || row_matches_search(*row, &keys, query))
        .cloned()
        .collect();
    if let Some(cfg) = sort {
        sort_rows(&mut rows, columns, cfg);
    }
    rows
}

/// Full pipeline, pagination included.
///
/// `pagination: None` reports the whole filtered set as a single page.
/// Total over its inputs: data-shape violations degrade to placeholder
/// matches, never to a panic.
pub fn derive_view<T: GridRow>(
    data: &[T],
    columns: &[Column],
    query: &str,
    search_scope: Option<&[String]>,
    filters: &FilterSet,
    sort: Option<&SortConfig>,
    pagination: Option<&PageConfig>,
) -> DerivedView<T> {
    let rows = derive_rows(data, columns, query, search_scope, filters, sort);
    let total = rows.len();
    match pagination {
        Some(cfg) => {
            let cfg = PageConfig {
                total,
                ..cfg.clone()
            };
            let page_rows = rows[cfg.slice(total)].to_vec();
            DerivedView {
                rows: page_rows,
                total,
                page: cfg.page,
                page_size: cfg.page_size,
                page_count: cfg.page_count(),
            }
        }
        None => DerivedView {
            page: 1,
            page_size: total,
            page_count: 1,
            rows,
            total,
        },
    }
}
