//! Grid state.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::controlled::StateCell;
use crate::selection::{SelectAllState, Selection};

use super::events::{ExportFormat, GridHandlers};
use super::filter::{FilterSet, FilterValue, row_matches_filters, row_matches_search, search_keys};
use super::item::{Column, GridRow, validate_columns};
use super::layout::{self, ResizeSession};
use super::page::PageConfig;
use super::pipeline::{DerivedView, derive_rows, derive_view};
use super::sort::{SortConfig, next_sort};

/// Unique identifier for a Grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

/// Capability toggles for a grid instance.
///
/// Everything is enabled by default except selection, which hosts opt into.
#[derive(Debug, Clone)]
struct GridOptions {
    selectable: bool,
    sortable: bool,
    filterable: bool,
    searchable: bool,
    paginated: bool,
    column_toggle: bool,
    /// Column ids participating in free-text search; `None` means every
    /// visible text column.
    search_scope: Option<Vec<String>>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            selectable: false,
            sortable: true,
            filterable: true,
            searchable: true,
            paginated: true,
            column_toggle: true,
            search_scope: None,
        }
    }
}

/// Internal state for the Grid.
#[derive(Debug)]
struct GridInner<T: GridRow> {
    /// Runtime column registry (schema plus layout overrides).
    columns: StateCell<Vec<Column>>,
    /// The raw row collection.
    rows: Vec<T>,
    /// Free-text query.
    search: StateCell<String>,
    /// Per-column filter values.
    filters: StateCell<FilterSet>,
    /// Active sort, if any.
    sort: StateCell<Option<SortConfig>>,
    /// Page state; `total` is refreshed from the filtered set.
    pagination: StateCell<PageConfig>,
    /// Selected row ids.
    selection: StateCell<Selection>,
    /// In-flight column resize, if any.
    resize: Option<ResizeSession>,
    options: GridOptions,
    /// Presentational only; gates no state transition.
    loading: bool,
}

impl<T: GridRow> GridInner<T> {
    fn new(columns: Vec<Column>) -> Self {
        Self {
            columns: StateCell::new(columns),
            rows: Vec::new(),
            search: StateCell::new(String::new()),
            filters: StateCell::new(FilterSet::new()),
            sort: StateCell::new(None),
            pagination: StateCell::new(PageConfig::default()),
            selection: StateCell::new(Selection::new()),
            resize: None,
            options: GridOptions::default(),
            loading: false,
        }
    }

    /// Run the full derivation pipeline over the current state.
    fn derived(&self) -> DerivedView<T> {
        let pagination = self
            .options
            .paginated
            .then(|| self.pagination.get().clone());
        derive_view(
            &self.rows,
            self.columns.get(),
            self.search.get(),
            self.options.search_scope.as_deref(),
            self.filters.get(),
            self.sort.get().as_ref(),
            pagination.as_ref(),
        )
    }

    /// Post-filter row count, without cloning any row.
    fn filtered_len(&self) -> usize {
        let columns = self.columns.get();
        let filters = self.filters.get();
        let query = self.search.get();
        let keys = search_keys(columns, self.options.search_scope.as_deref());
        self.rows
            .iter()
            .filter(|row| row_matches_filters(*row, columns, filters))
            .filter(|row| query.is_empty() || row_matches_search(*row, &keys, query))
            .count()
    }

    fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.get().iter().find(|c| c.id == column_id)
    }
}

/// A headless data grid: raw rows plus a column schema in, derived view out.
///
/// `Grid<T>` owns six state slices - column layout, search, per-column
/// filters, sort, pagination, and selection - and recomputes one derivation
/// pipeline (`filter → search → sort → paginate`) whenever any of them
/// changes. Every slice supports controlled operation: a value supplied via
/// the matching `control_*` method is authoritative on every read, and
/// mutations merely notify the host instead of writing.
///
/// State is per instance; two grids share nothing.
#[derive(Debug)]
pub struct Grid<T: GridRow> {
    /// Unique identifier.
    id: GridId,
    /// Internal state.
    inner: Arc<RwLock<GridInner<T>>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
    handlers: GridHandlers<T>,
}

impl<T: GridRow> Grid<T> {
    /// Create a new grid with column definitions.
    ///
    /// An invalid schema (duplicate ids, inverted width bounds) is accepted
    /// with a warning; call [`validate_columns`] first for a hard check.
    pub fn new(columns: Vec<Column>) -> Self {
        let id = GridId::new();
        if let Err(err) = validate_columns(&columns) {
            log::warn!("{id}: invalid column schema: {err}");
        }
        Self {
            id,
            inner: Arc::new(RwLock::new(GridInner::new(columns))),
            dirty: Arc::new(AtomicBool::new(false)),
            handlers: GridHandlers::default(),
        }
    }

    /// Create a grid with initial rows.
    pub fn with_rows(columns: Vec<Column>, rows: Vec<T>) -> Self {
        let grid = Self::new(columns);
        if let Ok(mut guard) = grid.inner.write() {
            guard.rows = rows;
        }
        grid
    }

    // -------------------------------------------------------------------------
    // Builder: capabilities and defaults
    // -------------------------------------------------------------------------

    /// Enable or disable row selection.
    pub fn selectable(self, selectable: bool) -> Self {
        self.with_options(|o| o.selectable = selectable)
    }

    /// Enable or disable header-click sorting.
    pub fn sortable(self, sortable: bool) -> Self {
        self.with_options(|o| o.sortable = sortable)
    }

    /// Enable or disable per-column filtering.
    pub fn filterable(self, filterable: bool) -> Self {
        self.with_options(|o| o.filterable = filterable)
    }

    /// Enable or disable free-text search.
    pub fn searchable(self, searchable: bool) -> Self {
        self.with_options(|o| o.searchable = searchable)
    }

    /// Enable or disable pagination. Unpaginated grids derive one page
    /// spanning the whole filtered set.
    pub fn paginated(self, paginated: bool) -> Self {
        self.with_options(|o| o.paginated = paginated)
    }

    /// Enable or disable column visibility/order mutations.
    pub fn column_toggle(self, column_toggle: bool) -> Self {
        self.with_options(|o| o.column_toggle = column_toggle)
    }

    /// Declare which column ids free-text search scans.
    pub fn search_scope(self, column_ids: Vec<String>) -> Self {
        self.with_options(|o| o.search_scope = Some(column_ids))
    }

    fn with_options(self, f: impl FnOnce(&mut GridOptions)) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            f(&mut guard.options);
        }
        self
    }

    /// Initial page size for the uncontrolled pagination cell.
    pub fn page_size(self, page_size: usize) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            let mut cfg = guard.pagination.get().clone();
            cfg.page_size = page_size;
            guard.pagination.store(cfg);
        }
        self
    }

    /// Initial sort for the uncontrolled sort cell.
    pub fn default_sort(self, sort: SortConfig) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort.store(Some(sort));
        }
        self
    }

    /// Initial filters for the uncontrolled filter cell.
    pub fn default_filters(self, filters: FilterSet) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.filters.store(filters);
        }
        self
    }

    /// Initial query for the uncontrolled search cell.
    pub fn default_search(self, query: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.store(query.into());
        }
        self
    }

    /// Initial selection for the uncontrolled selection cell. Selection
    /// normally starts empty; this exists for restored sessions.
    pub fn default_selection<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection.store(Selection::from_ids(ids));
        }
        self
    }

    // -------------------------------------------------------------------------
    // Builder: handlers
    // -------------------------------------------------------------------------

    pub fn on_selection_change(mut self, f: impl Fn(&Vec<String>) + Send + Sync + 'static) -> Self {
        self.handlers.on_selection_change = Some(Arc::new(f));
        self
    }

    pub fn on_sort_change(mut self, f: impl Fn(&Option<SortConfig>) + Send + Sync + 'static) -> Self {
        self.handlers.on_sort_change = Some(Arc::new(f));
        self
    }

    pub fn on_filter_change(mut self, f: impl Fn(&FilterSet) + Send + Sync + 'static) -> Self {
        self.handlers.on_filter_change = Some(Arc::new(f));
        self
    }

    pub fn on_search_change(mut self, f: impl Fn(&String) + Send + Sync + 'static) -> Self {
        self.handlers.on_search_change = Some(Arc::new(f));
        self
    }

    pub fn on_pagination_change(mut self, f: impl Fn(&PageConfig) + Send + Sync + 'static) -> Self {
        self.handlers.on_pagination_change = Some(Arc::new(f));
        self
    }

    pub fn on_columns_change(mut self, f: impl Fn(&Vec<Column>) + Send + Sync + 'static) -> Self {
        self.handlers.on_columns_change = Some(Arc::new(f));
        self
    }

    pub fn on_export(mut self, f: impl Fn(ExportFormat, &[T]) + Send + Sync + 'static) -> Self {
        self.handlers.on_export = Some(Arc::new(f));
        self
    }

    pub fn on_row_activate(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.handlers.on_row_activate = Some(Arc::new(f));
        self
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    /// Get the unique ID.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Get the ID as a string.
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Controlled state sync
    //
    // Hosts driving a slice call `control_*` on every render; the supplied
    // value is authoritative until `release_*`. Neither fires handlers -
    // these are the host pushing state in, not a user interaction.
    // -------------------------------------------------------------------------

    pub fn control_sort(&self, sort: Option<SortConfig>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort.set_controlled(Some(sort));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_sort(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort.set_controlled(None);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn control_filters(&self, filters: FilterSet) {
        if let Ok(mut guard) = self.inner.write() {
            guard.filters.set_controlled(Some(filters));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_filters(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.filters.set_controlled(None);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn control_search(&self, query: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.set_controlled(Some(query.into()));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_search(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.set_controlled(None);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn control_pagination(&self, pagination: PageConfig) {
        if let Ok(mut guard) = self.inner.write() {
            guard.pagination.set_controlled(Some(pagination));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_pagination(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.pagination.set_controlled(None);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn control_selection<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection.set_controlled(Some(Selection::from_ids(ids)));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_selection(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection.set_controlled(None);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn control_columns(&self, columns: Vec<Column>) {
        if let Err(err) = validate_columns(&columns) {
            log::warn!("{}: invalid controlled column schema: {err}", self.id);
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.columns.set_controlled(Some(columns));
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_columns(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.columns.set_controlled(None);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Column access
    // -------------------------------------------------------------------------

    /// The resolved column registry, layout overrides included.
    pub fn columns(&self) -> Vec<Column> {
        self.inner
            .read()
            .map(|g| g.columns.get().clone())
            .unwrap_or_default()
    }

    /// Columns visible to rendering and search, in registry order.
    pub fn visible_columns(&self) -> Vec<Column> {
        self.inner
            .read()
            .map(|g| layout::visible_columns(g.columns.get()))
            .unwrap_or_default()
    }

    /// Replace the column registry (uncontrolled schema update).
    pub fn set_columns(&self, columns: Vec<Column>) {
        if let Err(err) = validate_columns(&columns) {
            log::warn!("{}: invalid column schema: {err}", self.id);
        }
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            if guard.columns.store(columns.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(columns);
        }
        if let (Some(columns), Some(handler)) = (next, &self.handlers.on_columns_change) {
            handler(&columns);
        }
    }

    // -------------------------------------------------------------------------
    // Row access
    // -------------------------------------------------------------------------

    /// Get the number of raw rows.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all raw rows.
    pub fn rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    /// Find a raw row by ID.
    pub fn find_row(&self, id: &str) -> Option<(usize, T)> {
        self.inner.read().ok().and_then(|g| {
            g.rows
                .iter()
                .enumerate()
                .find(|(_, row)| row.id() == id)
                .map(|(i, row)| (i, row.clone()))
        })
    }

    /// Replace the row collection.
    ///
    /// Selection is not touched: ids are stable across re-fetches, and ids
    /// that no longer resolve are retained. Hosts that want pruning do it
    /// here.
    pub fn set_rows(&self, rows: Vec<T>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.rows = rows;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Current free-text query.
    pub fn search(&self) -> String {
        self.inner
            .read()
            .map(|g| g.search.get().clone())
            .unwrap_or_default()
    }

    /// Set the free-text query.
    pub fn set_search(&self, query: impl Into<String>) {
        let query = query.into();
        let mut fire = false;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.searchable {
                return;
            }
            if guard.search.store(query.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            fire = true;
        }
        if fire && let Some(handler) = &self.handlers.on_search_change {
            handler(&query);
        }
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Current per-column filters.
    pub fn filters(&self) -> FilterSet {
        self.inner
            .read()
            .map(|g| g.filters.get().clone())
            .unwrap_or_default()
    }

    /// Set (or, with a cleared value, remove) one column's filter.
    ///
    /// Ignored for columns that are not filterable: such columns never
    /// receive a filter-state entry.
    pub fn set_filter(&self, column_id: &str, value: FilterValue) {
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.filterable {
                return;
            }
            let filterable = guard.column(column_id).is_some_and(|c| c.filterable);
            if !filterable {
                log::warn!("{}: filter on non-filterable column '{column_id}'", self.id);
                return;
            }
            let mut filters = guard.filters.get().clone();
            filters.set(column_id, value);
            if guard.filters.store(filters.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(filters);
        }
        if let (Some(filters), Some(handler)) = (next, &self.handlers.on_filter_change) {
            handler(&filters);
        }
    }

    /// Remove one column's filter.
    pub fn clear_filter(&self, column_id: &str) {
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            let mut filters = guard.filters.get().clone();
            if !filters.clear(column_id) {
                return;
            }
            if guard.filters.store(filters.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(filters);
        }
        if let (Some(filters), Some(handler)) = (next, &self.handlers.on_filter_change) {
            handler(&filters);
        }
    }

    /// Remove every filter.
    pub fn clear_filters(&self) {
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            let mut filters = guard.filters.get().clone();
            if filters.is_empty() {
                return;
            }
            filters.clear_all();
            if guard.filters.store(filters.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(filters);
        }
        if let (Some(filters), Some(handler)) = (next, &self.handlers.on_filter_change) {
            handler(&filters);
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Current sort state.
    pub fn sort(&self) -> Option<SortConfig> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.sort.get().clone())
    }

    /// Header click: cycle the column through asc → desc → unsorted.
    ///
    /// Ignored unless both the grid and the column are sortable. Returns the
    /// new sort state (`None` also when the click was ignored; read
    /// [`sort`](Grid::sort) when the distinction matters).
    pub fn toggle_sort(&self, column_id: &str) -> Option<SortConfig> {
        let mut outcome = None;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.sortable {
                return None;
            }
            let sortable = guard.column(column_id).is_some_and(|c| c.sortable);
            if !sortable {
                return None;
            }
            let next = next_sort(guard.sort.get().as_ref(), column_id);
            if guard.sort.store(next.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            outcome = Some(next);
        }
        let next = outcome?;
        if let Some(handler) = &self.handlers.on_sort_change {
            handler(&next);
        }
        next
    }

    /// Set the sort state directly.
    ///
    /// A config naming an unknown or unsortable column is ignored with a
    /// warning.
    pub fn set_sort(&self, sort: Option<SortConfig>) {
        let mut fire = false;
        if let Ok(mut guard) = self.inner.write() {
            if let Some(cfg) = &sort {
                let sortable = guard.column(&cfg.key).is_some_and(|c| c.sortable);
                if !sortable {
                    log::warn!("{}: sort on non-sortable column '{}'", self.id, cfg.key);
                    return;
                }
            }
            if guard.sort.store(sort.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            fire = true;
        }
        if fire && let Some(handler) = &self.handlers.on_sort_change {
            handler(&sort);
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current page state with `total` refreshed from the filtered set.
    pub fn pagination(&self) -> PageConfig {
        self.inner
            .read()
            .map(|g| {
                let mut cfg = g.pagination.get().clone();
                cfg.total = g.filtered_len();
                cfg
            })
            .unwrap_or_default()
    }

    /// Go to a page (1-based).
    ///
    /// Out-of-range pages are accepted and derive an empty view; hosts
    /// disable their "next" control via
    /// [`PageConfig::has_next_page`].
    pub fn set_page(&self, page: usize) {
        self.update_pagination(|cfg| cfg.page = page);
    }

    /// Change the page size. Resets to page 1: the previous page index is
    /// meaningless under a new stride.
    pub fn set_page_size(&self, page_size: usize) {
        self.update_pagination(|cfg| {
            cfg.page_size = page_size;
            cfg.page = 1;
        });
    }

    fn update_pagination(&self, f: impl FnOnce(&mut PageConfig)) {
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.paginated {
                return;
            }
            let mut cfg = guard.pagination.get().clone();
            f(&mut cfg);
            cfg.total = guard.filtered_len();
            if guard.pagination.store(cfg.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(cfg);
        }
        if let (Some(cfg), Some(handler)) = (next, &self.handlers.on_pagination_change) {
            handler(&cfg);
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Get all selected IDs, in selection order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.selection.get().ids().to_vec())
            .unwrap_or_default()
    }

    /// Get the selected rows still present in the data, in data order.
    pub fn selected_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| {
                let selection = g.selection.get();
                g.rows
                    .iter()
                    .filter(|row| selection.is_selected(&row.id()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check if a row is selected by ID.
    pub fn is_selected(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.selection.get().is_selected(id))
            .unwrap_or(false)
    }

    /// Toggle selection of a row by ID.
    /// Returns (added IDs, removed IDs).
    pub fn toggle_row(&self, id: &str) -> (Vec<String>, Vec<String>) {
        let mut result = (vec![], vec![]);
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.selectable {
                return result;
            }
            let mut selection = guard.selection.get().clone();
            result = selection.toggle(id);
            if guard.selection.store(selection.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(selection.ids().to_vec());
        }
        if let (Some(ids), Some(handler)) = (next, &self.handlers.on_selection_change) {
            handler(&ids);
        }
        result
    }

    /// Select or deselect every row of the currently displayed page.
    ///
    /// The scope is the page, not the whole filtered set; hosts wanting
    /// filter-wide selection drive it through
    /// [`control_selection`](Grid::control_selection).
    /// Returns (added IDs, removed IDs).
    pub fn toggle_select_all(&self, checked: bool) -> (Vec<String>, Vec<String>) {
        let mut result = (vec![], vec![]);
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.selectable {
                return result;
            }
            let page_ids = guard.derived().row_ids();
            let mut selection = guard.selection.get().clone();
            result = if checked {
                (selection.extend(&page_ids), vec![])
            } else {
                (vec![], selection.remove_many(&page_ids))
            };
            if guard.selection.store(selection.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(selection.ids().to_vec());
        }
        if let (Some(ids), Some(handler)) = (next, &self.handlers.on_selection_change) {
            handler(&ids);
        }
        result
    }

    /// Empty the selection unconditionally.
    /// Returns the IDs that were deselected.
    pub fn clear_selection(&self) -> Vec<String> {
        let mut removed = vec![];
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            let mut selection = guard.selection.get().clone();
            removed = selection.clear();
            if guard.selection.store(selection.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(selection.ids().to_vec());
        }
        if let (Some(ids), Some(handler)) = (next, &self.handlers.on_selection_change) {
            handler(&ids);
        }
        removed
    }

    /// Header select-all checkbox state for the current page.
    pub fn select_all_state(&self) -> SelectAllState {
        self.inner
            .read()
            .map(|g| {
                let page_ids = g.derived().row_ids();
                g.selection.get().state_for_page(&page_ids)
            })
            .unwrap_or(SelectAllState::Unchecked)
    }

    /// Activate a row (click/Enter). Returns whether the id resolved.
    pub fn activate_row(&self, id: &str) -> bool {
        let Some((_, row)) = self.find_row(id) else {
            return false;
        };
        if let Some(handler) = &self.handlers.on_row_activate {
            handler(&row);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Column layout
    // -------------------------------------------------------------------------

    /// Flip a column's visibility. Hidden columns leave the visible set and
    /// the search scope. Returns whether the id resolved.
    pub fn toggle_column_visibility(&self, column_id: &str) -> bool {
        self.mutate_columns(|columns| layout::toggle_hidden(columns, column_id))
    }

    /// Move a column to a new index; all column ids remain present.
    /// Returns whether the id resolved.
    pub fn move_column(&self, column_id: &str, index: usize) -> bool {
        self.mutate_columns(|columns| layout::move_column(columns, column_id, index))
    }

    fn mutate_columns(&self, f: impl FnOnce(&mut Vec<Column>) -> bool) -> bool {
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            if !guard.options.column_toggle {
                return false;
            }
            let mut columns = guard.columns.get().clone();
            if !f(&mut columns) {
                return false;
            }
            if guard.columns.store(columns.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(columns);
        }
        let fired = next.is_some();
        if let (Some(columns), Some(handler)) = (next, &self.handlers.on_columns_change) {
            handler(&columns);
        }
        fired
    }

    /// Set a column's width directly, clamped to its bounds.
    /// Returns the stored width, or `None` for unknown/non-resizable columns.
    pub fn set_column_width(&self, column_id: &str, width: u16) -> Option<u16> {
        let mut next = None;
        let mut stored = None;
        if let Ok(mut guard) = self.inner.write() {
            let resizable = guard.column(column_id).is_some_and(|c| c.resizable);
            if !resizable {
                return None;
            }
            let mut columns = guard.columns.get().clone();
            if let Some(col) = columns.iter_mut().find(|c| c.id == column_id) {
                col.width = layout::clamp_width(width as i32, col.min_width, col.max_width);
                stored = Some(col.width);
            }
            if guard.columns.store(columns.clone()) {
                self.dirty.store(true, Ordering::SeqCst);
            }
            next = Some(columns);
        }
        if let (Some(columns), Some(handler)) = (next, &self.handlers.on_columns_change) {
            handler(&columns);
        }
        stored
    }

    // -------------------------------------------------------------------------
    // Resize sessions
    //
    // A session spans one pointer drag: `begin_resize` freezes the baseline
    // width at pointer-down, `resize_by` previews moves without persisting,
    // and `end_resize` commits the final width atomically at pointer-up.
    // -------------------------------------------------------------------------

    /// Start a resize session on a resizable column.
    /// Returns whether a session started.
    pub fn begin_resize(&self, column_id: &str) -> bool {
        if let Ok(mut guard) = self.inner.write() {
            let start = guard
                .column(column_id)
                .filter(|c| c.resizable)
                .map(|c| c.width);
            let Some(start_width) = start else {
                return false;
            };
            guard.resize = Some(ResizeSession::new(column_id, start_width));
            return true;
        }
        false
    }

    /// Update the session preview from a pointer delta (absolute against
    /// the frozen baseline). Returns the clamped preview width.
    pub fn resize_by(&self, delta: i32) -> Option<u16> {
        if let Ok(mut guard) = self.inner.write() {
            let bounds = guard.resize.as_ref().and_then(|session| {
                guard
                    .column(&session.column_id)
                    .map(|c| (c.min_width, c.max_width))
            });
            let (min, max) = bounds?;
            if let Some(session) = guard.resize.as_mut() {
                session.apply_delta(delta, min, max);
                self.dirty.store(true, Ordering::SeqCst);
                return Some(session.preview);
            }
        }
        None
    }

    /// Commit the session's preview width and end the session.
    /// Returns the committed width, or `None` without an active session.
    pub fn end_resize(&self) -> Option<u16> {
        let mut committed = None;
        let mut next = None;
        if let Ok(mut guard) = self.inner.write() {
            let session = guard.resize.take()?;
            let mut columns = guard.columns.get().clone();
            if let Some(col) = columns.iter_mut().find(|c| c.id == session.column_id) {
                col.width = session.preview;
                committed = Some(col.width);
            }
            if committed.is_some() {
                if guard.columns.store(columns.clone()) {
                    self.dirty.store(true, Ordering::SeqCst);
                }
                next = Some(columns);
            }
        }
        if let (Some(columns), Some(handler)) = (next, &self.handlers.on_columns_change) {
            handler(&columns);
        }
        committed
    }

    /// The in-flight resize session, if any.
    pub fn active_resize(&self) -> Option<ResizeSession> {
        self.inner.read().ok().and_then(|g| g.resize.clone())
    }

    /// A column's width as currently displayed: the session preview while a
    /// resize targets it, the committed width otherwise.
    pub fn resolved_width(&self, column_id: &str) -> Option<u16> {
        self.inner.read().ok().and_then(|g| {
            if let Some(session) = &g.resize
                && session.column_id == column_id
            {
                return Some(session.preview);
            }
            g.column(column_id).map(|c| c.width)
        })
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Ask the host to export the filtered+sorted row set.
    ///
    /// The rows handed over are NOT paginated: exports reflect the user's
    /// search/filter context, never the visible page only.
    pub fn request_export(&self, format: ExportFormat) {
        let Ok(guard) = self.inner.read() else {
            return;
        };
        let rows = derive_rows(
            &guard.rows,
            guard.columns.get(),
            guard.search.get(),
            guard.options.search_scope.as_deref(),
            guard.filters.get(),
            guard.sort.get().as_ref(),
        );
        drop(guard);
        log::debug!("{}: export requested ({format}, {} rows)", self.id, rows.len());
        if let Some(handler) = &self.handlers.on_export {
            handler(format, &rows);
        }
    }

    // -------------------------------------------------------------------------
    // Loading flag
    // -------------------------------------------------------------------------

    /// Presentational loading signal; gates nothing.
    pub fn is_loading(&self) -> bool {
        self.inner.read().map(|g| g.loading).unwrap_or(false)
    }

    pub fn set_loading(&self, loading: bool) {
        if let Ok(mut guard) = self.inner.write()
            && guard.loading != loading
        {
            guard.loading = loading;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// Run the derivation pipeline over the current state.
    pub fn view(&self) -> DerivedView<T> {
        self.inner
            .read()
            .map(|g| g.derived())
            .unwrap_or_else(|_| DerivedView {
                rows: vec![],
                total: 0,
                page: 1,
                page_size: 0,
                page_count: 0,
            })
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the grid has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T: GridRow> Clone for Grid<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            handlers: self.handlers.clone(),
        }
    }
}
