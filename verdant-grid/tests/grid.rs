use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use verdant_grid::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Holding {
    id: String,
    project: String,
    status: String,
    total_value: i64,
}

impl GridRow for Holding {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "project" => self.project.as_str().into(),
            "status" => self.status.as_str().into(),
            "total_value" => CellValue::Number(Decimal::from(self.total_value)),
            _ => CellValue::Empty,
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("project", "Project", 220)
            .sortable()
            .filterable(FilterKind::Text)
            .resizable()
            .min_width(80)
            .max_width(400),
        Column::new("status", "Status", 120).filterable(FilterKind::Select {
            options: vec!["pending".into(), "approved".into()],
        }),
        Column::new("total_value", "Total Value", 140)
            .kind(ColumnKind::Number)
            .sortable(),
    ]
}

fn row(id: &str, project: &str, status: &str, total_value: i64) -> Holding {
    Holding {
        id: id.to_string(),
        project: project.to_string(),
        status: status.to_string(),
        total_value,
    }
}

fn dataset() -> Vec<Holding> {
    vec![
        row("h-1", "Solar Farm", "pending", 300),
        row("h-2", "Wind Park", "approved", 100),
        row("h-3", "Hydro Plant", "pending", 200),
    ]
}

fn view_ids(grid: &Grid<Holding>) -> Vec<String> {
    grid.view().row_ids()
}

// ============================================================================
// Sort Cycle
// ============================================================================

#[test]
fn test_header_clicks_cycle_through_three_states() {
    let grid = Grid::with_rows(columns(), dataset());

    grid.toggle_sort("total_value");
    assert_eq!(grid.sort(), Some(SortConfig::asc("total_value")));
    assert_eq!(view_ids(&grid), vec!["h-2", "h-3", "h-1"]);

    grid.toggle_sort("total_value");
    assert_eq!(grid.sort(), Some(SortConfig::desc("total_value")));
    assert_eq!(view_ids(&grid), vec!["h-1", "h-3", "h-2"]);

    grid.toggle_sort("total_value");
    assert_eq!(grid.sort(), None, "third click returns to unsorted");
    assert_eq!(view_ids(&grid), vec!["h-1", "h-2", "h-3"]);
}

#[test]
fn test_sorting_another_column_replaces_the_config() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.toggle_sort("total_value");
    grid.toggle_sort("project");
    assert_eq!(grid.sort(), Some(SortConfig::asc("project")));
}

#[test]
fn test_unsortable_column_ignores_header_clicks() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.toggle_sort("status");
    assert_eq!(grid.sort(), None);
}

// ============================================================================
// Controlled / Uncontrolled Duality
// ============================================================================

#[test]
fn test_controlled_sort_is_authoritative_until_adopted() {
    let seen: Arc<Mutex<Vec<Option<SortConfig>>>> = Arc::new(Mutex::new(vec![]));
    let sink = Arc::clone(&seen);
    let grid = Grid::with_rows(columns(), dataset())
        .on_sort_change(move |cfg| sink.lock().unwrap().push(cfg.clone()));

    grid.control_sort(Some(SortConfig::asc("total_value")));
    assert_eq!(view_ids(&grid), vec!["h-2", "h-3", "h-1"]);

    // The interaction notifies the host but cannot move the state.
    grid.toggle_sort("total_value");
    assert_eq!(
        seen.lock().unwrap().last().unwrap(),
        &Some(SortConfig::desc("total_value"))
    );
    assert_eq!(grid.sort(), Some(SortConfig::asc("total_value")));
    assert_eq!(view_ids(&grid), vec!["h-2", "h-3", "h-1"]);

    // The host adopts the change; the supplied value wins again.
    grid.control_sort(Some(SortConfig::desc("total_value")));
    assert_eq!(view_ids(&grid), vec!["h-1", "h-3", "h-2"]);
}

#[test]
fn test_released_slice_falls_back_to_internal_state() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.toggle_sort("total_value"); // internal: asc
    grid.control_sort(None); // controlled: unsorted
    assert_eq!(grid.sort(), None);

    grid.release_sort();
    assert_eq!(grid.sort(), Some(SortConfig::asc("total_value")));
}

#[test]
fn test_controlled_search_never_diverges() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.control_search("wind");
    grid.set_search("solar");
    assert_eq!(grid.search(), "wind");
    assert_eq!(view_ids(&grid), vec!["h-2"]);
}

#[test]
fn test_controlled_selection_is_the_source_of_truth() {
    let grid = Grid::with_rows(columns(), dataset()).selectable(true);
    grid.control_selection(["h-1", "h-3"]);
    assert!(grid.is_selected("h-1"));

    grid.toggle_row("h-2");
    assert!(!grid.is_selected("h-2"), "controlled selection ignores writes");
    assert_eq!(grid.selected_ids(), vec!["h-1", "h-3"]);
}

#[test]
fn test_uncontrolled_defaults_seed_internal_state_once() {
    let grid = Grid::with_rows(columns(), dataset())
        .default_search("wind")
        .default_sort(SortConfig::desc("total_value"));
    assert_eq!(grid.search(), "wind");
    assert_eq!(grid.sort(), Some(SortConfig::desc("total_value")));

    grid.set_search("");
    assert_eq!(grid.search(), "", "thereafter owned internally");
}

// ============================================================================
// Filter State
// ============================================================================

#[test]
fn test_set_filter_fires_handler_with_next_set() {
    let seen: Arc<Mutex<Vec<FilterSet>>> = Arc::new(Mutex::new(vec![]));
    let sink = Arc::clone(&seen);
    let grid = Grid::with_rows(columns(), dataset())
        .on_filter_change(move |filters| sink.lock().unwrap().push(filters.clone()));

    grid.set_filter("status", FilterValue::Select("pending".into()));
    assert_eq!(view_ids(&grid), vec!["h-1", "h-3"]);
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(seen.lock().unwrap()[0].get("status").is_some());
}

#[test]
fn test_non_filterable_column_never_receives_an_entry() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.set_filter("total_value", FilterValue::Number(Decimal::from(100)));
    assert!(grid.filters().is_empty());
}

#[test]
fn test_cleared_filter_value_removes_the_entry() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.set_filter("project", FilterValue::Text("solar".into()));
    assert_eq!(grid.filters().len(), 1);

    grid.set_filter("project", FilterValue::Text(String::new()));
    assert!(grid.filters().is_empty());
}

// ============================================================================
// Pagination State
// ============================================================================

#[test]
fn test_pagination_handler_sees_refreshed_total() {
    let seen: Arc<Mutex<Vec<PageConfig>>> = Arc::new(Mutex::new(vec![]));
    let sink = Arc::clone(&seen);
    let grid = Grid::with_rows(columns(), dataset())
        .page_size(2)
        .on_pagination_change(move |cfg| sink.lock().unwrap().push(cfg.clone()));

    grid.set_filter("status", FilterValue::Select("pending".into()));
    grid.set_page(2);

    let last = seen.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.page, 2);
    assert_eq!(last.total, 2, "total is the filtered count");
    assert_eq!(last.page_count(), 1);
}

#[test]
fn test_page_size_change_resets_to_first_page() {
    let grid = Grid::with_rows(columns(), dataset()).page_size(1);
    grid.set_page(3);
    assert_eq!(grid.pagination().page, 3);

    grid.set_page_size(2);
    assert_eq!(grid.pagination().page, 1);
}

// ============================================================================
// Column Layout
// ============================================================================

#[test]
fn test_visibility_toggle_updates_visible_set_and_search_scope() {
    let grid = Grid::with_rows(columns(), dataset());
    assert_eq!(grid.visible_columns().len(), 3);

    grid.toggle_column_visibility("project");
    assert_eq!(grid.visible_columns().len(), 2);

    grid.set_search("solar");
    assert!(view_ids(&grid).is_empty(), "hidden column left the scope");
}

#[test]
fn test_move_column_keeps_every_id() {
    let grid = Grid::with_rows(columns(), dataset());
    assert!(grid.move_column("project", 2));

    let order: Vec<String> = grid.columns().iter().map(|c| c.id.clone()).collect();
    assert_eq!(order, vec!["status", "total_value", "project"]);
}

#[test]
fn test_columns_change_handler_fires_on_layout_mutations() {
    let count = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&count);
    let grid = Grid::with_rows(columns(), dataset())
        .on_columns_change(move |_| *sink.lock().unwrap() += 1);

    grid.toggle_column_visibility("status");
    grid.move_column("status", 0);
    assert_eq!(*count.lock().unwrap(), 2);
}

// ============================================================================
// Resize Sessions
// ============================================================================

#[test]
fn test_resize_session_commits_once_on_pointer_up() {
    let count = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&count);
    let grid = Grid::with_rows(columns(), dataset())
        .on_columns_change(move |_| *sink.lock().unwrap() += 1);

    assert!(grid.begin_resize("project"));
    assert_eq!(grid.resize_by(30), Some(250));
    assert_eq!(grid.resize_by(50), Some(270), "deltas are baseline-absolute");

    // Preview only: the registry still holds the original width.
    assert_eq!(grid.resolved_width("project"), Some(270));
    assert_eq!(grid.columns()[0].width, 220);
    assert_eq!(*count.lock().unwrap(), 0, "moves do not persist");

    assert_eq!(grid.end_resize(), Some(270));
    assert_eq!(grid.columns()[0].width, 270);
    assert_eq!(*count.lock().unwrap(), 1, "one commit per session");
    assert!(grid.active_resize().is_none());
}

#[test]
fn test_resize_preview_is_clamped_to_bounds() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.begin_resize("project");
    assert_eq!(grid.resize_by(-500), Some(80), "min width");
    assert_eq!(grid.resize_by(5_000), Some(400), "max width");
}

#[test]
fn test_resize_requires_a_resizable_column() {
    let grid = Grid::with_rows(columns(), dataset());
    assert!(!grid.begin_resize("status"));
    assert_eq!(grid.resize_by(10), None);
    assert_eq!(grid.end_resize(), None);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_rows_are_filtered_sorted_and_unpaginated() {
    let seen: Arc<Mutex<Vec<(ExportFormat, Vec<String>)>>> = Arc::new(Mutex::new(vec![]));
    let sink = Arc::clone(&seen);
    let grid = Grid::with_rows(columns(), dataset())
        .page_size(1)
        .on_export(move |format, rows| {
            let ids = rows.iter().map(|r| r.id.clone()).collect();
            sink.lock().unwrap().push((format, ids));
        });

    grid.set_filter("status", FilterValue::Select("pending".into()));
    grid.toggle_sort("total_value");
    grid.request_export(ExportFormat::Csv);

    let calls = seen.lock().unwrap();
    let (format, ids) = &calls[0];
    assert_eq!(*format, ExportFormat::Csv);
    assert_eq!(
        ids,
        &vec!["h-3".to_string(), "h-1".to_string()],
        "both filtered rows despite the 1-row page"
    );
}

// ============================================================================
// Row Activation & Misc
// ============================================================================

#[test]
fn test_activate_row_hands_the_row_to_the_host() {
    let seen: Arc<Mutex<Option<Holding>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let grid = Grid::with_rows(columns(), dataset())
        .on_row_activate(move |row| *sink.lock().unwrap() = Some(row.clone()));

    assert!(grid.activate_row("h-2"));
    assert_eq!(seen.lock().unwrap().as_ref().unwrap().id, "h-2");
    assert!(!grid.activate_row("missing"));
}

#[test]
fn test_loading_flag_gates_nothing() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.set_loading(true);
    assert!(grid.is_loading());
    grid.set_search("wind");
    assert_eq!(view_ids(&grid), vec!["h-2"], "state transitions still run");
}

#[test]
fn test_dirty_flag_tracks_mutations() {
    let grid = Grid::with_rows(columns(), dataset());
    grid.clear_dirty();
    assert!(!grid.is_dirty());

    grid.set_search("wind");
    assert!(grid.is_dirty());
    grid.clear_dirty();

    grid.set_search("wind");
    assert!(!grid.is_dirty(), "no-op mutation leaves the flag clear");
}

#[test]
fn test_two_grids_share_no_state() {
    let a = Grid::with_rows(columns(), dataset());
    let b = Grid::with_rows(columns(), dataset());
    a.set_search("wind");
    assert_eq!(b.search(), "");
    assert_eq!(a.rows().len(), b.rows().len());
    assert_ne!(a.id_string(), b.id_string());
}

// ============================================================================
// State Serialization
// ============================================================================

#[test]
fn test_persistable_state_round_trips_through_serde() {
    let sort = SortConfig::desc("total_value");
    let json = serde_json::to_string(&sort).unwrap();
    assert_eq!(serde_json::from_str::<SortConfig>(&json).unwrap(), sort);

    let mut filters = FilterSet::new();
    filters.set("status", FilterValue::Select("pending".into()));
    filters.set(
        "total_value",
        FilterValue::NumberRange {
            min: Some(Decimal::from(100)),
            max: None,
        },
    );
    let json = serde_json::to_string(&filters).unwrap();
    assert_eq!(serde_json::from_str::<FilterSet>(&json).unwrap(), filters);

    let page = PageConfig {
        page: 2,
        page_size: 25,
        total: 60,
    };
    let json = serde_json::to_string(&page).unwrap();
    assert_eq!(serde_json::from_str::<PageConfig>(&json).unwrap(), page);

    let cols = columns();
    let json = serde_json::to_string(&cols).unwrap();
    assert_eq!(serde_json::from_str::<Vec<Column>>(&json).unwrap(), cols);
}
