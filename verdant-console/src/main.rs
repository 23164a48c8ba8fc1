//! Scripted walkthrough of the grid engine against a green-bond portfolio.
//!
//! Runs the interactions a dashboard would drive - search, filter, sort,
//! pagination, selection, column layout, export - and prints each derived
//! view as plain text.

use std::fs::File;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use simplelog::{Config, LevelFilter, WriteLogger};
use verdant_grid::prelude::*;

#[derive(Clone, Debug)]
struct Holding {
    id: String,
    project: String,
    category: String,
    status: String,
    total_value: Decimal,
    issued_on: NaiveDate,
}

impl GridRow for Holding {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "project" => self.project.as_str().into(),
            "category" => self.category.as_str().into(),
            "status" => self.status.as_str().into(),
            "total_value" => self.total_value.into(),
            "issued_on" => self.issued_on.into(),
            _ => CellValue::Empty,
        }
    }

    fn display(&self, key: &str) -> String {
        match key {
            "total_value" => format!("EUR {}", self.total_value),
            _ => self.cell(key).to_string(),
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("project", "Project", 240)
            .sortable()
            .filterable(FilterKind::Text)
            .resizable()
            .min_width(120)
            .max_width(360),
        Column::new("category", "Category", 140).filterable(FilterKind::Select {
            options: vec!["solar".into(), "wind".into(), "biomass".into()],
        }),
        Column::new("status", "Status", 120).filterable(FilterKind::Select {
            options: vec!["active".into(), "retired".into()],
        }),
        Column::new("total_value", "Total Value", 140)
            .kind(ColumnKind::Number)
            .align(Alignment::Right)
            .sortable()
            .filterable(FilterKind::Number),
        Column::new("issued_on", "Issued", 120)
            .kind(ColumnKind::Date)
            .sortable()
            .filterable(FilterKind::Date),
    ]
}

fn holding(
    id: &str,
    project: &str,
    category: &str,
    status: &str,
    value: i64,
    (year, month, day): (i32, u32, u32),
) -> Holding {
    Holding {
        id: id.to_string(),
        project: project.to_string(),
        category: category.to_string(),
        status: status.to_string(),
        total_value: Decimal::from(value),
        issued_on: NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date"),
    }
}

fn portfolio() -> Vec<Holding> {
    vec![
        holding("gb-01", "Solar Farm Andalusia", "solar", "active", 1_250_000, (2024, 3, 14)),
        holding("gb-02", "North Sea Wind Array", "wind", "active", 3_400_000, (2024, 1, 9)),
        holding("gb-03", "Alpine Biomass Plant", "biomass", "retired", 780_000, (2023, 11, 2)),
        holding("gb-04", "Solar Rooftops Lisbon", "solar", "active", 410_000, (2024, 6, 21)),
        holding("gb-05", "Baltic Offshore Wind", "wind", "active", 2_150_000, (2024, 5, 30)),
        holding("gb-06", "Solar Farm Provence", "solar", "retired", 990_000, (2023, 8, 17)),
        holding("gb-07", "Highland Wind Cluster", "wind", "active", 1_620_000, (2024, 2, 4)),
        holding("gb-08", "Po Valley Biomass", "biomass", "active", 540_000, (2024, 4, 11)),
        holding("gb-09", "Solar Park Bavaria", "solar", "active", 1_875_000, (2024, 7, 2)),
        holding("gb-10", "Aegean Wind Farm", "wind", "retired", 690_000, (2023, 9, 25)),
        holding("gb-11", "Solar Canopy Utrecht", "solar", "active", 320_000, (2024, 8, 13)),
        holding("gb-12", "Coastal Wind Trio", "wind", "active", 1_140_000, (2024, 9, 1)),
    ]
}

/// Character width a pixel-width column gets in the console.
fn char_width(col: &Column) -> usize {
    (col.width as usize / 10).clamp(8, 28)
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let mut text = text.to_string();
    if text.len() > width {
        text.truncate(width);
        return text;
    }
    match align {
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Center => format!("{text:^width$}"),
        Alignment::Right => format!("{text:>width$}"),
    }
}

fn print_view(title: &str, grid: &Grid<Holding>) {
    let view = grid.view();
    let columns = grid.visible_columns();

    println!("\n== {title} ==");
    let header: Vec<String> = columns
        .iter()
        .map(|col| {
            let marker = match grid.sort() {
                Some(cfg) if cfg.key == col.id => match cfg.direction {
                    SortDirection::Ascending => " ^",
                    SortDirection::Descending => " v",
                },
                _ => "",
            };
            pad(&format!("{}{marker}", col.title), char_width(col), col.align)
        })
        .collect();
    println!("{}", header.join(" | "));

    for row in &view.rows {
        let selected = if grid.is_selected(&row.id()) { "*" } else { " " };
        let cells: Vec<String> = columns
            .iter()
            .map(|col| pad(&row.display(&col.key), char_width(col), col.align))
            .collect();
        println!("{selected}{}", cells.join(" | "));
    }
    println!(
        "page {}/{} | {} of {} rows | selected: {}",
        view.page,
        view.page_count.max(1),
        view.rows.len(),
        view.total,
        grid.selected_ids().len(),
    );
    grid.clear_dirty();
}

fn main() {
    let log_file = File::create("verdant-console.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let grid = Grid::with_rows(columns(), portfolio())
        .selectable(true)
        .page_size(5)
        .on_sort_change(|cfg| log::info!("sort changed: {cfg:?}"))
        .on_filter_change(|filters| log::info!("filters changed: {} active", filters.len()))
        .on_search_change(|query| log::info!("search changed: '{query}'"))
        .on_pagination_change(|cfg| log::info!("page {} of {}", cfg.page, cfg.page_count()))
        .on_selection_change(|ids| log::info!("selection: {} rows", ids.len()))
        .on_columns_change(|cols| log::info!("columns changed: {} defined", cols.len()))
        .on_export(|format, rows| {
            println!("-> export requested: {} rows as {format}", rows.len());
        })
        .on_row_activate(|row| println!("-> activated {} ({})", row.id, row.project));

    print_view("Initial portfolio", &grid);

    grid.set_search("solar");
    print_view("Search: 'solar'", &grid);
    grid.set_search("");

    grid.set_filter("status", FilterValue::Select("active".into()));
    print_view("Filter: status = active", &grid);

    grid.toggle_sort("total_value");
    grid.toggle_sort("total_value");
    print_view("Sorted by total value, descending", &grid);

    grid.toggle_select_all(true);
    print_view("Select all on page 1", &grid);

    grid.set_page(2);
    grid.toggle_select_all(true);
    print_view("Page 2, select all again", &grid);

    grid.clear_filter("status");
    print_view("Filter cleared - selection untouched", &grid);

    grid.request_export(ExportFormat::Csv);

    grid.begin_resize("project");
    grid.resize_by(60);
    let committed = grid.end_resize();
    log::info!("project column resized to {committed:?}");

    grid.toggle_column_visibility("issued_on");
    print_view("Issued column hidden", &grid);

    grid.activate_row("gb-09");

    grid.clear_selection();
    print_view("Selection cleared", &grid);
}
