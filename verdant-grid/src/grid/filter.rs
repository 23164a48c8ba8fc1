//! Filter and search state plus the row predicates behind them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value::CellValue;

use super::item::{Column, ColumnKind, GridRow};

/// Value of one per-column filter.
///
/// Matching dispatches on the variant; a mismatch with the cell's kind
/// (say, a number range against a text cell) leaves the row unfiltered by
/// that column so the pipeline stays total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Case-insensitive substring query.
    Text(String),
    /// Exact numeric match.
    Number(Decimal),
    /// Inclusive numeric range; open ends stay unbounded.
    NumberRange {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Exact option match.
    Select(String),
    /// Inclusive date interval; open ends stay unbounded.
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl FilterValue {
    /// A cleared value narrows nothing and is dropped from the set.
    fn is_cleared(&self) -> bool {
        match self {
            FilterValue::Text(q) => q.is_empty(),
            FilterValue::Select(opt) => opt.is_empty(),
            FilterValue::NumberRange { min, max } => min.is_none() && max.is_none(),
            FilterValue::DateRange { start, end } => start.is_none() && end.is_none(),
            FilterValue::Number(_) => false,
        }
    }

    /// Whether a resolved cell satisfies this filter.
    fn matches(&self, cell: &CellValue, display: &str) -> bool {
        match self {
            FilterValue::Text(q) => display.to_lowercase().contains(&q.to_lowercase()),
            FilterValue::Select(opt) => display == opt,
            FilterValue::Number(n) => match cell.number() {
                Some(v) => v == *n,
                None => true,
            },
            FilterValue::NumberRange { min, max } => match cell.number() {
                Some(v) => min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m),
                None => true,
            },
            FilterValue::DateRange { start, end } => match cell.date() {
                Some(d) => start.is_none_or(|s| d >= s) && end.is_none_or(|e| d <= e),
                None => true,
            },
        }
    }
}

/// Per-column filter values keyed by column id.
///
/// Absent entries mean "no filter for this column"; setting a cleared value
/// removes the entry instead of storing it. Entries compose with logical AND
/// across columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, column_id: &str) -> Option<&FilterValue> {
        self.entries.get(column_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.entries.iter()
    }

    /// Set a filter; cleared values remove the entry instead.
    pub fn set(&mut self, column_id: impl Into<String>, value: FilterValue) {
        let column_id = column_id.into();
        if value.is_cleared() {
            self.entries.remove(&column_id);
        } else {
            self.entries.insert(column_id, value);
        }
    }

    /// Remove one entry. Returns whether it existed.
    pub fn clear(&mut self, column_id: &str) -> bool {
        self.entries.remove(column_id).is_some()
    }

    /// Remove every entry.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }
}

/// Whether a row passes every active filter (logical AND across columns).
///
/// Entries naming a column the registry does not contain are skipped.
pub(super) fn row_matches_filters<T: GridRow>(
    row: &T,
    columns: &[Column],
    filters: &FilterSet,
) -> bool {
    filters.iter().all(|(column_id, value)| {
        let Some(col) = columns.iter().find(|c| &c.id == column_id) else {
            return true;
        };
        let cell = row.cell(&col.key);
        value.matches(&cell, &row.display(&col.key))
    })
}

/// Data keys participating in free-text search.
///
/// The host-declared scope (column ids) wins; the default is every
/// `Text`-kind column. Hidden columns never participate either way.
pub(super) fn search_keys(columns: &[Column], scope: Option<&[String]>) -> Vec<String> {
    match scope {
        Some(ids) => columns
            .iter()
            .filter(|c| !c.hidden && ids.contains(&c.id))
            .map(|c| c.key.clone())
            .collect(),
        None => columns
            .iter()
            .filter(|c| !c.hidden && c.kind == ColumnKind::Text)
            .map(|c| c.key.clone())
            .collect(),
    }
}

/// Case-insensitive substring match of the query against any in-scope cell.
pub(super) fn row_matches_search<T: GridRow>(row: &T, keys: &[String], query: &str) -> bool {
    let query = query.to_lowercase();
    keys.iter()
        .any(|key| row.display(key).to_lowercase().contains(&query))
}
