//! Sort state and the stable comparison behind it.

use serde::{Deserialize, Serialize};

use super::item::{Column, GridRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Active sort: one column, one direction.
///
/// `key` holds the column id; the grid resolves it to the column's bound
/// data key when comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Next sort state for a header click on the given column.
///
/// Cycles unsorted → ascending → descending → unsorted; clicking a
/// different column always starts a fresh ascending sort.
pub fn next_sort(current: Option<&SortConfig>, column_id: &str) -> Option<SortConfig> {
    match current {
        Some(cfg) if cfg.key == column_id => match cfg.direction {
            SortDirection::Ascending => Some(SortConfig::desc(column_id)),
            SortDirection::Descending => None,
        },
        _ => Some(SortConfig::asc(column_id)),
    }
}

/// Stable in-place sort of the filtered row set.
///
/// Ties keep their input order. An id the registry cannot resolve leaves
/// the order unchanged.
pub(super) fn sort_rows<T: GridRow>(rows: &mut [T], columns: &[Column], config: &SortConfig) {
    let Some(col) = columns.iter().find(|c| c.id == config.key) else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = a.cell(&col.key).compare(&b.cell(&col.key));
        match config.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
