//! Runtime column layout: visibility, ordering, and resize sessions.

use super::item::Column;

/// In-flight column resize.
///
/// `start_width` is frozen when the pointer goes down; moves only update
/// `preview`, and the width is committed to the registry once, on
/// pointer-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub column_id: String,
    pub start_width: u16,
    pub preview: u16,
}

impl ResizeSession {
    pub(super) fn new(column_id: impl Into<String>, start_width: u16) -> Self {
        Self {
            column_id: column_id.into(),
            start_width,
            preview: start_width,
        }
    }

    /// Recompute the preview from the frozen baseline and a pointer delta.
    pub(super) fn apply_delta(&mut self, delta: i32, min: u16, max: Option<u16>) {
        self.preview = clamp_width(self.start_width as i32 + delta, min, max);
    }
}

/// Clamp a candidate width into `[min, max]`, unbounded above when `max`
/// is absent.
pub(super) fn clamp_width(candidate: i32, min: u16, max: Option<u16>) -> u16 {
    let max = max.unwrap_or(u16::MAX);
    candidate.clamp(min as i32, max as i32) as u16
}

/// Columns visible to rendering and search, in registry order.
pub(super) fn visible_columns(columns: &[Column]) -> Vec<Column> {
    columns.iter().filter(|c| !c.hidden).cloned().collect()
}

/// Flip a column's hidden flag. Returns whether the id resolved.
pub(super) fn toggle_hidden(columns: &mut [Column], column_id: &str) -> bool {
    match columns.iter_mut().find(|c| c.id == column_id) {
        Some(col) => {
            col.hidden = !col.hidden;
            true
        }
        None => false,
    }
}

/// Move a column to a new index, shifting the others.
///
/// A pass-through list mutation: every original id remains present. The
/// target index is clamped to the list. Returns whether the id resolved.
pub(super) fn move_column(columns: &mut Vec<Column>, column_id: &str, index: usize) -> bool {
    let Some(from) = columns.iter().position(|c| c.id == column_id) else {
        return false;
    };
    let col = columns.remove(from);
    let index = index.min(columns.len());
    columns.insert(index, col);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Vec<Column> {
        vec![
            Column::new("a", "A", 100),
            Column::new("b", "B", 100),
            Column::new("c", "C", 100),
        ]
    }

    #[test]
    fn test_clamp_respects_bounds() {
        assert_eq!(clamp_width(30, 40, Some(200)), 40);
        assert_eq!(clamp_width(250, 40, Some(200)), 200);
        assert_eq!(clamp_width(5000, 40, None), 5000);
    }

    #[test]
    fn test_resize_session_previews_from_frozen_baseline() {
        let mut session = ResizeSession::new("a", 100);
        session.apply_delta(30, 40, None);
        assert_eq!(session.preview, 130);
        // Deltas are absolute against the baseline, not cumulative.
        session.apply_delta(-20, 40, None);
        assert_eq!(session.preview, 80);
        assert_eq!(session.start_width, 100);
    }

    #[test]
    fn test_move_column_keeps_all_ids() {
        let mut columns = registry();
        assert!(move_column(&mut columns, "a", 2));
        let order: Vec<_> = columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_column_clamps_index() {
        let mut columns = registry();
        assert!(move_column(&mut columns, "a", 99));
        assert_eq!(columns.last().unwrap().id, "a");
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn test_toggle_hidden_round_trips() {
        let mut columns = registry();
        assert!(toggle_hidden(&mut columns, "b"));
        assert!(columns[1].hidden);
        assert_eq!(visible_columns(&columns).len(), 2);
        assert!(toggle_hidden(&mut columns, "b"));
        assert!(!columns[1].hidden);
    }
}
