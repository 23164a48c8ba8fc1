//! Row selection keyed by stable row ids.

use serde::{Deserialize, Serialize};

/// Header select-all checkbox state for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// No row of the page is selected.
    Unchecked,
    /// Some, but not all, rows of the page are selected.
    Indeterminate,
    /// Every row of a non-empty page is selected.
    Checked,
}

/// Insertion-ordered set of selected row ids.
///
/// Selection is keyed by row id, not row index or page position, so it
/// survives sorting, filtering, and page changes. Ids whose rows have
/// disappeared from the data are kept; pruning is the host's call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from ids, dropping duplicates but keeping order.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for id in ids {
            let id = id.into();
            if !selection.is_selected(&id) {
                selection.selected.push(id);
            }
        }
        selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Toggle one id: add if absent, remove if present.
    /// Returns (added ids, removed ids).
    pub fn toggle(&mut self, id: &str) -> (Vec<String>, Vec<String>) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            let removed = self.selected.remove(pos);
            (vec![], vec![removed])
        } else {
            self.selected.push(id.to_string());
            (vec![id.to_string()], vec![])
        }
    }

    /// Add every id not yet selected, in the given order.
    /// Returns the ids that were newly selected.
    pub fn extend(&mut self, ids: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for id in ids {
            if !self.is_selected(id) {
                self.selected.push(id.clone());
                added.push(id.clone());
            }
        }
        added
    }

    /// Remove the given ids where present.
    /// Returns the ids that were actually removed.
    pub fn remove_many(&mut self, ids: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        self.selected.retain(|s| {
            if ids.contains(s) {
                removed.push(s.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Empty the selection unconditionally.
    /// Returns the ids that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected)
    }

    /// Tri-state for a select-all checkbox over the given page of ids.
    pub fn state_for_page(&self, page_ids: &[String]) -> SelectAllState {
        let selected_on_page = page_ids.iter().filter(|id| self.is_selected(id)).count();
        if selected_on_page == 0 || page_ids.is_empty() {
            SelectAllState::Unchecked
        } else if selected_on_page == page_ids.len() {
            SelectAllState::Checked
        } else {
            SelectAllState::Indeterminate
        }
    }
}
