use super::domain::ListingId;
use serde::Serialize;
use std::collections::BTreeSet;

pub const COMPARE_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The compare set is full; nothing was changed.
    #[error("compare set already holds the maximum of {limit} listings")]
    CapacityExceeded { limit: usize },
}

/// Favorites and compare picks, independent of filtering and of store reloads.
///
/// Ids are not checked against the store; ids that no longer exist are inert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionSets {
    favorites: BTreeSet<ListingId>,
    compare: Vec<ListingId>,
}

impl SelectionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_favorite(&mut self, id: &ListingId) -> SelectionChange {
        if self.favorites.remove(id) {
            SelectionChange::Removed
        } else {
            self.favorites.insert(id.clone());
            SelectionChange::Added
        }
    }

    /// Adds or removes `id` from the compare set. Adding to a full set is refused.
    pub fn toggle_compare(&mut self, id: &ListingId) -> Result<SelectionChange, SelectionError> {
        if let Some(position) = self.compare.iter().position(|existing| existing == id) {
            self.compare.remove(position);
            return Ok(SelectionChange::Removed);
        }

        if self.compare.len() >= COMPARE_LIMIT {
            return Err(SelectionError::CapacityExceeded {
                limit: COMPARE_LIMIT,
            });
        }

        self.compare.push(id.clone());
        Ok(SelectionChange::Added)
    }

    pub fn is_favorite(&self, id: &ListingId) -> bool {
        self.favorites.contains(id)
    }

    pub fn is_selected_for_compare(&self, id: &ListingId) -> bool {
        self.compare.contains(id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &ListingId> {
        self.favorites.iter()
    }

    /// Compare picks in the order they were added.
    pub fn compare_ids(&self) -> &[ListingId] {
        &self.compare
    }

    pub fn clear_compare(&mut self) {
        self.compare.clear();
    }
}
