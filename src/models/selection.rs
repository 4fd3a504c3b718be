//! In-memory selection state for bulk actions on list pages.

use std::collections::BTreeSet;

use super::EntityId;

/// Ids currently ticked in a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is now selected.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Header checkbox: select every row, or clear when all are already selected.
    pub fn toggle_all<I>(&mut self, all: I)
    where
        I: IntoIterator<Item = EntityId>,
    {
        let all: BTreeSet<EntityId> = all.into_iter().collect();
        if !all.is_empty() && all.is_subset(&self.ids) {
            self.ids.clear();
        } else {
            self.ids = all;
        }
    }

    /// Deselect one row; returns whether it was selected.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.ids.remove(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    /// True when `total` rows exist and every one is selected.
    pub fn is_all_selected(&self, total: usize) -> bool {
        total > 0 && self.ids.len() == total
    }

    /// Bulk action bar visibility.
    pub fn has_selection(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop ids no longer present in the list.
    pub fn retain_existing<I>(&mut self, existing: I)
    where
        I: IntoIterator<Item = EntityId>,
    {
        let existing: BTreeSet<EntityId> = existing.into_iter().collect();
        self.ids.retain(|id| existing.contains(id));
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }
}
