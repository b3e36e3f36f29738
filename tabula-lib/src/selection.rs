//! Row selection tracking.

use std::collections::HashSet;

use crate::model::RowId;

/// The set of selected row identities.
///
/// The set knows nothing about rows; the table checks membership against
/// its collection when selecting and skips absent identities when reading.
/// Positional identities are shifted by the table when rows move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<RowId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identity. Returns `true` if it was not selected before.
    pub fn insert(&mut self, id: RowId) -> bool {
        self.ids.insert(id)
    }

    /// Removes an identity. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &RowId) -> bool {
        self.ids.remove(id)
    }

    /// Flips an identity. Returns the new state.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Empties the set. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Follows a deletion at `position`: drops that position and moves later
    /// positions down by one.
    pub fn shift_after_delete(&mut self, position: usize) {
        self.remap_positions(|p| match p.cmp(&position) {
            std::cmp::Ordering::Less => Some(p),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(p - 1),
        });
    }

    /// Follows `count` rows being prepended.
    pub fn shift_for_prepend(&mut self, count: usize) {
        self.remap_positions(|p| Some(p + count));
    }

    /// Drops every positional identity.
    pub fn drop_positions(&mut self) {
        self.ids.retain(|id| !id.is_positional());
    }

    fn remap_positions(&mut self, remap: impl Fn(usize) -> Option<usize>) {
        self.ids = self
            .ids
            .drain()
            .filter_map(|id| match id {
                RowId::Position(p) => remap(p).map(RowId::Position),
                key => Some(key),
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle(RowId::from(1)));
        assert!(selection.contains(&RowId::from(1)));
        assert!(!selection.toggle(RowId::from(1)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_delete_shifts_positions() {
        let mut selection = Selection::new();
        selection.insert(RowId::Position(0));
        selection.insert(RowId::Position(2));
        selection.insert(RowId::Position(5));
        selection.insert(RowId::from("k"));

        selection.shift_after_delete(2);

        assert!(selection.contains(&RowId::Position(0)));
        assert!(!selection.contains(&RowId::Position(2)));
        assert!(selection.contains(&RowId::Position(4)));
        assert!(selection.contains(&RowId::from("k")));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_prepend_shifts_positions() {
        let mut selection = Selection::new();
        selection.insert(RowId::Position(1));
        selection.shift_for_prepend(3);
        assert!(selection.contains(&RowId::Position(4)));
    }

    #[test]
    fn test_clear_reports_change() {
        let mut selection = Selection::new();
        assert!(!selection.clear());
        selection.insert(RowId::from(1));
        assert!(selection.clear());
    }
}
