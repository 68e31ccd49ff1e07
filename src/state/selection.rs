//! Selection handling. Selecting a grouped item selects its whole group.

use std::collections::HashSet;

use glam::DVec3;
use uuid::Uuid;

use super::AppState;
use crate::model::Workpiece;

impl AppState {
    /// Ids that act together with `id`: its group members, or just itself.
    pub fn group_members(&self, id: Uuid) -> Vec<Uuid> {
        let Some(target) = self.item(id) else {
            return Vec::new();
        };
        match target.group_id {
            Some(group) => self
                .items
                .iter()
                .filter(|i| i.group_id == Some(group))
                .map(|i| i.instance_id)
                .collect(),
            None => vec![id],
        }
    }

    /// Click selection. With `multi`, toggles the item's group in or out of
    /// the selection; otherwise replaces the selection with it.
    pub fn toggle_selection(&mut self, id: Uuid, multi: bool) {
        let effective = self.group_members(id);
        if effective.is_empty() {
            return;
        }

        if !multi {
            self.selection = effective;
            return;
        }

        if self.selection.contains(&id) {
            self.selection.retain(|s| !effective.contains(s));
        } else {
            for member in effective {
                if !self.selection.contains(&member) {
                    self.selection.push(member);
                }
            }
        }
    }

    /// Select one item (and its group), or clear with `None`.
    pub fn select_item(&mut self, id: Option<Uuid>) {
        match id {
            None => self.selection.clear(),
            Some(id) => {
                let effective = self.group_members(id);
                if !effective.is_empty() {
                    self.selection = effective;
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids plus every member of any group they belong to, in item
    /// list order.
    pub fn expanded_selection(&self) -> Vec<Uuid> {
        let moving = self.expanded_selection_set();
        self.items
            .iter()
            .filter(|i| moving.contains(&i.instance_id))
            .map(|i| i.instance_id)
            .collect()
    }

    pub(crate) fn expanded_selection_set(&self) -> HashSet<Uuid> {
        let mut moving = HashSet::new();
        for id in &self.selection {
            let Some(item) = self.item(*id) else {
                continue;
            };
            match item.group_id {
                Some(group) => moving.extend(
                    self.items
                        .iter()
                        .filter(|i| i.group_id == Some(group))
                        .map(|i| i.instance_id),
                ),
                None => {
                    moving.insert(*id);
                }
            }
        }
        moving
    }

    /// Items of the expanded selection.
    pub fn selected_items(&self) -> Vec<&Workpiece> {
        let moving = self.expanded_selection_set();
        self.items
            .iter()
            .filter(|i| moving.contains(&i.instance_id))
            .collect()
    }

    /// Mean world position of the expanded selection.
    pub fn centroid(&self) -> Option<DVec3> {
        let selected = self.selected_items();
        if selected.is_empty() {
            return None;
        }
        let sum: DVec3 = selected.iter().map(|i| i.world_position()).sum();
        Some(sum / selected.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use crate::state::AppState;
    use glam::DVec3;

    fn state_with(n: usize) -> (AppState, Vec<uuid::Uuid>) {
        let mut state = AppState::default();
        let ids = state.add_material("m3", None, n).unwrap();
        (state, ids)
    }

    #[test]
    fn test_single_click_replaces() {
        let (mut state, ids) = state_with(2);
        state.toggle_selection(ids[0], false);
        state.toggle_selection(ids[1], false);
        assert_eq!(state.selected_ids(), &[ids[1]]);
    }

    #[test]
    fn test_multi_click_toggles() {
        let (mut state, ids) = state_with(3);
        state.toggle_selection(ids[0], true);
        state.toggle_selection(ids[2], true);
        assert_eq!(state.selected_ids(), &[ids[0], ids[2]]);
        state.toggle_selection(ids[0], true);
        assert_eq!(state.selected_ids(), &[ids[2]]);
    }

    #[test]
    fn test_group_expands_selection() {
        let (mut state, ids) = state_with(3);
        state.group_items(&[ids[0], ids[1]]).unwrap();

        state.select_item(Some(ids[1]));
        assert_eq!(state.selected_ids().len(), 2);

        // a stale single-member selection still moves the whole group
        state.clear_selection();
        state.selection.push(ids[0]);
        assert_eq!(state.expanded_selection(), vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let (mut state, ids) = state_with(1);
        state.select_item(Some(ids[0]));
        state.toggle_selection(uuid::Uuid::new_v4(), false);
        state.select_item(Some(uuid::Uuid::new_v4()));
        assert_eq!(state.selected_ids(), &[ids[0]]);
    }

    #[test]
    fn test_centroid_is_mean_world_position() {
        let (mut state, ids) = state_with(2);
        // m3 pieces are staggered 0 and 50 laterally, resting at z = 19
        state.toggle_selection(ids[0], true);
        state.toggle_selection(ids[1], true);
        assert_eq!(state.centroid(), Some(DVec3::new(25.0, 19.0, 0.0)));

        state.clear_selection();
        assert_eq!(state.centroid(), None);
    }
}
