//! Workpiece operations: add, cut, copy, delete, group and transform.

use std::collections::HashMap;

use glam::{DQuat, DVec3};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::AppState;
use crate::error::{PlannerError, Result};
use crate::geometry::remap;
use crate::model::{Placement, Workpiece};

impl AppState {
    /// Add `quantity` pieces of a catalog material, staggered laterally and
    /// resting on the ground. `length` defaults to the stock length and may
    /// not exceed it.
    pub fn add_material(&mut self, material_id: &str, length: Option<f64>, quantity: usize) -> Result<Vec<Uuid>> {
        let material = self
            .catalog
            .get(material_id)
            .ok_or_else(|| PlannerError::MaterialNotFound {
                id: material_id.to_string(),
            })?;
        if quantity == 0 {
            return Err(PlannerError::InvalidQuantity);
        }

        let used_length = length.unwrap_or(material.length);
        if !(used_length > 0.0 && used_length <= material.length) {
            warn!(
                "Length {} out of range for {} (stock {})",
                used_length, material.name, material.length
            );
            return Err(PlannerError::InvalidLength {
                length: used_length,
                stock: material.length,
            });
        }
        let stagger = self.config.layout.add_stagger;

        let added: Vec<Workpiece> = (0..quantity)
            .map(|i| {
                let piece = Workpiece::from_material(material).with_length(used_length);
                let z = piece.z;
                piece.with_position(i as f64 * stagger, 0.0, z)
            })
            .collect();
        let ids: Vec<Uuid> = added.iter().map(|p| p.instance_id).collect();

        info!("Added {} x {} ({} mm)", quantity, material.name, used_length);

        let mut items = self.items.as_ref().clone();
        items.extend(added);
        self.set_items(items);
        self.snapshot();
        Ok(ids)
    }

    /// Split a piece into up to `quantity` pieces of `cut_point` plus a
    /// remainder.
    ///
    /// Each cut consumes `kerf` (default from config). The pieces replace the
    /// original in place; a remainder shorter than the configured minimum is
    /// scrap. Returns the new ids, pieces first.
    pub fn cut_item(&mut self, id: Uuid, cut_point: f64, kerf: Option<f64>, quantity: usize) -> Result<Vec<Uuid>> {
        let index = self
            .items
            .iter()
            .position(|i| i.instance_id == id)
            .ok_or(PlannerError::ItemNotFound { id })?;
        let original = &self.items[index];

        if !(cut_point > 0.0 && cut_point < original.current_length) {
            warn!(
                "Cut point {} out of bounds for piece of length {}",
                cut_point, original.current_length
            );
            return Err(PlannerError::InvalidCutPoint {
                cut_point,
                length: original.current_length,
            });
        }
        if quantity == 0 {
            warn!("Cut requested with zero quantity");
            return Err(PlannerError::InvalidQuantity);
        }

        let cut = &self.config.cut;
        let kerf = kerf.unwrap_or(cut.kerf);
        if !kerf.is_finite() || kerf < 0.0 {
            warn!("Kerf {} rejected", kerf);
            return Err(PlannerError::InvalidKerf { kerf });
        }

        let mut remaining = original.current_length;
        let mut pieces = Vec::new();

        for i in 0..quantity {
            let needed = if i > 0 { cut_point + kerf } else { cut_point };
            if remaining < needed {
                break;
            }
            let mut piece = original.duplicate().with_length(cut_point);
            piece.y = original.y + i as f64 * cut.piece_spacing;
            pieces.push(piece);
            remaining -= cut_point + kerf;
        }

        if remaining >= cut.min_remainder {
            let mut rest = original.duplicate().with_length(remaining);
            rest.x = original.x + cut_point + kerf + cut.remainder_gap;
            pieces.push(rest);
        } else if remaining > 0.0 {
            debug!("Discarding {:.1} mm offcut", remaining);
        }

        info!(
            "Cut {} at {} mm (kerf {}): {} pieces",
            original.name,
            cut_point,
            kerf,
            pieces.len()
        );

        let ids: Vec<Uuid> = pieces.iter().map(|p| p.instance_id).collect();
        let mut items = self.items.as_ref().clone();
        items.splice(index..=index, pieces);
        self.set_items(items);
        self.selection.retain(|s| *s != id);
        self.snapshot();
        Ok(ids)
    }

    /// Remove one item.
    pub fn delete_item(&mut self, id: Uuid) -> Result<()> {
        if self.item(id).is_none() {
            return Err(PlannerError::ItemNotFound { id });
        }
        let items: Vec<Workpiece> = self
            .items
            .iter()
            .filter(|i| i.instance_id != id)
            .cloned()
            .collect();
        self.set_items(items);
        self.selection.retain(|s| *s != id);
        self.snapshot();
        Ok(())
    }

    /// Remove every item of the expanded selection. Returns how many went.
    pub fn delete_selection(&mut self) -> Result<usize> {
        let doomed = self.expanded_selection_set();
        if doomed.is_empty() {
            return Err(PlannerError::EmptySelection);
        }
        let items: Vec<Workpiece> = self
            .items
            .iter()
            .filter(|i| !doomed.contains(&i.instance_id))
            .cloned()
            .collect();
        let removed = self.items.len() - items.len();
        self.set_items(items);
        self.selection.clear();
        self.snapshot();
        info!("Deleted {} items", removed);
        Ok(removed)
    }

    /// Duplicate the expanded selection and select the copies.
    ///
    /// Copies of one group form one new group. Copies are offset on the
    /// lateral and elevation fields.
    pub fn copy_selection(&mut self) -> Result<Vec<Uuid>> {
        let originals = self.selected_items();
        if originals.is_empty() {
            return Err(PlannerError::EmptySelection);
        }

        let offset = self.config.layout.copy_offset;
        let mut group_map: HashMap<Uuid, Uuid> = HashMap::new();

        let copies: Vec<Workpiece> = originals
            .into_iter()
            .map(|original| {
                let group_id = original
                    .group_id
                    .map(|old| *group_map.entry(old).or_insert_with(Uuid::new_v4));
                let mut copy = original.duplicate().with_group(group_id);
                copy.x += offset;
                copy.z += offset;
                copy
            })
            .collect();

        let ids: Vec<Uuid> = copies.iter().map(|c| c.instance_id).collect();
        debug!("Copied {} items into {} new groups", ids.len(), group_map.len());

        let mut items = self.items.as_ref().clone();
        items.extend(copies);
        self.set_items(items);
        self.selection = ids.clone();
        self.snapshot();
        Ok(ids)
    }

    /// Put the given items in one fresh group.
    pub fn group_items(&mut self, ids: &[Uuid]) -> Result<Uuid> {
        if ids.is_empty() {
            return Err(PlannerError::EmptySelection);
        }
        let group = Uuid::new_v4();
        let items: Vec<Workpiece> = self
            .items
            .iter()
            .map(|i| {
                if ids.contains(&i.instance_id) {
                    i.clone().with_group(Some(group))
                } else {
                    i.clone()
                }
            })
            .collect();
        self.set_items(items);
        self.snapshot();
        debug!("Grouped {} items as {}", ids.len(), group);
        Ok(group)
    }

    /// Clear the group of the given items.
    pub fn ungroup_items(&mut self, ids: &[Uuid]) {
        let items: Vec<Workpiece> = self
            .items
            .iter()
            .map(|i| {
                if ids.contains(&i.instance_id) {
                    i.clone().with_group(None)
                } else {
                    i.clone()
                }
            })
            .collect();
        self.set_items(items);
        self.snapshot();
    }

    /// Translate the expanded selection by an item-space delta. No snapshot.
    pub fn move_selection(&mut self, dx: f64, dy: f64, dz: f64) {
        let moving = self.expanded_selection_set();
        if moving.is_empty() {
            return;
        }
        let items: Vec<Workpiece> = self
            .items
            .iter()
            .map(|i| {
                if moving.contains(&i.instance_id) {
                    let mut moved = i.clone();
                    moved.x += dx;
                    moved.y += dy;
                    moved.z += dz;
                    moved
                } else {
                    i.clone()
                }
            })
            .collect();
        self.set_items(items);
    }

    /// Translate the expanded selection by a world-space delta. No snapshot.
    pub fn move_selection_world(&mut self, delta: DVec3) {
        let d = remap::position_from_world(delta);
        self.move_selection(d.x, d.y, d.z);
    }

    /// Rotate the expanded selection about its centroid by a world-space
    /// rotation. No snapshot.
    pub fn rotate_selection(&mut self, rotation: DQuat) {
        let Some(centroid) = self.centroid() else {
            return;
        };
        let moving = self.expanded_selection_set();

        let items: Vec<Workpiece> = self
            .items
            .iter()
            .map(|i| {
                if !moving.contains(&i.instance_id) {
                    return i.clone();
                }
                let mut rotated = i.clone();
                let offset = i.world_position() - centroid;
                rotated.set_world_position(centroid + rotation * offset);
                rotated.set_world_orientation(rotation * i.world_orientation());
                rotated
            })
            .collect();
        self.set_items(items);
    }

    /// Set an item's position and rotation directly.
    pub fn update_item_transform(&mut self, id: Uuid, placement: Placement) -> Result<()> {
        if self.item(id).is_none() {
            return Err(PlannerError::ItemNotFound { id });
        }
        let items: Vec<Workpiece> = self
            .items
            .iter()
            .map(|i| {
                let mut item = i.clone();
                if item.instance_id == id {
                    item.set_placement(placement);
                }
                item
            })
            .collect();
        self.set_items(items);
        self.snapshot();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOL: f64 = 1e-6;

    fn one_piece(material: &str, length: Option<f64>) -> (AppState, Uuid) {
        let mut state = AppState::default();
        let ids = state.add_material(material, length, 1).unwrap();
        (state, ids[0])
    }

    // ==== add ====

    #[test]
    fn test_add_material_staggers_and_rests() {
        let mut state = AppState::default();
        let ids = state.add_material("m4", Some(1200.0), 3).unwrap();
        assert_eq!(ids.len(), 3);

        let xs: Vec<f64> = state.items().iter().map(|i| i.x).collect();
        assert_eq!(xs, vec![0.0, 50.0, 100.0]);
        assert!(state.items().iter().all(|i| i.z == 50.0));
        assert!(state.items().iter().all(|i| i.current_length == 1200.0));
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_add_unknown_material() {
        let mut state = AppState::default();
        let err = state.add_material("nope", None, 1).unwrap_err();
        assert!(matches!(err, PlannerError::MaterialNotFound { .. }));
        assert!(state.items().is_empty());
    }

    #[test]
    fn test_add_length_must_fit_stock() {
        let mut state = AppState::default();
        for bad in [3000.5, 0.0, -10.0, f64::NAN] {
            let err = state.add_material("m4", Some(bad), 1).unwrap_err();
            assert!(matches!(err, PlannerError::InvalidLength { .. }), "{bad}");
        }
        assert!(state.items().is_empty());
        assert_eq!(state.history().len(), 1);

        let id = state.add_material("m4", Some(3000.0), 1).unwrap()[0];
        assert_eq!(state.item(id).unwrap().current_length, 3000.0);
    }

    // ==== cut ====

    #[test]
    fn test_cut_single_piece_and_remainder() {
        let (mut state, id) = one_piece("m1", None);
        let ids = state.cut_item(id, 1000.0, Some(3.0), 1).unwrap();

        assert_eq!(ids.len(), 2);
        let lengths: Vec<f64> = state.items().iter().map(|i| i.current_length).collect();
        assert_eq!(lengths, vec![1000.0, 4997.0]);
        assert!(state.item(id).is_none());

        let rest = &state.items()[1];
        assert_eq!(rest.x, 1000.0 + 3.0 + 20.0);
    }

    #[test]
    fn test_cut_multiple_pieces_spaced_in_depth() {
        let (mut state, id) = one_piece("m3", Some(1000.0));
        state.cut_item(id, 300.0, None, 3).unwrap();

        let items = state.items();
        // 1000 - 3 * 303 = 91
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].y, 0.0);
        assert_eq!(items[1].y, 50.0);
        assert_eq!(items[2].y, 100.0);
        assert!((items[3].current_length - 91.0).abs() < TOL);
    }

    #[test]
    fn test_cut_stops_when_material_runs_out() {
        let (mut state, id) = one_piece("m3", Some(1000.0));
        state.cut_item(id, 400.0, Some(3.0), 5).unwrap();

        // 400, then 597 >= 403 -> 400, then 194 < 403 stops; remainder 194
        let lengths: Vec<f64> = state.items().iter().map(|i| i.current_length).collect();
        assert_eq!(lengths.len(), 3);
        assert!((lengths[2] - 194.0).abs() < TOL);
    }

    #[test]
    fn test_small_remainder_is_discarded() {
        let (mut state, id) = one_piece("m3", Some(1006.0));
        state.cut_item(id, 500.0, Some(3.0), 2).unwrap();
        // 1006 - 2 * 503 = 0
        assert_eq!(state.items().len(), 2);
        assert!(state.items().iter().all(|i| i.current_length == 500.0));
    }

    #[test]
    fn test_invalid_cut_leaves_state_alone() {
        let (mut state, id) = one_piece("m3", Some(1000.0));
        let revision = state.revision();

        for bad in [0.0, -5.0, 1000.0, 1500.0, f64::NAN, f64::INFINITY] {
            let err = state.cut_item(id, bad, Some(3.0), 1).unwrap_err();
            assert!(matches!(err, PlannerError::InvalidCutPoint { .. }), "{bad}");
        }
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].current_length, 1000.0);
        assert_eq!(state.revision(), revision);
    }

    #[test]
    fn test_invalid_kerf_leaves_state_alone() {
        let (mut state, id) = one_piece("m3", Some(1000.0));
        let before = state.item_list();
        let revision = state.revision();

        for bad in [-200.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = state.cut_item(id, 100.0, Some(bad), 3).unwrap_err();
            assert!(matches!(err, PlannerError::InvalidKerf { .. }), "{bad}");
        }
        assert_eq!(state.items(), before.as_slice());
        assert_eq!(state.revision(), revision);

        let ids = state.cut_item(id, 100.0, Some(0.0), 3).unwrap();
        let lengths: Vec<f64> = ids.iter().map(|i| state.item(*i).unwrap().current_length).collect();
        assert_eq!(lengths, vec![100.0, 100.0, 100.0, 700.0]);
    }

    #[test]
    fn test_cut_replaces_in_place_and_deselects() {
        let mut state = AppState::default();
        let ids = state.add_material("m3", Some(1000.0), 3).unwrap();
        state.select_item(Some(ids[1]));

        state.cut_item(ids[1], 200.0, None, 1).unwrap();
        let order: Vec<f64> = state.items().iter().map(|i| i.current_length).collect();
        assert_eq!(order, vec![1000.0, 200.0, 797.0, 1000.0]);
        assert!(state.selected_ids().is_empty());
    }

    // ==== copy / delete / group ====

    #[test]
    fn test_copy_remaps_groups_and_selects_copies() {
        let mut state = AppState::default();
        let ids = state.add_material("m2", None, 3).unwrap();
        let group = state.group_items(&[ids[0], ids[1]]).unwrap();
        state.select_item(Some(ids[0]));

        let copies = state.copy_selection().unwrap();
        assert_eq!(copies.len(), 2);
        assert_eq!(state.selected_ids(), copies.as_slice());

        let new_groups: Vec<Option<Uuid>> = copies.iter().map(|c| state.item(*c).unwrap().group_id).collect();
        assert_eq!(new_groups[0], new_groups[1]);
        assert!(new_groups[0].is_some());
        assert_ne!(new_groups[0], Some(group));

        let original = state.item(ids[0]).unwrap();
        let copy = state.item(copies[0]).unwrap();
        assert_eq!(copy.x, original.x + 20.0);
        assert_eq!(copy.z, original.z + 20.0);
        assert_eq!(copy.y, original.y);
    }

    #[test]
    fn test_copy_without_selection() {
        let mut state = AppState::default();
        assert!(matches!(state.copy_selection(), Err(PlannerError::EmptySelection)));
    }

    #[test]
    fn test_delete_selection_takes_group() {
        let mut state = AppState::default();
        let ids = state.add_material("m1", None, 3).unwrap();
        state.group_items(&[ids[1], ids[2]]).unwrap();
        state.select_item(Some(ids[2]));

        assert_eq!(state.delete_selection().unwrap(), 2);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].instance_id, ids[0]);
    }

    #[test]
    fn test_delete_item() {
        let (mut state, id) = one_piece("m1", None);
        state.select_item(Some(id));
        state.delete_item(id).unwrap();
        assert!(state.items().is_empty());
        assert!(state.selected_ids().is_empty());
        assert!(state.delete_item(id).is_err());
    }

    #[test]
    fn test_ungroup() {
        let mut state = AppState::default();
        let ids = state.add_material("m1", None, 2).unwrap();
        state.group_items(&ids).unwrap();
        state.ungroup_items(&ids);
        assert!(state.items().iter().all(|i| !i.is_grouped()));
    }

    // ==== transforms ====

    #[test]
    fn test_grouped_move_only_moves_group() {
        let mut state = AppState::default();
        let ids = state.add_material("m3", Some(500.0), 3).unwrap();
        state.group_items(&[ids[0], ids[1]]).unwrap();
        state.select_item(Some(ids[0]));
        let before: Vec<Workpiece> = state.items().to_vec();

        state.move_selection_world(DVec3::new(10.0, 5.0, -7.0));

        for (old, new) in before.iter().zip(state.items()) {
            if new.instance_id == ids[2] {
                assert_eq!(old, new);
            } else {
                assert_eq!(new.x, old.x + 10.0);
                assert_eq!(new.y, old.y - 7.0);
                assert_eq!(new.z, old.z + 5.0);
            }
        }
        // continuous moves do not enter history
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_rotation_preserves_pairwise_distances() {
        let mut state = AppState::default();
        let ids = state.add_material("m1", Some(800.0), 3).unwrap();
        state
            .update_item_transform(
                ids[2],
                Placement {
                    x: 300.0,
                    y: 250.0,
                    z: 80.0,
                    ..Default::default()
                },
            )
            .unwrap();
        for id in &ids {
            state.toggle_selection(*id, true);
        }
        let before: Vec<DVec3> = state.items().iter().map(|i| i.world_position()).collect();
        let centroid = state.centroid().unwrap();

        state.rotate_selection(DQuat::from_rotation_y(0.7) * DQuat::from_rotation_x(0.2));

        let after: Vec<DVec3> = state.items().iter().map(|i| i.world_position()).collect();
        for a in 0..3 {
            for b in a + 1..3 {
                let d0 = before[a].distance(before[b]);
                let d1 = after[a].distance(after[b]);
                assert!((d0 - d1).abs() < TOL, "{d0} vs {d1}");
            }
        }
        assert!((state.centroid().unwrap() - centroid).length() < TOL);
    }

    #[test]
    fn test_swivel_rotation_updates_rz() {
        let (mut state, id) = one_piece("m3", None);
        state.select_item(Some(id));
        state.rotate_selection(DQuat::from_rotation_y(30f64.to_radians()));
        let item = state.item(id).unwrap();
        assert!((item.rz - 30.0).abs() < 0.01);
        assert_eq!(item.rx, 0.0);
        assert_eq!(item.ry, 0.0);
    }

    #[test]
    fn test_update_item_transform_snapshots() {
        let (mut state, id) = one_piece("m1", None);
        let placement = Placement {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            rx: 0.0,
            ry: 0.0,
            rz: 45.0,
        };
        state.update_item_transform(id, placement).unwrap();
        assert_eq!(state.item(id).unwrap().placement(), placement);
        assert_eq!(state.history().len(), 3);
    }
}
