//! Workpiece definition representing one placed piece of stock material.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::material::{Material, MaterialCategory};
use crate::geometry::remap::{self, ItemAxes};

/// Position and orientation in item-native field order.
///
/// `x` is lateral, `y` is depth, `z` is elevation (mm). `rz` is the floor
/// swivel; angles are degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

/// A piece of stock material placed in the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workpiece {
    /// Unique instance id.
    pub instance_id: Uuid,
    /// Items sharing a group id move together.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,

    /// Catalog id of the source material.
    #[serde(rename = "id")]
    pub material_id: String,
    pub category: MaterialCategory,
    pub name: String,
    /// Nominal stock length (used when re-ordering stock).
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub price: f64,

    /// Lateral position of the centre.
    pub x: f64,
    /// Depth position of the centre.
    pub y: f64,
    /// Elevation of the centre.
    pub z: f64,
    #[serde(default)]
    pub rx: f64,
    #[serde(default)]
    pub ry: f64,
    #[serde(default)]
    pub rz: f64,

    /// Length of this piece after cutting.
    pub current_length: f64,
}

impl Workpiece {
    /// Create a full-length piece from a catalog entry, resting on the ground.
    pub fn from_material(material: &Material) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            group_id: None,
            material_id: material.id.clone(),
            category: material.category,
            name: material.name.clone(),
            length: material.length,
            width: material.width,
            thickness: material.thickness,
            price: material.price,
            x: 0.0,
            y: 0.0,
            z: material.thickness / 2.0,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            current_length: material.length,
        }
    }

    /// Set the current length.
    pub fn with_length(mut self, length: f64) -> Self {
        self.current_length = length;
        self
    }

    /// Set the item-native position.
    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Set the item-native rotation triplet (degrees).
    pub fn with_rotation(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rx = rx;
        self.ry = ry;
        self.rz = rz;
        self
    }

    /// Set the group id.
    pub fn with_group(mut self, group_id: Option<Uuid>) -> Self {
        self.group_id = group_id;
        self
    }

    /// Clone with a fresh instance id.
    pub fn duplicate(&self) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            z: self.z,
            rx: self.rx,
            ry: self.ry,
            rz: self.rz,
        }
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.x = placement.x;
        self.y = placement.y;
        self.z = placement.z;
        self.rx = placement.rx;
        self.ry = placement.ry;
        self.rz = placement.rz;
    }

    /// Centre position in world space.
    pub fn world_position(&self) -> DVec3 {
        remap::position_to_world(ItemAxes::new(self.x, self.y, self.z))
    }

    /// Move the centre to a world-space position.
    pub fn set_world_position(&mut self, position: DVec3) {
        let item = remap::position_from_world(position);
        self.x = item.x;
        self.y = item.y;
        self.z = item.z;
    }

    /// Orientation in world space.
    pub fn world_orientation(&self) -> DQuat {
        remap::orientation_to_world(ItemAxes::new(self.rx, self.ry, self.rz))
    }

    /// Set the orientation from a world-space rotation.
    pub fn set_world_orientation(&mut self, orientation: DQuat) {
        let angles = remap::orientation_from_world(orientation);
        self.rx = angles.x;
        self.ry = angles.y;
        self.rz = angles.z;
    }

    /// Half of the vertical extent used for resting on surfaces.
    pub fn half_height(&self) -> f64 {
        self.thickness / 2.0
    }

    /// Elevation of the bottom face.
    pub fn bottom(&self) -> f64 {
        self.z - self.half_height()
    }

    /// Elevation of the top face.
    pub fn top(&self) -> f64 {
        self.z + self.half_height()
    }

    /// Check if this piece is part of a group.
    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_catalog;

    #[test]
    fn test_from_material_rests_on_ground() {
        let catalog = default_catalog();
        let piece = Workpiece::from_material(&catalog["m3"]);
        assert_eq!(piece.current_length, 2440.0);
        assert_eq!(piece.z, 19.0);
        assert_eq!(piece.bottom(), 0.0);
        assert_eq!(piece.material_id, "m3");
    }

    #[test]
    fn test_world_position_swaps_depth_and_elevation() {
        let catalog = default_catalog();
        let piece = Workpiece::from_material(&catalog["m4"]).with_position(10.0, 20.0, 30.0);
        assert_eq!(piece.world_position(), DVec3::new(10.0, 30.0, 20.0));
    }

    #[test]
    fn test_set_world_position_round_trip() {
        let catalog = default_catalog();
        let mut piece = Workpiece::from_material(&catalog["m1"]);
        piece.set_world_position(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!((piece.x, piece.y, piece.z), (1.0, 3.0, 2.0));
        assert_eq!(piece.world_position(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let catalog = default_catalog();
        let piece = Workpiece::from_material(&catalog["m1"]);
        let json = serde_json::to_value(&piece).unwrap();
        assert!(json.get("instanceId").is_some());
        assert!(json.get("currentLength").is_some());
        assert_eq!(json["id"], "m1");
        assert_eq!(json["category"], "metal");
        assert!(json.get("groupId").is_none());
    }
}
