//! Mapping between item-native fields and world space.
//!
//! World space: X lateral, Y elevation (up), Z depth.
//! Item fields: `x` lateral, `y` depth, `z` elevation, and the rotation
//! triplet `(rx, ry, rz)` where `rz` is the floor swivel about world Y.
//!
//! Every conversion across that boundary goes through this module.

use glam::{DQuat, DVec3, EulerRot};

use crate::config::{angle, float_cmp};

/// Euler order used for item orientations (intrinsic X, then Y, then Z).
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

/// Decimals kept on rotation angles written back to items.
pub const ANGLE_DECIMALS: u32 = 2;

/// A triplet in item field order: `(x, y, z)` or `(rx, ry, rz)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemAxes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ItemAxes {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Item position (or delta) to world space.
#[inline]
pub fn position_to_world(item: ItemAxes) -> DVec3 {
    DVec3::new(item.x, item.z, item.y)
}

/// World position (or delta) to item fields.
#[inline]
pub fn position_from_world(world: DVec3) -> ItemAxes {
    ItemAxes::new(world.x, world.z, world.y)
}

/// Item rotation triplet to world Euler angles (degrees).
#[inline]
pub fn rotation_to_world(item: ItemAxes) -> DVec3 {
    DVec3::new(item.x, item.z, item.y)
}

/// World Euler angles (degrees) to the item rotation triplet.
#[inline]
pub fn rotation_from_world(world: DVec3) -> ItemAxes {
    ItemAxes::new(world.x, world.z, world.y)
}

/// Item rotation triplet (degrees) to a world-space orientation.
pub fn orientation_to_world(item: ItemAxes) -> DQuat {
    let euler = rotation_to_world(item);
    DQuat::from_euler(
        EULER_ORDER,
        euler.x.to_radians(),
        euler.y.to_radians(),
        euler.z.to_radians(),
    )
}

/// World-space orientation to the item rotation triplet.
///
/// Angles are rounded to [`ANGLE_DECIMALS`] and wrapped into `[0, 360)`.
pub fn orientation_from_world(orientation: DQuat) -> ItemAxes {
    let (a, b, c) = orientation.normalize().to_euler(EULER_ORDER);
    let world = DVec3::new(
        canonical_degrees(a.to_degrees()),
        canonical_degrees(b.to_degrees()),
        canonical_degrees(c.to_degrees()),
    );
    rotation_from_world(world)
}

fn canonical_degrees(degrees: f64) -> f64 {
    angle::normalize_degrees(float_cmp::round_to(degrees, ANGLE_DECIMALS))
}
