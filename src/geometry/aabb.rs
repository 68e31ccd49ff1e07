//! Horizontal axis-aligned bounding boxes of (possibly rotated) workpieces.

use glam::DVec3;

use crate::model::Workpiece;

/// World-space extents on the lateral (X) and depth (Z) axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Aabb {
    /// An empty box; the identity for [`Aabb::union`].
    pub const EMPTY: Aabb = Aabb {
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        z_min: f64::INFINITY,
        z_max: f64::NEG_INFINITY,
    };

    pub fn new(x_min: f64, x_max: f64, z_min: f64, z_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            z_min,
            z_max,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.z_min > self.z_max
    }

    /// Grow to include a world point.
    pub fn include(&mut self, p: DVec3) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.z_min = self.z_min.min(p.z);
        self.z_max = self.z_max.max(p.z);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            z_min: self.z_min.min(other.z_min),
            z_max: self.z_max.max(other.z_max),
        }
    }

    /// Centre on the lateral axis.
    pub fn center_x(&self) -> f64 {
        (self.x_min + self.x_max) / 2.0
    }

    /// Centre on the depth axis.
    pub fn center_z(&self) -> f64 {
        (self.z_min + self.z_max) / 2.0
    }

    /// Overlap on both horizontal axes; touching edges count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let overlap_x = !(self.x_max < other.x_min || self.x_min > other.x_max);
        let overlap_z = !(self.z_max < other.z_min || self.z_min > other.z_max);
        overlap_x && overlap_z
    }

    /// Shift by a world-space delta (only X and Z are used).
    pub fn translated(&self, delta: DVec3) -> Aabb {
        Aabb {
            x_min: self.x_min + delta.x,
            x_max: self.x_max + delta.x,
            z_min: self.z_min + delta.z,
            z_max: self.z_max + delta.z,
        }
    }
}

/// Local-space corner offsets of a workpiece's box.
///
/// Length runs along local X, width along local Y, thickness along local Z.
fn local_corners(item: &Workpiece) -> [DVec3; 8] {
    let hl = item.current_length / 2.0;
    let hw = item.width / 2.0;
    let ht = item.thickness / 2.0;
    [
        DVec3::new(-hl, -hw, -ht),
        DVec3::new(hl, -hw, -ht),
        DVec3::new(-hl, hw, -ht),
        DVec3::new(hl, hw, -ht),
        DVec3::new(-hl, -hw, ht),
        DVec3::new(hl, -hw, ht),
        DVec3::new(-hl, hw, ht),
        DVec3::new(hl, hw, ht),
    ]
}

/// Bounding box of one workpiece in world space.
pub fn workpiece_aabb(item: &Workpiece) -> Aabb {
    let rotation = item.world_orientation();
    let center = item.world_position();

    let mut aabb = Aabb::EMPTY;
    for corner in local_corners(item) {
        aabb.include(center + rotation * corner);
    }
    aabb
}

/// Union of the individual boxes of several workpieces.
///
/// Returns `None` for an empty input.
pub fn combined_aabb<'a, I>(items: I) -> Option<Aabb>
where
    I: IntoIterator<Item = &'a Workpiece>,
{
    let combined = items
        .into_iter()
        .map(workpiece_aabb)
        .fold(Aabb::EMPTY, |acc, b| acc.union(&b));

    if combined.is_empty() {
        None
    } else {
        Some(combined)
    }
}
