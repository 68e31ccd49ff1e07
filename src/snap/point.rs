//! Snapping for a single world point (tape measure, free guide placement).

use glam::DVec3;

use super::{nearest_grid_line, Candidate, SnapTier};
use crate::config::PointSnapConfig;
use crate::geometry::workpiece_aabb;
use crate::model::{GuidePoint, Workpiece};

/// A snapped probe point. Elevation is never changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSnap {
    pub point: DVec3,
    pub lateral: Option<SnapTier>,
    pub depth: Option<SnapTier>,
}

impl PointSnap {
    fn unsnapped(point: DVec3) -> Self {
        Self {
            point,
            lateral: None,
            depth: None,
        }
    }
}

/// Snap `point` to the first nearby guide, else to item edges, else to the
/// fine grid, per horizontal axis.
pub fn snap_point(
    point: DVec3,
    items: &[Workpiece],
    guides: &[GuidePoint],
    config: &PointSnapConfig,
) -> PointSnap {
    let mut result = PointSnap::unsnapped(point);

    if let Some(guide) = guides.iter().find(|g| {
        (g.x - point.x).abs() < config.guide_threshold && (g.z - point.z).abs() < config.guide_threshold
    }) {
        result.point.x = guide.x;
        result.point.z = guide.z;
        result.lateral = Some(SnapTier::Guide);
        result.depth = Some(SnapTier::Guide);
        return result;
    }

    let mut best_x = None;
    let mut best_z = None;
    for item in items {
        let bounds = workpiece_aabb(item);
        for edge in [bounds.x_min, bounds.x_max] {
            Candidate::consider(&mut best_x, point.x, edge, config.material_threshold);
        }
        for edge in [bounds.z_min, bounds.z_max] {
            Candidate::consider(&mut best_z, point.z, edge, config.material_threshold);
        }
    }
    if let Some(c) = best_x {
        result.point.x += c.delta;
        result.lateral = Some(SnapTier::Material);
    }
    if let Some(c) = best_z {
        result.point.z += c.delta;
        result.depth = Some(SnapTier::Material);
    }

    if result.lateral.is_none() {
        if let Some(line) = nearest_grid_line(point.x, config.grid_size) {
            if (point.x - line).abs() < config.grid_threshold {
                result.point.x = line;
                result.lateral = Some(SnapTier::Grid);
            }
        }
    }
    if result.depth.is_none() {
        if let Some(line) = nearest_grid_line(point.z, config.grid_size) {
            if (point.z - line).abs() < config.grid_threshold {
                result.point.z = line;
                result.depth = Some(SnapTier::Grid);
            }
        }
    }

    result
}
