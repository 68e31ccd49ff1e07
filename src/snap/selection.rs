//! End-of-drag snapping for a moving selection.

use std::collections::HashSet;

use glam::DVec3;
use tracing::debug;
use uuid::Uuid;

use super::{nearest_grid_line, Candidate, SnapCorrection, SnapTier};
use crate::config::SnapConfig;
use crate::geometry::{combined_aabb, workpiece_aabb, Aabb};
use crate::model::{GuidePoint, Workpiece};

/// Compute the snap correction for the items in `moving` relative to the rest
/// of `items`.
///
/// Tiers are evaluated in order (guide, material edge, grid) per horizontal
/// axis; an axis snapped by one tier is not revisited. A guide hit snaps
/// both horizontal axes and ends the horizontal search. Single-item moves
/// additionally rest on the nearest surface below, or on the ground.
pub fn snap_selection(
    items: &[Workpiece],
    moving: &HashSet<Uuid>,
    guides: &[GuidePoint],
    config: &SnapConfig,
) -> SnapCorrection {
    let selected: Vec<&Workpiece> = items
        .iter()
        .filter(|i| moving.contains(&i.instance_id))
        .collect();
    let others: Vec<&Workpiece> = items
        .iter()
        .filter(|i| !moving.contains(&i.instance_id))
        .collect();

    let Some(bounds) = combined_aabb(selected.iter().copied()) else {
        return SnapCorrection::none();
    };

    let mut correction = SnapCorrection::none();

    // 1. Guides (highest priority)
    if let Some(delta) = snap_to_guides(&bounds, guides, config.guide_threshold) {
        correction.delta.x = delta.x;
        correction.delta.z = delta.z;
        correction.lateral = Some(SnapTier::Guide);
        correction.depth = Some(SnapTier::Guide);
    }

    // 2. Other items' edges
    if correction.lateral.is_none() || correction.depth.is_none() {
        let (best_x, best_z) = snap_to_material_edges(&bounds, &others, config.material_threshold);
        if correction.lateral.is_none() {
            if let Some(c) = best_x {
                correction.delta.x = c.delta;
                correction.lateral = Some(SnapTier::Material);
            }
        }
        if correction.depth.is_none() {
            if let Some(c) = best_z {
                correction.delta.z = c.delta;
                correction.depth = Some(SnapTier::Material);
            }
        }
    }

    // 3. Grid
    if correction.lateral.is_none() {
        if let Some(c) = snap_edges_to_grid([bounds.x_min, bounds.x_max], config) {
            correction.delta.x = c.delta;
            correction.lateral = Some(SnapTier::Grid);
        }
    }
    if correction.depth.is_none() {
        if let Some(c) = snap_edges_to_grid([bounds.z_min, bounds.z_max], config) {
            correction.delta.z = c.delta;
            correction.depth = Some(SnapTier::Grid);
        }
    }

    // 4. Surfaces below, then the ground
    if let [item] = selected.as_slice() {
        if let Some((dy, tier)) = snap_vertical(item, &others, config) {
            correction.delta.y = dy;
            correction.vertical = Some(tier);
        }
    }

    debug!(
        "Snap correction: ({:.3}, {:.3}, {:.3}) lateral={:?} depth={:?} vertical={:?}",
        correction.delta.x,
        correction.delta.y,
        correction.delta.z,
        correction.lateral,
        correction.depth,
        correction.vertical
    );

    correction
}

/// First guide within `threshold` of the selection centre on both axes.
fn snap_to_guides(bounds: &Aabb, guides: &[GuidePoint], threshold: f64) -> Option<DVec3> {
    let cx = bounds.center_x();
    let cz = bounds.center_z();

    guides
        .iter()
        .find(|g| (g.x - cx).abs() < threshold && (g.z - cz).abs() < threshold)
        .map(|g| DVec3::new(g.x - cx, 0.0, g.z - cz))
}

/// Closest edge-to-edge alignment per horizontal axis.
fn snap_to_material_edges(
    bounds: &Aabb,
    others: &[&Workpiece],
    threshold: f64,
) -> (Option<Candidate>, Option<Candidate>) {
    let mut best_x = None;
    let mut best_z = None;

    for other in others {
        let target = workpiece_aabb(other);
        for edge in [bounds.x_min, bounds.x_max] {
            for other_edge in [target.x_min, target.x_max] {
                Candidate::consider(&mut best_x, edge, other_edge, threshold);
            }
        }
        for edge in [bounds.z_min, bounds.z_max] {
            for other_edge in [target.z_min, target.z_max] {
                Candidate::consider(&mut best_z, edge, other_edge, threshold);
            }
        }
    }

    (best_x, best_z)
}

/// Closest grid alignment of either edge on one axis.
fn snap_edges_to_grid(edges: [f64; 2], config: &SnapConfig) -> Option<Candidate> {
    let mut best = None;
    for edge in edges {
        if let Some(line) = nearest_grid_line(edge, config.grid_size) {
            Candidate::consider(&mut best, edge, line, config.grid_threshold);
        }
    }
    best
}

/// Elevation change that rests `item` on the nearest surface below it, or on
/// the ground when no surface is close enough.
fn snap_vertical(item: &Workpiece, others: &[&Workpiece], config: &SnapConfig) -> Option<(f64, SnapTier)> {
    let footprint = workpiece_aabb(item);
    let bottom = item.bottom();

    let mut best: Option<(f64, f64)> = None; // (distance, surface elevation)
    for other in others {
        let surface = other.top();
        let gap = bottom - surface;
        if gap < 0.0 || gap >= config.surface_threshold {
            continue;
        }
        if !footprint.overlaps(&workpiece_aabb(other)) {
            continue;
        }
        if best.map_or(true, |(d, _)| gap < d) {
            best = Some((gap, surface));
        }
    }

    if let Some((_, surface)) = best {
        let target = surface + item.half_height();
        return Some((target - item.z, SnapTier::Surface));
    }

    let resting = item.half_height();
    if (item.z - resting).abs() < config.ground_threshold {
        return Some((resting - item.z, SnapTier::Ground));
    }

    None
}
