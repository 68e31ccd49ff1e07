//! Snapping engine.
//!
//! Resolves a translation correction for a released selection (or a single
//! probe point) against guides, other items' edges, the grid and, for
//! selections, the surfaces below.

mod point;
mod selection;

pub use point::{snap_point, PointSnap};
pub use selection::snap_selection;

use glam::DVec3;
use serde::Serialize;

/// Which rule produced a snap on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapTier {
    Guide,
    Material,
    Grid,
    Surface,
    Ground,
}

/// A world-space correction with the tier that produced each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapCorrection {
    pub delta: DVec3,
    /// Lateral (world X).
    pub lateral: Option<SnapTier>,
    /// Depth (world Z).
    pub depth: Option<SnapTier>,
    /// Elevation (world Y).
    pub vertical: Option<SnapTier>,
}

impl SnapCorrection {
    /// No axis snapped.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_snapped(&self) -> bool {
        self.lateral.is_some() || self.depth.is_some() || self.vertical.is_some()
    }

    /// Something snapped and the move is larger than `epsilon` on some axis.
    pub fn should_apply(&self, epsilon: f64) -> bool {
        self.is_snapped()
            && (self.delta.x.abs() > epsilon
                || self.delta.y.abs() > epsilon
                || self.delta.z.abs() > epsilon)
    }
}

/// Best edge pairing found so far on one axis.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Signed move that aligns the edge with its target.
    delta: f64,
    distance: f64,
}

impl Candidate {
    /// Keep `target - edge` if it is under `threshold` and closer than the current best.
    fn consider(best: &mut Option<Candidate>, edge: f64, target: f64, threshold: f64) {
        let distance = (edge - target).abs();
        if distance < threshold && best.map_or(true, |b| distance < b.distance) {
            *best = Some(Candidate {
                delta: target - edge,
                distance,
            });
        }
    }
}

/// Nearest grid line to `value`. A non-positive grid size disables the grid.
fn nearest_grid_line(value: f64, grid_size: f64) -> Option<f64> {
    if grid_size <= 0.0 {
        return None;
    }
    Some((value / grid_size).round() * grid_size)
}
