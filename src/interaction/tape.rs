//! Tape measure tool.

use glam::DVec3;
use tracing::debug;

use crate::error::Result;
use crate::model::{MarkerId, WorldPoint};
use crate::snap::{snap_point, PointSnap};
use crate::state::{AppState, Tool};

/// Outcome of a tape click.
#[derive(Debug, Clone, PartialEq)]
pub enum TapeClick {
    /// Nothing to do (no hover point, or the tool is not active).
    Ignored,
    /// First point of a new measurement was set.
    Started(WorldPoint),
    /// A measurement was completed.
    Measured(MarkerId),
    /// A missing anchor of an existing measurement was re-created.
    Repaired { measurement: MarkerId, guide: MarkerId },
}

/// Hover and click handling for the Measure tool.
#[derive(Debug, Clone, Default)]
pub struct TapeMeasure {
    hover: Option<PointSnap>,
    start: Option<WorldPoint>,
}

impl TapeMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the pointer. The raw point is snapped to guides, item edges and
    /// the fine grid.
    pub fn hover(&mut self, state: &AppState, raw: DVec3) -> PointSnap {
        let snapped = snap_point(raw, state.items(), state.guides(), &state.config().point_snap);
        self.hover = Some(snapped);
        snapped
    }

    /// Pointer left the workspace.
    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn hover_point(&self) -> Option<WorldPoint> {
        self.hover.map(|h| h.point.into())
    }

    pub fn start_point(&self) -> Option<WorldPoint> {
        self.start
    }

    /// Live distance from the start point to the hover point.
    pub fn preview_distance(&self) -> Option<f64> {
        Some(self.start?.distance(self.hover_point()?))
    }

    /// Abandon a half-drawn measurement.
    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Handle a click at the current hover point.
    ///
    /// An incomplete measurement is repaired first; otherwise the first click
    /// sets the start point and the second completes the measurement.
    pub fn click(&mut self, state: &mut AppState) -> Result<TapeClick> {
        if state.active_tool() != Tool::Measure {
            return Ok(TapeClick::Ignored);
        }
        let Some(point) = self.hover_point() else {
            return Ok(TapeClick::Ignored);
        };

        if let Some(measurement) = state.incomplete_measurement().map(|m| m.id.clone()) {
            let guide = state.repair_measurement(&measurement, point)?;
            self.start = None;
            return Ok(TapeClick::Repaired { measurement, guide });
        }

        match self.start.take() {
            None => {
                self.start = Some(point);
                debug!("Tape start at ({:.1}, {:.1}, {:.1})", point.x, point.y, point.z);
                Ok(TapeClick::Started(point))
            }
            Some(start) => Ok(TapeClick::Measured(state.add_measurement(start, point))),
        }
    }
}
