//! Guide points and measurements. These notify the change hook but are not
//! part of item history.

use std::sync::Arc;

use tracing::debug;

use super::AppState;
use crate::error::{PlannerError, Result};
use crate::model::{GuidePoint, MarkerId, Measurement, WorldPoint};

impl AppState {
    pub fn guide(&self, id: &MarkerId) -> Option<&GuidePoint> {
        self.guides.iter().find(|g| g.id == *id)
    }

    fn has_guide(&self, id: &MarkerId) -> bool {
        self.guide(id).is_some()
    }

    /// Place a guide at a world point.
    pub fn add_guide(&mut self, point: WorldPoint, label: Option<String>) -> MarkerId {
        let guide = GuidePoint::new(point, label);
        let id = guide.id.clone();
        let mut guides = self.guides.as_ref().clone();
        guides.push(guide);
        self.guides = Arc::new(guides);
        self.notify_change();
        id
    }

    /// Remove a guide, and every measurement it anchored whose other anchor
    /// is gone too.
    pub fn delete_guide(&mut self, id: &MarkerId) -> Result<()> {
        if !self.has_guide(id) {
            return Err(PlannerError::GuideNotFound { id: id.clone() });
        }
        let guides: Vec<GuidePoint> = self.guides.iter().filter(|g| g.id != *id).cloned().collect();
        self.guides = Arc::new(guides);

        let before = self.measurements.len();
        let measurements: Vec<Measurement> = self
            .measurements
            .iter()
            .filter(|m| !m.references(id) || self.has_guide(m.other_anchor(id)))
            .cloned()
            .collect();
        if measurements.len() != before {
            debug!("Removed {} orphaned measurements", before - measurements.len());
        }
        self.measurements = Arc::new(measurements);
        self.notify_change();
        Ok(())
    }

    pub fn clear_guides(&mut self) {
        self.guides = Arc::new(Vec::new());
        self.notify_change();
    }

    /// Record a measurement between two points, creating guides "A" and "B"
    /// at its ends. Restores the tool used before Measure.
    pub fn add_measurement(&mut self, point_a: WorldPoint, point_b: WorldPoint) -> MarkerId {
        let guide_a = GuidePoint::new(point_a, Some("A".to_string()));
        let guide_b = GuidePoint::new(point_b, Some("B".to_string()));
        let measurement = Measurement::new(point_a, point_b, guide_a.id.clone(), guide_b.id.clone());
        let id = measurement.id.clone();

        debug!("Measured {:.2} mm", measurement.distance);

        let mut guides = self.guides.as_ref().clone();
        guides.push(guide_a);
        guides.push(guide_b);
        self.guides = Arc::new(guides);

        let mut measurements = self.measurements.as_ref().clone();
        measurements.push(measurement);
        self.measurements = Arc::new(measurements);

        self.notify_change();
        self.restore_previous_tool();
        id
    }

    /// Replace a measurement's endpoints and anchors.
    pub fn update_measurement(
        &mut self,
        id: &MarkerId,
        point_a: WorldPoint,
        point_b: WorldPoint,
        guide_a_id: MarkerId,
        guide_b_id: MarkerId,
    ) -> Result<()> {
        let mut measurements = self.measurements.as_ref().clone();
        let target = measurements
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| PlannerError::MeasurementNotFound { id: id.clone() })?;
        target.update(point_a, point_b, guide_a_id, guide_b_id);
        self.measurements = Arc::new(measurements);
        self.notify_change();
        Ok(())
    }

    pub fn delete_measurement(&mut self, id: &MarkerId) -> Result<()> {
        if !self.measurements.iter().any(|m| m.id == *id) {
            return Err(PlannerError::MeasurementNotFound { id: id.clone() });
        }
        let measurements: Vec<Measurement> = self
            .measurements
            .iter()
            .filter(|m| m.id != *id)
            .cloned()
            .collect();
        self.measurements = Arc::new(measurements);
        self.notify_change();
        Ok(())
    }

    pub fn clear_measurements(&mut self) {
        self.measurements = Arc::new(Vec::new());
        self.notify_change();
    }

    /// First measurement with a missing anchor guide.
    pub fn incomplete_measurement(&self) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|m| !self.has_guide(&m.guide_a_id) || !self.has_guide(&m.guide_b_id))
    }

    /// Re-anchor a measurement at `point`: endpoint A if its guide is
    /// missing, otherwise endpoint B. Returns the new guide's id.
    pub fn repair_measurement(&mut self, id: &MarkerId, point: WorldPoint) -> Result<MarkerId> {
        let measurement = self
            .measurements
            .iter()
            .find(|m| m.id == *id)
            .cloned()
            .ok_or_else(|| PlannerError::MeasurementNotFound { id: id.clone() })?;

        let (label, point_a, point_b) = if !self.has_guide(&measurement.guide_a_id) {
            ("A", point, measurement.point_b)
        } else {
            ("B", measurement.point_a, point)
        };
        let guide = GuidePoint::new(point, Some(label.to_string()));
        let guide_id = guide.id.clone();
        let (guide_a_id, guide_b_id) = if label == "A" {
            (guide_id.clone(), measurement.guide_b_id)
        } else {
            (measurement.guide_a_id, guide_id.clone())
        };

        let mut guides = self.guides.as_ref().clone();
        guides.push(guide);
        self.guides = Arc::new(guides);

        debug!("Re-anchored endpoint {} of measurement {}", label, id);
        self.update_measurement(id, point_a, point_b, guide_a_id, guide_b_id)?;
        Ok(guide_id)
    }
}
