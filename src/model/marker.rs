//! Guide points and measurements.
//!
//! Both use world convention: `x` lateral, `y` elevation, `z` depth.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of a guide or measurement.
///
/// Kept as free text: saved projects carry ids like
/// `guide-1735689600000-0.123`. Fresh ids are UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MarkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A literal point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn distance(self, other: WorldPoint) -> f64 {
        self.to_vec3().distance(other.to_vec3())
    }
}

impl From<DVec3> for WorldPoint {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<WorldPoint> for DVec3 {
    fn from(p: WorldPoint) -> Self {
        p.to_vec3()
    }
}

/// A labeled 3D marker used as a snap target and measurement anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidePoint {
    pub id: MarkerId,
    pub x: f64,
    /// Elevation.
    pub y: f64,
    /// Depth.
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GuidePoint {
    pub fn new(point: WorldPoint, label: Option<String>) -> Self {
        Self {
            id: MarkerId::generate(),
            x: point.x,
            y: point.y,
            z: point.z,
            label,
        }
    }

    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y, self.z)
    }
}

/// A distance between two literal points, anchored by two guides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: MarkerId,
    pub point_a: WorldPoint,
    pub point_b: WorldPoint,
    /// Cached Euclidean distance between the endpoints.
    pub distance: f64,
    pub guide_a_id: MarkerId,
    pub guide_b_id: MarkerId,
}

impl Measurement {
    pub fn new(point_a: WorldPoint, point_b: WorldPoint, guide_a_id: MarkerId, guide_b_id: MarkerId) -> Self {
        Self {
            id: MarkerId::generate(),
            point_a,
            point_b,
            distance: point_a.distance(point_b),
            guide_a_id,
            guide_b_id,
        }
    }

    /// Replace the endpoints and anchors, recomputing the distance.
    pub fn update(&mut self, point_a: WorldPoint, point_b: WorldPoint, guide_a_id: MarkerId, guide_b_id: MarkerId) {
        self.point_a = point_a;
        self.point_b = point_b;
        self.distance = point_a.distance(point_b);
        self.guide_a_id = guide_a_id;
        self.guide_b_id = guide_b_id;
    }

    pub fn references(&self, guide_id: &MarkerId) -> bool {
        self.guide_a_id == *guide_id || self.guide_b_id == *guide_id
    }

    /// The anchor at the other end from `guide_id`.
    pub fn other_anchor(&self, guide_id: &MarkerId) -> &MarkerId {
        if self.guide_a_id == *guide_id {
            &self.guide_b_id
        } else {
            &self.guide_a_id
        }
    }
}
