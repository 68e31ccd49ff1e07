//! Configuration constants and tunable thresholds for the planner.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Project file format version written by this crate.
pub const PROJECT_VERSION: &str = "1.0.0";

/// Default saw kerf in mm.
pub const DEFAULT_KERF_MM: f64 = 3.0;

/// Default number of item snapshots kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Thresholds used when a dragged selection is released.
///
/// Tiers are ordered by confidence: guides pull from furthest away, grid
/// lines from closest. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Max horizontal distance (per axis) between selection centre and a guide.
    pub guide_threshold: f64,
    /// Max distance between a moving edge and another item's edge.
    pub material_threshold: f64,
    /// Grid spacing in mm.
    pub grid_size: f64,
    /// Max distance between a moving edge and the nearest grid line.
    pub grid_threshold: f64,
    /// Max gap between the moving item's bottom and a surface below it.
    pub surface_threshold: f64,
    /// Max distance from the resting-on-floor elevation.
    pub ground_threshold: f64,
    /// Corrections smaller than this on every axis are not applied.
    pub apply_epsilon: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            guide_threshold: 40.0,
            material_threshold: 15.0,
            grid_size: 100.0,
            grid_threshold: 25.0,
            surface_threshold: 20.0,
            ground_threshold: 15.0,
            apply_epsilon: 0.01,
        }
    }
}

/// Thresholds for snapping a single probe point (tape measure, guides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointSnapConfig {
    pub guide_threshold: f64,
    pub material_threshold: f64,
    /// Fine grid for measurements (2.5 mm increments).
    pub grid_size: f64,
    pub grid_threshold: f64,
}

impl Default for PointSnapConfig {
    fn default() -> Self {
        Self {
            guide_threshold: 20.0,
            material_threshold: 15.0,
            grid_size: 2.5,
            grid_threshold: 3.0,
        }
    }
}

/// Cutting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutConfig {
    /// Saw kerf used when the caller does not supply one.
    pub kerf: f64,
    /// Remainders shorter than this are discarded as scrap.
    pub min_remainder: f64,
    /// Depth offset between consecutive cut pieces.
    pub piece_spacing: f64,
    /// Extra lateral gap between the last piece and the remainder.
    pub remainder_gap: f64,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            kerf: DEFAULT_KERF_MM,
            min_remainder: 10.0,
            piece_spacing: 50.0,
            remainder_gap: 20.0,
        }
    }
}

/// Placement offsets for newly created items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Lateral stagger between copies added in one batch.
    pub add_stagger: f64,
    /// Offset applied to copies on the lateral and elevation fields.
    pub copy_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            add_stagger: 50.0,
            copy_offset: 20.0,
        }
    }
}

/// Negligible-motion thresholds for continuous drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Per-axis translation below this (mm) is ignored.
    pub translate_epsilon: f64,
    /// Rotation angle below this (radians) is ignored.
    pub rotate_epsilon: f64,
    /// Fraction of the viewport (in NDC) the floating handle stays within.
    pub handle_padding: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            translate_epsilon: 0.001,
            rotate_epsilon: 0.001,
            handle_padding: 0.85,
        }
    }
}

/// Complete planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub snap: SnapConfig,
    pub point_snap: PointSnapConfig,
    pub cut: CutConfig,
    pub layout: LayoutConfig,
    pub motion: MotionConfig,
    /// Maximum number of item snapshots kept for undo.
    pub history_limit: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            point_snap: PointSnapConfig::default(),
            cut: CutConfig::default(),
            layout: LayoutConfig::default(),
            motion: MotionConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }

    /// Round to a fixed number of decimals.
    #[inline]
    pub fn round_to(value: f64, decimals: u32) -> f64 {
        let factor = 10f64.powi(decimals as i32);
        (value * factor).round() / factor
    }
}

/// Utility functions for angle operations.
pub mod angle {
    /// Normalize angle to 0-360 range (exclusive of 360).
    #[inline]
    pub fn normalize_degrees(angle: f64) -> f64 {
        let mut a = angle % 360.0;
        if a < 0.0 {
            a += 360.0;
        }
        // Handle 360.0 and -0.0 cases
        if a >= 360.0 || a == 0.0 {
            a = 0.0;
        }
        a
    }
}
