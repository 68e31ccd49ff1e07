//! workshop-planner - Spatial interaction engine for 3D workshop stock layouts.
//!
//! Pieces of stock material (metal tube, lumber, PVC pipe) are placed on a
//! virtual floor, moved, rotated and cut. This library holds the workspace
//! state and the engines that operate on it: unit conversion, the item/world
//! coordinate remapper, bounding boxes, snapping, the selection transform
//! tools, undo history and the cut list aggregator.
//!
//! # Example
//!
//! ```no_run
//! use workshop_planner::{cut_list_report, Unit};
//! use std::path::Path;
//!
//! let report = cut_list_report(Path::new("shed.json"), Unit::Centimeters).unwrap();
//! println!("{}", report);
//! ```

pub mod config;
pub mod cutlist;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod project;
pub mod snap;
pub mod state;
pub mod units;
pub mod validation;

// Re-exports for convenience
pub use config::PlannerConfig;
pub use cutlist::report::render_report;
pub use cutlist::stats::{material_usage, ProjectStats};
pub use cutlist::{generate_cut_list, CutListSummary};
pub use error::{ErrorCode, PlannerError, Result};
pub use interaction::{TapeMeasure, TransformGizmo};
pub use model::{GuidePoint, MarkerId, Material, MaterialCategory, Measurement, Workpiece, WorldPoint};
pub use project::ProjectData;
pub use snap::{snap_point, snap_selection, SnapCorrection};
pub use state::{AppState, Tool};
pub use units::Unit;
pub use validation::{validate_project, ValidationResult};

/// Load a project file and render its cut list.
///
/// This is the high-level entry point used by the command line tool:
/// 1. Load and parse the project file
/// 2. Validate it (warnings are logged, errors abort)
/// 3. Aggregate the pieces into a cut list
/// 4. Render the report in the requested unit
pub fn cut_list_report(input_path: &std::path::Path, unit: Unit) -> Result<String> {
    let project = ProjectData::load(input_path)?;

    let validation = validate_project(&project);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    if !validation.passed {
        return Err(PlannerError::InvalidProject {
            errors: validation.errors,
        });
    }

    let summary = generate_cut_list(&project.workspace_items);
    Ok(render_report(&summary, &project.measurements, unit))
}
