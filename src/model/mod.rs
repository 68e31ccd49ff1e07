//! Data model types for the workshop planner.

mod marker;
mod material;
mod workpiece;

pub use marker::{GuidePoint, MarkerId, Measurement, WorldPoint};
pub use material::{default_catalog, Catalog, Material, MaterialCategory};
pub use workpiece::{Placement, Workpiece};
