//! Coordinate remapping and bounding boxes.

pub mod aabb;
pub mod remap;

pub use aabb::{combined_aabb, workpiece_aabb, Aabb};
pub use remap::ItemAxes;
