//! Pointer interaction: the transform gizmo and the tape measure.

mod gizmo;
mod tape;

pub use gizmo::{floating_handle, GizmoMode, GizmoPhase, MatrixProjection, TransformGizmo, ViewProjection};
pub use tape::{TapeClick, TapeMeasure};
