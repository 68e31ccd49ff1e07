//! Transform gizmo: drag state machine, delta application and handle placement.

use glam::{DMat4, DQuat, DVec3};
use tracing::debug;

use crate::snap::{snap_selection, SnapCorrection};
use crate::state::{AppState, Tool};

/// What the gizmo manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoMode {
    Translate,
    Rotate,
}

impl GizmoMode {
    /// Gizmo shown for a tool, if any.
    pub fn for_tool(tool: Tool) -> Option<GizmoMode> {
        match tool {
            Tool::Move => Some(GizmoMode::Translate),
            Tool::Rotate => Some(GizmoMode::Rotate),
            _ => None,
        }
    }
}

/// Drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GizmoPhase {
    #[default]
    Idle,
    Translating { last_position: DVec3 },
    Rotating { last_rotation: DQuat },
}

/// Camera projection between world space and normalized device coordinates.
pub trait ViewProjection {
    /// World point to NDC (`x`, `y` in `[-1, 1]` when visible; `z` is depth).
    fn project(&self, world: DVec3) -> DVec3;

    /// NDC back to a world point.
    fn unproject(&self, ndc: DVec3) -> DVec3;
}

/// [`ViewProjection`] backed by a combined view-projection matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixProjection {
    view_projection: DMat4,
    inverse: DMat4,
}

impl MatrixProjection {
    pub fn new(view_projection: DMat4) -> Self {
        Self {
            view_projection,
            inverse: view_projection.inverse(),
        }
    }

    /// Build from separate camera view and projection matrices.
    pub fn from_camera(view: DMat4, projection: DMat4) -> Self {
        Self::new(projection * view)
    }
}

impl ViewProjection for MatrixProjection {
    fn project(&self, world: DVec3) -> DVec3 {
        self.view_projection.project_point3(world)
    }

    fn unproject(&self, ndc: DVec3) -> DVec3 {
        self.inverse.project_point3(ndc)
    }
}

/// Where to draw an idle handle.
///
/// In translate mode a centroid outside `[-padding, padding]` in NDC is
/// pulled back on screen, keeping its depth. Rotate handles stay on the
/// centroid.
pub fn floating_handle(centroid: DVec3, mode: GizmoMode, view: &dyn ViewProjection, padding: f64) -> DVec3 {
    if mode == GizmoMode::Rotate {
        return centroid;
    }

    let ndc = view.project(centroid);
    let off_screen = ndc.x.abs() > padding || ndc.y.abs() > padding;
    if !off_screen {
        return centroid;
    }

    let clamped = DVec3::new(
        ndc.x.clamp(-padding, padding),
        ndc.y.clamp(-padding, padding),
        ndc.z,
    );
    view.unproject(clamped)
}

/// Gizmo attached to the current selection.
#[derive(Debug, Clone, Default)]
pub struct TransformGizmo {
    mode: Option<GizmoMode>,
    phase: GizmoPhase,
    handle_position: DVec3,
    handle_rotation: DQuat,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<GizmoMode> {
        self.mode
    }

    pub fn phase(&self) -> GizmoPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase != GizmoPhase::Idle
    }

    pub fn handle_position(&self) -> DVec3 {
        self.handle_position
    }

    pub fn handle_rotation(&self) -> DQuat {
        self.handle_rotation
    }

    /// Per-frame update. While idle the handle follows the live centroid and
    /// the mode follows the active tool; while dragging the handle is left
    /// alone.
    ///
    /// Returns the display position of the handle, or `None` when no gizmo
    /// should be shown.
    pub fn sync(&mut self, state: &AppState, view: Option<&dyn ViewProjection>) -> Option<DVec3> {
        if self.is_dragging() {
            return Some(self.handle_position);
        }

        self.mode = GizmoMode::for_tool(state.active_tool());
        let centroid = state.centroid()?;
        self.handle_position = centroid;
        self.handle_rotation = DQuat::IDENTITY;

        let mode = self.mode?;
        Some(match view {
            Some(view) => floating_handle(centroid, mode, view, state.config().motion.handle_padding),
            None => centroid,
        })
    }

    /// Start a drag from the current handle. Returns false when there is
    /// nothing to drag.
    pub fn begin_drag(&mut self, state: &AppState) -> bool {
        if self.is_dragging() {
            return true;
        }
        let Some(mode) = self.mode else {
            return false;
        };
        let Some(centroid) = state.centroid() else {
            return false;
        };

        self.handle_position = centroid;
        self.handle_rotation = DQuat::IDENTITY;
        self.phase = match mode {
            GizmoMode::Translate => GizmoPhase::Translating {
                last_position: centroid,
            },
            GizmoMode::Rotate => GizmoPhase::Rotating {
                last_rotation: DQuat::IDENTITY,
            },
        };
        debug!("Gizmo drag started in {:?} mode", mode);
        true
    }

    /// Move the handle to `position` and translate the selection by the
    /// change since the last applied update. Returns true if items moved.
    pub fn drag_to(&mut self, state: &mut AppState, position: DVec3) -> bool {
        let GizmoPhase::Translating { last_position } = self.phase else {
            return false;
        };
        self.handle_position = position;

        let delta = position - last_position;
        let epsilon = state.config().motion.translate_epsilon;
        if delta.abs().max_element() <= epsilon {
            return false;
        }

        state.move_selection_world(delta);
        self.phase = GizmoPhase::Translating {
            last_position: position,
        };
        true
    }

    /// Set the handle orientation and rotate the selection about its
    /// centroid by the change since the last applied update. Returns true if
    /// items moved.
    pub fn rotate_to(&mut self, state: &mut AppState, rotation: DQuat) -> bool {
        let GizmoPhase::Rotating { last_rotation } = self.phase else {
            return false;
        };
        self.handle_rotation = rotation;

        let delta = rotation * last_rotation.inverse();
        let epsilon = state.config().motion.rotate_epsilon;
        if delta.angle_between(DQuat::IDENTITY) <= epsilon {
            return false;
        }

        state.rotate_selection(delta);
        self.phase = GizmoPhase::Rotating {
            last_rotation: rotation,
        };
        true
    }

    /// Release the drag. Translations are snapped once when snapping is on;
    /// exactly one history snapshot is taken either way.
    ///
    /// Returns the snap correction that was computed (zero when none).
    pub fn end_drag(&mut self, state: &mut AppState) -> Option<SnapCorrection> {
        let phase = std::mem::take(&mut self.phase);
        if phase == GizmoPhase::Idle {
            return None;
        }

        let mut correction = SnapCorrection::none();
        if matches!(phase, GizmoPhase::Translating { .. }) && state.snapping_enabled() {
            let moving = state.expanded_selection_set();
            correction = snap_selection(state.items(), &moving, state.guides(), &state.config().snap);
            if correction.should_apply(state.config().snap.apply_epsilon) {
                state.move_selection_world(correction.delta);
            }
        }

        state.snapshot();
        debug!("Gizmo drag ended");
        Some(correction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorldPoint;
    use crate::snap::SnapTier;

    const TOL: f64 = 1e-6;

    /// Orthographic view onto the X/Y plane spanning +-1000 mm.
    fn ortho() -> MatrixProjection {
        MatrixProjection::new(DMat4::orthographic_rh(-1000.0, 1000.0, -1000.0, 1000.0, 0.1, 5000.0))
    }

    fn selected_state(tool: Tool) -> AppState {
        let mut state = AppState::default();
        let ids = state.add_material("m3", Some(600.0), 1).unwrap();
        state.select_item(Some(ids[0]));
        state.set_tool(tool);
        state
    }

    #[test]
    fn test_mode_follows_tool() {
        assert_eq!(GizmoMode::for_tool(Tool::Move), Some(GizmoMode::Translate));
        assert_eq!(GizmoMode::for_tool(Tool::Rotate), Some(GizmoMode::Rotate));
        assert_eq!(GizmoMode::for_tool(Tool::Cut), None);

        let state = selected_state(Tool::Select);
        let mut gizmo = TransformGizmo::new();
        assert_eq!(gizmo.sync(&state, None), None);
        assert!(!gizmo.begin_drag(&state));
    }

    #[test]
    fn test_floating_handle_clamps_off_screen_centroid() {
        let view = ortho();
        let inside = DVec3::new(100.0, 200.0, -10.0);
        assert_eq!(floating_handle(inside, GizmoMode::Translate, &view, 0.85), inside);

        let outside = DVec3::new(3000.0, -200.0, -10.0);
        let shown = floating_handle(outside, GizmoMode::Translate, &view, 0.85);
        assert!((shown.x - 850.0).abs() < TOL);
        assert!((shown.y - -200.0).abs() < TOL);
        assert!((shown.z - -10.0).abs() < TOL);

        assert_eq!(floating_handle(outside, GizmoMode::Rotate, &view, 0.85), outside);
    }

    #[test]
    fn test_translate_drag_applies_incremental_deltas() {
        let mut state = selected_state(Tool::Move);
        state.set_snapping(false);
        let mut gizmo = TransformGizmo::new();
        let start = gizmo.sync(&state, None).unwrap();
        assert!(gizmo.begin_drag(&state));

        assert!(gizmo.drag_to(&mut state, start + DVec3::new(30.0, 0.0, 0.0)));
        // below the motion epsilon
        assert!(!gizmo.drag_to(&mut state, start + DVec3::new(30.0005, 0.0, 0.0)));
        assert!(gizmo.drag_to(&mut state, start + DVec3::new(130.0, 0.0, 40.0)));

        let item = &state.items()[0];
        assert!((item.x - 130.0).abs() < TOL);
        assert!((item.y - 40.0).abs() < TOL);

        let history_before = state.history().len();
        assert_eq!(gizmo.end_drag(&mut state), Some(SnapCorrection::none()));
        assert_eq!(state.history().len(), history_before + 1);
        assert!(!gizmo.is_dragging());
    }

    #[test]
    fn test_drag_end_snaps_to_guide_then_snapshots_once() {
        let mut state = selected_state(Tool::Move);
        state.add_guide(WorldPoint::new(500.0, 0.0, 300.0), None);
        let mut gizmo = TransformGizmo::new();
        let start = gizmo.sync(&state, None).unwrap();
        gizmo.begin_drag(&state);
        gizmo.drag_to(&mut state, start + DVec3::new(480.0, 0.0, 290.0));

        let history_before = state.history().len();
        let correction = gizmo.end_drag(&mut state).unwrap();
        assert_eq!(correction.lateral, Some(SnapTier::Guide));

        let item = &state.items()[0];
        assert!((item.x - 500.0).abs() < TOL);
        assert!((item.y - 300.0).abs() < TOL);
        assert_eq!(state.history().len(), history_before + 1);
    }

    #[test]
    fn test_rotate_drag_swivels_selection() {
        let mut state = selected_state(Tool::Rotate);
        let mut gizmo = TransformGizmo::new();
        gizmo.sync(&state, None);
        assert!(gizmo.begin_drag(&state));

        assert!(gizmo.rotate_to(&mut state, DQuat::from_rotation_y(20f64.to_radians())));
        assert!(!gizmo.rotate_to(&mut state, DQuat::from_rotation_y(20.00001f64.to_radians())));
        assert!(gizmo.rotate_to(&mut state, DQuat::from_rotation_y(45f64.to_radians())));

        assert!((state.items()[0].rz - 45.0).abs() < 0.02);

        // rotation drags are never snapped
        let correction = gizmo.end_drag(&mut state).unwrap();
        assert!(!correction.is_snapped());
    }

    #[test]
    fn test_end_drag_when_idle() {
        let mut state = selected_state(Tool::Move);
        let mut gizmo = TransformGizmo::new();
        let revision = state.revision();
        assert_eq!(gizmo.end_drag(&mut state), None);
        assert_eq!(state.revision(), revision);
    }
}
