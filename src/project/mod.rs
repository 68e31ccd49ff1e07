//! Project file: the JSON shape exchanged with storage.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{PlannerConfig, PROJECT_VERSION};
use crate::error::{PlannerError, Result};
use crate::model::{default_catalog, Catalog, GuidePoint, Measurement, Workpiece};
use crate::state::{AppState, UiSettings};
use crate::units::Unit;

/// Persisted display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUiSettings {
    pub unit: Unit,
    pub snapping_enabled: bool,
    pub show_dimensions: bool,
}

impl Default for ProjectUiSettings {
    fn default() -> Self {
        let ui = UiSettings::default();
        Self {
            unit: ui.unit,
            snapping_enabled: ui.snapping_enabled,
            show_dimensions: ui.show_dimensions,
        }
    }
}

/// A saved workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub version: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub workspace_items: Vec<Workpiece>,
    #[serde(default)]
    pub materials: Catalog,
    #[serde(default)]
    pub guides: Vec<GuidePoint>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub ui_settings: ProjectUiSettings,
}

impl ProjectData {
    /// Capture the current state, stamped now.
    pub fn from_state(state: &AppState) -> Self {
        let ui = state.ui();
        Self {
            version: PROJECT_VERSION.to_string(),
            timestamp: Utc::now(),
            workspace_items: state.items().to_vec(),
            materials: state.catalog().clone(),
            guides: state.guides().to_vec(),
            measurements: state.measurements().to_vec(),
            ui_settings: ProjectUiSettings {
                unit: ui.unit,
                snapping_enabled: ui.snapping_enabled,
                show_dimensions: ui.show_dimensions,
            },
        }
    }

    /// Build a fresh state from this project. An empty material table falls
    /// back to the built-in catalog.
    pub fn into_state(self, config: PlannerConfig) -> AppState {
        let catalog = if self.materials.is_empty() {
            default_catalog()
        } else {
            self.materials
        };
        let ui = UiSettings {
            unit: self.ui_settings.unit,
            snapping_enabled: self.ui_settings.snapping_enabled,
            show_dimensions: self.ui_settings.show_dimensions,
            ..UiSettings::default()
        };
        AppState::new(config)
            .with_contents(catalog, self.workspace_items, self.guides, self.measurements)
            .with_ui(ui)
    }

    /// Parse project JSON.
    ///
    /// The version marker must be present and `workspaceItems` must be an
    /// array; other collections default to empty.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;

        match value.get("version") {
            Some(Value::String(v)) if !v.is_empty() => {}
            _ => {
                warn!("Project data has no version");
                return Err(PlannerError::MissingVersion);
            }
        }
        if !matches!(value.get("workspaceItems"), Some(Value::Array(_))) {
            warn!("Project data has no workspace item list");
            return Err(PlannerError::InvalidWorkspaceItems);
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a project file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlannerError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let project = Self::from_json(&content)?;
        info!(
            "Loaded project {} ({} items, {} guides, {} measurements)",
            path.display(),
            project.workspace_items.len(),
            project.guides.len(),
            project.measurements.len()
        );
        Ok(project)
    }

    /// Write a project file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        info!("Saved project to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarkerId, WorldPoint};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_version_is_rejected() {
        let err = ProjectData::from_json(r#"{"workspaceItems": []}"#).unwrap_err();
        assert!(matches!(err, PlannerError::MissingVersion));
        let err = ProjectData::from_json(r#"{"version": "", "workspaceItems": []}"#).unwrap_err();
        assert!(matches!(err, PlannerError::MissingVersion));
    }

    #[test]
    fn test_non_array_items_are_rejected() {
        for text in [
            r#"{"version": "1.0.0"}"#,
            r#"{"version": "1.0.0", "workspaceItems": {}}"#,
            r#"{"version": "1.0.0", "workspaceItems": null}"#,
        ] {
            let err = ProjectData::from_json(text).unwrap_err();
            assert!(matches!(err, PlannerError::InvalidWorkspaceItems), "{text}");
        }
    }

    #[test]
    fn test_minimal_project_uses_defaults() {
        let project = ProjectData::from_json(r#"{"version": "1.0.0", "workspaceItems": []}"#).unwrap();
        assert!(project.guides.is_empty());
        assert!(project.measurements.is_empty());
        assert_eq!(project.ui_settings, ProjectUiSettings::default());

        let state = project.into_state(PlannerConfig::default());
        assert_eq!(state.catalog().len(), 4);
    }

    #[test]
    fn test_state_round_trip_through_json() {
        let mut state = AppState::default();
        state.add_material("m3", Some(1200.0), 2).unwrap();
        state.add_measurement(WorldPoint::new(0.0, 0.0, 0.0), WorldPoint::new(0.0, 0.0, 90.0));
        state.set_unit(Unit::Inches);

        let json = ProjectData::from_state(&state).to_json().unwrap();
        assert!(json.contains("\"workspaceItems\""));
        assert!(json.contains("\"uiSettings\""));

        let restored = ProjectData::from_json(&json)
            .unwrap()
            .into_state(PlannerConfig::default());
        assert_eq!(restored.items(), state.items());
        assert_eq!(restored.guides(), state.guides());
        assert_eq!(restored.measurements(), state.measurements());
        assert_eq!(restored.unit(), Unit::Inches);
        assert_eq!(restored.history().len(), 1);
    }

    #[test]
    fn test_loads_timestamped_marker_ids() {
        let text = r#"{
            "version": "1.0.0",
            "timestamp": "2025-01-01T00:00:00Z",
            "workspaceItems": [],
            "guides": [
                {"id": "guide-1735689600000-0.123", "x": 0, "y": 0, "z": 0, "label": "A"},
                {"id": "guide-1735689600001-0.456", "x": 300, "y": 0, "z": 400, "label": "B"}
            ],
            "measurements": [{
                "id": "measure-1735689600002-0.789",
                "pointA": {"x": 0, "y": 0, "z": 0},
                "pointB": {"x": 300, "y": 0, "z": 400},
                "distance": 500,
                "guideAId": "guide-1735689600000-0.123",
                "guideBId": "guide-1735689600001-0.456"
            }]
        }"#;

        let project = ProjectData::from_json(text).unwrap();
        assert_eq!(project.guides[0].id.as_str(), "guide-1735689600000-0.123");
        assert!(crate::validation::validate_project(&project).warnings.is_empty());

        let mut state = project.into_state(PlannerConfig::default());
        assert!(state.incomplete_measurement().is_none());

        state.delete_guide(&MarkerId::from("guide-1735689600001-0.456")).unwrap();
        let measurement = MarkerId::from("measure-1735689600002-0.789");
        assert_eq!(state.incomplete_measurement().map(|m| &m.id), Some(&measurement));
        state
            .repair_measurement(&measurement, WorldPoint::new(0.0, 0.0, 120.0))
            .unwrap();
        assert_eq!(state.measurements()[0].distance, 120.0);
    }
}
