//! Integrity checks for loaded projects.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::config::{EPS, PROJECT_VERSION};
use crate::model::{Catalog, GuidePoint, MarkerId, Measurement, Workpiece};
use crate::project::ProjectData;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate a whole project.
pub fn validate_project(project: &ProjectData) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if project.version != PROJECT_VERSION {
        result.add_warning(format!(
            "Project version {} differs from {}",
            project.version, PROJECT_VERSION
        ));
    }

    result.merge(validate_catalog(&project.materials));
    result.merge(validate_items(&project.workspace_items, &project.materials));
    result.merge(validate_markers(&project.guides, &project.measurements));

    result
}

/// Validate catalog entries.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (id, material) in catalog {
        if material.id != *id {
            result.add_warning(format!(
                "Material {}: Catalog key does not match id {}",
                id, material.id
            ));
        }
        if material.length <= 0.0 {
            result.add_warning(format!("Material {}: Stock length is not positive", id));
        }
        if material.width <= 0.0 || material.thickness <= 0.0 {
            result.add_error(format!(
                "Material {}: Invalid cross-section {} x {}",
                id, material.width, material.thickness
            ));
        }
    }

    result
}

/// Validate workspace items.
///
/// Catalog references are only checked when a catalog is present; a project
/// without one falls back to the built-in materials.
pub fn validate_items(items: &[Workpiece], catalog: &Catalog) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let item_num = idx + 1;

        if !seen.insert(item.instance_id) {
            result.add_error(format!(
                "Item {}: Duplicate instance id {}",
                item_num, item.instance_id
            ));
        }

        if item.width <= 0.0 || item.thickness <= 0.0 {
            result.add_error(format!(
                "Item {}: Invalid dimensions {} x {}",
                item_num, item.width, item.thickness
            ));
        }

        if item.current_length.is_nan() || item.current_length <= 0.0 {
            result.add_error(format!(
                "Item {}: Length {} must be positive",
                item_num, item.current_length
            ));
        } else if item.length > 0.0 && item.current_length > item.length + EPS {
            result.add_warning(format!(
                "Item {}: Length {} exceeds stock length {}",
                item_num, item.current_length, item.length
            ));
        }

        if item.length <= 0.0 {
            result.add_warning(format!(
                "Item {}: Stock length is not positive, excluded from costing",
                item_num
            ));
        }

        if !catalog.is_empty() && !catalog.contains_key(&item.material_id) {
            result.add_warning(format!(
                "Item {}: Material {} is not in the catalog",
                item_num, item.material_id
            ));
        }

        if item.bottom() < -EPS {
            result.add_warning(format!("Item {}: Below the floor", item_num));
        }
    }

    let mut group_sizes: BTreeMap<Uuid, usize> = BTreeMap::new();
    for group_id in items.iter().filter_map(|i| i.group_id) {
        *group_sizes.entry(group_id).or_default() += 1;
    }
    for (group_id, _) in group_sizes.iter().filter(|(_, n)| **n == 1) {
        result.add_warning(format!("Group {}: Has a single member", group_id));
    }

    result
}

/// Validate guides and the measurements anchored on them.
pub fn validate_markers(guides: &[GuidePoint], measurements: &[Measurement]) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut guide_ids: HashSet<&MarkerId> = HashSet::with_capacity(guides.len());

    for guide in guides {
        if !guide_ids.insert(&guide.id) {
            result.add_error(format!("Guide {}: Duplicate id", guide.id));
        }
    }

    for (idx, m) in measurements.iter().enumerate() {
        let num = idx + 1;
        let missing = [&m.guide_a_id, &m.guide_b_id]
            .into_iter()
            .filter(|id| !guide_ids.contains(id))
            .count();
        match missing {
            0 => {}
            1 => result.add_warning(format!(
                "Measurement {}: Anchor guide missing, measurement is incomplete",
                num
            )),
            _ => result.add_warning(format!("Measurement {}: Both anchor guides missing", num)),
        }

        let actual = m.point_a.distance(m.point_b);
        if (actual - m.distance).abs() > 0.01 {
            result.add_warning(format!(
                "Measurement {}: Stored distance {} does not match endpoints ({:.2})",
                num, m.distance, actual
            ));
        }
    }

    result
}
