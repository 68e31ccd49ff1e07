//! Stock material catalog entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of stock material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    Wood,
    Metal,
    Pvc,
}

impl MaterialCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Wood => "wood",
            MaterialCategory::Metal => "metal",
            MaterialCategory::Pvc => "pvc",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable stock bar. All dimensions are in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub category: MaterialCategory,
    pub name: String,
    /// Standard stock length.
    pub length: f64,
    /// Cross-section width (profile height).
    pub width: f64,
    /// Cross-section thickness.
    pub thickness: f64,
    /// Price of one stock bar.
    pub price: f64,
}

impl Material {
    pub fn new(
        id: impl Into<String>,
        category: MaterialCategory,
        name: impl Into<String>,
        length: f64,
        width: f64,
        thickness: f64,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            name: name.into(),
            length,
            width,
            thickness,
            price,
        }
    }
}

/// Material catalog keyed by material id.
pub type Catalog = BTreeMap<String, Material>;

/// The built-in catalog (values in mm; profile sizes given in inches are converted).
pub fn default_catalog() -> Catalog {
    let inch = 25.4;
    [
        Material::new(
            "m1",
            MaterialCategory::Metal,
            "Caja HG 3/4 X 3/4 X 1.5",
            6000.0,
            inch,
            inch,
            3600.0,
        ),
        Material::new(
            "m2",
            MaterialCategory::Metal,
            "Caja HG 1 X 2 X 1.5",
            6000.0,
            inch,
            2.0 * inch,
            6950.0,
        ),
        Material::new(
            "m3",
            MaterialCategory::Wood,
            "Viga de Pino 2x4\"",
            2440.0,
            89.0,
            38.0,
            30.0,
        ),
        Material::new(
            "m4",
            MaterialCategory::Pvc,
            "Tubo PVC 4\"",
            3000.0,
            100.0,
            100.0,
            15.0,
        ),
    ]
    .into_iter()
    .map(|m| (m.id.clone(), m))
    .collect()
}
