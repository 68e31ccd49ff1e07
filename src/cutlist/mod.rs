//! Cut list aggregation and stock requirements.
//!
//! Pieces are grouped by cross-section (category, width, thickness); within a
//! group identical lengths are tallied. Stock requirements assume perfect
//! packing of the total length into whole bars, so bar-level provenance is
//! not tracked.

pub mod report;
pub mod stats;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{MaterialCategory, Workpiece};

/// One distinct cut length and how many pieces have it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutItem {
    pub length: f64,
    pub quantity: u32,
}

/// All pieces sharing a cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutGroup {
    /// `category_width_thickness`.
    pub material_key: String,
    pub category: MaterialCategory,
    pub name: String,
    pub width: f64,
    pub thickness: f64,
    pub stock_length: f64,
    /// Price per stock bar.
    pub price: f64,
    /// Sorted by length, longest first.
    pub cuts: Vec<CutItem>,
}

impl CutGroup {
    pub fn requirements(&self) -> StockRequirement {
        calculate_stock_requirements(self)
    }

    /// Number of pieces in the group.
    pub fn piece_count(&self) -> u32 {
        self.cuts.iter().map(|c| c.quantity).sum()
    }
}

/// Whole-bar purchase needed for a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRequirement {
    pub total_length: f64,
    pub bars_needed: u64,
    pub waste: f64,
    pub waste_percentage: f64,
    pub total_cost: f64,
}

/// Groups plus the overall cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutListSummary {
    pub groups: Vec<CutGroup>,
    pub total_cost: f64,
}

/// Grouping key for a piece's cross-section.
pub fn material_key(category: MaterialCategory, width: f64, thickness: f64) -> String {
    format!("{}_{}_{}", category, width, thickness)
}

/// Group pieces by cross-section, in first-seen order.
///
/// The first piece of a group supplies its name, stock length and price.
pub fn group_items_by_material(items: &[Workpiece]) -> Vec<CutGroup> {
    let mut groups: Vec<CutGroup> = Vec::new();

    for item in items {
        let key = material_key(item.category, item.width, item.thickness);
        let index = match groups.iter().position(|g| g.material_key == key) {
            Some(index) => index,
            None => {
                groups.push(CutGroup {
                    material_key: key,
                    category: item.category,
                    name: item.name.clone(),
                    width: item.width,
                    thickness: item.thickness,
                    stock_length: item.length,
                    price: item.price,
                    cuts: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let cuts = &mut groups[index].cuts;
        match cuts.iter_mut().find(|c| c.length == item.current_length) {
            Some(cut) => cut.quantity += 1,
            None => cuts.push(CutItem {
                length: item.current_length,
                quantity: 1,
            }),
        }
    }

    for group in &mut groups {
        group.cuts.sort_by(|a, b| b.length.total_cmp(&a.length));
    }

    groups
}

/// Bars, waste and cost for one group. A non-positive stock length yields
/// an all-zero requirement apart from the total length.
pub fn calculate_stock_requirements(group: &CutGroup) -> StockRequirement {
    let total_length: f64 = group
        .cuts
        .iter()
        .map(|c| c.length * c.quantity as f64)
        .sum();

    if group.stock_length <= 0.0 {
        return StockRequirement {
            total_length,
            bars_needed: 0,
            waste: 0.0,
            waste_percentage: 0.0,
            total_cost: 0.0,
        };
    }

    let bars_needed = (total_length / group.stock_length).ceil().max(0.0) as u64;
    let purchased = bars_needed as f64 * group.stock_length;
    let waste = purchased - total_length;
    let waste_percentage = if purchased > 0.0 {
        waste / purchased * 100.0
    } else {
        0.0
    };

    StockRequirement {
        total_length,
        bars_needed,
        waste,
        waste_percentage,
        total_cost: bars_needed as f64 * group.price,
    }
}

/// Group the pieces and total the cost of every group.
pub fn generate_cut_list(items: &[Workpiece]) -> CutListSummary {
    let groups = group_items_by_material(items);
    let total_cost = groups.iter().map(|g| g.requirements().total_cost).sum();

    debug!(
        "Cut list: {} pieces in {} groups, total cost {:.2}",
        items.len(),
        groups.len(),
        total_cost
    );

    CutListSummary { groups, total_cost }
}
