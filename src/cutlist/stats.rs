//! Material usage per catalog material.

use serde::Serialize;

use crate::model::Workpiece;

/// How much of one catalog material is on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    pub material_id: String,
    pub name: String,
    /// Sum of current lengths (mm).
    pub total_length: f64,
    pub piece_count: usize,
    pub stock_length: f64,
    pub price: f64,
    pub bars_needed: u64,
    pub cost: f64,
    pub waste_percentage: f64,
}

/// Usage of every material plus the estimated total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub materials: Vec<MaterialUsage>,
    pub total_cost: f64,
}

impl ProjectStats {
    pub fn total_length(&self) -> f64 {
        self.materials.iter().map(|m| m.total_length).sum()
    }
}

/// Tally pieces by material id, in first-seen order.
pub fn material_usage(items: &[Workpiece]) -> ProjectStats {
    let mut materials: Vec<MaterialUsage> = Vec::new();

    for item in items {
        match materials.iter_mut().find(|m| m.material_id == item.material_id) {
            Some(usage) => {
                usage.total_length += item.current_length;
                usage.piece_count += 1;
            }
            None => materials.push(MaterialUsage {
                material_id: item.material_id.clone(),
                name: item.name.clone(),
                total_length: item.current_length,
                piece_count: 1,
                stock_length: item.length,
                price: item.price,
                bars_needed: 0,
                cost: 0.0,
                waste_percentage: 0.0,
            }),
        }
    }

    for usage in &mut materials {
        if usage.stock_length <= 0.0 {
            continue;
        }
        usage.bars_needed = (usage.total_length / usage.stock_length).ceil() as u64;
        usage.cost = usage.bars_needed as f64 * usage.price;
        let purchased = usage.bars_needed as f64 * usage.stock_length;
        if purchased > 0.0 {
            usage.waste_percentage = (purchased - usage.total_length) / purchased * 100.0;
        }
    }

    let total_cost = materials.iter().map(|m| m.cost).sum();
    ProjectStats {
        materials,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_catalog;

    #[test]
    fn test_usage_by_material_id() {
        let catalog = default_catalog();
        let items = vec![
            Workpiece::from_material(&catalog["m3"]).with_length(2000.0),
            Workpiece::from_material(&catalog["m1"]).with_length(1500.0),
            Workpiece::from_material(&catalog["m3"]).with_length(1000.0),
        ];

        let stats = material_usage(&items);
        assert_eq!(stats.materials.len(), 2);

        let pine = &stats.materials[0];
        assert_eq!(pine.material_id, "m3");
        assert_eq!(pine.piece_count, 2);
        assert_eq!(pine.total_length, 3000.0);
        assert_eq!(pine.bars_needed, 2);
        assert_eq!(pine.cost, 60.0);

        let tube = &stats.materials[1];
        assert_eq!(tube.bars_needed, 1);
        assert_eq!(tube.waste_percentage, 75.0);

        assert_eq!(stats.total_cost, 3660.0);
        assert_eq!(stats.total_length(), 4500.0);
    }
}
