//! Plain-text cut list report.

use std::fmt;

use super::CutListSummary;
use crate::model::Measurement;
use crate::units::{format_dim, Unit};

/// A printable cut list in a display unit, optionally followed by the
/// measurements of the project.
#[derive(Debug, Clone, Copy)]
pub struct CutListReport<'a> {
    summary: &'a CutListSummary,
    measurements: &'a [Measurement],
    unit: Unit,
}

impl<'a> CutListReport<'a> {
    pub fn new(summary: &'a CutListSummary, unit: Unit) -> Self {
        Self {
            summary,
            measurements: &[],
            unit,
        }
    }

    pub fn with_measurements(mut self, measurements: &'a [Measurement]) -> Self {
        self.measurements = measurements;
        self
    }
}

impl fmt::Display for CutListReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.unit;
        writeln!(f, "CUT LIST ({})", unit)?;

        for group in &self.summary.groups {
            let req = group.requirements();
            writeln!(f)?;
            writeln!(f, "{}", group.name)?;
            writeln!(
                f,
                "  {} x {} | Bar: {}",
                format_dim(group.width, unit),
                format_dim(group.thickness, unit),
                format_dim(group.stock_length, unit)
            )?;
            for (i, cut) in group.cuts.iter().enumerate() {
                writeln!(
                    f,
                    "  #{} {} x {} = {}",
                    i + 1,
                    format_dim(cut.length, unit),
                    cut.quantity,
                    format_dim(cut.length * cut.quantity as f64, unit)
                )?;
            }
            writeln!(
                f,
                "  Total: {} | Bars: {} | Waste: {:.1}% | Price/bar: {:.2} | Cost: {:.2}",
                format_dim(req.total_length, unit),
                req.bars_needed,
                req.waste_percentage,
                group.price,
                req.total_cost
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Material types: {}", self.summary.groups.len())?;
        writeln!(f, "Total cost: {:.2}", self.summary.total_cost)?;

        if !self.measurements.is_empty() {
            writeln!(f)?;
            writeln!(f, "Measurements:")?;
            for (i, m) in self.measurements.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, format_dim(m.distance, unit))?;
            }
        }

        Ok(())
    }
}

/// Render the cut list report as a string.
pub fn render_report(summary: &CutListSummary, measurements: &[Measurement], unit: Unit) -> String {
    CutListReport::new(summary, unit)
        .with_measurements(measurements)
        .to_string()
}
