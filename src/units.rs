//! Display units and conversion to and from the millimeter base unit.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PlannerError;

/// Unit of measurement used for display and input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm")]
    Millimeters,
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "m")]
    Meters,
}

impl Unit {
    /// All supported units.
    pub const ALL: [Unit; 4] = [
        Unit::Millimeters,
        Unit::Centimeters,
        Unit::Inches,
        Unit::Meters,
    ];

    /// Millimeters per one of this unit.
    pub fn multiplier(&self) -> f64 {
        match self {
            Unit::Millimeters => 1.0,
            Unit::Centimeters => 10.0,
            Unit::Inches => 25.4,
            Unit::Meters => 1000.0,
        }
    }

    /// Decimal places shown when formatting.
    pub fn precision(&self) -> usize {
        match self {
            Unit::Millimeters => 0,
            Unit::Centimeters => 1,
            Unit::Inches | Unit::Meters => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Inches => "in",
            Unit::Meters => "m",
        }
    }

    /// Convert a value expressed in this unit to millimeters.
    #[inline]
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.multiplier()
    }

    /// Convert a millimeter value to this unit.
    #[inline]
    pub fn from_base(&self, value: f64) -> f64 {
        value / self.multiplier()
    }

    /// Format a millimeter value in this unit, rounded to the unit's precision.
    ///
    /// Trailing zeros are dropped, so 125 mm in centimeters is `"12.5 cm"`.
    pub fn format(&self, mm: f64, show_suffix: bool) -> String {
        let number = format_number(self.from_base(mm), self.precision());
        if show_suffix {
            format!("{} {}", number, self.label())
        } else {
            number
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" => Ok(Unit::Millimeters),
            "cm" => Ok(Unit::Centimeters),
            "in" | "inch" => Ok(Unit::Inches),
            "m" => Ok(Unit::Meters),
            _ => Err(PlannerError::UnknownUnit {
                value: s.to_string(),
            }),
        }
    }
}

/// Render a number with at most `precision` decimals and no trailing zeros.
pub fn format_number(value: f64, precision: usize) -> String {
    let mut text = format!("{:.*}", precision, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Shorthand for [`Unit::format`] with the suffix shown.
pub fn format_dim(mm: f64, unit: Unit) -> String {
    unit.format(mm, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_and_from_base() {
        assert_eq!(Unit::Centimeters.to_base(30.0), 300.0);
        assert_eq!(Unit::Inches.to_base(2.0), 50.8);
        assert_eq!(Unit::Meters.from_base(2440.0), 2.44);
        assert_eq!(Unit::Millimeters.from_base(-5.0), -5.0);
    }

    #[test]
    fn test_round_trip_within_precision() {
        let values = [0.5, 1.0, 12.34, 300.0, 2440.0, 6000.0, 0.01];
        for unit in Unit::ALL {
            let tolerance = 0.5 * 10f64.powi(-(unit.precision() as i32));
            for &x in &values {
                let back = unit.from_base(unit.to_base(x));
                assert!((back - x).abs() < tolerance, "{unit}: {x} -> {back}");
            }
        }
    }

    #[test]
    fn test_format_drops_trailing_zeros() {
        assert_eq!(format_dim(125.0, Unit::Centimeters), "12.5 cm");
        assert_eq!(format_dim(120.0, Unit::Centimeters), "12 cm");
        assert_eq!(format_dim(2440.0, Unit::Meters), "2.44 m");
        assert_eq!(format_dim(25.4, Unit::Inches), "1 in");
        assert_eq!(format_dim(1234.6, Unit::Millimeters), "1235 mm");
        assert_eq!(Unit::Meters.format(1500.0, false), "1.5");
    }

    #[test]
    fn test_format_negative_zero() {
        assert_eq!(format_dim(-0.001, Unit::Millimeters), "0 mm");
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("CM".parse::<Unit>().unwrap(), Unit::Centimeters);
        assert_eq!(" in ".parse::<Unit>().unwrap(), Unit::Inches);
        assert!("ft".parse::<Unit>().is_err());
    }
}
