//! Unit systems for displaying body measurements.
//!
//! The simulation works in metric units internally. Conversion happens only
//! at the formatting boundary, with the unit system passed in explicitly.

use serde::{Deserialize, Serialize};

/// Unit system used when reporting lengths and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Centimeters and kilograms.
    #[default]
    Metric,
    /// Inches and pounds.
    Imperial,
}

const INCHES_PER_CENTIMETER: f32 = 1.0 / 2.54;
const POUNDS_PER_KILOGRAM: f32 = 2.204_622_6;

impl UnitSystem {
    /// Convert a length in centimeters.
    pub fn length(self, centimeters: f32) -> f32 {
        match self {
            UnitSystem::Metric => centimeters,
            UnitSystem::Imperial => centimeters * INCHES_PER_CENTIMETER,
        }
    }

    /// Convert a weight in kilograms.
    pub fn weight(self, kilograms: f32) -> f32 {
        match self {
            UnitSystem::Metric => kilograms,
            UnitSystem::Imperial => kilograms * POUNDS_PER_KILOGRAM,
        }
    }

    pub fn length_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn weight_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }

    /// Format a length in centimeters with one decimal and a unit suffix.
    pub fn format_length(self, centimeters: f32) -> String {
        format!("{:.1} {}", self.length(centimeters), self.length_suffix())
    }

    /// Format a weight in kilograms with two decimals and a unit suffix.
    pub fn format_weight(self, kilograms: f32) -> String {
        format!("{:.2} {}", self.weight(kilograms), self.weight_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting() {
        assert_eq!(UnitSystem::Metric.format_length(25.4), "25.4 cm");
        assert_eq!(UnitSystem::Imperial.format_length(25.4), "10.0 in");
        assert_eq!(UnitSystem::Imperial.format_weight(1.0), "2.20 lb");
    }
}
