//! Unit management
//!
//! G-code programs address the machine either in millimeters (G21) or
//! inches (G20). All internal coordinates are kept in millimeter scale;
//! inch values are multiplied by 25.4 on the way in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine coordinate units (millimeters or inches)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (metric)
    Mm,
    /// Inches (imperial)
    Inches,
}

impl Units {
    /// Scale factor applied to raw coordinate values to reach internal
    /// millimeter scale (1.0 for millimeters, 25.4 for inches).
    pub fn scale_factor(self) -> f64 {
        match self {
            Units::Mm => 1.0,
            Units::Inches => 25.4,
        }
    }

    /// Convert a value between unit systems
    pub fn convert(value: f64, from: Units, to: Units) -> f64 {
        if from == to {
            return value;
        }
        match (from, to) {
            (Units::Mm, Units::Inches) => value / 25.4,
            (Units::Inches, Units::Mm) => value * 25.4,
            _ => value,
        }
    }
}

impl Default for Units {
    fn default() -> Self {
        Units::Mm
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Mm => write!(f, "mm"),
            Units::Inches => write!(f, "in"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mm" | "millimeters" | "metric" => Ok(Units::Mm),
            "in" | "inch" | "inches" | "imperial" => Ok(Units::Inches),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}
