//! Core domain types for the BMI calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Measurement inputs (weight, height, age, gender)
//! - Categories, display colors and health-risk tiers
//! - The immutable classification result

use crate::config::LimitsConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Measurement Types
// ============================================================================

/// Gender of the person being measured. Only affects labels, never arithmetic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// The other gender, for toggle-style selectors
    pub fn toggled(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::invalid(format!("unknown gender '{}'", other))),
        }
    }
}

/// A single set of user-supplied inputs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    /// Age in years
    pub age: u32,
    pub gender: Gender,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            weight: 70.0,
            height: 170.0,
            age: 23,
            gender: Gender::Male,
        }
    }
}

impl Measurement {
    /// Clamp every field into the configured input ranges.
    ///
    /// Non-finite weight/height are left untouched so `validate` can reject them.
    pub fn clamped(&self, limits: &LimitsConfig) -> Self {
        Self {
            weight: limits.weight.clamp(self.weight),
            height: limits.height.clamp(self.height),
            age: limits.age.clamp(self.age as f64).round() as u32,
            gender: self.gender,
        }
    }

    /// Reject inputs the BMI formula cannot handle
    pub fn validate(&self) -> Result<()> {
        ensure_positive("weight", self.weight)?;
        ensure_positive("height", self.height)?;
        Ok(())
    }
}

pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid(format!("{} must be a finite number", name)));
    }
    if value <= 0.0 {
        return Err(Error::invalid(format!(
            "{} must be greater than zero (got {})",
            name, value
        )));
    }
    Ok(())
}

// ============================================================================
// Classification Types
// ============================================================================

/// BMI category. Covers the bands of both classification schemes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
    Obesity,
    ObesityClassI,
    ObesityClassII,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::SeverelyUnderweight => "Severely Underweight",
            Category::Underweight => "Underweight",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obesity => "Obesity",
            Category::ObesityClassI => "Obesity Class I",
            Category::ObesityClassII => "Obesity Class II",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display color bound to a category, serialized as its hex token
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Color {
    #[serde(rename = "#10b981")]
    Green,
    #[serde(rename = "#3b82f6")]
    Blue,
    #[serde(rename = "#f59e0b")]
    Amber,
    #[serde(rename = "#ef4444")]
    Red,
    #[serde(rename = "#dc2626")]
    DarkRed,
}

impl Color {
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Green => "#10b981",
            Color::Blue => "#3b82f6",
            Color::Amber => "#f59e0b",
            Color::Red => "#ef4444",
            Color::DarkRed => "#dc2626",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Qualitative health-risk tier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HealthRisk {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl HealthRisk {
    pub fn label(&self) -> &'static str {
        match self {
            HealthRisk::Low => "Low",
            HealthRisk::Medium => "Medium",
            HealthRisk::High => "High",
            HealthRisk::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for HealthRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weight range (kg) that keeps BMI inside the Normal band for a height
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct IdealWeight {
    pub min: f64,
    pub max: f64,
}

/// The result of classifying a BMI value.
///
/// Everything except `ideal_weight` is derived from `bmi` alone.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Classification {
    pub bmi: f64,
    pub category: Category,
    pub color: Color,
    pub health_risk: HealthRisk,
    pub recommendation: &'static str,
    pub tips: &'static [&'static str],
    pub ideal_weight: Option<IdealWeight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parsing() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" Female ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_toggle() {
        assert_eq!(Gender::Male.toggled(), Gender::Female);
        assert_eq!(Gender::Female.toggled(), Gender::Male);
    }

    #[test]
    fn test_clamped_to_default_limits() {
        let limits = LimitsConfig::default();
        let m = Measurement {
            weight: 250.0,
            height: 90.0,
            age: 7,
            gender: Gender::Female,
        };

        let clamped = m.clamped(&limits);
        assert_eq!(clamped.weight, 200.0);
        assert_eq!(clamped.height, 112.0);
        assert_eq!(clamped.age, 15);
        assert_eq!(clamped.gender, Gender::Female);
    }

    #[test]
    fn test_clamped_age_rounds_fractional_bounds() {
        let mut limits = LimitsConfig::default();
        limits.age = crate::config::Range::new(17.6, 99.4);

        let young = Measurement {
            age: 10,
            ..Measurement::default()
        };
        assert_eq!(young.clamped(&limits).age, 18);

        let old = Measurement {
            age: 120,
            ..Measurement::default()
        };
        assert_eq!(old.clamped(&limits).age, 99);
    }

    #[test]
    fn test_clamped_keeps_in_range_values() {
        let m = Measurement::default();
        assert_eq!(m.clamped(&LimitsConfig::default()), m);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut m = Measurement::default();
        assert!(m.validate().is_ok());

        m.height = 0.0;
        assert!(matches!(m.validate(), Err(Error::InvalidInput(_))));

        m.height = 170.0;
        m.weight = f64::NAN;
        assert!(matches!(m.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&Color::Amber).unwrap();
        assert_eq!(json, "\"#f59e0b\"");
        assert_eq!(Color::DarkRed.to_string(), "#dc2626");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::ObesityClassII.to_string(), "Obesity Class II");
        assert_eq!(HealthRisk::VeryHigh.to_string(), "Very High");
    }
}
