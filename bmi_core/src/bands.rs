//! Band tables for BMI classification.
//!
//! Two schemes are supported and are never mixed:
//! - `FourBand`: Underweight / Normal / Overweight / Obesity
//! - `SixBand`: adds Severely Underweight and splits Obesity into two classes
//!
//! Boundaries and the band -> color/risk binding are fixed. Recommendation
//! and tip text is plain table content.

use crate::{Category, Color, Error, HealthRisk, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One contiguous BMI interval and everything bound to it
#[derive(Debug, PartialEq)]
pub struct Band {
    /// Exclusive upper bound; `None` for the open-ended top band
    pub upper: Option<f64>,
    pub category: Category,
    pub color: Color,
    pub risk: HealthRisk,
    pub recommendation: &'static str,
    pub tips: &'static [&'static str],
}

impl Band {
    fn contains_below(&self, bmi: f64) -> bool {
        match self.upper {
            Some(upper) => bmi < upper,
            None => true,
        }
    }
}

/// The banding scheme used by a classifier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BandScheme {
    #[default]
    FourBand,
    SixBand,
}

impl BandScheme {
    pub fn bands(&self) -> &'static [Band] {
        match self {
            BandScheme::FourBand => &FOUR_BAND,
            BandScheme::SixBand => &SIX_BAND,
        }
    }

    /// Find the band for a BMI value.
    ///
    /// Bands are tested in ascending order; the first `bmi < upper` wins.
    pub fn lookup(&self, bmi: f64) -> &'static Band {
        let bands = self.bands();
        bands
            .iter()
            .find(|band| band.contains_below(bmi))
            .unwrap_or(&bands[bands.len() - 1])
    }
}

impl fmt::Display for BandScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandScheme::FourBand => f.write_str("four-band"),
            BandScheme::SixBand => f.write_str("six-band"),
        }
    }
}

impl FromStr for BandScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "four-band" | "four" | "4" => Ok(BandScheme::FourBand),
            "six-band" | "six" | "6" => Ok(BandScheme::SixBand),
            other => Err(Error::invalid(format!("unknown band scheme '{}'", other))),
        }
    }
}

// ============================================================================
// Shared band content
// ============================================================================

const UNDERWEIGHT_RECOMMENDATION: &str =
    "Gain weight gradually with a healthy, nutrient-dense diet.";
const UNDERWEIGHT_TIPS: &[&str] = &[
    "Eat five to six smaller meals a day",
    "Choose calorie-dense foods such as nuts, avocado and whole grains",
    "Add strength training to build muscle mass",
    "Drink smoothies or milk between meals",
];

const NORMAL_RECOMMENDATION: &str =
    "Your weight is in the ideal range! Keep up a healthy lifestyle with regular exercise.";
const NORMAL_TIPS: &[&str] = &[
    "Keep eating a balanced diet",
    "Exercise at least 150 minutes a week",
    "Drink eight glasses of water a day",
    "Sleep seven to eight hours a night",
];

const OVERWEIGHT_RECOMMENDATION: &str =
    "Lose weight with regular exercise and a healthy diet.";
const OVERWEIGHT_TIPS: &[&str] = &[
    "Cut back on sugar and processed foods",
    "Do 30 minutes of cardio every day",
    "Watch your portion sizes",
    "Fill half of every plate with vegetables",
];

const OBESITY_RECOMMENDATION: &str =
    "Consult a doctor about a safe weight-loss program.";
const OBESITY_TIPS: &[&str] = &[
    "See a doctor or dietitian for a personal plan",
    "Start with low-impact exercise such as walking or swimming",
    "Track what you eat every day",
    "Set small, realistic weekly goals",
];

// ============================================================================
// Scheme tables
// ============================================================================

static FOUR_BAND: [Band; 4] = [
    Band {
        upper: Some(18.5),
        category: Category::Underweight,
        color: Color::Green,
        risk: HealthRisk::Medium,
        recommendation: UNDERWEIGHT_RECOMMENDATION,
        tips: UNDERWEIGHT_TIPS,
    },
    Band {
        upper: Some(25.0),
        category: Category::Normal,
        color: Color::Blue,
        risk: HealthRisk::Low,
        recommendation: NORMAL_RECOMMENDATION,
        tips: NORMAL_TIPS,
    },
    Band {
        upper: Some(30.0),
        category: Category::Overweight,
        color: Color::Amber,
        risk: HealthRisk::Medium,
        recommendation: OVERWEIGHT_RECOMMENDATION,
        tips: OVERWEIGHT_TIPS,
    },
    Band {
        upper: None,
        category: Category::Obesity,
        color: Color::Red,
        risk: HealthRisk::High,
        recommendation: OBESITY_RECOMMENDATION,
        tips: OBESITY_TIPS,
    },
];

static SIX_BAND: [Band; 6] = [
    Band {
        upper: Some(16.0),
        category: Category::SeverelyUnderweight,
        color: Color::Red,
        risk: HealthRisk::VeryHigh,
        recommendation: "Your weight is far below the healthy range. Please see a doctor soon.",
        tips: &[
            "Get a medical check-up to rule out underlying conditions",
            "Work with a dietitian on a supervised meal plan",
            "Increase calories gradually, not all at once",
            "Avoid intense exercise until your weight recovers",
        ],
    },
    Band {
        upper: Some(18.5),
        category: Category::Underweight,
        color: Color::Green,
        risk: HealthRisk::Medium,
        recommendation: UNDERWEIGHT_RECOMMENDATION,
        tips: UNDERWEIGHT_TIPS,
    },
    Band {
        upper: Some(25.0),
        category: Category::Normal,
        color: Color::Blue,
        risk: HealthRisk::Low,
        recommendation: NORMAL_RECOMMENDATION,
        tips: NORMAL_TIPS,
    },
    Band {
        upper: Some(30.0),
        category: Category::Overweight,
        color: Color::Amber,
        risk: HealthRisk::Medium,
        recommendation: OVERWEIGHT_RECOMMENDATION,
        tips: OVERWEIGHT_TIPS,
    },
    Band {
        upper: Some(35.0),
        category: Category::ObesityClassI,
        color: Color::Red,
        risk: HealthRisk::High,
        recommendation: OBESITY_RECOMMENDATION,
        tips: OBESITY_TIPS,
    },
    Band {
        upper: None,
        category: Category::ObesityClassII,
        color: Color::DarkRed,
        risk: HealthRisk::VeryHigh,
        recommendation: "Your health risk is very high. Seek medical guidance for weight management.",
        tips: &[
            "Book an appointment with your doctor",
            "Ask about supervised weight-loss programs",
            "Monitor blood pressure and blood sugar regularly",
            "Build activity slowly with daily short walks",
        ],
    },
];
