//! BMI calculation and classification.
//!
//! All functions here are pure: identical inputs always produce identical
//! results, and nothing is cached between calls.
//!
//! Rounding is half away from zero (`f64::round`), so an exact `24.25`
//! becomes `24.3`.

use crate::bands::BandScheme;
use crate::types::ensure_positive;
use crate::{Classification, Error, IdealWeight, Measurement, Result};

/// Lower BMI bound of the Normal band
const IDEAL_BMI_MIN: f64 = 18.5;

/// BMI used for the top of the ideal weight range
const IDEAL_BMI_MAX: f64 = 24.9;

fn height_in_meters(height_cm: f64) -> f64 {
    height_cm / 100.0
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute BMI from weight (kg) and height (cm), rounded to one decimal.
pub fn calculate_bmi(weight: f64, height: f64) -> Result<f64> {
    ensure_positive("height", height)?;
    ensure_positive("weight", weight)?;

    let meters = height_in_meters(height);
    let bmi = round_to_tenth(weight / (meters * meters));
    if !bmi.is_finite() {
        return Err(Error::invalid(format!(
            "BMI for weight {} and height {} is not a finite number",
            weight, height
        )));
    }
    if bmi <= 0.0 {
        return Err(Error::invalid(format!(
            "BMI for weight {} and height {} rounds to zero",
            weight, height
        )));
    }
    Ok(bmi)
}

/// Weight range (whole kg) that yields a Normal BMI at the given height (cm).
pub fn calculate_ideal_weight(height: f64) -> Result<IdealWeight> {
    ensure_positive("height", height)?;

    let meters = height_in_meters(height);
    let squared = meters * meters;
    let ideal = IdealWeight {
        min: (IDEAL_BMI_MIN * squared).round(),
        max: (IDEAL_BMI_MAX * squared).round(),
    };
    if !ideal.min.is_finite() || !ideal.max.is_finite() {
        return Err(Error::invalid(format!(
            "ideal weight for height {} is not a finite number",
            height
        )));
    }
    Ok(ideal)
}

/// Stateless classifier bound to one banding scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classifier {
    scheme: BandScheme,
}

impl Classifier {
    pub fn new(scheme: BandScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> BandScheme {
        self.scheme
    }

    /// Map a BMI value to its band. Attaches the ideal weight range when a
    /// height (cm) is supplied.
    pub fn classify(&self, bmi: f64, height: Option<f64>) -> Result<Classification> {
        if !bmi.is_finite() {
            return Err(Error::invalid("BMI must be a finite number"));
        }

        let ideal_weight = height.map(calculate_ideal_weight).transpose()?;
        let band = self.scheme.lookup(bmi);

        tracing::debug!(
            "Classified BMI {} as {} ({})",
            bmi,
            band.category,
            self.scheme
        );

        Ok(Classification {
            bmi,
            category: band.category,
            color: band.color,
            health_risk: band.risk,
            recommendation: band.recommendation,
            tips: band.tips,
            ideal_weight,
        })
    }

    /// Validate a measurement, compute its BMI and classify it
    pub fn evaluate(&self, measurement: &Measurement) -> Result<Classification> {
        measurement.validate()?;
        let bmi = calculate_bmi(measurement.weight, measurement.height)?;
        self.classify(bmi, Some(measurement.height))
    }
}
