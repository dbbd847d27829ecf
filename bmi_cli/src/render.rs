//! Terminal rendering for results, inputs and history.

use bmi_core::{Classification, HistoryRow, Measurement};
use std::io::{self, Write};

/// Light or dark frame style for result cards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn frame(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Theme::Light => (
                "╭─────────────────────────────────────────╮",
                "│",
                "╰─────────────────────────────────────────╯",
            ),
            Theme::Dark => (
                "┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓",
                "┃",
                "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛",
            ),
        }
    }
}

/// Print the full result card
pub fn result_card(
    out: &mut dyn Write,
    measurement: &Measurement,
    result: &Classification,
    theme: Theme,
) -> io::Result<()> {
    let (top, side, bottom) = theme.frame();
    writeln!(out)?;
    writeln!(out, "{}", top)?;
    writeln!(out, "{}  YOUR BMI: {:.1}", side, result.bmi)?;
    writeln!(out, "{}", bottom)?;
    writeln!(out)?;
    writeln!(out, "  Category:    {} ({})", result.category, result.color)?;
    writeln!(out, "  Health risk: {}", result.health_risk)?;
    writeln!(
        out,
        "  Height: {} cm | Weight: {} kg | Age: {} yo | {}",
        measurement.height, measurement.weight, measurement.age, measurement.gender
    )?;
    writeln!(out)?;
    writeln!(out, "  {}", result.recommendation)?;

    if let Some(ideal) = result.ideal_weight {
        writeln!(out, "  Ideal weight: {}-{} kg", ideal.min, ideal.max)?;
    }

    if !result.tips.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Health Tips")?;
        for tip in result.tips {
            writeln!(out, "  • {}", tip)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

/// Print the current inputs with a live BMI preview
pub fn input_summary(
    out: &mut dyn Write,
    measurement: &Measurement,
    preview: Option<&Classification>,
) -> io::Result<()> {
    writeln!(
        out,
        "  Gender: {} | Height: {} cm | Weight: {} kg | Age: {} yo",
        measurement.gender, measurement.height, measurement.weight, measurement.age
    )?;
    if let Some(result) = preview {
        writeln!(out, "  BMI preview: {:.1} ({})", result.bmi, result.category)?;
    }
    Ok(())
}

/// Print history rows, newest first
pub fn history(out: &mut dyn Write, rows: &[HistoryRow<'_>]) -> io::Result<()> {
    writeln!(out, "History")?;
    if rows.is_empty() {
        writeln!(out, "  No history yet. Calculate your BMI first!")?;
        return Ok(());
    }

    for row in rows {
        let record = row.record;
        writeln!(
            out,
            "  {}  BMI {:.1} {} ({})",
            record.date(),
            record.bmi,
            row.classification.category,
            row.classification.color
        )?;
        writeln!(
            out,
            "      Height: {}cm  Weight: {}kg  Age: {}yo  {}",
            record.height, record.weight, record.age, record.gender
        )?;
    }
    Ok(())
}
