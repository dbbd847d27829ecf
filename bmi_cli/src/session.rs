//! Interactive calculator session.
//!
//! All presentation state (inputs, theme, current screen, history) lives in
//! `SessionState` and is passed explicitly to each handler.

use crate::render::{self, Theme};
use bmi_core::config::LimitsConfig;
use bmi_core::report::write_history_csv;
use bmi_core::{
    share_result, Classification, Classifier, Config, Gender, JsonReportSink, Ledger,
    Measurement, ReportSink, ResultReport, Result, ShareTarget, Snapshot,
};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// Which view the session is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Input,
    Result,
    History,
}

/// Set a value outright or nudge it like a stepper button
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Adjust {
    Set(f64),
    Step(f64),
}

impl Adjust {
    fn apply(self, current: f64) -> f64 {
        match self {
            Adjust::Set(value) => value,
            Adjust::Step(delta) => current + delta,
        }
    }
}

impl FromStr for Adjust {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "+" => Ok(Adjust::Step(1.0)),
            "-" => Ok(Adjust::Step(-1.0)),
            value => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Adjust::Set)
                .ok_or_else(|| format!("'{}' is not a number", value)),
        }
    }
}

/// One line of user input
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Gender(Option<Gender>),
    Weight(Adjust),
    Height(Adjust),
    Age(Adjust),
    Calc,
    Show,
    History,
    Clear,
    Share,
    Export(Option<PathBuf>),
    ExportHistory(PathBuf),
    Theme,
    Back,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, String> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next();

        let required = |what: &str| {
            arg.ok_or_else(|| format!("'{}' needs a value", what))
        };

        let command = match name.as_str() {
            "gender" => SessionCommand::Gender(
                arg.map(|g| g.parse::<Gender>().map_err(|e| e.to_string()))
                    .transpose()?,
            ),
            "weight" => SessionCommand::Weight(required("weight")?.parse()?),
            "height" => SessionCommand::Height(required("height")?.parse()?),
            "age" => SessionCommand::Age(required("age")?.parse()?),
            "calc" | "calculate" | "go" => SessionCommand::Calc,
            "show" => SessionCommand::Show,
            "history" => SessionCommand::History,
            "clear" | "reset" => SessionCommand::Clear,
            "share" => SessionCommand::Share,
            "export" => SessionCommand::Export(arg.map(PathBuf::from)),
            "export-history" => {
                SessionCommand::ExportHistory(PathBuf::from(required("export-history")?))
            }
            "theme" => SessionCommand::Theme,
            "back" => SessionCommand::Back,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            "" => return Err("empty command".into()),
            other => return Err(format!("unknown command '{}'", other)),
        };
        Ok(command)
    }
}

/// Whether the session loop should keep reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the interactive session owns
pub struct SessionState {
    pub input: Measurement,
    pub theme: Theme,
    pub screen: Screen,
    pub ledger: Ledger,
    last: Option<(Measurement, Classification)>,
    classifier: Classifier,
    limits: LimitsConfig,
    export_dir: PathBuf,
}

impl SessionState {
    pub fn new(config: &Config, classifier: Classifier) -> Self {
        Self {
            input: Measurement::default().clamped(&config.limits),
            theme: Theme::default(),
            screen: Screen::Input,
            ledger: Ledger::new(config.history.capacity),
            last: None,
            classifier,
            limits: config.limits.clone(),
            export_dir: config.export.dir.clone(),
        }
    }

    /// Result of the last "calc", if any
    pub fn last_result(&self) -> Option<&Classification> {
        self.last.as_ref().map(|(_, result)| result)
    }

    fn set_input(&mut self, input: Measurement) {
        self.input = input.clamped(&self.limits);
        self.screen = Screen::Input;
    }

    /// Apply one command, writing any output to `out`
    pub fn handle(
        &mut self,
        command: SessionCommand,
        out: &mut dyn Write,
        share: &mut dyn ShareTarget,
    ) -> Result<Flow> {
        match command {
            SessionCommand::Gender(gender) => {
                let gender = gender.unwrap_or_else(|| self.input.gender.toggled());
                self.set_input(Measurement {
                    gender,
                    ..self.input.clone()
                });
                writeln!(out, "Gender: {}", self.input.gender)?;
            }
            SessionCommand::Weight(adjust) => {
                self.set_input(Measurement {
                    weight: adjust.apply(self.input.weight),
                    ..self.input.clone()
                });
                writeln!(out, "Weight: {} kg", self.input.weight)?;
            }
            SessionCommand::Height(adjust) => {
                self.set_input(Measurement {
                    height: adjust.apply(self.input.height),
                    ..self.input.clone()
                });
                writeln!(out, "Height: {} cm", self.input.height)?;
            }
            SessionCommand::Age(adjust) => {
                let age = adjust.apply(self.input.age as f64).max(0.0).round() as u32;
                self.set_input(Measurement {
                    age,
                    ..self.input.clone()
                });
                writeln!(out, "Age: {} yo", self.input.age)?;
            }
            SessionCommand::Calc => self.calculate(out)?,
            SessionCommand::Show => self.show(out)?,
            SessionCommand::History => {
                self.screen = Screen::History;
                self.show(out)?;
            }
            SessionCommand::Clear => {
                self.ledger.clear();
                writeln!(out, "History cleared")?;
            }
            SessionCommand::Share => match self.last_result() {
                Some(result) => match share_result(share, result) {
                    Ok(()) => writeln!(out, "✓ Shared")?,
                    Err(e) => writeln!(out, "Share failed: {}", e)?,
                },
                None => writeln!(out, "Nothing to share yet. Run 'calc' first.")?,
            },
            SessionCommand::Export(dir) => self.export(dir, out)?,
            SessionCommand::ExportHistory(path) => {
                let rows = self.ledger.rows(&self.classifier)?;
                match write_history_csv(&rows, &path) {
                    Ok(count) => writeln!(
                        out,
                        "✓ Exported {} history entries to {}",
                        count,
                        path.display()
                    )?,
                    Err(e) => writeln!(out, "History export failed: {}", e)?,
                }
            }
            SessionCommand::Theme => {
                self.theme = self.theme.toggled();
                writeln!(out, "Theme: {}", self.theme.name())?;
            }
            SessionCommand::Back => {
                self.screen = Screen::Input;
                self.show(out)?;
            }
            SessionCommand::Help => help(out)?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn calculate(&mut self, out: &mut dyn Write) -> Result<()> {
        let result = self.classifier.evaluate(&self.input)?;
        self.ledger
            .record(Snapshot::from_measurement(&self.input, &result))?;
        tracing::info!("Calculated BMI {} ({})", result.bmi, result.category);

        render::result_card(out, &self.input, &result, self.theme)?;
        self.last = Some((self.input.clone(), result));
        self.screen = Screen::Result;
        Ok(())
    }

    fn show(&self, out: &mut dyn Write) -> Result<()> {
        match self.screen {
            Screen::Input => {
                let preview = self.classifier.evaluate(&self.input).ok();
                render::input_summary(out, &self.input, preview.as_ref())?;
            }
            Screen::Result => match &self.last {
                Some((measurement, result)) => {
                    render::result_card(out, measurement, result, self.theme)?
                }
                None => render::input_summary(out, &self.input, None)?,
            },
            Screen::History => {
                let rows = self.ledger.rows(&self.classifier)?;
                render::history(out, &rows)?;
            }
        }
        Ok(())
    }

    fn export(&self, dir: Option<PathBuf>, out: &mut dyn Write) -> Result<()> {
        let Some((measurement, result)) = &self.last else {
            writeln!(out, "Nothing to export yet. Run 'calc' first.")?;
            return Ok(());
        };

        let mut sink = JsonReportSink::new(dir.unwrap_or_else(|| self.export_dir.clone()));
        let report = ResultReport::new(measurement.clone(), result.clone());
        match sink.export(&report) {
            Ok(path) => writeln!(out, "✓ Report exported: {}", path.display())?,
            Err(e) => writeln!(out, "Export failed: {}", e)?,
        }
        Ok(())
    }
}

fn help(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  gender [male|female]   set or toggle gender")?;
    writeln!(out, "  weight <kg|+|->        set or step weight")?;
    writeln!(out, "  height <cm|+|->        set or step height")?;
    writeln!(out, "  age <years|+|->        set or step age")?;
    writeln!(out, "  calc                   calculate and save to history")?;
    writeln!(out, "  show                   redraw the current screen")?;
    writeln!(out, "  history                show this session's history")?;
    writeln!(out, "  clear                  clear history")?;
    writeln!(out, "  share                  share the last result")?;
    writeln!(out, "  export [dir]           export the last result as JSON")?;
    writeln!(out, "  export-history <file>  export history as CSV")?;
    writeln!(out, "  theme                  toggle light/dark theme")?;
    writeln!(out, "  back                   return to the input screen")?;
    writeln!(out, "  quit                   leave the session")?;
    Ok(())
}
