mod render;
mod session;

use bmi_core::*;
use clap::{Parser, Subcommand};
use session::{Flow, SessionCommand, SessionState};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body Mass Index calculator with health tips", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the banding scheme (four-band, six-band)
    #[arg(long, global = true)]
    scheme: Option<BandScheme>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BMI once and print the result
    Calc {
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        /// Height in centimeters
        #[arg(long)]
        height: f64,

        /// Age in years
        #[arg(long, default_value_t = 23)]
        age: u32,

        /// Gender (male, female)
        #[arg(long, default_value = "male")]
        gender: Gender,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also export the result as a JSON report into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Print the ideal weight range for a height
    Ideal {
        /// Height in centimeters
        #[arg(long)]
        height: f64,
    },

    /// Interactive session with history (default)
    Session,
}

/// Share target that prints the text for the user to copy
struct ConsoleShare;

impl ShareTarget for ConsoleShare {
    fn share(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    bmi_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let scheme = cli.scheme.unwrap_or(config.classifier.scheme);
    let classifier = Classifier::new(scheme);
    tracing::debug!("Using {} classification", scheme);

    match cli.command {
        Some(Commands::Calc {
            weight,
            height,
            age,
            gender,
            json,
            export,
        }) => cmd_calc(
            Measurement {
                weight,
                height,
                age,
                gender,
            },
            json,
            export,
            &classifier,
            &config,
        ),
        Some(Commands::Ideal { height }) => cmd_ideal(height, &config),
        Some(Commands::Session) | None => cmd_session(&classifier, &config),
    }
}

fn cmd_calc(
    raw: Measurement,
    json: bool,
    export: Option<PathBuf>,
    classifier: &Classifier,
    config: &Config,
) -> Result<()> {
    let measurement = raw.clamped(&config.limits);
    if measurement != raw {
        tracing::warn!(
            "Input clamped to configured limits: {:?} -> {:?}",
            raw,
            measurement
        );
    }

    let result = classifier.evaluate(&measurement)?;
    let report = ResultReport::new(measurement.clone(), result.clone());

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else {
        render::result_card(&mut stdout, &measurement, &result, render::Theme::default())?;
    }

    if let Some(dir) = export {
        let mut sink = JsonReportSink::new(dir);
        let path = sink.export(&report)?;
        if !json {
            writeln!(stdout, "✓ Report exported: {}", path.display())?;
        }
    }

    Ok(())
}

fn cmd_ideal(height: f64, config: &Config) -> Result<()> {
    let height = config.limits.height.clamp(height);
    let ideal = calculate_ideal_weight(height)?;
    println!(
        "Ideal weight for {} cm: {}-{} kg",
        height, ideal.min, ideal.max
    );
    Ok(())
}

fn cmd_session(classifier: &Classifier, config: &Config) -> Result<()> {
    let mut state = SessionState::new(config, *classifier);
    let mut share = ConsoleShare;

    println!("BMI Calculator ({} scheme). Type 'help' for commands.", classifier.scheme());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // EOF
            println!();
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{} (type 'help' for commands)", e);
                continue;
            }
        };

        let mut stdout = io::stdout().lock();
        match state.handle(command, &mut stdout, &mut share) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(Error::InvalidInput(msg)) => writeln!(stdout, "Invalid input: {}", msg)?,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
