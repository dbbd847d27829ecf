//! Result sharing and export.
//!
//! Sharing and exporting are outside collaborators: the core builds the
//! payload, a `ShareTarget` or `ReportSink` delivers it. A failed delivery
//! is reported to the caller and never touches classifier or ledger state.

use crate::ledger::HistoryRow;
use crate::{Classification, Error, Measurement, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Text handed to a share target
pub fn share_text(result: &Classification) -> String {
    format!(
        "My BMI is {:.1} ({}). Check yours at BMI Calculator!",
        result.bmi, result.category
    )
}

/// Capability that publishes a short text (clipboard, share sheet, ...)
pub trait ShareTarget {
    fn share(&mut self, text: &str) -> Result<()>;
}

/// Share a result through the given target
pub fn share_result<S: ShareTarget + ?Sized>(target: &mut S, result: &Classification) -> Result<()> {
    let text = share_text(result);
    target.share(&text).map_err(|e| {
        tracing::warn!("Sharing result failed: {}", e);
        e
    })
}

/// Renderable snapshot of a single calculation
#[derive(Clone, Debug, Serialize)]
pub struct ResultReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub measurement: Measurement,
    pub classification: Classification,
}

impl ResultReport {
    pub fn new(measurement: Measurement, classification: Classification) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            measurement,
            classification,
        }
    }

    /// File name used by directory-based sinks
    pub fn file_name(&self) -> String {
        let id = self.id.simple().to_string();
        format!(
            "bmi-report-{}-{}.json",
            self.generated_at.format("%Y%m%d-%H%M%S"),
            &id[..8]
        )
    }
}

/// Export capability for result reports
pub trait ReportSink {
    /// Write the report, returning where it ended up
    fn export(&mut self, report: &ResultReport) -> Result<PathBuf>;
}

/// Writes each report as a pretty-printed JSON file in a directory
pub struct JsonReportSink {
    dir: PathBuf,
}

impl JsonReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportSink for JsonReportSink {
    /// Atomically writes the report by:
    /// 1. Writing to a temp file in the target directory
    /// 2. Syncing to disk
    /// 3. Renaming into place
    fn export(&mut self, report: &ResultReport) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(report.file_name());

        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist_noclobber(&path)
            .map_err(|e| Error::Export(format!("{}: {}", path.display(), e.error)))?;

        tracing::info!("Exported report {} to {:?}", report.id, path);
        Ok(path)
    }
}

/// Column names of the history CSV, in `CsvRow` field order
const HISTORY_CSV_HEADER: [&str; 9] = [
    "id", "date", "weight", "height", "age", "gender", "bmi", "category", "color",
];

/// A row in the history CSV
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: String,
    date: String,
    weight: f64,
    height: f64,
    age: u32,
    gender: &'a str,
    bmi: f64,
    category: &'a str,
    color: &'a str,
}

impl<'a> From<&'a HistoryRow<'a>> for CsvRow<'a> {
    fn from(row: &'a HistoryRow<'a>) -> Self {
        CsvRow {
            id: row.record.id.to_string(),
            date: row.record.date(),
            weight: row.record.weight,
            height: row.record.height,
            age: row.record.age,
            gender: row.record.gender.as_str(),
            bmi: row.record.bmi,
            category: row.classification.category.label(),
            color: row.classification.color.hex(),
        }
    }
}

/// Write rendered history rows to a CSV file, replacing any existing file.
///
/// Returns the number of rows written.
pub fn write_history_csv(rows: &[HistoryRow<'_>], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.lock_exclusive()?;

    // Header is written by hand so an empty history still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&file);
    writer.write_record(HISTORY_CSV_HEADER)?;

    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }

    // Flush and sync to disk
    writer.flush()?;
    drop(writer);
    file.sync_all()?;
    file.unlock()?;

    tracing::info!("Wrote {} history rows to {:?}", rows.len(), path);
    Ok(rows.len())
}
