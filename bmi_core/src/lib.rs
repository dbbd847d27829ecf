#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI calculator.
//!
//! This crate provides:
//! - Domain types (measurements, categories, classification results)
//! - Band tables for the four- and six-band schemes
//! - The BMI classifier
//! - The bounded in-session history ledger
//! - Share text and report export

pub mod types;
pub mod error;
pub mod bands;
pub mod classifier;
pub mod config;
pub mod logging;
pub mod ledger;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use bands::BandScheme;
pub use classifier::{calculate_bmi, calculate_ideal_weight, Classifier};
pub use config::Config;
pub use ledger::{HistoryRecord, HistoryRow, Ledger, SharedLedger, Snapshot};
pub use report::{share_result, share_text, JsonReportSink, ReportSink, ResultReport, ShareTarget};
