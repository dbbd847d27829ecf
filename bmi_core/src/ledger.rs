//! In-session calculation history.
//!
//! The ledger keeps a bounded, newest-first list of past calculations for the
//! lifetime of a session. Records hold only the numeric snapshot taken at
//! capture time; colors and full category metadata are re-derived through the
//! classifier whenever a record is rendered.

use crate::types::ensure_positive;
use crate::{Category, Classification, Classifier, Error, Gender, Measurement, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Default number of records retained per session
pub const DEFAULT_CAPACITY: usize = 10;

/// Values captured when the user presses "calculate"
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub bmi: f64,
    pub category: Category,
}

impl Snapshot {
    pub fn from_measurement(measurement: &Measurement, result: &Classification) -> Self {
        Self {
            weight: measurement.weight,
            height: measurement.height,
            age: measurement.age,
            gender: measurement.gender,
            bmi: result.bmi,
            category: result.category,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure_positive("weight", self.weight)?;
        ensure_positive("height", self.height)?;
        ensure_positive("bmi", self.bmi)?;
        Ok(())
    }
}

/// A stored history entry. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub bmi: f64,
    pub category: Category,
}

impl HistoryRecord {
    /// Capture time formatted for display
    pub fn date(&self) -> String {
        self.recorded_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// A history record paired with metadata from the live classifier
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow<'a> {
    pub record: &'a HistoryRecord,
    pub classification: Classification,
}

/// Bounded newest-first history for a single session
#[derive(Clone, Debug)]
pub struct Ledger {
    capacity: usize,
    records: VecDeque<HistoryRecord>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Ledger {
    /// Create an empty ledger. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, newest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    /// Most recent record, if any
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    /// Record a calculation captured now
    pub fn record(&mut self, snapshot: Snapshot) -> Result<&HistoryRecord> {
        self.record_at(snapshot, Utc::now())
    }

    /// Record a calculation with an explicit capture time.
    ///
    /// The new record goes to the front; the oldest records are dropped once
    /// the ledger is over capacity.
    pub fn record_at(
        &mut self,
        snapshot: Snapshot,
        recorded_at: DateTime<Utc>,
    ) -> Result<&HistoryRecord> {
        snapshot.validate()?;

        let record = HistoryRecord {
            id: Uuid::new_v4(),
            recorded_at,
            weight: snapshot.weight,
            height: snapshot.height,
            age: snapshot.age,
            gender: snapshot.gender,
            bmi: snapshot.bmi,
            category: snapshot.category,
        };
        tracing::debug!("Recording history entry {} (BMI {})", record.id, record.bmi);

        self.records.push_front(record);
        while self.records.len() > self.capacity {
            if let Some(evicted) = self.records.pop_back() {
                tracing::debug!("Evicted history entry {}", evicted.id);
            }
        }

        if self.records.len() > self.capacity {
            return Err(Error::CapacityInvariantViolation {
                len: self.records.len(),
                capacity: self.capacity,
            });
        }

        self.records
            .front()
            .ok_or_else(|| Error::invalid("history record was not stored"))
    }

    /// Discard every record. Calling it on an empty ledger is a no-op.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            tracing::debug!("Clearing {} history entries", self.records.len());
        }
        self.records.clear();
    }

    /// Re-derive display metadata for a stored record
    pub fn render<'a>(
        record: &'a HistoryRecord,
        classifier: &Classifier,
    ) -> Result<HistoryRow<'a>> {
        let classification = classifier.classify(record.bmi, Some(record.height))?;
        Ok(HistoryRow {
            record,
            classification,
        })
    }

    /// Render every record, newest first
    pub fn rows(&self, classifier: &Classifier) -> Result<Vec<HistoryRow<'_>>> {
        self.entries()
            .map(|record| Self::render(record, classifier))
            .collect()
    }
}

/// Thread-safe ledger handle.
///
/// Writers are serialized through one lock; readers get a cloned snapshot
/// taken under the same lock.
#[derive(Clone, Debug, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Ledger::new(capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // No operation leaves the deque half-updated, so poisoning is ignored
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a calculation, returning the stored record
    pub fn record(&self, snapshot: Snapshot) -> Result<HistoryRecord> {
        let mut ledger = self.lock();
        let record = ledger.record(snapshot)?.clone();
        Ok(record)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current records, newest first
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        self.lock().entries().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandScheme;
    use chrono::Duration;
    use std::thread;

    fn snapshot(weight: f64) -> Snapshot {
        let measurement = Measurement {
            weight,
            ..Measurement::default()
        };
        let result = Classifier::default().evaluate(&measurement).unwrap();
        Snapshot::from_measurement(&measurement, &result)
    }

    #[test]
    fn test_record_prepends_newest_first() {
        let mut ledger = Ledger::new(10);
        ledger.record(snapshot(60.0)).unwrap();
        ledger.record(snapshot(70.0)).unwrap();

        let weights: Vec<f64> = ledger.entries().map(|r| r.weight).collect();
        assert_eq!(weights, vec![70.0, 60.0]);
        assert_eq!(ledger.latest().unwrap().weight, 70.0);
    }

    #[test]
    fn test_bounded_retention() {
        let mut ledger = Ledger::new(10);
        for i in 0..15 {
            ledger.record(snapshot(50.0 + i as f64)).unwrap();
            assert!(ledger.len() <= ledger.capacity());
        }

        assert_eq!(ledger.len(), 10);
        let weights: Vec<f64> = ledger.entries().map(|r| r.weight).collect();
        let expected: Vec<f64> = (5..15).rev().map(|i| 50.0 + i as f64).collect();
        assert_eq!(weights, expected);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ledger = Ledger::new(5);
        for _ in 0..5 {
            ledger.record(snapshot(70.0)).unwrap();
        }
        let mut ids: Vec<Uuid> = ledger.entries().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut ledger = Ledger::new(0);
        assert_eq!(ledger.capacity(), 1);
        ledger.record(snapshot(60.0)).unwrap();
        ledger.record(snapshot(61.0)).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest().unwrap().weight, 61.0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.entries().count(), 0);
        ledger.clear();
        assert_eq!(ledger.entries().count(), 0);

        ledger.record(snapshot(70.0)).unwrap();
        ledger.clear();
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_rejects_poisoned_snapshot() {
        let mut ledger = Ledger::default();

        let mut bad = snapshot(70.0);
        bad.bmi = f64::NAN;
        assert!(matches!(ledger.record(bad), Err(Error::InvalidInput(_))));

        let mut bad = snapshot(70.0);
        bad.height = 0.0;
        assert!(matches!(ledger.record(bad), Err(Error::InvalidInput(_))));

        assert!(ledger.is_empty());
    }

    #[test]
    fn test_record_at_uses_given_time() {
        let mut ledger = Ledger::default();
        let at = DateTime::parse_from_rfc3339("2026-03-01T08:05:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let record = ledger.record_at(snapshot(70.0), at).unwrap();
        assert_eq!(record.recorded_at, at);
        assert_eq!(record.date(), "2026-03-01 08:05");

        let later = at + Duration::minutes(1);
        ledger.record_at(snapshot(71.0), later).unwrap();
        assert_eq!(ledger.latest().unwrap().recorded_at, later);
    }

    #[test]
    fn test_render_matches_live_classifier() {
        let mut ledger = Ledger::default();
        for w in [40.0, 55.0, 70.0, 85.0, 100.0, 130.0] {
            ledger.record(snapshot(w)).unwrap();
        }

        for scheme in [BandScheme::FourBand, BandScheme::SixBand] {
            let classifier = Classifier::new(scheme);
            for record in ledger.entries() {
                let row = Ledger::render(record, &classifier).unwrap();
                let live = classifier.classify(record.bmi, Some(record.height)).unwrap();
                assert_eq!(row.classification.category, live.category);
                assert_eq!(row.classification.color, live.color);
            }
        }
    }

    #[test]
    fn test_render_ignores_stale_category() {
        let mut ledger = Ledger::default();
        // 130 kg at 170 cm is BMI 45.0
        ledger.record(snapshot(130.0)).unwrap();
        assert_eq!(ledger.latest().unwrap().category, Category::Obesity);

        let rows = ledger.rows(&Classifier::new(BandScheme::SixBand)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].classification.category, Category::ObesityClassII);
    }

    #[test]
    fn test_shared_ledger_concurrent_writers() {
        let shared = SharedLedger::new(10);
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        ledger.record(snapshot(40.0 + t as f64 + i as f64)).unwrap();
                        assert!(ledger.len() <= 10);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len(), 10);
        let mut ids: Vec<Uuid> = shared.snapshot().iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);

        shared.clear();
        assert!(shared.is_empty());
    }
}
