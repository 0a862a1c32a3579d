//! Listening duration ledger
//!
//! Accumulated seconds per `"title - artist"` key plus a running total.
//! Persisted as a flat `{ key: seconds }` object; the total is recomputed on load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-track and total listening time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LedgerRecord", into = "BTreeMap<String, f64>")]
pub struct DurationLedger {
    per_track: BTreeMap<String, f64>,
    total_seconds: f64,
}

impl DurationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add listening time to a track key
    pub fn add(&mut self, key: &str, delta: Duration) {
        let seconds = delta.as_secs_f64();
        *self.per_track.entry(key.to_string()).or_insert(0.0) += seconds;
        self.total_seconds += seconds;
    }

    /// Seconds accumulated for a key
    pub fn seconds_for(&self, key: &str) -> f64 {
        self.per_track.get(key).copied().unwrap_or(0.0)
    }

    /// Seconds accumulated over all tracks
    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    /// Keys with their accumulated seconds
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.per_track.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.per_track.len()
    }

    /// Check if nothing was listened to yet
    pub fn is_empty(&self) -> bool {
        self.per_track.is_empty()
    }
}

impl From<BTreeMap<String, f64>> for DurationLedger {
    fn from(per_track: BTreeMap<String, f64>) -> Self {
        let total_seconds = per_track.values().sum();
        Self {
            per_track,
            total_seconds,
        }
    }
}

impl From<DurationLedger> for BTreeMap<String, f64> {
    fn from(ledger: DurationLedger) -> Self {
        ledger.per_track
    }
}

/// Very old files stored an empty list here
#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerRecord {
    Map(BTreeMap<String, f64>),
    Legacy(Vec<serde_json::Value>),
}

impl From<LedgerRecord> for DurationLedger {
    fn from(record: LedgerRecord) -> Self {
        match record {
            LedgerRecord::Map(map) => map.into(),
            LedgerRecord::Legacy(_) => Self::default(),
        }
    }
}
