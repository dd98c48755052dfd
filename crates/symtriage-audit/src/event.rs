//! Analytics event and export types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use symtriage_contracts::analysis::AnalysisRecord;

/// One stored evaluation, linked to its predecessor by hash.
///
/// Editing the record, or any other field, breaks `this_hash` and the
/// `prev_hash` of the event after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Position in the log, from 0.
    pub sequence: u64,
    /// Label of the deployment that wrote the event (e.g. "cli", "kiosk-3").
    pub stream_id: String,
    pub record: AnalysisRecord,
    pub prev_hash: String,
    pub this_hash: String,
}

impl AnalyticsEvent {
    /// What the first event links to.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Snapshot of an analytics log, with a summary of what it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsLog {
    pub stream_id: String,
    pub events: Vec<AnalyticsEvent>,
    pub exported_at: DateTime<Utc>,
    /// Hash of the last event; empty when there are none.
    pub terminal_hash: String,
}

impl AnalyticsLog {
    pub fn new(stream_id: String, events: Vec<AnalyticsEvent>, exported_at: DateTime<Utc>) -> Self {
        let terminal_hash = events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();
        Self {
            stream_id,
            events,
            exported_at,
            terminal_hash,
        }
    }

    /// How many times each condition was reported, most frequent first.
    /// Equal counts are ordered by condition name.
    pub fn condition_counts(&self) -> Vec<(String, usize)> {
        let mut counts: std::collections::BTreeMap<&str, usize> = Default::default();
        for event in &self.events {
            *counts.entry(event.record.condition.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}
