//! Hash-chain primitives shared by every analytics sink.
//!
//! Hash input layout (bytes, in order):
//!   1. stream_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the record

use sha2::{Digest, Sha256};

use symtriage_contracts::{
    analysis::AnalysisRecord,
    error::{TriageError, TriageResult},
};

use crate::event::AnalyticsEvent;

/// SHA-256 over one event's fields, as lowercase hex.
pub fn hash_event(
    stream_id: &str,
    sequence: u64,
    record: &AnalysisRecord,
    prev_hash: &str,
) -> TriageResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| TriageError::SinkWriteFailed {
        reason: format!("failed to encode analysis record {}: {}", record.id.0, e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(stream_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Position of the first event that does not link to its predecessor, has a
/// stale hash, or is out of sequence. `None` for an intact chain.
pub fn first_break(events: &[AnalyticsEvent]) -> Option<usize> {
    let mut expected_prev: &str = AnalyticsEvent::GENESIS_HASH;

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return Some(position);
        }
        match hash_event(&event.stream_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(hash) if hash == event.this_hash => {}
            _ => return Some(position),
        }
        expected_prev = event.this_hash.as_str();
    }

    None
}

/// True when `events` form an unbroken chain from genesis. An empty chain is
/// intact.
pub fn verify_chain(events: &[AnalyticsEvent]) -> bool {
    first_break(events).is_none()
}

/// The tip of a chain: where the next event goes and what it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHead {
    pub next_sequence: u64,
    pub last_hash: String,
}

impl Default for ChainHead {
    fn default() -> Self {
        Self {
            next_sequence: 0,
            last_hash: AnalyticsEvent::GENESIS_HASH.to_string(),
        }
    }
}

impl ChainHead {
    /// The head after `events`, which must already be verified.
    pub fn after(events: &[AnalyticsEvent]) -> Self {
        match events.last() {
            Some(last) => Self {
                next_sequence: last.sequence + 1,
                last_hash: last.this_hash.clone(),
            },
            None => Self::default(),
        }
    }

    /// Build the event that would extend the chain. The head only moves once
    /// the caller has stored it and calls `advance`.
    pub fn link(&self, stream_id: &str, record: &AnalysisRecord) -> TriageResult<AnalyticsEvent> {
        let this_hash = hash_event(stream_id, self.next_sequence, record, &self.last_hash)?;
        Ok(AnalyticsEvent {
            sequence: self.next_sequence,
            stream_id: stream_id.to_string(),
            record: record.clone(),
            prev_hash: self.last_hash.clone(),
            this_hash,
        })
    }

    pub fn advance(&mut self, stored: &AnalyticsEvent) {
        self.next_sequence = stored.sequence + 1;
        self.last_hash = stored.this_hash.clone();
    }
}
