//! In-process analytics sink.
//!
//! Useful for embedding the service in a long-running process or in tests;
//! the chain lives only as long as the log.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use symtriage_contracts::{
    analysis::AnalysisRecord,
    error::{TriageError, TriageResult},
};
use symtriage_core::traits::AnalysisSink;

use crate::{
    chain::{verify_chain, ChainHead},
    event::{AnalyticsEvent, AnalyticsLog},
};

#[derive(Default)]
pub(crate) struct LogState {
    pub(crate) events: Vec<AnalyticsEvent>,
    pub(crate) head: ChainHead,
}

/// Hash-chained analytics held in memory. Clones share one stream.
#[derive(Clone)]
pub struct InMemoryAnalyticsLog {
    stream_id: String,
    pub(crate) state: Arc<Mutex<LogState>>,
}

impl InMemoryAnalyticsLog {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            state: Arc::new(Mutex::new(LogState::default())),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every event so far. A poisoned lock yields an empty log.
    pub fn export_log(&self) -> AnalyticsLog {
        let events = self
            .state
            .lock()
            .map(|s| s.events.clone())
            .unwrap_or_default();
        AnalyticsLog::new(self.stream_id.clone(), events, Utc::now())
    }

    /// False if any stored event was altered, or the lock is poisoned.
    pub fn verify_integrity(&self) -> bool {
        self.state
            .lock()
            .map(|s| verify_chain(&s.events))
            .unwrap_or(false)
    }
}

impl AnalysisSink for InMemoryAnalyticsLog {
    fn record(&self, record: &AnalysisRecord) -> TriageResult<()> {
        let mut state = self.state.lock().map_err(|e| TriageError::SinkWriteFailed {
            reason: format!("analytics state lock poisoned: {}", e),
        })?;

        let event = state.head.link(&self.stream_id, record)?;
        state.head.advance(&event);
        debug!(sequence = event.sequence, condition = %record.condition, "analytics record kept in memory");
        state.events.push(event);
        Ok(())
    }
}
