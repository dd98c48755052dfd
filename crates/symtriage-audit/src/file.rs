//! Append-only JSON-lines analytics file.
//!
//! One `AnalyticsEvent` per line. Opening an existing file reads and verifies
//! the whole chain, then new events continue it, so a log written across
//! many runs stays one chain. A file that fails verification is refused
//! rather than extended.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info};

use symtriage_contracts::{
    analysis::AnalysisRecord,
    error::{TriageError, TriageResult},
};
use symtriage_core::traits::AnalysisSink;

use crate::{
    chain::{first_break, ChainHead},
    event::{AnalyticsEvent, AnalyticsLog},
};

struct Writer {
    file: File,
    head: ChainHead,
}

/// Analytics sink persisting a hash chain to a JSON-lines file.
pub struct FileAnalyticsLog {
    path: PathBuf,
    stream_id: String,
    writer: Mutex<Writer>,
}

/// Parse every event in the file at `path`. A missing file holds no events.
pub fn read_events(path: &Path) -> TriageResult<Vec<AnalyticsEvent>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(TriageError::ConfigError {
                reason: format!("failed to read analytics log '{}': {}", path.display(), e),
            })
        }
    };

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|e| TriageError::ConfigError {
                reason: format!("analytics log '{}' line {}: {}", path.display(), n + 1, e),
            })
        })
        .collect()
}

/// Read the file at `path` and refuse it unless the chain is intact.
pub fn load_verified(path: &Path) -> TriageResult<Vec<AnalyticsEvent>> {
    let events = read_events(path)?;
    if let Some(position) = first_break(&events) {
        return Err(TriageError::ConfigError {
            reason: format!(
                "analytics log '{}' fails integrity check at event {}",
                path.display(),
                position
            ),
        });
    }
    Ok(events)
}

impl FileAnalyticsLog {
    /// Open (or create) the log at `path`, writing new events as `stream_id`.
    pub fn open(path: impl Into<PathBuf>, stream_id: impl Into<String>) -> TriageResult<Self> {
        let path = path.into();
        let existing = load_verified(&path)?;
        let head = ChainHead::after(&existing);

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| TriageError::ConfigError {
                reason: format!("failed to create '{}': {}", dir.display(), e),
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TriageError::ConfigError {
                reason: format!("failed to open analytics log '{}': {}", path.display(), e),
            })?;

        info!(
            path = %path.display(),
            existing = existing.len(),
            next_sequence = head.next_sequence,
            "analytics log opened"
        );

        Ok(Self {
            path,
            stream_id: stream_id.into(),
            writer: Mutex::new(Writer { file, head }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Re-read the file and snapshot it, failing if the chain is broken.
    pub fn export_log(&self) -> TriageResult<AnalyticsLog> {
        let events = load_verified(&self.path)?;
        Ok(AnalyticsLog::new(self.stream_id.clone(), events, Utc::now()))
    }
}

impl AnalysisSink for FileAnalyticsLog {
    /// Append one line and flush it. The chain head moves only after the
    /// write succeeds, so a failed write leaves the next event linking to the
    /// last stored one.
    fn record(&self, record: &AnalysisRecord) -> TriageResult<()> {
        let mut writer = self.writer.lock().map_err(|e| TriageError::SinkWriteFailed {
            reason: format!("analytics writer lock poisoned: {}", e),
        })?;

        let event = writer.head.link(&self.stream_id, record)?;
        let line = serde_json::to_string(&event).map_err(|e| TriageError::SinkWriteFailed {
            reason: format!("failed to encode analytics event: {}", e),
        })?;

        writeln!(writer.file, "{}", line)
            .and_then(|_| writer.file.flush())
            .map_err(|e| TriageError::SinkWriteFailed {
                reason: format!("failed to append to '{}': {}", self.path.display(), e),
            })?;

        writer.head.advance(&event);
        debug!(
            path = %self.path.display(),
            sequence = event.sequence,
            condition = %record.condition,
            "analytics record appended"
        );
        Ok(())
    }
}
