//! Error types for the symtriage crates.
//!
//! Evaluation itself is total and never returns an error. Only loading data
//! (configuration, catalogs, rule tables) and writing analytics records can
//! fail, and every fallible operation returns `TriageResult<T>`.

use thiserror::Error;

/// The unified error type for the symtriage workspace.
#[derive(Debug, Error)]
pub enum TriageError {
    /// A configuration file or data document is missing or not valid TOML.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A rule table parsed correctly but violates a structural invariant
    /// (duplicate ids, unknown trigger symptoms, out-of-range confidence).
    #[error("invalid rule table: {reason}")]
    InvalidRuleTable { reason: String },

    /// The analytics sink could not persist a record.
    ///
    /// Callers going through `TriageService` never see this: the service
    /// logs it and keeps the evaluation result.
    #[error("analytics write failed: {reason}")]
    SinkWriteFailed { reason: String },
}

/// Convenience alias used throughout the symtriage crates.
pub type TriageResult<T> = Result<T, TriageError>;
