//! Core trait definitions for the triage pipeline.
//!
//! - `Matcher`: pure classification of a symptom set
//! - `AnalysisSink`: optional downstream recorder of evaluation outcomes
//!
//! `TriageService` wires them together. A sink is only ever called after the
//! matcher has produced its result, and nothing a sink does can change it.

use symtriage_contracts::{
    analysis::{AnalysisRecord, AnalysisResult},
    error::TriageResult,
    symptom::SymptomSet,
};

/// Maps a set of symptom identifiers to the single best-explaining condition.
///
/// Implementations must be total and deterministic: every input, including
/// the empty set and sets of unknown identifiers, yields a result, and the
/// same input always yields the same result.
pub trait Matcher: Send + Sync {
    /// Drop identifiers this matcher does not know about.
    ///
    /// Must be idempotent: `normalize(normalize(x)) == normalize(x)`.
    fn normalize(&self, input: &SymptomSet) -> SymptomSet;

    /// Classify `input`. Unknown identifiers are ignored, not errors.
    fn evaluate(&self, input: &SymptomSet) -> AnalysisResult;
}

/// A downstream collaborator that records evaluations for analytics.
///
/// Recording is fire-and-forget from the caller's point of view: a failed
/// write is logged and dropped, never surfaced as an evaluation failure.
pub trait AnalysisSink: Send + Sync {
    /// Append one record. Implementations should treat this as append-only.
    fn record(&self, record: &AnalysisRecord) -> TriageResult<()>;
}
