//! Evaluation results and analytics records.
//!
//! `AnalysisResult` is what the matcher returns for one symptom set.
//! `AnalysisRecord` is the slimmed-down, timestamped form handed to an
//! analytics sink after the evaluation has completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    condition::{ConditionRule, Urgency},
    symptom::SymptomSet,
};

/// How the matcher arrived at its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// The input set equalled the rule's trigger set.
    Exact,

    /// The rule shared at least two symptoms with the input and had the best
    /// overlap score.
    Partial {
        /// `|trigger ∩ input|`
        matched: usize,
        /// `|trigger|`
        rule_size: usize,
        /// `|input|` after unknown identifiers were dropped.
        input_size: usize,
    },

    /// No rule overlapped enough, but a red-flag symptom was present.
    RedFlag,

    /// Nothing matched; the generic default record was returned.
    Fallback,
}

impl MatchKind {
    /// The overlap score `(m / |trigger|) * (m / |input|)` for partial
    /// matches, 1.0 for exact matches, and `None` otherwise.
    pub fn score(&self) -> Option<f64> {
        match self {
            MatchKind::Exact => Some(1.0),
            MatchKind::Partial {
                matched,
                rule_size,
                input_size,
            } => {
                let m = *matched as f64;
                Some((m / *rule_size as f64) * (m / *input_size as f64))
            }
            MatchKind::RedFlag | MatchKind::Fallback => None,
        }
    }
}

/// The outcome of evaluating one symptom set.
///
/// Derived and ephemeral: nothing in the matcher keeps it after returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The condition record that best explains the input.
    pub matched_rule: ConditionRule,

    /// Confidence (0..=100) after overlap adjustment.
    pub adjusted_confidence: u8,

    pub match_kind: MatchKind,
}

impl AnalysisResult {
    pub fn condition_name(&self) -> &str {
        &self.matched_rule.name
    }

    pub fn urgency(&self) -> Urgency {
        self.matched_rule.urgency
    }
}

/// Unique identifier for one analytics record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub uuid::Uuid);

impl RecordId {
    /// Create a new, unique record ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

/// What an analytics sink receives for each evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: RecordId,
    /// The known symptoms that were evaluated, sorted.
    pub symptoms: Vec<String>,
    pub condition: String,
    pub adjusted_confidence: u8,
    pub urgency: Urgency,
    /// Wall-clock time the record was created (UTC).
    pub recorded_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Build a record for `result`, evaluated from the normalized `input`.
    pub fn from_result(input: &SymptomSet, result: &AnalysisResult) -> Self {
        Self {
            id: RecordId::new(),
            symptoms: input.to_strings(),
            condition: result.matched_rule.name.clone(),
            adjusted_confidence: result.adjusted_confidence,
            urgency: result.matched_rule.urgency,
            recorded_at: Utc::now(),
        }
    }
}
