//! The triage service: evaluate, then record.
//!
//! The service enforces the only ordering the runtime cares about:
//!
//!   Normalize → Matcher::evaluate → [AnalysisSink::record]
//!
//! The result returned to the caller is fixed the moment the matcher
//! returns. A sink error is logged and dropped; it can neither delay the
//! result past the write call nor turn it into an error.

use tracing::{debug, warn};

use symtriage_contracts::{
    analysis::{AnalysisRecord, AnalysisResult, MatchKind},
    symptom::SymptomSet,
};

use crate::traits::{AnalysisSink, Matcher};

/// Evaluates symptom sets and hands each outcome to an optional sink.
///
/// One service can be shared across request threads; both components are
/// `Send + Sync` and the service holds no mutable state of its own.
pub struct TriageService {
    matcher: Box<dyn Matcher>,
    sink: Option<Box<dyn AnalysisSink>>,
}

impl TriageService {
    /// A service with no analytics sink.
    pub fn new(matcher: Box<dyn Matcher>) -> Self {
        Self {
            matcher,
            sink: None,
        }
    }

    /// Attach an analytics sink.
    pub fn with_sink(mut self, sink: Box<dyn AnalysisSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Evaluate `input` and record the outcome.
    ///
    /// Never fails. Unknown identifiers are dropped before matching and do
    /// not appear in the analytics record.
    pub fn evaluate(&self, input: &SymptomSet) -> AnalysisResult {
        let known = self.matcher.normalize(input);
        let dropped = input.len() - known.len();

        debug!(
            requested = input.len(),
            known = known.len(),
            dropped,
            "evaluating symptom set"
        );

        let result = self.matcher.evaluate(&known);

        match result.match_kind {
            MatchKind::Fallback => warn!(
                symptoms = ?known.to_strings(),
                "no condition matched; returning general default"
            ),
            _ => debug!(
                condition = %result.matched_rule.name,
                confidence = result.adjusted_confidence,
                urgency = %result.matched_rule.urgency,
                "symptom set evaluated"
            ),
        }

        if let Some(sink) = &self.sink {
            let record = AnalysisRecord::from_result(&known, &result);
            if let Err(e) = sink.record(&record) {
                warn!(
                    record_id = %record.id.0,
                    error = %e,
                    "analytics record dropped"
                );
            }
        }

        result
    }

    /// Convenience wrapper taking plain string identifiers.
    pub fn evaluate_ids<'a, I>(&self, ids: I) -> AnalysisResult
    where
        I: IntoIterator<Item = &'a str>,
    {
        let input: SymptomSet = ids.into_iter().collect();
        self.evaluate(&input)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
