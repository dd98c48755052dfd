//! Rule-table matcher implementation.
//!
//! `RuleTableMatcher` implements the `Matcher` trait from symtriage-core over
//! a validated `RuleTable` and its `SymptomCatalog`.
//!
//! Evaluation algorithm:
//!
//! 1. Drop identifiers that are not in the catalog.
//! 2. If the input equals a condition's trigger set exactly, return that
//!    condition at its base confidence.
//! 3. Otherwise score every condition sharing at least two symptoms with the
//!    input as `(m / |trigger|) * (m / |input|)`. The highest score wins;
//!    ties go to the condition declared first.
//! 4. Adjusted confidence is `max(60, round(base * score))`, capped at 100.
//! 5. With no candidate, any red-flag symptom returns the red-flag record;
//!    otherwise the fallback record is returned.

use std::cmp::Ordering;

use tracing::{debug, trace};

use symtriage_contracts::{
    analysis::{AnalysisResult, MatchKind},
    condition::ConditionRule,
    symptom::SymptomSet,
};
use symtriage_core::traits::Matcher;

use crate::{catalog::SymptomCatalog, table::RuleTable};

/// A condition needs at least this many shared symptoms to be a candidate.
pub const MIN_OVERLAP: usize = 2;

/// Lowest confidence reported for a partial match.
pub const CONFIDENCE_FLOOR: u8 = 60;

/// Highest confidence any result can carry.
pub const CONFIDENCE_CEILING: u8 = 100;

/// Overlap between one condition's trigger set and the input.
///
/// The score `(m / t) * (m / n)` equals the rational `m² / (t·n)`, and
/// candidates are compared on that rational with integer arithmetic so the
/// first-declared tie-break is never decided by floating-point noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// `m`: symptoms shared by the trigger set and the input.
    pub matched: usize,
    /// `t`: size of the trigger set.
    pub rule_size: usize,
    /// `n`: size of the (normalized) input.
    pub input_size: usize,
}

impl Overlap {
    /// Measure `rule` against an already-normalized `input`.
    pub fn measure(rule: &ConditionRule, input: &SymptomSet) -> Self {
        Self {
            matched: rule.trigger_symptoms.overlap(input),
            rule_size: rule.trigger_symptoms.len(),
            input_size: input.len(),
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.matched >= MIN_OVERLAP
    }

    /// The score as a float, for display. `0.0` when either side is empty.
    pub fn score(&self) -> f64 {
        if self.rule_size == 0 || self.input_size == 0 {
            return 0.0;
        }
        let m = self.matched as f64;
        (m / self.rule_size as f64) * (m / self.input_size as f64)
    }

    fn numerator(&self) -> u64 {
        (self.matched as u64).pow(2)
    }

    fn denominator(&self) -> u64 {
        self.rule_size as u64 * self.input_size as u64
    }

    /// Exact comparison of two scores.
    pub fn cmp_score(&self, other: &Overlap) -> Ordering {
        (self.numerator() * other.denominator()).cmp(&(other.numerator() * self.denominator()))
    }

    /// `max(60, round(base * score))` capped at 100, rounding half up.
    pub fn adjusted_confidence(&self, base: u8) -> u8 {
        let denom = self.denominator();
        if denom == 0 {
            return CONFIDENCE_FLOOR;
        }
        let num = u64::from(base) * self.numerator();
        let rounded = (2 * num + denom) / (2 * denom);
        let floored = rounded.max(u64::from(CONFIDENCE_FLOOR));
        floored.min(u64::from(CONFIDENCE_CEILING)) as u8
    }
}

/// A `Matcher` backed by a static rule table.
///
/// ```rust,ignore
/// use symtriage_rules::RuleTableMatcher;
/// use symtriage_core::traits::Matcher;
///
/// let matcher = RuleTableMatcher::builtin();
/// let result = matcher.evaluate(&["fever", "cough"].into_iter().collect());
/// ```
#[derive(Debug, Clone)]
pub struct RuleTableMatcher {
    catalog: SymptomCatalog,
    table: RuleTable,
}

impl RuleTableMatcher {
    /// Build a matcher over a table that has been validated against
    /// `catalog` (as every `RuleTable` constructor does).
    pub fn new(catalog: SymptomCatalog, table: RuleTable) -> Self {
        Self { catalog, table }
    }

    /// The built-in catalog and rule table.
    pub fn builtin() -> Self {
        Self::new(SymptomCatalog::builtin(), RuleTable::builtin())
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    fn exact_match(&self, input: &SymptomSet) -> Option<&ConditionRule> {
        self.table
            .conditions
            .iter()
            .find(|rule| rule.trigger_symptoms == *input)
    }

    fn best_partial(&self, input: &SymptomSet) -> Option<(&ConditionRule, Overlap)> {
        let mut best: Option<(&ConditionRule, Overlap)> = None;

        for rule in &self.table.conditions {
            let overlap = Overlap::measure(rule, input);
            trace!(
                rule_id = %rule.id,
                matched = overlap.matched,
                score = overlap.score(),
                "scored condition"
            );
            if !overlap.is_candidate() {
                continue;
            }
            // Strictly greater only: an equal score keeps the earlier rule.
            let better = match &best {
                None => true,
                Some((_, current)) => overlap.cmp_score(current) == Ordering::Greater,
            };
            if better {
                best = Some((rule, overlap));
            }
        }

        best
    }
}

impl Default for RuleTableMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Matcher for RuleTableMatcher {
    fn normalize(&self, input: &SymptomSet) -> SymptomSet {
        self.catalog.normalize(input)
    }

    fn evaluate(&self, input: &SymptomSet) -> AnalysisResult {
        let input = self.catalog.normalize(input);

        if let Some(rule) = self.exact_match(&input) {
            debug!(rule_id = %rule.id, "exact trigger-set match");
            return AnalysisResult {
                matched_rule: rule.clone(),
                adjusted_confidence: rule.base_confidence,
                match_kind: MatchKind::Exact,
            };
        }

        if let Some((rule, overlap)) = self.best_partial(&input) {
            let adjusted = overlap.adjusted_confidence(rule.base_confidence);
            debug!(
                rule_id = %rule.id,
                matched = overlap.matched,
                score = overlap.score(),
                adjusted,
                "partial match selected"
            );
            return AnalysisResult {
                matched_rule: rule.clone(),
                adjusted_confidence: adjusted,
                match_kind: MatchKind::Partial {
                    matched: overlap.matched,
                    rule_size: overlap.rule_size,
                    input_size: overlap.input_size,
                },
            };
        }

        let red_flag = &self.table.red_flag;
        if input.iter().any(|s| red_flag.symptoms.contains(s)) {
            debug!(rule_id = %red_flag.condition.id, "red-flag override");
            return AnalysisResult {
                matched_rule: red_flag.condition.clone(),
                adjusted_confidence: red_flag.condition.base_confidence,
                match_kind: MatchKind::RedFlag,
            };
        }

        debug!(input_size = input.len(), "no match; using fallback");
        AnalysisResult {
            matched_rule: self.table.fallback.clone(),
            adjusted_confidence: self.table.fallback.base_confidence,
            match_kind: MatchKind::Fallback,
        }
    }
}
