//! Condition rule table types and loading.
//!
//! A `RuleTable` is deserialized from TOML and holds:
//!
//! - an ordered list of `[[conditions]]` matched by symptom overlap,
//! - one `[red_flag]` entry consulted only when no condition overlaps enough,
//! - one `[fallback]` record returned when nothing else applies.
//!
//! Every table is validated against a `SymptomCatalog` when it is loaded, so
//! the matcher can assume a well-formed table.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use symtriage_contracts::{
    condition::ConditionRule,
    error::{TriageError, TriageResult},
    symptom::SymptomSet,
};

use crate::catalog::SymptomCatalog;

const BUILTIN_CONDITIONS: &str = include_str!("../data/conditions.toml");

/// Single-symptom override: any listed symptom escalates to `condition`.
///
/// Example:
/// ```toml
/// [red_flag]
/// symptoms = ["chest_pain", "shortness_breath"]
///
/// [red_flag.condition]
/// id = "cardiovascular-concern"
/// name = "Cardiovascular Concern"
/// base_confidence = 70
/// severity = "high"
/// urgency = "immediate"
/// description = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlag {
    pub symptoms: SymptomSet,
    pub condition: ConditionRule,
}

/// The top-level structure deserialized from a rule table document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    /// Ordered list of condition rules. Earlier rules win ties.
    pub conditions: Vec<ConditionRule>,

    pub red_flag: RedFlag,

    /// Generic default returned when no rule and no red flag applies.
    pub fallback: ConditionRule,
}

impl RuleTable {
    /// The rule table shipped with the crate, validated against the
    /// built-in catalog.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_CONDITIONS, &SymptomCatalog::builtin())
            .expect("embedded rule table must be valid")
    }

    /// Parse `s` as TOML and validate it against `catalog`.
    ///
    /// Returns `TriageError::ConfigError` if the TOML is malformed and
    /// `TriageError::InvalidRuleTable` if it parses but is inconsistent.
    pub fn from_toml_str(s: &str, catalog: &SymptomCatalog) -> TriageResult<Self> {
        let table: RuleTable = toml::from_str(s).map_err(|e| TriageError::ConfigError {
            reason: format!("failed to parse rule table TOML: {}", e),
        })?;
        table.validate(catalog)?;
        info!(
            conditions = table.conditions.len(),
            red_flags = table.red_flag.symptoms.len(),
            "rule table loaded"
        );
        Ok(table)
    }

    /// Read the file at `path` and parse it as a rule table.
    pub fn from_file(path: &Path, catalog: &SymptomCatalog) -> TriageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TriageError::ConfigError {
            reason: format!("failed to read rule table '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents, catalog)
    }

    /// Check structural invariants the matcher relies on.
    ///
    /// - every confidence is within 0..=100
    /// - condition ids are unique across the whole table
    /// - each condition has a non-empty trigger set
    /// - no two conditions share the same trigger set
    /// - every trigger and red-flag symptom is in the catalog
    pub fn validate(&self, catalog: &SymptomCatalog) -> TriageResult<()> {
        let mut ids = HashSet::new();
        let mut trigger_sets: Vec<(&str, &SymptomSet)> = Vec::new();

        for rule in self.records() {
            if rule.base_confidence > 100 {
                return Err(invalid(format!(
                    "condition '{}' has base_confidence {} (must be 0..=100)",
                    rule.id, rule.base_confidence
                )));
            }
            if !ids.insert(rule.id.as_str()) {
                return Err(invalid(format!("duplicate condition id '{}'", rule.id)));
            }
        }

        for rule in &self.conditions {
            if rule.trigger_symptoms.is_empty() {
                return Err(invalid(format!(
                    "condition '{}' has no trigger symptoms",
                    rule.id
                )));
            }
            if let Some(unknown) = rule.trigger_symptoms.iter().find(|s| !catalog.contains(s)) {
                return Err(invalid(format!(
                    "condition '{}' triggers on unknown symptom '{}'",
                    rule.id, unknown
                )));
            }
            if let Some((other, _)) = trigger_sets
                .iter()
                .find(|(_, set)| **set == rule.trigger_symptoms)
            {
                return Err(invalid(format!(
                    "conditions '{}' and '{}' have identical trigger symptoms",
                    other, rule.id
                )));
            }
            trigger_sets.push((rule.id.as_str(), &rule.trigger_symptoms));
        }

        if let Some(unknown) = self.red_flag.symptoms.iter().find(|s| !catalog.contains(s)) {
            return Err(invalid(format!("red flag lists unknown symptom '{}'", unknown)));
        }

        Ok(())
    }

    /// Every condition record in the table: the ordered conditions, then the
    /// red-flag record, then the fallback.
    pub fn records(&self) -> impl Iterator<Item = &ConditionRule> {
        self.conditions
            .iter()
            .chain(std::iter::once(&self.red_flag.condition))
            .chain(std::iter::once(&self.fallback))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn invalid(reason: String) -> TriageError {
    TriageError::InvalidRuleTable { reason }
}
