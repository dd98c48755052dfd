//! Condition rule records and their triage enums.
//!
//! A `ConditionRule` pairs a set of trigger symptoms with a named condition
//! and the guidance shown to the patient. Rules are loaded once at startup
//! and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::symptom::SymptomSet;

/// Clinical severity badge attached to a condition.
///
/// Expressed in TOML as a lowercase string:
/// ```toml
/// severity = "medium"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(s)
    }
}

/// How quickly the patient should seek professional care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Book a regular appointment.
    Routine,
    /// See a clinician within a day or two.
    Soon,
    /// Seek emergency care now.
    Immediate,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::Routine => "routine",
            Urgency::Soon => "soon",
            Urgency::Immediate => "immediate",
        };
        f.write_str(s)
    }
}

/// A single static condition rule.
///
/// Example in TOML:
/// ```toml
/// [[conditions]]
/// id = "gastroenteritis"
/// name = "Gastroenteritis (Stomach Flu)"
/// trigger_symptoms = ["nausea", "vomiting", "diarrhea"]
/// base_confidence = 85
/// severity = "medium"
/// urgency = "soon"
/// description = "..."
/// home_remedies = ["..."]
/// precautions = ["..."]
/// seek_care_if = ["..."]
/// specialist_categories = ["Gastroenterologist"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRule {
    /// Stable identifier used in logs and validation messages.
    pub id: String,

    /// Display name of the condition (e.g. "Common Cold/Flu").
    pub name: String,

    /// Symptoms whose co-occurrence points at this condition.
    ///
    /// Empty for the red-flag and fallback records, which are never matched
    /// by overlap.
    #[serde(default)]
    pub trigger_symptoms: SymptomSet,

    /// Confidence (0..=100) reported on an exact trigger-set match.
    pub base_confidence: u8,

    pub severity: Severity,

    pub urgency: Urgency,

    pub description: String,

    #[serde(default)]
    pub home_remedies: Vec<String>,

    #[serde(default)]
    pub precautions: Vec<String>,

    /// Escalation triggers: when to stop self-care and see a clinician.
    #[serde(default)]
    pub seek_care_if: Vec<String>,

    /// Specialist categories to suggest, most relevant first.
    #[serde(default)]
    pub specialist_categories: Vec<String>,
}
