//! Emergency level detection and response protocols.
//!
//! Levels are decided by the highest tier with any keyword appearing as a
//! substring of the lowercased message:
//!
//! | Level | Keywords |
//! |---|---|
//! | 4 critical | heart attack, stroke, unconscious, not breathing, severe bleeding, overdose |
//! | 3 high | chest pain, difficulty breathing, severe pain, emergency, urgent, help |
//! | 2 medium | pain, hurt, sick, fever, nausea |
//! | 1 low | tired, headache, cough, cold |
//!
//! Level 3 and above requires escalation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How urgent a free-text patient message sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyLevel {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl EmergencyLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Critical),
            _ => None,
        }
    }

    /// True for levels that must be escalated to an emergency response.
    pub fn requires_escalation(self) -> bool {
        self >= Self::High
    }

    /// Banner text shown with an escalation.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL EMERGENCY",
            Self::High => "HIGH PRIORITY EMERGENCY",
            Self::Medium => "MEDIUM PRIORITY",
            Self::Low | Self::None => "LOW PRIORITY",
        }
    }
}

impl fmt::Display for EmergencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Keyword tiers, highest first.
const TIERS: [(EmergencyLevel, &[&str]); 4] = [
    (
        EmergencyLevel::Critical,
        &["heart attack", "stroke", "unconscious", "not breathing", "severe bleeding", "overdose"],
    ),
    (
        EmergencyLevel::High,
        &["chest pain", "difficulty breathing", "severe pain", "emergency", "urgent", "help"],
    ),
    (EmergencyLevel::Medium, &["pain", "hurt", "sick", "fever", "nausea"]),
    (EmergencyLevel::Low, &["tired", "headache", "cough", "cold"]),
];

/// Classify `text`, returning the level and the keyword that decided it.
fn classify(text: &str) -> (EmergencyLevel, Option<&'static str>) {
    let lower = text.to_lowercase();
    for (level, keywords) in TIERS {
        if let Some(keyword) = keywords.iter().find(|k| lower.contains(*k)) {
            return (level, Some(*keyword));
        }
    }
    (EmergencyLevel::None, None)
}

/// The emergency level of a free-text message.
pub fn detect_level(text: &str) -> EmergencyLevel {
    classify(text).0
}

/// Fixed response plan for an emergency level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseProtocol {
    pub response_type: &'static str,
    pub estimated_response_time: &'static str,
    pub responder_type: &'static str,
    pub instructions: &'static [&'static str],
}

const CRITICAL_PROTOCOL: ResponseProtocol = ResponseProtocol {
    response_type: "immediate_emergency",
    estimated_response_time: "3-5 minutes",
    responder_type: "paramedic_team",
    instructions: &[
        "Emergency services have been notified",
        "Paramedic team is being dispatched",
        "Stay calm and do not move unless necessary",
        "Keep airways clear if conscious",
        "If unconscious, check for pulse and breathing",
    ],
};

const HIGH_PROTOCOL: ResponseProtocol = ResponseProtocol {
    response_type: "urgent_medical",
    estimated_response_time: "8-12 minutes",
    responder_type: "medical_team",
    instructions: &[
        "Medical team is being dispatched",
        "Stay in current location",
        "Monitor vital signs if possible",
        "Prepare medical history and current medications",
        "Have someone stay with you if possible",
    ],
};

const MEDIUM_PROTOCOL: ResponseProtocol = ResponseProtocol {
    response_type: "scheduled_urgent",
    estimated_response_time: "30-60 minutes",
    responder_type: "nurse_practitioner",
    instructions: &[
        "Urgent care appointment being scheduled",
        "Monitor symptoms closely",
        "Avoid strenuous activities",
        "Take prescribed medications as directed",
        "Call back if symptoms worsen",
    ],
};

const LOW_PROTOCOL: ResponseProtocol = ResponseProtocol {
    response_type: "routine_followup",
    estimated_response_time: "2-4 hours",
    responder_type: "healthcare_advisor",
    instructions: &[
        "Healthcare advisor will contact you",
        "Continue monitoring symptoms",
        "Follow home care recommendations",
        "Schedule routine appointment if needed",
        "Contact us if you have concerns",
    ],
};

/// The response protocol for `level`. Level 0 gets the routine protocol.
pub fn response_protocol(level: EmergencyLevel) -> &'static ResponseProtocol {
    match level {
        EmergencyLevel::Critical => &CRITICAL_PROTOCOL,
        EmergencyLevel::High => &HIGH_PROTOCOL,
        EmergencyLevel::Medium => &MEDIUM_PROTOCOL,
        EmergencyLevel::Low | EmergencyLevel::None => &LOW_PROTOCOL,
    }
}

/// Everything a caller needs to act on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyAssessment {
    pub level: EmergencyLevel,
    pub label: &'static str,
    /// The keyword that decided the level, if any.
    pub matched_keyword: Option<&'static str>,
    pub protocol: &'static ResponseProtocol,
    /// Whether the hospital emergency department should be alerted.
    pub notify_hospital: bool,
    /// Whether a responder should be dispatched.
    pub dispatch_responder: bool,
}

/// Classify `text` and attach the matching protocol.
pub fn assess(text: &str) -> EmergencyAssessment {
    let (level, matched_keyword) = classify(text);
    let escalate = level.requires_escalation();

    if escalate {
        warn!(
            level = level.as_u8(),
            keyword = matched_keyword.unwrap_or(""),
            "emergency escalation required"
        );
    } else {
        debug!(level = level.as_u8(), "emergency level assessed");
    }

    EmergencyAssessment {
        level,
        label: level.label(),
        matched_keyword,
        protocol: response_protocol(level),
        notify_hospital: escalate,
        dispatch_responder: escalate,
    }
}
