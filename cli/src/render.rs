//! Human-readable output for each subcommand.

use std::fmt;

use symtriage_contracts::{
    analysis::{AnalysisResult, MatchKind},
    symptom::Symptom,
};
use symtriage_audit::AnalyticsLog;
use symtriage_signals::{EmergencyAssessment, FeedbackReport};

fn list(f: &mut fmt::Formatter<'_>, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{}:", heading)?;
    for item in items {
        writeln!(f, "  - {}", item)?;
    }
    Ok(())
}

// ── symptoms ──────────────────────────────────────────────────────────────────

pub struct SymptomList<'a>(pub &'a [&'a Symptom]);

impl fmt::Display for SymptomList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No matching symptoms.");
        }
        let width = self.0.iter().map(|s| s.id.as_str().len()).max().unwrap_or(0);
        for symptom in self.0 {
            writeln!(f, "{:<width$}  {}", symptom.id.as_str(), symptom.display_name, width = width)?;
        }
        Ok(())
    }
}

// ── evaluate ──────────────────────────────────────────────────────────────────

pub struct Evaluation<'a> {
    /// Display names of the recognised input symptoms.
    pub recognized: &'a [String],
    pub result: &'a AnalysisResult,
}

fn match_label(kind: &MatchKind) -> String {
    match kind {
        MatchKind::Exact => "exact".to_string(),
        MatchKind::Partial {
            matched, rule_size, ..
        } => format!("partial ({} of {} rule symptoms)", matched, rule_size),
        MatchKind::RedFlag => "red flag".to_string(),
        MatchKind::Fallback => "no specific match".to_string(),
    }
}

impl fmt::Display for Evaluation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = &self.result.matched_rule;

        if self.recognized.is_empty() {
            writeln!(f, "Symptoms:    (none recognised)")?;
        } else {
            writeln!(f, "Symptoms:    {}", self.recognized.join(", "))?;
        }
        writeln!(f, "Condition:   {}", rule.name)?;
        writeln!(f, "Confidence:  {}%", self.result.adjusted_confidence)?;
        writeln!(f, "Severity:    {}", rule.severity)?;
        writeln!(f, "Urgency:     {}", rule.urgency)?;
        writeln!(f, "Match:       {}", match_label(&self.result.match_kind))?;
        writeln!(f)?;
        writeln!(f, "{}", rule.description)?;

        list(f, "Home remedies", &rule.home_remedies)?;
        list(f, "Precautions", &rule.precautions)?;
        list(f, "Seek care if", &rule.seek_care_if)?;
        list(f, "Specialists", &rule.specialist_categories)?;
        Ok(())
    }
}

// ── emergency ─────────────────────────────────────────────────────────────────

pub struct Emergency<'a>(pub &'a EmergencyAssessment);

impl fmt::Display for Emergency<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        writeln!(f, "Level:       {} ({})", a.level, a.label)?;
        if let Some(keyword) = a.matched_keyword {
            writeln!(f, "Keyword:     {}", keyword)?;
        }
        writeln!(f, "Response:    {}", a.protocol.response_type)?;
        writeln!(f, "Responder:   {}", a.protocol.responder_type)?;
        writeln!(f, "ETA:         {}", a.protocol.estimated_response_time)?;
        writeln!(
            f,
            "Escalate:    {}",
            if a.level.requires_escalation() { "yes" } else { "no" }
        )?;
        writeln!(f)?;
        writeln!(f, "Instructions:")?;
        for (n, step) in a.protocol.instructions.iter().enumerate() {
            writeln!(f, "  {}. {}", n + 1, step)?;
        }
        Ok(())
    }
}

// ── feedback ──────────────────────────────────────────────────────────────────

pub struct Feedback<'a>(pub &'a FeedbackReport);

impl fmt::Display for Feedback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let s = &r.sentiment;

        writeln!(
            f,
            "Sentiment:   {} (score {:.2}, confidence {:.2})",
            s.sentiment, s.score, s.confidence
        )?;
        if let Some(emotion) = s.dominant_emotion() {
            writeln!(f, "Emotion:     {:?}", emotion)?;
        }
        if !r.themes.primary.is_empty() {
            let themes: Vec<String> = r
                .themes
                .primary
                .iter()
                .map(|t| format!("{} ({})", t.theme.name(), t.score))
                .collect();
            writeln!(f, "Themes:      {}", themes.join(", "))?;
        }
        writeln!(f, "Priority:    {:?}", r.insights.urgency)?;
        writeln!(
            f,
            "Follow-up:   {}",
            if r.insights.follow_up_required { "required" } else { "not required" }
        )?;
        writeln!(f)?;
        writeln!(f, "{}", r.insights.overall_assessment)?;

        list(f, "Strengths", &r.insights.key_strengths)?;
        list(f, "Areas for improvement", &r.insights.areas_for_improvement)?;
        list(f, "Recommendations", &r.insights.recommendations)?;
        Ok(())
    }
}

// ── analytics ─────────────────────────────────────────────────────────────────

/// Summary of a log that has already passed verification.
pub struct Analytics<'a>(pub &'a AnalyticsLog);

impl fmt::Display for Analytics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let log = self.0;
        writeln!(f, "Events:      {}", log.events.len())?;
        if log.events.is_empty() {
            return Ok(());
        }
        writeln!(f, "Chain:       intact")?;
        writeln!(f, "Last hash:   {}", log.terminal_hash)?;
        if let (Some(first), Some(last)) = (log.events.first(), log.events.last()) {
            writeln!(
                f,
                "Span:        {} to {}",
                first.record.recorded_at.format("%Y-%m-%d %H:%M"),
                last.record.recorded_at.format("%Y-%m-%d %H:%M")
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Conditions:")?;
        for (name, count) in log.condition_counts() {
            writeln!(f, "  {:>4}  {}", count, name)?;
        }
        Ok(())
    }
}
