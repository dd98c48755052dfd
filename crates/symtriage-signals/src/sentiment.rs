//! Patient feedback sentiment analysis.
//!
//! Scoring:
//!
//! 1. Lowercase the text and split on whitespace; punctuation at the edges of
//!    a token is ignored when matching word lists.
//! 2. `score = (positive - negative) / max(word_count, 1)`.
//! 3. `score > 0.1` is positive and `score < -0.1` negative, both with
//!    confidence `min(0.95, 0.6 + |score|)`. Anything else is neutral at 0.7.
//!
//! Themes are counted by substring occurrence over the whole text; the three
//! highest non-zero themes become the primary themes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

const POSITIVE_WORDS: &[&str] = &[
    "excellent", "amazing", "wonderful", "fantastic", "great", "good", "helpful",
    "professional", "caring", "thorough", "knowledgeable", "satisfied", "happy",
    "pleased", "recommend", "thank", "appreciate", "comfortable", "confident",
    "effective", "efficient", "friendly", "patient", "understanding", "skilled",
];

const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "awful", "horrible", "bad", "poor", "disappointing", "rude",
    "unprofessional", "late", "rushed", "dismissive", "unsatisfied", "unhappy",
    "frustrated", "waste", "complaint", "angry", "confused", "worried", "scared",
    "painful", "uncomfortable", "ineffective", "slow", "expensive", "difficult",
];

const POLARITY_THRESHOLD: f64 = 0.1;
const NEUTRAL_CONFIDENCE: f64 = 0.7;
const MAX_CONFIDENCE: f64 = 0.95;
const HIGH_CONFIDENCE: f64 = 0.8;

/// What the feedback is about. Appointment feedback gets follow-up
/// recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Appointment,
    Chat,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        };
        f.write_str(s)
    }
}

/// Emotions tracked in feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Trust,
    Fear,
    Anger,
    Sadness,
    Surprise,
}

impl Emotion {
    const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Trust,
        Emotion::Fear,
        Emotion::Anger,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    fn words(self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["happy", "pleased", "satisfied", "delighted", "grateful"],
            Emotion::Trust => &["confident", "comfortable", "secure", "reliable", "professional"],
            Emotion::Fear => &["scared", "worried", "anxious", "nervous", "concerned"],
            Emotion::Anger => &["angry", "frustrated", "annoyed", "upset", "mad"],
            Emotion::Sadness => &["sad", "disappointed", "unhappy", "depressed", "discouraged"],
            Emotion::Surprise => &["surprised", "shocked", "amazed", "unexpected", "sudden"],
        }
    }
}

/// Feedback themes, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Communication,
    Professionalism,
    Timeliness,
    Effectiveness,
    Facility,
    Staff,
    Cost,
    Accessibility,
}

impl Theme {
    const ALL: [Theme; 8] = [
        Theme::Communication,
        Theme::Professionalism,
        Theme::Timeliness,
        Theme::Effectiveness,
        Theme::Facility,
        Theme::Staff,
        Theme::Cost,
        Theme::Accessibility,
    ];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Theme::Communication => &["communication", "explain", "listen", "understand", "clear", "confusing"],
            Theme::Professionalism => &["professional", "respectful", "courteous", "rude", "inappropriate"],
            Theme::Timeliness => &["time", "wait", "late", "prompt", "quick", "slow", "delayed"],
            Theme::Effectiveness => &["effective", "helpful", "useless", "beneficial", "treatment", "cure"],
            Theme::Facility => &["clean", "dirty", "comfortable", "crowded", "quiet", "noisy"],
            Theme::Staff => &["nurse", "receptionist", "staff", "team", "friendly", "helpful"],
            Theme::Cost => &["expensive", "cheap", "affordable", "cost", "price", "insurance"],
            Theme::Accessibility => &["accessible", "parking", "location", "convenient", "difficult"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Communication => "communication",
            Theme::Professionalism => "professionalism",
            Theme::Timeliness => "timeliness",
            Theme::Effectiveness => "effectiveness",
            Theme::Facility => "facility",
            Theme::Staff => "staff",
            Theme::Cost => "cost",
            Theme::Accessibility => "accessibility",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    /// `(positive - negative) / word_count`, in -1.0..=1.0.
    pub score: f64,
    pub confidence: f64,
    /// Non-zero emotion counts.
    pub emotions: BTreeMap<Emotion, usize>,
    /// Emotions in the order their first word appeared in the text.
    pub emotion_order: Vec<Emotion>,
    pub positive_words: usize,
    pub negative_words: usize,
    pub word_count: usize,
}

impl SentimentScore {
    /// The most frequent emotion; ties go to the one mentioned first.
    pub fn dominant_emotion(&self) -> Option<Emotion> {
        let mut best: Option<(Emotion, usize)> = None;
        for &emotion in &self.emotion_order {
            let count = self.emotions.get(&emotion).copied().unwrap_or(0);
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((emotion, count));
            }
        }
        best.map(|(emotion, _)| emotion)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeScore {
    pub theme: Theme,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAnalysis {
    /// Up to three non-zero themes, highest first.
    pub primary: Vec<ThemeScore>,
    /// Every theme in declared order, including zeros.
    pub all: Vec<ThemeScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub overall_assessment: String,
    pub key_strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
    pub urgency: Priority,
    pub follow_up_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub kind: FeedbackKind,
    pub sentiment: SentimentScore,
    pub themes: ThemeAnalysis,
    pub insights: Insights,
}

/// Score the polarity and emotions of `text`.
///
/// Two departures from plain whitespace splitting: punctuation at either end
/// of a token is ignored, so "great!" counts as positive, and empty text has
/// a word count of 0 rather than one empty token.
pub fn score_sentiment(text: &str) -> SentimentScore {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();

    let mut positive = 0;
    let mut negative = 0;
    let mut emotions = BTreeMap::new();
    let mut emotion_order = Vec::new();

    for token in &tokens {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if POSITIVE_WORDS.contains(&word) {
            positive += 1;
        }
        if NEGATIVE_WORDS.contains(&word) {
            negative += 1;
        }
        for emotion in Emotion::ALL {
            if emotion.words().contains(&word) {
                let count = emotions.entry(emotion).or_insert(0);
                if *count == 0 {
                    emotion_order.push(emotion);
                }
                *count += 1;
            }
        }
    }

    let word_count = tokens.len();
    let score = (positive as f64 - negative as f64) / word_count.max(1) as f64;

    let (sentiment, confidence) = if score > POLARITY_THRESHOLD {
        (Sentiment::Positive, (0.6 + score.abs()).min(MAX_CONFIDENCE))
    } else if score < -POLARITY_THRESHOLD {
        (Sentiment::Negative, (0.6 + score.abs()).min(MAX_CONFIDENCE))
    } else {
        (Sentiment::Neutral, NEUTRAL_CONFIDENCE)
    };

    SentimentScore {
        sentiment,
        score,
        confidence,
        emotions,
        emotion_order,
        positive_words: positive,
        negative_words: negative,
        word_count,
    }
}

/// Count theme keyword occurrences in `text`.
pub fn extract_themes(text: &str) -> ThemeAnalysis {
    let lower = text.to_lowercase();

    let all: Vec<ThemeScore> = Theme::ALL
        .iter()
        .map(|&theme| ThemeScore {
            theme,
            score: theme.keywords().iter().map(|k| lower.matches(k).count()).sum(),
        })
        .collect();

    let mut primary: Vec<ThemeScore> = all.iter().filter(|t| t.score > 0).cloned().collect();
    // Stable sort keeps declared order among equal scores.
    primary.sort_by(|a, b| b.score.cmp(&a.score));
    primary.truncate(3);

    ThemeAnalysis { primary, all }
}

fn derive_insights(sentiment: &SentimentScore, themes: &ThemeAnalysis, kind: FeedbackKind) -> Insights {
    let mut insights = Insights {
        overall_assessment: String::new(),
        key_strengths: Vec::new(),
        areas_for_improvement: Vec::new(),
        recommendations: Vec::new(),
        urgency: Priority::Low,
        follow_up_required: false,
    };

    match sentiment.sentiment {
        Sentiment::Positive => {
            insights.overall_assessment =
                "Patient expresses satisfaction with the healthcare experience".to_string();
            insights.key_strengths = vec![
                "Positive patient experience".to_string(),
                "Good service delivery".to_string(),
            ];
        }
        Sentiment::Negative => {
            insights.overall_assessment =
                "Patient expresses dissatisfaction requiring attention".to_string();
            insights.areas_for_improvement = vec![
                "Patient satisfaction".to_string(),
                "Service quality".to_string(),
            ];
            insights.urgency = if sentiment.confidence > HIGH_CONFIDENCE {
                Priority::High
            } else {
                Priority::Medium
            };
            insights.follow_up_required = true;
        }
        Sentiment::Neutral => {
            insights.overall_assessment = "Mixed or neutral feedback requiring review".to_string();
        }
    }

    for theme in &themes.primary {
        match sentiment.sentiment {
            Sentiment::Positive => insights
                .key_strengths
                .push(format!("Strong performance in {}", theme.theme.name())),
            Sentiment::Negative => insights
                .areas_for_improvement
                .push(format!("Improvement needed in {}", theme.theme.name())),
            Sentiment::Neutral => {}
        }
    }

    if matches!(
        sentiment.dominant_emotion(),
        Some(Emotion::Fear) | Some(Emotion::Anger)
    ) {
        insights.urgency = Priority::High;
        insights.follow_up_required = true;
        insights
            .recommendations
            .push("Immediate follow-up required due to patient emotional state".to_string());
    }

    if kind == FeedbackKind::Appointment {
        let extra: &[&str] = match sentiment.sentiment {
            Sentiment::Negative => &[
                "Schedule follow-up call with patient",
                "Review appointment process for improvements",
                "Consider additional training for staff",
            ],
            Sentiment::Positive => &[
                "Share positive feedback with team",
                "Use as case study for best practices",
            ],
            Sentiment::Neutral => &[],
        };
        insights
            .recommendations
            .extend(extra.iter().map(|s| s.to_string()));
    }

    insights
}

/// Full analysis of one piece of patient feedback.
pub fn analyze_feedback(text: &str, kind: FeedbackKind) -> FeedbackReport {
    let sentiment = score_sentiment(text);
    let themes = extract_themes(text);
    let insights = derive_insights(&sentiment, &themes, kind);

    debug!(
        sentiment = %sentiment.sentiment,
        score = sentiment.score,
        primary_themes = themes.primary.len(),
        follow_up = insights.follow_up_required,
        "feedback analysed"
    );

    FeedbackReport {
        kind,
        sentiment,
        themes,
        insights,
    }
}
