//! # symtriage-signals
//!
//! Keyword-driven signals read from free text:
//!
//! 1. **Emergency level**: tiered keyword lists classify a patient message
//!    into levels 0..=4 and map the level to a fixed response protocol.
//! 2. **Feedback sentiment**: word-list scoring of patient feedback into
//!    polarity, emotions, themes, and follow-up insights.
//!
//! Nothing here performs I/O.

pub mod emergency;
pub mod sentiment;

pub use emergency::{assess, detect_level, response_protocol, EmergencyAssessment, EmergencyLevel, ResponseProtocol};
pub use sentiment::{
    analyze_feedback, extract_themes, score_sentiment, Emotion, FeedbackKind, FeedbackReport,
    Insights, Priority, Sentiment, SentimentScore, Theme, ThemeAnalysis, ThemeScore,
};
