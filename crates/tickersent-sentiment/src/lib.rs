//! Headline text normalization and sentiment scoring.

mod normalize;
mod scorer;

use serde::Serialize;

pub use normalize::Normalizer;
pub use scorer::{build_scorer, LexiconScorer, SentimentScorer};

/// Discrete sentiment class derived from the compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a compound score to its label. The thresholds are strict: exactly
/// ±0.05 is still neutral.
#[must_use]
pub fn label_for(score: f64) -> SentimentLabel {
    if score > 0.05 {
        SentimentLabel::Positive
    } else if score < -0.05 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
