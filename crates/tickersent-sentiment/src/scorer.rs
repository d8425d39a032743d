//! Lexicon compound-sentiment scoring for financial news headlines.

use std::collections::HashMap;
use std::sync::LazyLock;

use tickersent_core::SentimentBackend;

/// Scoring backend contract: processed text in, compound score in
/// `[-1.0, 1.0]` out.
///
/// Implementations must be total over their input domain — a backend that
/// can fail on a record is a misconfiguration, not a runtime concern. A
/// heavier model (e.g. a transformer service) slots in behind this same
/// trait without the pipeline knowing.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, processed_text: &str) -> f64;
}

/// Build the scorer selected by configuration.
///
/// Selector validation happens when the config is parsed, so by the time
/// this runs the backend is known-good.
#[must_use]
pub fn build_scorer(backend: SentimentBackend) -> Box<dyn SentimentScorer> {
    match backend {
        SentimentBackend::Lexicon => Box::new(LexiconScorer::new()),
    }
}

/// Word valences for financial news, lowercase single words.
///
/// Magnitudes follow the usual lexicon convention of roughly `[-3.4, 3.4]`;
/// the compound normalization squashes the summed valence into `[-1, 1]`.
const WORDS: &[(&str, f64)] = &[
    // Market moves up
    ("surge", 2.3),
    ("surges", 2.3),
    ("surged", 2.3),
    ("soar", 2.6),
    ("soars", 2.6),
    ("soared", 2.6),
    ("rally", 2.0),
    ("rallies", 2.0),
    ("jump", 1.8),
    ("jumps", 1.8),
    ("jumped", 1.8),
    ("gain", 1.6),
    ("gains", 1.6),
    ("gained", 1.6),
    ("rise", 1.4),
    ("rises", 1.4),
    ("rose", 1.4),
    ("higher", 1.3),
    ("rebound", 1.7),
    ("rebounds", 1.7),
    ("recovery", 1.6),
    ("boost", 1.7),
    ("boosts", 1.7),
    ("boosted", 1.7),
    // Results and ratings
    ("beat", 1.9),
    ("beats", 1.9),
    ("exceed", 1.9),
    ("exceeds", 1.9),
    ("exceeded", 1.9),
    ("top", 1.3),
    ("tops", 1.3),
    ("topped", 1.3),
    ("record", 1.5),
    ("strong", 1.9),
    ("profit", 1.8),
    ("profits", 1.8),
    ("profitable", 2.0),
    ("growth", 1.7),
    ("grow", 1.4),
    ("grows", 1.4),
    ("upgrade", 2.0),
    ("upgraded", 2.0),
    ("upgrades", 2.0),
    ("outperform", 2.1),
    ("outperforms", 2.1),
    ("bullish", 2.4),
    ("upbeat", 1.9),
    ("optimistic", 2.0),
    // Business wins
    ("win", 2.2),
    ("wins", 2.2),
    ("won", 2.2),
    ("boom", 2.2),
    ("success", 2.4),
    ("successful", 2.4),
    ("breakthrough", 2.5),
    ("approval", 1.8),
    ("approved", 1.8),
    ("innovative", 1.9),
    ("milestone", 1.6),
    ("expand", 1.5),
    ("expands", 1.5),
    ("expansion", 1.5),
    ("dividend", 1.2),
    ("buyback", 1.4),
    // Generic positive
    ("best", 2.6),
    ("great", 2.5),
    ("good", 1.9),
    ("positive", 2.0),
    // Market moves down
    ("plunge", -2.6),
    ("plunges", -2.6),
    ("plunged", -2.6),
    ("plummet", -2.8),
    ("plummets", -2.8),
    ("plummeted", -2.8),
    ("crash", -3.1),
    ("crashes", -3.1),
    ("crashed", -3.1),
    ("tank", -2.5),
    ("tanks", -2.5),
    ("tanked", -2.5),
    ("tumble", -2.3),
    ("tumbles", -2.3),
    ("tumbled", -2.3),
    ("slump", -2.2),
    ("slumps", -2.2),
    ("slumped", -2.2),
    ("sink", -2.0),
    ("sinks", -2.0),
    ("sank", -2.0),
    ("slide", -1.6),
    ("slides", -1.6),
    ("slid", -1.6),
    ("fall", -1.5),
    ("falls", -1.5),
    ("fell", -1.5),
    ("drop", -1.6),
    ("drops", -1.6),
    ("dropped", -1.6),
    ("decline", -1.6),
    ("declines", -1.6),
    ("declined", -1.6),
    ("lower", -1.2),
    // Results and ratings
    ("miss", -1.8),
    ("misses", -1.8),
    ("missed", -1.8),
    ("weak", -1.8),
    ("loss", -2.0),
    ("losses", -2.0),
    ("downgrade", -2.1),
    ("downgraded", -2.1),
    ("downgrades", -2.1),
    ("bearish", -2.3),
    ("shortfall", -1.9),
    ("disappointing", -2.2),
    ("disappoints", -2.1),
    ("disappointed", -2.1),
    // Legal and regulatory
    ("lawsuit", -2.2),
    ("lawsuits", -2.2),
    ("sued", -2.3),
    ("sues", -2.1),
    ("probe", -1.8),
    ("investigation", -1.8),
    ("fraud", -3.0),
    ("scandal", -2.8),
    ("fine", -1.6),
    ("fined", -1.8),
    ("penalty", -1.8),
    ("ban", -2.2),
    ("banned", -2.2),
    ("bans", -2.2),
    ("recall", -2.4),
    ("recalls", -2.4),
    ("halt", -1.7),
    ("halted", -1.7),
    // Distress
    ("bankruptcy", -3.2),
    ("bankrupt", -3.2),
    ("default", -2.5),
    ("debt", -1.4),
    ("layoff", -2.3),
    ("layoffs", -2.3),
    ("cut", -1.4),
    ("cuts", -1.4),
    ("crisis", -2.6),
    ("trouble", -1.9),
    ("warning", -1.9),
    ("warns", -1.9),
    ("warned", -1.9),
    ("delay", -1.4),
    ("delays", -1.4),
    ("delayed", -1.4),
    ("fear", -1.9),
    ("fears", -1.9),
    ("worry", -1.7),
    ("worries", -1.7),
    ("risk", -1.3),
    ("risks", -1.3),
    // Generic negative
    ("worst", -2.8),
    ("bad", -2.1),
    ("negative", -1.8),
    ("terrible", -2.7),
];

static LEXICON: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| WORDS.iter().copied().collect());

/// Tokens that invert the valence of a lexicon word appearing within the
/// next [`NEGATION_WINDOW`] tokens. The normalizer strips apostrophes, so
/// contractions arrive as `isnt`, `wont`, etc.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "cannot", "without", "neither", "nor", "isnt", "wasnt", "arent", "wont",
    "cant", "dont", "doesnt", "didnt", "couldnt", "wouldnt", "shouldnt",
];

const NEGATION_WINDOW: usize = 3;

/// Denominator constant for the compound normalization
/// `s / sqrt(s^2 + ALPHA)`, which maps any summed valence into `(-1, 1)`.
const ALPHA: f64 = 15.0;

/// Weighted-lexicon compound scorer.
///
/// Stateless after construction; build one instance at startup and share
/// it across every headline rather than re-creating it per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, processed_text: &str) -> f64 {
        let tokens: Vec<&str> = processed_text.split_whitespace().collect();
        if tokens.is_empty() {
            return 0.0;
        }

        let mut sum = 0.0_f64;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = LEXICON.get(token) else {
                continue;
            };
            let negated = (1..=NEGATION_WINDOW)
                .any(|k| i >= k && NEGATORS.contains(&tokens[i - k]));
            sum += if negated { -valence } else { valence };
        }

        let compound = sum / (sum * sum + ALPHA).sqrt();
        compound.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{label_for, SentimentLabel};

    fn scorer() -> LexiconScorer {
        LexiconScorer::new()
    }

    #[test]
    fn empty_text_scores_exactly_zero() {
        assert_eq!(scorer().score(""), 0.0);
        assert_eq!(scorer().score("   "), 0.0);
    }

    #[test]
    fn unknown_words_score_zero() {
        assert_eq!(scorer().score("the quarterly shareholder meeting"), 0.0);
    }

    #[test]
    fn positive_headline_crosses_the_positive_threshold() {
        let score = scorer().score("apple beats expectations");
        assert!(score > 0.05, "expected positive score, got {score}");
        assert_eq!(label_for(score), SentimentLabel::Positive);
    }

    #[test]
    fn negative_headline_crosses_the_negative_threshold() {
        let score = scorer().score("apple stock tanks amid lawsuit");
        assert!(score < -0.05, "expected negative score, got {score}");
        assert_eq!(label_for(score), SentimentLabel::Negative);
    }

    #[test]
    fn score_stays_within_bounds_for_stacked_valences() {
        let positive = "surge rally beats record strong profit upgrade bullish win success";
        let negative = "crash plunge lawsuit fraud scandal bankruptcy layoffs crisis worst";

        let hi = scorer().score(positive);
        let lo = scorer().score(negative);

        assert!(hi > 0.9 && hi <= 1.0, "expected near 1.0, got {hi}");
        assert!(lo < -0.9 && lo >= -1.0, "expected near -1.0, got {lo}");
    }

    #[test]
    fn negation_inverts_nearby_valence() {
        let plain = scorer().score("profits are strong");
        let negated = scorer().score("profits are not strong");
        assert!(plain > 0.0);
        assert!(
            negated < plain,
            "negation must pull the score down: {negated} vs {plain}"
        );
    }

    #[test]
    fn negator_outside_the_window_has_no_effect() {
        // "not" sits four tokens before "strong", past the 3-token window.
        let far = scorer().score("not a very very very strong quarter");
        let near = scorer().score("not strong quarter");
        assert!(far > 0.0, "out-of-window negator ignored, got {far}");
        assert!(near < 0.0, "in-window negator inverts, got {near}");
    }

    #[test]
    fn scoring_is_deterministic() {
        let text = "shares fall after disappointing earnings miss";
        assert_eq!(scorer().score(text), scorer().score(text));
    }

    #[test]
    fn mixed_headline_lands_between_the_extremes() {
        let score = scorer().score("profits surge despite lawsuit risk");
        assert!(score > -1.0 && score < 1.0);
    }

    #[test]
    fn build_scorer_returns_the_lexicon_backend() {
        let scorer = build_scorer(tickersent_core::SentimentBackend::Lexicon);
        assert!(scorer.score("beats") > 0.0);
    }
}
