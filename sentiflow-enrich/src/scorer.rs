//! Sentiment scoring
//!
//! Scores come from the pre-built VADER lexicon/rule model. The derived
//! label collapses to two classes: `compound >= 0` is positive (including
//! exactly 0), anything below is negative.

use sentiflow_common::models::SentimentLabel;

/// Polarity sub-scores of one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    /// Share of positive sentiment, in [0, 1]
    pub positive: f64,
    /// Share of negative sentiment, in [0, 1]
    pub negative: f64,
    /// Share of neutral sentiment, in [0, 1]
    pub neutral: f64,
    /// Normalized aggregate polarity, in [-1, 1]
    pub compound: f64,
}

impl SentimentScores {
    pub fn magnitude(&self) -> f64 {
        self.compound.abs()
    }

    pub fn label(&self) -> SentimentLabel {
        sentiment_label(self.compound)
    }
}

/// Two-class label of a compound score
pub fn sentiment_label(compound: f64) -> SentimentLabel {
    if compound >= 0.0 {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    }
}

/// Scoring capability injected into the enrichment pipeline
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> SentimentScores;
}

/// VADER-backed analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderAnalyzer;

impl VaderAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentAnalyzer for VaderAnalyzer {
    fn polarity_scores(&self, text: &str) -> SentimentScores {
        // The lexicon is loaded once by the crate; the analyzer itself is a thin view
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        SentimentScores {
            positive: get("pos"),
            negative: get("neg"),
            neutral: get("neu"),
            compound: get("compound"),
        }
    }
}
