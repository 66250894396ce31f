//! Prediction accuracy against the dataset's ground truth
//!
//! Both sides are collapsed with a strict `> 0` threshold, so a compound
//! score of exactly 0 counts as negative here even though the stored
//! `sentiment_label` for the same score is positive. The two thresholds are
//! intentionally different and must not be unified.

use sentiflow_common::models::SentimentLabel;

/// Strict two-class label used for match checking
pub fn match_label(score: f64) -> SentimentLabel {
    if score > 0.0 {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    }
}

/// Whether the predicted compound score agrees with the ground truth
pub fn check_prediction_match(predicted: f64, ground_truth: f64) -> bool {
    match_label(predicted) == match_label(ground_truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::sentiment_label;

    #[test]
    fn test_agreement() {
        assert!(check_prediction_match(0.8, 1.0));
        assert!(check_prediction_match(-0.8, -1.0));
        assert!(!check_prediction_match(0.8, -1.0));
        assert!(!check_prediction_match(-0.8, 1.0));
    }

    #[test]
    fn test_neutral_ground_truth_counts_as_negative() {
        assert!(check_prediction_match(-0.3, 0.0));
        assert!(!check_prediction_match(0.3, 0.0));
    }

    #[test]
    fn test_zero_compound_thresholds_disagree() {
        // Stored label says positive, match check says negative
        assert_eq!(sentiment_label(0.0), SentimentLabel::Positive);
        assert_eq!(match_label(0.0), SentimentLabel::Negative);

        assert!(!check_prediction_match(0.0, 1.0));
        assert!(check_prediction_match(0.0, -1.0));
    }
}
