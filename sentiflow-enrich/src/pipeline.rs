//! Enrichment pipeline
//!
//! One received post goes through validation, cleaning, scoring, feature
//! extraction and the accuracy check, and the resulting record is written to
//! both sinks. The outcome is three-way: validation rejections are
//! `Skipped` with no writes, scoring or storage errors are `Failed` and are
//! surfaced to the caller so the transport can redeliver.

use chrono::{DateTime, Utc};
use sentiflow_common::time::to_iso8601;
use sentiflow_common::{CanonicalPost, EnrichedRecord, ItemOutcome, SkipReason};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::accuracy::check_prediction_match;
use crate::scorer::{SentimentAnalyzer, SentimentScores};
use crate::sinks::{AnalyticalSink, LatestStateSink};
use crate::text::{clean_text, truncate_chars, TextFeatures, STORED_TEXT_MAX_CHARS};

/// Shortest text, in characters, worth scoring
pub const MIN_TEXT_CHARS: usize = 5;

/// Reject posts whose received or cleaned text is too short to score
///
/// Returns the cleaned text on success.
pub fn validate_text(text: &str) -> Result<String, SkipReason> {
    if text.is_empty() {
        return Err(SkipReason::MissingText);
    }

    let raw_chars = text.chars().count();
    if raw_chars < MIN_TEXT_CHARS {
        return Err(SkipReason::TextTooShort(raw_chars));
    }

    let cleaned = clean_text(text);
    let cleaned_chars = cleaned.chars().count();
    if cleaned_chars < MIN_TEXT_CHARS {
        return Err(SkipReason::TextTooShort(cleaned_chars));
    }

    Ok(cleaned)
}

/// Assemble the enriched record for a post
///
/// Features come from the cleaned text; the stored text is the received text
/// cut to [`STORED_TEXT_MAX_CHARS`].
pub fn build_record(
    post: &CanonicalPost,
    cleaned: &str,
    scores: SentimentScores,
    collected_at: DateTime<Utc>,
) -> EnrichedRecord {
    let features = TextFeatures::extract(cleaned);
    let prediction_match = post
        .original_sentiment
        .map(|truth| check_prediction_match(scores.compound, truth));

    EnrichedRecord {
        post_id: post.id.clone(),
        text: truncate_chars(&post.text, STORED_TEXT_MAX_CHARS),
        author: post.author.clone(),
        platform: post.platform.clone(),
        timestamp: post.timestamp.clone(),
        collected_at: to_iso8601(collected_at),
        sentiment_score: scores.compound,
        sentiment_magnitude: scores.magnitude(),
        sentiment_positive: scores.positive,
        sentiment_negative: scores.negative,
        sentiment_neutral: scores.neutral,
        sentiment_label: scores.label(),
        original_sentiment: post.original_sentiment,
        prediction_match,
        likes: i64::from(post.likes),
        shares: i64::from(post.shares),
        comments: i64::from(post.comments),
        engagement_total: post.engagement_total(),
        word_count: features.word_count,
        char_count: features.char_count,
        has_hashtags: features.has_hashtags,
        has_mentions: features.has_mentions,
        has_url: features.has_url,
    }
}

/// Scores posts and writes them to the analytical and latest-state sinks
pub struct EnrichmentPipeline {
    analyzer: Arc<dyn SentimentAnalyzer>,
    analytical: Arc<dyn AnalyticalSink>,
    latest: Arc<dyn LatestStateSink>,
}

impl EnrichmentPipeline {
    pub fn new(
        analyzer: Arc<dyn SentimentAnalyzer>,
        analytical: Arc<dyn AnalyticalSink>,
        latest: Arc<dyn LatestStateSink>,
    ) -> Self {
        Self {
            analyzer,
            analytical,
            latest,
        }
    }

    /// Enrich one post and store the record
    pub async fn process(&self, post: &CanonicalPost) -> ItemOutcome<EnrichedRecord> {
        let cleaned = match validate_text(&post.text) {
            Ok(cleaned) => cleaned,
            Err(reason) => {
                info!(post_id = %post.id, %reason, "Skipping post");
                return ItemOutcome::Skipped(reason);
            }
        };

        let scores = self.analyzer.polarity_scores(&cleaned);
        let record = build_record(post, &cleaned, scores, Utc::now());

        if let Err(e) = self.analytical.append(&record).await {
            error!(post_id = %post.id, error = %e, "Failed to append analytical record");
            return ItemOutcome::Failed(format!("analytical store: {}", e));
        }

        if let Err(e) = self.latest.upsert(&record).await {
            error!(post_id = %post.id, error = %e, "Failed to upsert latest state");
            return ItemOutcome::Failed(format!("latest-state store: {}", e));
        }

        debug!(
            post_id = %record.post_id,
            label = %record.sentiment_label,
            score = record.sentiment_score,
            "Post enriched"
        );

        ItemOutcome::Succeeded(record)
    }
}
