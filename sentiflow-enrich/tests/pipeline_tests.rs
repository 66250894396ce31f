//! Enrichment pipeline tests over fake and SQLite sinks

mod helpers;

use helpers::{memory_sinks, sample_post, sqlite_pipeline, FixedAnalyzer, RecordingSink};
use sentiflow_common::{ItemOutcome, SentimentLabel, SkipReason};
use sentiflow_enrich::pipeline::EnrichmentPipeline;
use std::sync::Arc;

fn recording_pipeline(
    compound: f64,
    analytical: Arc<RecordingSink>,
    latest: Arc<RecordingSink>,
) -> EnrichmentPipeline {
    EnrichmentPipeline::new(Arc::new(FixedAnalyzer { compound }), analytical, latest)
}

#[tokio::test]
async fn test_enriched_record_written_to_both_sinks() {
    let analytical = Arc::new(RecordingSink::default());
    let latest = Arc::new(RecordingSink::default());
    let pipeline = recording_pipeline(-0.57, analytical.clone(), latest.clone());

    let post = sample_post("tweet_123", "I hate this http://x.com", Some(-1.0));
    let outcome = pipeline.process(&post).await;

    let record = outcome.succeeded().expect("post should be enriched");
    assert_eq!(record.post_id, "tweet_123");
    assert_eq!(record.sentiment_label, SentimentLabel::Negative);
    assert_eq!(record.sentiment_magnitude, 0.57);
    assert_eq!(record.original_sentiment, Some(-1.0));
    assert_eq!(record.prediction_match, Some(true));
    assert!(!record.has_url);
    assert_eq!(record.engagement_total, 167);

    assert_eq!(analytical.records(), vec![record.clone()]);
    assert_eq!(latest.records(), vec![record]);
}

#[tokio::test]
async fn test_short_text_skipped_without_writes() {
    let analytical = Arc::new(RecordingSink::default());
    let latest = Arc::new(RecordingSink::default());
    let pipeline = recording_pipeline(0.5, analytical.clone(), latest.clone());

    let cases = [
        ("", SkipReason::MissingText),
        ("hey", SkipReason::TextTooShort(3)),
        ("http://only.a/link", SkipReason::TextTooShort(0)),
    ];

    for (text, expected) in cases {
        let outcome = pipeline.process(&sample_post("tweet_1", text, None)).await;
        assert_eq!(outcome, ItemOutcome::Skipped(expected), "text: {:?}", text);
    }

    assert!(analytical.records().is_empty());
    assert!(latest.records().is_empty());
}

#[tokio::test]
async fn test_analytical_failure_is_reported_and_stops_latest_write() {
    let analytical = Arc::new(RecordingSink::failing());
    let latest = Arc::new(RecordingSink::default());
    let pipeline = recording_pipeline(0.5, analytical, latest.clone());

    let outcome = pipeline
        .process(&sample_post("tweet_1", "lovely weather today", Some(1.0)))
        .await;

    assert!(outcome.is_failed());
    assert!(latest.records().is_empty());
}

#[tokio::test]
async fn test_latest_state_failure_is_reported() {
    let analytical = Arc::new(RecordingSink::default());
    let latest = Arc::new(RecordingSink::failing());
    let pipeline = recording_pipeline(0.5, analytical.clone(), latest);

    let outcome = pipeline
        .process(&sample_post("tweet_1", "lovely weather today", Some(1.0)))
        .await;

    assert!(outcome.is_failed());
    assert_eq!(analytical.records().len(), 1);
}

#[tokio::test]
async fn test_zero_compound_stored_positive_but_not_matching_positive_truth() {
    let analytical = Arc::new(RecordingSink::default());
    let latest = Arc::new(RecordingSink::default());
    let pipeline = recording_pipeline(0.0, analytical, latest);

    let positive_truth = pipeline
        .process(&sample_post("tweet_1", "the table is brown", Some(1.0)))
        .await
        .succeeded()
        .unwrap();
    assert_eq!(positive_truth.sentiment_label, SentimentLabel::Positive);
    assert_eq!(positive_truth.prediction_match, Some(false));

    // Neutral ground truth (0.0) also falls on the negative side of the check
    let neutral_truth = pipeline
        .process(&sample_post("tweet_2", "the table is brown", Some(0.0)))
        .await
        .succeeded()
        .unwrap();
    assert_eq!(neutral_truth.prediction_match, Some(true));
}

#[tokio::test]
async fn test_redelivery_appends_analytics_and_replaces_latest() {
    let sinks = memory_sinks().await;
    let pipeline = sqlite_pipeline(0.4, &sinks);
    let post = sample_post("tweet_42", "good morning everyone", Some(1.0));

    assert!(pipeline.process(&post).await.succeeded().is_some());
    assert!(pipeline.process(&post).await.succeeded().is_some());

    assert_eq!(sinks.load_history("tweet_42").await.unwrap().len(), 2);

    let latest = sinks.load_latest("tweet_42").await.unwrap().unwrap();
    assert_eq!(latest.sentiment_score, 0.4);
    assert_eq!(latest.prediction_match, Some(true));

    let stats = sinks.accuracy_stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.matches, 2);
    assert_eq!(stats.accuracy, Some(1.0));
}
