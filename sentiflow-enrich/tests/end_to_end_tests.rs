//! Ingestion through the in-process transport into enrichment and storage

mod helpers;

use helpers::memory_sinks;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sentiflow_common::transport::ChannelPublisher;
use sentiflow_common::SentimentLabel;
use sentiflow_enrich::pipeline::EnrichmentPipeline;
use sentiflow_enrich::scorer::VaderAnalyzer;
use sentiflow_enrich::worker::{spawn_channel_worker, WorkerStats};
use sentiflow_ingest::normalizer::pseudonymize_author;
use sentiflow_ingest::pipeline::{ingest_content, IngestOptions};
use std::sync::Arc;

const DATASET: &str = concat!(
    "\"0\",\"123\",\"Mon May 11 03:17:40 UTC 2009\",\"NO_QUERY\",\"alice\",\"I hate this http://x.com\"\n",
    "\"4\",\"124\",\"Mon May 11 03:18:01 UTC 2009\",\"NO_QUERY\",\"bob\",\"What a lovely day, I love it\"\n",
    "\"4\",\"125\",\"Mon May 11 03:18:09 UTC 2009\",\"NO_QUERY\",\"carol\"\n",
    "\"2\",\"126\",\"Mon May 11 03:18:20 UTC 2009\",\"NO_QUERY\",\"dave\",\"hi http://t.co/abc\"\n",
);

#[tokio::test]
async fn test_dataset_row_flows_to_stored_record() {
    let sinks = memory_sinks().await;
    let pipeline = Arc::new(EnrichmentPipeline::new(
        Arc::new(VaderAnalyzer::new()),
        Arc::new(sinks.clone()),
        Arc::new(sinks.clone()),
    ));

    let (publisher, receiver) = ChannelPublisher::channel(16);
    let worker = spawn_channel_worker(receiver, pipeline);

    let mut options = IngestOptions::new("sentiment-raw");
    options.batch_size = 2;
    let mut rng = StdRng::seed_from_u64(11);
    let summary = ingest_content(DATASET, "raw/e2e.csv", &options, &publisher, &mut rng).await;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.skipped, 1);

    drop(publisher);
    let stats = worker.await.unwrap();
    assert_eq!(
        stats,
        WorkerStats {
            succeeded: 2,
            skipped: 1,
            failed: 0,
        }
    );

    let record = sinks.load_latest("tweet_123").await.unwrap().unwrap();
    assert_eq!(record.author, pseudonymize_author("alice"));
    assert_eq!(record.platform, "twitter");
    assert_eq!(record.timestamp, "2009-05-11T03:17:40Z");
    assert_eq!(record.original_sentiment, Some(-1.0));
    assert_eq!(record.sentiment_label, SentimentLabel::Negative);
    assert_eq!(record.prediction_match, Some(true));
    assert!(!record.has_url);
    assert_eq!(record.word_count, 3);
    assert_eq!(
        record.engagement_total,
        record.likes + record.shares + record.comments
    );
    assert_eq!(record.sentiment_magnitude, record.sentiment_score.abs());

    let positive = sinks.load_latest("tweet_124").await.unwrap().unwrap();
    assert_eq!(positive.sentiment_label, SentimentLabel::Positive);
    assert_eq!(positive.original_sentiment, Some(1.0));

    // Only a URL and a two-letter word: skipped after cleaning
    assert!(sinks.load_latest("tweet_126").await.unwrap().is_none());

    let accuracy = sinks.accuracy_stats().await.unwrap();
    assert_eq!(accuracy.total, 2);
    assert_eq!(accuracy.with_ground_truth, 2);
    assert_eq!(accuracy.matches, 2);
}
