//! Test Helper Utilities
//!
//! Shared fakes for testing sentiflow-enrich

#![allow(dead_code)]

use async_trait::async_trait;
use sentiflow_common::{CanonicalPost, EnrichedRecord, Error, Result};
use sentiflow_enrich::db::init_memory_pool;
use sentiflow_enrich::pipeline::EnrichmentPipeline;
use sentiflow_enrich::scorer::{SentimentAnalyzer, SentimentScores};
use sentiflow_enrich::sinks::{AnalyticalSink, LatestStateSink, SqliteSinks};
use std::sync::{Arc, Mutex};

/// Analyzer returning the same compound score for every text
pub struct FixedAnalyzer {
    pub compound: f64,
}

impl SentimentAnalyzer for FixedAnalyzer {
    fn polarity_scores(&self, _text: &str) -> SentimentScores {
        SentimentScores {
            positive: if self.compound > 0.0 { self.compound } else { 0.0 },
            negative: if self.compound < 0.0 { -self.compound } else { 0.0 },
            neutral: 1.0 - self.compound.abs(),
            compound: self.compound,
        }
    }
}

/// In-memory sink recording every write; refuses all writes when `fail` is set
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<EnrichedRecord>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<EnrichedRecord> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, record: &EnrichedRecord) -> Result<()> {
        if self.fail {
            return Err(Error::Internal("sink unavailable".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl AnalyticalSink for RecordingSink {
    async fn append(&self, record: &EnrichedRecord) -> Result<()> {
        self.record(record)
    }
}

#[async_trait]
impl LatestStateSink for RecordingSink {
    async fn upsert(&self, record: &EnrichedRecord) -> Result<()> {
        self.record(record)
    }
}

/// In-memory SQLite sinks with tables created
pub async fn memory_sinks() -> SqliteSinks {
    SqliteSinks::new(init_memory_pool().await.unwrap(), 1000)
}

/// Pipeline with a fixed score writing to `sinks`
pub fn sqlite_pipeline(compound: f64, sinks: &SqliteSinks) -> Arc<EnrichmentPipeline> {
    Arc::new(EnrichmentPipeline::new(
        Arc::new(FixedAnalyzer { compound }),
        Arc::new(sinks.clone()),
        Arc::new(sinks.clone()),
    ))
}

pub fn sample_post(id: &str, text: &str, original_sentiment: Option<f64>) -> CanonicalPost {
    CanonicalPost {
        id: id.to_string(),
        text: text.to_string(),
        author: "user_31337".to_string(),
        platform: "twitter".to_string(),
        timestamp: "2009-05-11T03:17:40Z".to_string(),
        original_sentiment,
        likes: 120,
        shares: 40,
        comments: 7,
    }
}
