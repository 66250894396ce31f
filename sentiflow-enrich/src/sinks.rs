//! Record sinks
//!
//! Two destinations receive every enriched record: an append-only analytical
//! store (one row per processing event) and a latest-state store keyed by
//! post id. Both are injected into the pipeline as trait objects; the SQLite
//! implementation backs the service and serves the read endpoints.

use async_trait::async_trait;
use sentiflow_common::{EnrichedRecord, Error, Result, SentimentLabel};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{query::Query, Row, Sqlite, SqlitePool};

use crate::db::retry_on_lock;

/// Append-only analytical store
#[async_trait]
pub trait AnalyticalSink: Send + Sync {
    /// Append one record; redelivered posts produce additional rows
    async fn append(&self, record: &EnrichedRecord) -> Result<()>;
}

/// Latest-state store keyed by post id
#[async_trait]
pub trait LatestStateSink: Send + Sync {
    /// Create or replace the document for `record.post_id`
    async fn upsert(&self, record: &EnrichedRecord) -> Result<()>;
}

/// Aggregate accuracy over the analytical store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub total: i64,
    /// Rows carrying a prediction_match value
    pub with_ground_truth: i64,
    pub matches: i64,
    /// `matches / with_ground_truth`, absent when no row has ground truth
    pub accuracy: Option<f64>,
    pub positive: i64,
    pub negative: i64,
}

const INSERT_POST_SQL: &str = r#"
    INSERT INTO posts (
        post_id, text, author, platform, timestamp, collected_at,
        sentiment_score, sentiment_magnitude, sentiment_positive,
        sentiment_negative, sentiment_neutral, sentiment_label,
        original_sentiment, prediction_match,
        likes, shares, comments, engagement_total,
        word_count, char_count, has_hashtags, has_mentions, has_url
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_LATEST_SQL: &str = r#"
    INSERT INTO latest_posts (
        post_id, text, author, platform, timestamp, collected_at,
        sentiment_score, sentiment_magnitude, sentiment_positive,
        sentiment_negative, sentiment_neutral, sentiment_label,
        original_sentiment, prediction_match,
        likes, shares, comments, engagement_total,
        word_count, char_count, has_hashtags, has_mentions, has_url,
        updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(post_id) DO UPDATE SET
        text = excluded.text,
        author = excluded.author,
        platform = excluded.platform,
        timestamp = excluded.timestamp,
        collected_at = excluded.collected_at,
        sentiment_score = excluded.sentiment_score,
        sentiment_magnitude = excluded.sentiment_magnitude,
        sentiment_positive = excluded.sentiment_positive,
        sentiment_negative = excluded.sentiment_negative,
        sentiment_neutral = excluded.sentiment_neutral,
        sentiment_label = excluded.sentiment_label,
        original_sentiment = excluded.original_sentiment,
        prediction_match = excluded.prediction_match,
        likes = excluded.likes,
        shares = excluded.shares,
        comments = excluded.comments,
        engagement_total = excluded.engagement_total,
        word_count = excluded.word_count,
        char_count = excluded.char_count,
        has_hashtags = excluded.has_hashtags,
        has_mentions = excluded.has_mentions,
        has_url = excluded.has_url,
        updated_at = excluded.updated_at
"#;

fn bind_record<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    record: &'q EnrichedRecord,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(record.post_id.as_str())
        .bind(record.text.as_str())
        .bind(record.author.as_str())
        .bind(record.platform.as_str())
        .bind(record.timestamp.as_str())
        .bind(record.collected_at.as_str())
        .bind(record.sentiment_score)
        .bind(record.sentiment_magnitude)
        .bind(record.sentiment_positive)
        .bind(record.sentiment_negative)
        .bind(record.sentiment_neutral)
        .bind(record.sentiment_label.as_str())
        .bind(record.original_sentiment)
        .bind(record.prediction_match)
        .bind(record.likes)
        .bind(record.shares)
        .bind(record.comments)
        .bind(record.engagement_total)
        .bind(record.word_count)
        .bind(record.char_count)
        .bind(record.has_hashtags)
        .bind(record.has_mentions)
        .bind(record.has_url)
}

fn record_from_row(row: &SqliteRow) -> Result<EnrichedRecord> {
    let label: String = row.get("sentiment_label");

    Ok(EnrichedRecord {
        post_id: row.get("post_id"),
        text: row.get("text"),
        author: row.get("author"),
        platform: row.get("platform"),
        timestamp: row.get("timestamp"),
        collected_at: row.get("collected_at"),
        sentiment_score: row.get("sentiment_score"),
        sentiment_magnitude: row.get("sentiment_magnitude"),
        sentiment_positive: row.get("sentiment_positive"),
        sentiment_negative: row.get("sentiment_negative"),
        sentiment_neutral: row.get("sentiment_neutral"),
        sentiment_label: label.parse::<SentimentLabel>()?,
        original_sentiment: row.get("original_sentiment"),
        prediction_match: row.get("prediction_match"),
        likes: row.get("likes"),
        shares: row.get("shares"),
        comments: row.get("comments"),
        engagement_total: row.get("engagement_total"),
        word_count: row.get("word_count"),
        char_count: row.get("char_count"),
        has_hashtags: row.get("has_hashtags"),
        has_mentions: row.get("has_mentions"),
        has_url: row.get("has_url"),
    })
}

/// SQLite-backed analytical and latest-state stores
#[derive(Clone)]
pub struct SqliteSinks {
    pool: SqlitePool,
    max_lock_wait_ms: u64,
}

impl SqliteSinks {
    pub fn new(pool: SqlitePool, max_lock_wait_ms: u64) -> Self {
        Self {
            pool,
            max_lock_wait_ms,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Latest stored document for a post id
    pub async fn load_latest(&self, post_id: &str) -> Result<Option<EnrichedRecord>> {
        let row = sqlx::query("SELECT * FROM latest_posts WHERE post_id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// Every analytical row for a post id, oldest first
    pub async fn load_history(&self, post_id: &str) -> Result<Vec<EnrichedRecord>> {
        let rows = sqlx::query("SELECT * FROM posts WHERE post_id = ? ORDER BY id")
            .bind(post_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    /// Prediction accuracy and label distribution over the analytical store
    pub async fn accuracy_stats(&self) -> Result<AccuracyStats> {
        let (total, with_ground_truth, matches, positive, negative): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(prediction_match),
                COALESCE(SUM(CASE WHEN prediction_match = 1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN sentiment_label = 'positive' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN sentiment_label = 'negative' THEN 1 ELSE 0 END), 0)
            FROM posts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let accuracy = if with_ground_truth > 0 {
            Some(matches as f64 / with_ground_truth as f64)
        } else {
            None
        };

        Ok(AccuracyStats {
            total,
            with_ground_truth,
            matches,
            accuracy,
            positive,
            negative,
        })
    }
}

#[async_trait]
impl AnalyticalSink for SqliteSinks {
    async fn append(&self, record: &EnrichedRecord) -> Result<()> {
        let pool = &self.pool;
        retry_on_lock("posts.append", self.max_lock_wait_ms, || async move {
            bind_record(sqlx::query(INSERT_POST_SQL), record)
                .execute(pool)
                .await
                .map_err(Error::Database)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl LatestStateSink for SqliteSinks {
    async fn upsert(&self, record: &EnrichedRecord) -> Result<()> {
        let updated_at = sentiflow_common::time::now_iso8601();
        let updated_at = updated_at.as_str();
        let pool = &self.pool;

        retry_on_lock("latest_posts.upsert", self.max_lock_wait_ms, || async move {
            bind_record(sqlx::query(UPSERT_LATEST_SQL), record)
                .bind(updated_at)
                .execute(pool)
                .await
                .map_err(Error::Database)?;
            Ok(())
        })
        .await
    }
}
