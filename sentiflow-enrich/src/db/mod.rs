//! Database access for sentiflow-enrich
//!
//! One SQLite database holds both stores: `posts` (analytical, append-only)
//! and `latest_posts` (latest state per post id).

pub mod retry;

pub use retry::retry_on_lock;

use sentiflow_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the parent directory and the database file if needed.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with tables created
///
/// One connection only: every SQLite in-memory connection is its own database.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create the analytical and latest-state tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id TEXT NOT NULL,
            text TEXT NOT NULL,
            author TEXT NOT NULL,
            platform TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            collected_at TEXT NOT NULL,
            sentiment_score REAL NOT NULL,
            sentiment_magnitude REAL NOT NULL,
            sentiment_positive REAL NOT NULL,
            sentiment_negative REAL NOT NULL,
            sentiment_neutral REAL NOT NULL,
            sentiment_label TEXT NOT NULL,
            original_sentiment REAL,
            prediction_match INTEGER,
            likes INTEGER NOT NULL,
            shares INTEGER NOT NULL,
            comments INTEGER NOT NULL,
            engagement_total INTEGER NOT NULL,
            word_count INTEGER NOT NULL,
            char_count INTEGER NOT NULL,
            has_hashtags INTEGER NOT NULL,
            has_mentions INTEGER NOT NULL,
            has_url INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_post_id ON posts (post_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS latest_posts (
            post_id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            author TEXT NOT NULL,
            platform TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            collected_at TEXT NOT NULL,
            sentiment_score REAL NOT NULL,
            sentiment_magnitude REAL NOT NULL,
            sentiment_positive REAL NOT NULL,
            sentiment_negative REAL NOT NULL,
            sentiment_neutral REAL NOT NULL,
            sentiment_label TEXT NOT NULL,
            original_sentiment REAL,
            prediction_match INTEGER,
            likes INTEGER NOT NULL,
            shares INTEGER NOT NULL,
            comments INTEGER NOT NULL,
            engagement_total INTEGER NOT NULL,
            word_count INTEGER NOT NULL,
            char_count INTEGER NOT NULL,
            has_hashtags INTEGER NOT NULL,
            has_mentions INTEGER NOT NULL,
            has_url INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (posts, latest_posts)");

    Ok(())
}
