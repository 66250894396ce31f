//! sentiflow-enrich library interface
//!
//! Scores each received post for sentiment, extracts text features, checks
//! the prediction against the dataset's ground truth and stores the result.

pub mod accuracy;
pub mod api;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod scorer;
pub mod sinks;
pub mod text;
pub mod worker;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::EnrichmentPipeline;
use crate::sinks::SqliteSinks;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Enrichment pipeline with its injected scorer and sinks
    pub pipeline: Arc<EnrichmentPipeline>,
    /// Read access to the stored records
    pub store: SqliteSinks,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(pipeline: Arc<EnrichmentPipeline>, store: SqliteSinks) -> Self {
        Self {
            pipeline,
            store,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::push_routes())
        .merge(api::post_routes())
        .merge(api::health_routes())
        .with_state(state)
}
