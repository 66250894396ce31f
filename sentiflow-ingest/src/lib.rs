//! sentiflow-ingest library interface
//!
//! Reads a labeled sentiment dataset from object storage, normalizes every
//! row into a Canonical Post and publishes it to the transport.

pub mod api;
pub mod decode;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod publisher;
pub mod storage;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sentiflow_common::transport::PostPublisher;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::ObjectStore;

/// Application state shared across handlers
///
/// Clients are created once at process start and injected here; handlers
/// never reach for global clients.
#[derive(Clone)]
pub struct AppState {
    /// Dataset source
    pub store: Arc<dyn ObjectStore>,
    /// Transport sink for canonical posts
    pub publisher: Arc<dyn PostPublisher>,
    /// Bucket used when a request names none
    pub default_bucket: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        publisher: Arc<dyn PostPublisher>,
        default_bucket: impl Into<String>,
    ) -> Self {
        Self {
            store,
            publisher,
            default_bucket: default_bucket.into(),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::preprocess_routes())
        .merge(api::health_routes())
        .with_state(state)
}
