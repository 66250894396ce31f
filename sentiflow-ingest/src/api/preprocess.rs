//! Dataset preprocessing endpoint
//!
//! POST /preprocess reads one dataset object and publishes a Canonical Post
//! per row. The body is optional: a missing or unparseable body means
//! "all defaults".

use axum::{extract::State, routing::post, Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::pipeline::{run_ingest, IngestOptions, IngestSummary, DEFAULT_BATCH_SIZE, DEFAULT_OBJECT};
use crate::AppState;

/// POST /preprocess request
#[derive(Debug, Default, Deserialize)]
pub struct PreprocessRequest {
    /// Bucket name (default: configured default bucket)
    pub bucket: Option<String>,
    /// Object path (default: raw/sample_20k.csv)
    pub file: Option<String>,
    /// Lines per iteration chunk (default: 100)
    pub batch_size: Option<usize>,
    /// Replace source dates with random recent timestamps (default: false)
    pub simulate_time: Option<bool>,
    /// Seed for engagement counts and simulated timestamps; random when absent
    pub seed: Option<u64>,
}

impl PreprocessRequest {
    fn into_options(self, default_bucket: &str) -> (IngestOptions, Option<u64>) {
        let options = IngestOptions {
            bucket: self.bucket.unwrap_or_else(|| default_bucket.to_string()),
            object: self.file.unwrap_or_else(|| DEFAULT_OBJECT.to_string()),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            simulate_time: self.simulate_time.unwrap_or(false),
        };
        (options, self.seed)
    }
}

/// POST /preprocess
pub async fn preprocess_dataset(
    State(state): State<AppState>,
    body: Option<Json<PreprocessRequest>>,
) -> ApiResult<Json<IngestSummary>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let (options, seed) = request.into_options(&state.default_bucket);

    if options.batch_size == 0 {
        return Err(ApiError::BadRequest("batch_size must be positive".to_string()));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match run_ingest(state.store.as_ref(), state.publisher.as_ref(), &options, &mut rng).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!(
                bucket = %options.bucket,
                object = %options.object,
                error = %e,
                "Preprocessing failed"
            );
            *state.last_error.write().await = Some(e.to_string());
            Err(ApiError::from(e))
        }
    }
}

/// Build preprocessing routes
pub fn preprocess_routes() -> Router<AppState> {
    Router::new().route("/preprocess", post(preprocess_dataset))
}
