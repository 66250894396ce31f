//! Read endpoints over the stored records

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use sentiflow_common::EnrichedRecord;

use crate::sinks::AccuracyStats;
use crate::{ApiError, ApiResult, AppState};

/// GET /posts/:post_id
///
/// Latest-state document for the post.
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<EnrichedRecord>> {
    let record = state
        .store
        .load_latest(&post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post not found: {}", post_id)))?;

    Ok(Json(record))
}

/// GET /stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<AccuracyStats>> {
    Ok(Json(state.store.accuracy_stats().await?))
}

/// Build post read routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/:post_id", get(get_post))
        .route("/stats", get(get_stats))
}
