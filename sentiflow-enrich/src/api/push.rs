//! Push delivery endpoint
//!
//! The push transport POSTs one envelope per message and redelivers on any
//! non-2xx response, so enrichment failures answer 500 while skips and
//! successes answer 200.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use sentiflow_common::transport::PushEnvelope;
use sentiflow_common::ItemOutcome;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{ApiError, ApiResult, AppState};

/// Per-message status
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushResponse {
    /// "success" or "skipped"
    pub status: String,
    pub post_id: String,
}

/// POST /push
pub async fn receive_push(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<PushResponse>> {
    let envelope: PushEnvelope = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected malformed push envelope");
        ApiError::BadRequest(format!("Invalid push envelope: {}", e))
    })?;

    let post = envelope.decode_post().map_err(|e| {
        warn!(message_id = %envelope.message.message_id, error = %e, "Rejected undecodable push payload");
        ApiError::from(e)
    })?;

    match state.pipeline.process(&post).await {
        ItemOutcome::Succeeded(record) => Ok(Json(PushResponse {
            status: "success".to_string(),
            post_id: record.post_id,
        })),
        ItemOutcome::Skipped(_) => Ok(Json(PushResponse {
            status: "skipped".to_string(),
            post_id: post.id,
        })),
        ItemOutcome::Failed(reason) => {
            error!(post_id = %post.id, %reason, "Enrichment failed");
            let message = format!("Enrichment of {} failed: {}", post.id, reason);
            *state.last_error.write().await = Some(message.clone());
            Err(ApiError::Internal(message))
        }
    }
}

/// Build push routes
pub fn push_routes() -> Router<AppState> {
    Router::new().route("/push", post(receive_push))
}
