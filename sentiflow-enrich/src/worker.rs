//! In-process transport consumer
//!
//! Drains a [`ChannelPublisher`](sentiflow_common::transport::ChannelPublisher)
//! receiver one message at a time and runs each post through the pipeline.
//! There is no redelivery on this path: failures are logged and counted.

use sentiflow_common::transport::TransportMessage;
use sentiflow_common::ItemOutcome;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::pipeline::EnrichmentPipeline;

/// Per-outcome counts of a finished worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub succeeded: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Consume messages until every sender is dropped
pub async fn run_channel_worker(
    mut receiver: mpsc::Receiver<TransportMessage>,
    pipeline: Arc<EnrichmentPipeline>,
) -> WorkerStats {
    info!("Channel worker started");
    let mut stats = WorkerStats::default();

    while let Some(message) = receiver.recv().await {
        let post = match message.decode_post() {
            Ok(post) => post,
            Err(e) => {
                warn!(message_id = %message.message_id, error = %e, "Undecodable message");
                stats.failed += 1;
                continue;
            }
        };

        match pipeline.process(&post).await {
            ItemOutcome::Succeeded(_) => stats.succeeded += 1,
            ItemOutcome::Skipped(_) => stats.skipped += 1,
            ItemOutcome::Failed(reason) => {
                warn!(message_id = %message.message_id, post_id = %post.id, %reason, "Enrichment failed");
                stats.failed += 1;
            }
        }
    }

    info!(
        succeeded = stats.succeeded,
        skipped = stats.skipped,
        failed = stats.failed,
        "Channel worker stopped"
    );
    stats
}

/// Spawn [`run_channel_worker`] on the current runtime
pub fn spawn_channel_worker(
    receiver: mpsc::Receiver<TransportMessage>,
    pipeline: Arc<EnrichmentPipeline>,
) -> JoinHandle<WorkerStats> {
    tokio::spawn(run_channel_worker(receiver, pipeline))
}
