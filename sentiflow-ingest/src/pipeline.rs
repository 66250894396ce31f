//! Ingestion pipeline
//!
//! Fetches a dataset object, decodes it, and walks its lines in dataset
//! order, chunked into batches. Batches only set iteration granularity:
//! there is no parallel dispatch, no per-batch commit and no fail-fast.
//! Every line ends up processed, skipped or counted as an error.

use rand::Rng;
use sentiflow_common::outcome::ItemOutcome;
use sentiflow_common::transport::PostPublisher;
use sentiflow_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::decode::decode_content;
use crate::normalizer::normalize_line;
use crate::storage::ObjectStore;

/// Object path used when a request names none
pub const DEFAULT_OBJECT: &str = "raw/sample_20k.csv";

/// Lines per iteration chunk when a request names none
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Fully resolved ingestion parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub bucket: String,
    pub object: String,
    pub batch_size: usize,
    pub simulate_time: bool,
}

impl IngestOptions {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object: DEFAULT_OBJECT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            simulate_time: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidInput("batch_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Result envelope of one ingestion run
///
/// `status` is always `"success"`, even when every row failed; callers must
/// inspect the counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub status: String,
    pub processed: usize,
    pub errors: usize,
    /// Blank, unparseable or wrong-width lines (neither processed nor errors)
    pub skipped: usize,
    pub message: String,
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split content into lines on every line boundary
///
/// `\r\n`, bare `\r`, `\n` and the other Unicode line separators all end a
/// line. A trailing separator does not produce an empty last line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = content.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&content[start..index]);
        start = index + c.len_utf8();
        if c == '\r' {
            if let Some(&(next_index, '\n')) = chars.peek() {
                chars.next();
                start = next_index + 1;
            }
        }
    }

    if start < content.len() {
        lines.push(&content[start..]);
    }
    lines
}

/// Normalize and publish every line of already-decoded content
pub async fn ingest_content<R>(
    content: &str,
    source_name: &str,
    options: &IngestOptions,
    publisher: &dyn PostPublisher,
    rng: &mut R,
) -> IngestSummary
where
    R: Rng + Send + ?Sized,
{
    let lines = split_lines(content);
    let batch_size = options.batch_size.max(1);

    let mut processed = 0usize;
    let mut errors = 0usize;
    let mut skipped = 0usize;

    for (batch_index, batch) in lines.chunks(batch_size).enumerate() {
        debug!(batch = batch_index, lines = batch.len(), "Processing batch");

        for line in batch {
            match normalize_line(line, options.simulate_time, rng) {
                ItemOutcome::Succeeded(post) => match publisher.publish(&post).await {
                    Ok(message_id) => {
                        processed += 1;
                        debug!(post_id = %post.id, message_id = %message_id, "Published post");
                    }
                    Err(e) => {
                        errors += 1;
                        warn!(post_id = %post.id, error = %e, "Error publishing row");
                    }
                },
                ItemOutcome::Failed(reason) => {
                    errors += 1;
                    warn!(error = %reason, "Error processing row");
                }
                ItemOutcome::Skipped(reason) => {
                    skipped += 1;
                    debug!(reason = %reason, "Skipped row");
                }
            }
        }
    }

    info!(
        source = source_name,
        processed, errors, skipped, "Ingestion finished"
    );

    IngestSummary {
        status: "success".to_string(),
        processed,
        errors,
        skipped,
        message: format!("Processed {} tweets from {}", processed, source_name),
    }
}

/// Fetch, decode and ingest one dataset object
///
/// Only fetch failures and invalid options are returned as errors; per-row
/// problems are counted in the summary.
pub async fn run_ingest<R>(
    store: &dyn ObjectStore,
    publisher: &dyn PostPublisher,
    options: &IngestOptions,
    rng: &mut R,
) -> Result<IngestSummary>
where
    R: Rng + Send + ?Sized,
{
    options.validate()?;

    info!(
        bucket = %options.bucket,
        object = %options.object,
        batch_size = options.batch_size,
        simulate_time = options.simulate_time,
        "Starting ingestion"
    );

    let bytes = store.fetch(&options.bucket, &options.object).await?;
    let decoded = decode_content(bytes, &options.object);
    debug!(
        encoding = %decoded.encoding,
        chars = decoded.text.chars().count(),
        "Dataset decoded"
    );

    Ok(ingest_content(&decoded.text, &options.object, options, publisher, rng).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_on_every_boundary() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            split_lines("a\u{0b}b\u{0c}c\u{1c}d\u{1d}e\u{1e}f\u{85}g\u{2028}h\u{2029}i"),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
    }

    #[test]
    fn test_split_lines_keeps_blank_lines_but_no_trailing_empty() {
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\r\r\n"), vec!["a", ""]);
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![""]);
    }
}
