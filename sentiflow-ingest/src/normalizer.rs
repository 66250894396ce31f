//! Record normalization
//!
//! Maps one dataset line `label,id,date,flag,user,text` onto a Canonical Post.
//! Blank, unparseable and wrong-width rows are skipped silently; a row whose
//! label code is not an integer fails and is counted by the caller.

use rand::Rng;
use sentiflow_common::models::{CanonicalPost, PLATFORM_TWITTER};
use sentiflow_common::outcome::{ItemOutcome, SkipReason};
use sentiflow_common::time::{parse_source_date, simulate_recent_iso8601};
use sha2::{Digest, Sha256};
use std::num::IntErrorKind;

/// Number of positional fields in a dataset row
pub const ROW_FIELD_COUNT: usize = 6;

/// Size of the pseudonym space (`user_0` .. `user_99999`)
pub const PSEUDONYM_SPACE: u64 = 100_000;

pub const MAX_LIKES: u32 = 1000;
pub const MAX_SHARES: u32 = 500;
pub const MAX_COMMENTS: u32 = 200;

/// One parsed dataset row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub label_code: String,
    pub id: String,
    pub date: String,
    /// Query flag; carried but unused
    pub flag: String,
    pub author_handle: String,
    pub text: String,
}

/// Map a ground-truth code onto a sentiment value
///
/// 0 → -1.0, 2 → 0.0, 4 → 1.0; anything else → 0.0.
pub fn ground_truth_sentiment(code: i64) -> f64 {
    match code {
        0 => -1.0,
        2 => 0.0,
        4 => 1.0,
        _ => 0.0,
    }
}

/// Deterministic pseudonym for an author handle
///
/// Stable across processes, but not a security control: the space is small
/// and distinct handles can collide.
pub fn pseudonymize_author(handle: &str) -> String {
    let digest = Sha256::digest(handle.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    format!("user_{}", u64::from_be_bytes(prefix) % PSEUDONYM_SPACE)
}

/// Split one line into a row, or say why it was skipped
pub fn parse_row(line: &str) -> Result<RawRow, SkipReason> {
    if line.trim().is_empty() {
        return Err(SkipReason::BlankLine);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => {}
        Ok(false) | Err(_) => return Err(SkipReason::Unparseable),
    }

    if record.len() != ROW_FIELD_COUNT {
        return Err(SkipReason::FieldCount(record.len()));
    }

    Ok(RawRow {
        label_code: record[0].to_string(),
        id: record[1].to_string(),
        date: record[2].to_string(),
        flag: record[3].to_string(),
        author_handle: record[4].to_string(),
        text: record[5].to_string(),
    })
}

/// Build a Canonical Post from a parsed row
///
/// Engagement counts are drawn from `rng`, followed by the simulated
/// timestamp when `simulate_time` is set.
pub fn normalize_row<R: Rng + ?Sized>(
    row: RawRow,
    simulate_time: bool,
    rng: &mut R,
) -> ItemOutcome<CanonicalPost> {
    let original_sentiment = match row.label_code.trim().parse::<i64>() {
        Ok(code) => ground_truth_sentiment(code),
        // Integers too wide for i64 are still integers, just not a known code
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => 0.0,
        Err(e) => {
            return ItemOutcome::Failed(format!(
                "invalid label code {:?}: {}",
                row.label_code, e
            ))
        }
    };

    let likes = rng.gen_range(0..=MAX_LIKES);
    let shares = rng.gen_range(0..=MAX_SHARES);
    let comments = rng.gen_range(0..=MAX_COMMENTS);

    let timestamp = if simulate_time {
        simulate_recent_iso8601(rng)
    } else {
        parse_source_date(&row.date)
    };

    ItemOutcome::Succeeded(CanonicalPost {
        id: format!("tweet_{}", row.id),
        text: row.text,
        author: pseudonymize_author(&row.author_handle),
        platform: PLATFORM_TWITTER.to_string(),
        timestamp,
        original_sentiment: Some(original_sentiment),
        likes,
        shares,
        comments,
    })
}

/// Normalize one dataset line
pub fn normalize_line<R: Rng + ?Sized>(
    line: &str,
    simulate_time: bool,
    rng: &mut R,
) -> ItemOutcome<CanonicalPost> {
    match parse_row(line) {
        Ok(row) => normalize_row(row, simulate_time, rng),
        Err(reason) => ItemOutcome::Skipped(reason),
    }
}
