//! Post models shared by the ingestion and enrichment services
//!
//! A [`CanonicalPost`] is produced once per dataset row and travels over the
//! transport as JSON. The enrichment side turns each received post into an
//! [`EnrichedRecord`] which is written to the analytical and latest-state
//! stores and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform tag carried by every post produced from the dataset
pub const PLATFORM_TWITTER: &str = "twitter";

/// Normalized representation of one dataset row, ready for transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPost {
    /// Post identity (`tweet_<dataset id>`)
    pub id: String,
    /// Free text; absent or `null` on the wire deserializes to empty and is skipped downstream
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    /// Pseudonymous author (`user_<n>`)
    pub author: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    /// ISO-8601 timestamp (parsed or simulated)
    pub timestamp: String,
    /// Ground truth mapped onto {-1.0, 0.0, 1.0}; `None` when the producer had no label
    #[serde(default)]
    pub original_sentiment: Option<f64>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub shares: u32,
    #[serde(default)]
    pub comments: u32,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_platform() -> String {
    PLATFORM_TWITTER.to_string()
}

impl CanonicalPost {
    /// Sum of the three engagement counts
    pub fn engagement_total(&self) -> i64 {
        i64::from(self.likes) + i64::from(self.shares) + i64::from(self.comments)
    }
}

/// Binary sentiment label (no neutral bucket)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            other => Err(crate::Error::Decode(format!(
                "Unknown sentiment label: {}",
                other
            ))),
        }
    }
}

/// Canonical Post plus sentiment scores and text features, ready for storage
///
/// Invariants: `sentiment_magnitude == sentiment_score.abs()` and
/// `engagement_total == likes + shares + comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub post_id: String,
    /// Received text truncated to 500 characters
    pub text: String,
    pub author: String,
    pub platform: String,
    pub timestamp: String,
    /// When the enrichment ran (ISO-8601)
    pub collected_at: String,

    /// Compound score in [-1, 1]
    pub sentiment_score: f64,
    pub sentiment_magnitude: f64,
    pub sentiment_positive: f64,
    pub sentiment_negative: f64,
    pub sentiment_neutral: f64,
    pub sentiment_label: SentimentLabel,

    pub original_sentiment: Option<f64>,
    /// Present only when `original_sentiment` is present
    pub prediction_match: Option<bool>,

    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
    pub engagement_total: i64,

    /// Features of the cleaned, untruncated text
    pub word_count: i64,
    pub char_count: i64,
    pub has_hashtags: bool,
    pub has_mentions: bool,
    pub has_url: bool,
}
