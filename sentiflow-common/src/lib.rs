//! # Sentiflow Common Library
//!
//! Shared code for both Sentiflow services including:
//! - Canonical Post and Enriched Record models
//! - Per-item processing outcomes
//! - Transport envelopes and the publisher abstraction
//! - Configuration loading
//! - Source date parsing and timestamp simulation

pub mod config;
pub mod error;
pub mod models;
pub mod outcome;
pub mod time;
pub mod transport;

pub use error::{Error, Result};
pub use models::{CanonicalPost, EnrichedRecord, SentimentLabel};
pub use outcome::{ItemOutcome, SkipReason};
