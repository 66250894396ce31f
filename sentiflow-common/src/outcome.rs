//! Per-item processing outcome
//!
//! Every dataset line and every received message ends in exactly one of three
//! states. Skips are expected input noise and are never counted as errors;
//! failures are counted and processing moves on to the next item.

use std::fmt;

/// Why an item was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Line was empty or whitespace only
    BlankLine,
    /// Delimited-field parsing failed
    Unparseable,
    /// Row did not have exactly six fields
    FieldCount(usize),
    /// Post carried no text
    MissingText,
    /// Text shorter than the minimum length (carries the observed length)
    TextTooShort(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlankLine => write!(f, "blank line"),
            SkipReason::Unparseable => write!(f, "unparseable row"),
            SkipReason::FieldCount(n) => write!(f, "expected 6 fields, found {}", n),
            SkipReason::MissingText => write!(f, "missing text"),
            SkipReason::TextTooShort(n) => write!(f, "text too short ({} chars)", n),
        }
    }
}

/// Outcome of processing a single item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    Skipped(SkipReason),
    Failed(String),
    Succeeded(T),
}

impl<T> ItemOutcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ItemOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ItemOutcome::Failed(_))
    }

    /// Consume the outcome, returning the value if it succeeded
    pub fn succeeded(self) -> Option<T> {
        match self {
            ItemOutcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }
}
