//! Text cleaning and feature extraction

/// Maximum number of characters of post text kept in storage
pub const STORED_TEXT_MAX_CHARS: usize = 500;

/// Remove every whitespace-delimited token starting with `http`, then trim
///
/// Remaining tokens are re-joined with single spaces. No lowercasing or
/// punctuation stripping.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !token.starts_with("http"))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Keep at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Features computed from cleaned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFeatures {
    pub word_count: i64,
    pub char_count: i64,
    pub has_hashtags: bool,
    pub has_mentions: bool,
    /// Case-insensitive `http` anywhere in the text
    pub has_url: bool,
}

impl TextFeatures {
    pub fn extract(cleaned: &str) -> Self {
        Self {
            word_count: cleaned.split_whitespace().count() as i64,
            char_count: cleaned.chars().count() as i64,
            has_hashtags: cleaned.contains('#'),
            has_mentions: cleaned.contains('@'),
            has_url: cleaned.to_lowercase().contains("http"),
        }
    }
}
