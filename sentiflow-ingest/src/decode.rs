//! Dataset content decoding
//!
//! Strict UTF-8 is tried first. On failure the content is decoded as
//! Latin-1 (ISO-8859-1), which maps every byte to a character and so never
//! fails; the fallback is logged.

use std::fmt;

const UTF8_BOM: &str = "\u{feff}";

/// Encoding that produced the decoded text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("UTF-8"),
            TextEncoding::Latin1 => f.write_str("Latin-1"),
        }
    }
}

/// Decoded dataset content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContent {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decode raw object bytes, falling back to Latin-1 when they are not valid UTF-8
pub fn decode_content(bytes: Vec<u8>, source_name: &str) -> DecodedContent {
    match String::from_utf8(bytes) {
        Ok(text) => {
            let text = match text.strip_prefix(UTF8_BOM) {
                Some(stripped) => stripped.to_string(),
                None => text,
            };
            DecodedContent {
                text,
                encoding: TextEncoding::Utf8,
            }
        }
        Err(e) => {
            tracing::warn!(
                source = source_name,
                valid_up_to = e.utf8_error().valid_up_to(),
                "UTF-8 decoding failed, falling back to Latin-1"
            );
            DecodedContent {
                text: decode_latin1(e.as_bytes()),
                encoding: TextEncoding::Latin1,
            }
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_kept() {
        let decoded = decode_content("caf\u{e9} ok".as_bytes().to_vec(), "a.csv");
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "caf\u{e9} ok");
    }

    #[test]
    fn test_bom_stripped() {
        let mut bytes = UTF8_BOM.as_bytes().to_vec();
        bytes.extend_from_slice(b"0,1");
        assert_eq!(decode_content(bytes, "a.csv").text, "0,1");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        // 0xE9 alone is not valid UTF-8; in Latin-1 it is 'é'
        let decoded = decode_content(b"caf\xe9 \xff".to_vec(), "a.csv");
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text, "caf\u{e9} \u{ff}");
    }
}
