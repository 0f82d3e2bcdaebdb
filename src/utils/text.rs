//! Text cleanup for fetched page bodies

use std::borrow::Cow;

/// Remove CR/LF so multi-line payloads become one scannable string.
///
/// Every extraction pattern assumes a single line; obfuscated script
/// fragments in particular are wrapped at arbitrary points.
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|&c| c != '\r' && c != '\n').collect()
}

/// Decode raw bytes as UTF-8, dropping invalid or incomplete sequences.
///
/// Mirror pages occasionally truncate multi-byte sequences mid-stream;
/// rejecting the whole payload would lose the parts the extraction
/// patterns need, and replacement characters would corrupt them.
pub fn sanitize_utf8(input: &[u8]) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                output.push_str(valid);
                break;
            }
            Err(error) => {
                let (valid, after_valid) = rest.split_at(error.valid_up_to());
                if let Ok(prefix) = std::str::from_utf8(valid) {
                    output.push_str(prefix);
                }
                match error.error_len() {
                    Some(invalid_len) => rest = &after_valid[invalid_len..],
                    // Incomplete trailing sequence, drop it
                    None => break,
                }
            }
        }
    }

    output
}

/// Decode HTML numeric and named entities in an extracted fragment.
pub fn decode_entities(text: &str) -> String {
    match html_escape::decode_html_entities(text) {
        Cow::Borrowed(borrowed) => borrowed.to_string(),
        Cow::Owned(owned) => owned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_breaks() {
        assert_eq!(strip_line_breaks("a\r\nb\rc\nd"), "abcd");
        assert_eq!(strip_line_breaks("plain"), "plain");
    }

    #[test]
    fn test_sanitize_utf8_passes_valid_text() {
        assert_eq!(sanitize_utf8("caf\u{e9} \u{1F600}".as_bytes()), "café 😀");
    }

    #[test]
    fn test_sanitize_utf8_drops_invalid_bytes() {
        let mut bytes = b"ab".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"cd");
        assert_eq!(sanitize_utf8(&bytes), "abcd");
    }

    #[test]
    fn test_sanitize_utf8_drops_incomplete_trailing_sequence() {
        // 0xE2 0x82 starts a three-byte sequence that never completes
        let bytes = [b'o', b'k', 0xE2, 0x82];
        assert_eq!(sanitize_utf8(&bytes), "ok");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("Fullmetal &amp; Alchemist &middot; 720p"),
            "Fullmetal & Alchemist · 720p"
        );
        assert_eq!(decode_entities("&#65;BC"), "ABC");
        assert_eq!(decode_entities("plain"), "plain");
    }
}
