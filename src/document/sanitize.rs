//! Text sanitization applied to every loaded document, regardless of source.
//!
//! Raw extraction output can carry non-printable artifacts that corrupt LLM
//! prompts, so everything outside tab/LF/CR/printable-ASCII is stripped
//! before the text reaches a prompt.

/// Maximum characters of document text forwarded to verification.
/// Bounds prompt size and cost deterministically regardless of document size.
pub const MAX_DOCUMENT_CHARS: usize = 10_000;

/// Strip all characters outside tab (0x09), LF (0x0A), CR (0x0D), and the
/// printable-ASCII range (0x20–0x7E).
pub fn sanitize_document_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r' | '\x20'..='\x7E'))
        .collect()
}

/// Truncate to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Full post-processing pass: sanitize, trim, truncate.
pub fn bound_document_text(raw: &str) -> String {
    let sanitized = sanitize_document_text(raw);
    truncate_chars(sanitized.trim(), MAX_DOCUMENT_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes_and_control_chars() {
        let raw = "Name: Jane\x00Doe\x01\x02\nEmail: jane@example.com";
        let clean = sanitize_document_text(raw);
        assert!(!clean.contains('\x00'));
        assert!(!clean.contains('\x01'));
        assert!(clean.contains("JaneDoe"));
        assert!(clean.contains("jane@example.com"));
    }

    #[test]
    fn keeps_tab_newline_carriage_return() {
        let raw = "a\tb\nc\rd";
        assert_eq!(sanitize_document_text(raw), "a\tb\nc\rd");
    }

    #[test]
    fn strips_non_ascii() {
        let raw = "Résumé — senior engineer";
        let clean = sanitize_document_text(raw);
        assert_eq!(clean, "Rsum  senior engineer");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(sanitize_document_text(""), "");
        assert_eq!(sanitize_document_text("\x00\x01\x02"), "");
    }

    #[test]
    fn truncate_respects_limit() {
        let text = "abcdef";
        assert_eq!(truncate_chars(text, 3), "abc");
        assert_eq!(truncate_chars(text, 6), "abcdef");
        assert_eq!(truncate_chars(text, 100), "abcdef");
    }

    #[test]
    fn bounded_text_never_exceeds_max() {
        let raw = "x".repeat(MAX_DOCUMENT_CHARS + 500);
        let bounded = bound_document_text(&raw);
        assert_eq!(bounded.chars().count(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn bounded_text_is_trimmed() {
        let bounded = bound_document_text("   padded content \x07  ");
        assert_eq!(bounded, "padded content");
    }
}
