//! Message text normalization.
//!
//! Outgoing text is stored as typed, trimmed UTF-8. The only parsing done
//! here is [`unwrap_legacy_text`], which recovers the message body from
//! records written by old clients that persisted a stringified tagged value
//! (`text("hello")`) instead of the body itself.

/// Normalize outgoing message text: trim whitespace, reject empty.
pub fn normalize_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Recover the message body from a fetched record.
///
/// Old clients stored the display form of a tagged payload, `text("hello")`,
/// rather than the body. Only that exact wrapper is unwrapped; anything else,
/// including user text that happens to contain parentheses or quotes, is
/// returned unchanged.
pub fn unwrap_legacy_text(stored: &str) -> &str {
    let inner = match stored
        .strip_prefix("text(")
        .and_then(|s| s.strip_suffix(')'))
    {
        Some(inner) => inner,
        None => return stored,
    };
    // The wrapper quoted string payloads; unquote when both ends match.
    inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_message("  hello  "), Some("hello".to_string()));
        assert_eq!(normalize_message("hi"), Some("hi".to_string()));
    }

    #[test]
    fn normalize_rejects_empty() {
        assert_eq!(normalize_message(""), None);
        assert_eq!(normalize_message("   "), None);
        assert_eq!(normalize_message("\n\t"), None);
    }

    #[test]
    fn legacy_wrapper_is_unwrapped() {
        assert_eq!(unwrap_legacy_text("text(\"hello\")"), "hello");
        assert_eq!(unwrap_legacy_text("text(hello)"), "hello");
    }

    #[test]
    fn wrapper_with_inner_parentheses_survives() {
        assert_eq!(unwrap_legacy_text("text(\"a (b) c\")"), "a (b) c");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(unwrap_legacy_text("hello"), "hello");
        assert_eq!(unwrap_legacy_text("meet at the park (north gate)"),
            "meet at the park (north gate)");
        assert_eq!(unwrap_legacy_text("(hi)"), "(hi)");
        assert_eq!(unwrap_legacy_text("\"quoted\""), "\"quoted\"");
    }

    #[test]
    fn half_wrapper_is_untouched() {
        assert_eq!(unwrap_legacy_text("text(\"unterminated"), "text(\"unterminated");
        assert_eq!(unwrap_legacy_text("text"), "text");
    }

    #[test]
    fn mismatched_quotes_keep_inner_verbatim() {
        assert_eq!(unwrap_legacy_text("text(\"odd)"), "\"odd");
    }
}
