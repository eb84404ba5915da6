// Sanitization utilities

/// Sanitize HTML content using ammonia, dropping scripts and unsafe attributes
pub fn sanitize_html(text: &str) -> String {
    ammonia::clean(text)
}

/// Sanitize plain text content (escape HTML entities)
/// Use this for text that should not contain any HTML
pub fn sanitize_text(text: &str) -> String {
    text.trim()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2F;")
}

/// Truncate text to at most `max_chars` characters, ellipsis included
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_html() {
        // ammonia should remove script tags entirely
        assert!(!sanitize_html("<script>alert('xss')</script>").contains("script"));

        // ammonia should allow safe HTML
        let sanitized = sanitize_html("<p>Hello <strong>world</strong><br></p>");
        assert!(sanitized.contains("<p>"));
        assert!(sanitized.contains("<strong>"));
        assert!(sanitized.contains("<br>"));
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(
            sanitize_text("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(
            sanitize_text("  A & B < C > D \"quoted\"  "),
            "A &amp; B &lt; C &gt; D &quot;quoted&quot;"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        // Multi-byte characters are never split
        assert_eq!(truncate("éééééééééé", 6), "ééé...");
    }
}
