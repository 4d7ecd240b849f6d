//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Strip a surrounding markdown code fence (```lang ... ```), if any.
pub fn strip_code_fence(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Slice from the first `open` to the last `close` delimiter, inclusive.
///
/// Models often wrap JSON in prose; this recovers the outermost object or
/// array without parsing.
pub fn extract_delimited(s: &str, open: char, close: char) -> Option<&str> {
    let start = s.find(open)?;
    let end = s.rfind(close)?;
    (end > start).then(|| &s[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_delimited() {
        assert_eq!(
            extract_delimited("Sure: {\"a\": {\"b\": 1}} done", '{', '}'),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(extract_delimited("[1, 2]", '[', ']'), Some("[1, 2]"));
        assert_eq!(extract_delimited("} nothing {", '{', '}'), None);
        assert_eq!(extract_delimited("plain", '{', '}'), None);
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // each character is 3 bytes
        assert_eq!(truncate("あいうえお", 30), "あいうえお");
        assert_eq!(truncate("あいうえお", 10), "あい...");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\nSELECT ?s\n```"), "SELECT ?s");
        assert_eq!(strip_code_fence("  plain  "), "plain");
    }
}
