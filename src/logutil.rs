//! Helpers that keep client-supplied text on a single log line.

use std::fmt::Write;

/// Longest preview of client text written to the log.
pub const LOG_PREVIEW_CHARS: usize = 120;

/// Escape client text for logging with the default preview length.
pub fn escape_log(s: &str) -> String {
    escape_log_limited(s, LOG_PREVIEW_CHARS)
}

/// Escape line breaks, tabs, quotes and other control characters, cutting
/// the result after `limit` source characters with a trailing ellipsis.
pub fn escape_log_limited(s: &str, limit: usize) -> String {
    let mut out = String::with_capacity(s.len().min(limit) + 4);
    for (n, ch) in s.chars().enumerate() {
        if n == limit {
            out.push('…');
            break;
        }
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:04x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("go\nnorth\t'x'"), "go\\nnorth\\t\\'x\\'");
        assert_eq!(escape_log("a\u{7}b"), "a\\u{0007}b");
    }

    #[test]
    fn truncates_long_input() {
        let long = "x".repeat(LOG_PREVIEW_CHARS + 10);
        let escaped = escape_log(&long);
        assert_eq!(escaped.chars().count(), LOG_PREVIEW_CHARS + 1);
        assert!(escaped.ends_with('…'));
        assert_eq!(escape_log_limited("abc", 3), "abc");
    }
}
