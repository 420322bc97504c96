//! HTML entity escaping.

/// Escape HTML special characters.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their entity forms, each
/// character exactly once, left to right. Escaping is total: every input
/// produces output, there is no failure mode.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
