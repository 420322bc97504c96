//! Inline span rendering for a single line or table cell.
//!
//! Processing order is fixed: inline code spans are split out first and
//! kept atomic, links and images are matched inside the remaining
//! segments, and leftover plain text is escaped and then run through the
//! emphasis substitutions. Escaping happens exactly once per piece of
//! literal text, always before emphasis tags are inserted.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;
use crate::resolve::resolve_url;

/// Inline code span with a non-empty interior. A lone backtick is text.
static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());

/// `![label](url)` image or `[label](url)` link. Labels cannot contain
/// `]` and urls cannot contain `)`, so nested delimiters end the match.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]]*)\]\(([^)]*)\)").unwrap());

static BOLD_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());
static ITALIC_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static ITALIC_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_(.+?)_").unwrap());

/// Render one line (or table cell) of report markdown to inline HTML.
///
/// Code span interiors are escaped but never scanned for links or
/// emphasis. Unmatched markers fall through as literal text, so this
/// cannot fail on any input.
pub(crate) fn render_inline(text: &str, base_url: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last_end = 0;

    for span in CODE_SPAN_RE.find_iter(text) {
        render_segment(&text[last_end..span.start()], base_url, &mut out);
        // Interior without the backtick delimiters
        let interior = &text[span.start() + 1..span.end() - 1];
        out.push_str("<code>");
        out.push_str(&escape_html(interior));
        out.push_str("</code>");
        last_end = span.end();
    }
    render_segment(&text[last_end..], base_url, &mut out);

    out
}

/// Render a non-code segment: links and images, then emphasized text.
fn render_segment(segment: &str, base_url: &str, out: &mut String) {
    let mut last_end = 0;

    for caps in LINK_RE.captures_iter(segment) {
        let whole = caps.get(0).unwrap();
        out.push_str(&emphasize(&escape_html(&segment[last_end..whole.start()])));

        let label = escape_html(&caps[2]);
        let target = escape_html(&resolve_url(&caps[3], base_url));
        if caps[1].is_empty() {
            write!(out, r#"<a target="_blank" rel="noopener" href="{target}">{label}</a>"#)
                .unwrap();
        } else {
            write!(out, r#"<img src="{target}" alt="{label}">"#).unwrap();
        }
        last_end = whole.end();
    }
    out.push_str(&emphasize(&escape_html(&segment[last_end..])));
}

/// Apply the four emphasis substitutions to already-escaped text.
///
/// Order is fixed: bold-star, bold-underscore, italic-star,
/// italic-underscore. Each pass is a single non-greedy global
/// substitution; marker styles never pair across each other.
fn emphasize(escaped: &str) -> String {
    let pass = BOLD_STAR_RE.replace_all(escaped, "<strong>$1</strong>");
    let pass = BOLD_UNDERSCORE_RE.replace_all(&pass, "<strong>$1</strong>");
    let pass = ITALIC_STAR_RE.replace_all(&pass, "<em>$1</em>");
    ITALIC_UNDERSCORE_RE.replace_all(&pass, "<em>$1</em>").into_owned()
}
