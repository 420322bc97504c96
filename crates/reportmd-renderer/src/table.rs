//! Pipe table parsing.
//!
//! The block scanner recognizes a table by a pipe-bearing header line
//! followed by a separator line; this module consumes the whole region
//! and renders it. The separator grammar and the single-header-row model
//! match what the report generator emits, not full GFM tables.

use std::sync::LazyLock;

use regex::Regex;

use crate::inline::render_inline;

/// Separator line: optional outer pipes around colon-flanked dash runs,
/// such as `---`, `:---:`, or `|---|---|`. Matched over the whole
/// trimmed line; interior whitespace disqualifies it.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?:?-+:?(\|:?-+:?)*\|?$").unwrap());

/// A parsed table region.
pub(crate) struct ParsedTable {
    /// Rendered `<table>` fragment.
    pub html: String,
    /// Index of the first line not consumed by the table.
    pub next_index: usize,
}

/// Whether a trimmed line satisfies the separator grammar.
pub(crate) fn is_separator_row(trimmed: &str) -> bool {
    SEPARATOR_RE.is_match(trimmed)
}

/// Parse a table beginning at `start_index`.
///
/// `lines[start_index]` is the header row and `lines[start_index + 1]`
/// the separator, already validated by the caller and skipped here.
/// Body rows run until a blank line or a line without a pipe; the stop
/// line is left unconsumed. Column counts are not validated, because
/// generated reports routinely emit separators narrower than their
/// headers.
pub(crate) fn parse_table(lines: &[&str], start_index: usize, base_url: &str) -> ParsedTable {
    let mut html = String::from("<table><thead><tr>");
    for cell in split_row(lines[start_index]) {
        html.push_str("<th>");
        html.push_str(&render_inline(cell, base_url));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    let mut next_index = start_index + 2;
    while next_index < lines.len() {
        let trimmed = lines[next_index].trim();
        if trimmed.is_empty() || !trimmed.contains('|') {
            break;
        }
        html.push_str("<tr>");
        for cell in split_row(trimmed) {
            html.push_str("<td>");
            html.push_str(&render_inline(cell, base_url));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
        next_index += 1;
    }
    html.push_str("</tbody></table>");

    ParsedTable { html, next_index }
}

/// Split a row into trimmed cells: one leading and one trailing pipe
/// stripped, then split on `|`. Escaped pipes are not supported and act
/// as cell boundaries.
fn split_row(line: &str) -> impl Iterator<Item = &str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim)
}
