//! Block-level markdown scanner and HTML assembly.
//!
//! A single cursor walks the document line by line. Classification rules
//! apply in a fixed priority order, and the open-block accumulator is
//! flushed whenever a line starts a different kind of block. Tables are
//! consumed as whole regions; every other rule advances one line.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;
use crate::inline::render_inline;
use crate::resolve::resolve_url;
use crate::state::{ListKind, OpenBlock};
use crate::table::{is_separator_row, parse_table};

/// Placeholder emitted when a document produces no output at all.
const EMPTY_PLACEHOLDER: &str = r#"<p class="markdown-empty">No report content.</p>"#;

/// One to six `#` characters, whitespace, then the heading text.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

/// `-`, `*`, or `+` bullet followed by whitespace.
static UNORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());

/// Digits, `.`, whitespace ordered-item marker.
static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());

/// A complete `![label](url)` image occupying the whole line.
static FULL_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[[^\]]*\]\([^)]*\)$").unwrap());

/// Extensions recognized on bare image lines.
const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

/// Render a markdown report to an HTML fragment.
///
/// `base_url` is the document's own location (empty when unknown); all
/// relative link and image targets resolve against it. The result is a
/// fragment, not a page: literal text is escaped, and the only markup is
/// what the renderer itself emits. Rendering never fails. Malformed
/// input degrades to literal paragraph text, and a document with no
/// content yields a fixed placeholder.
///
/// # Example
///
/// ```
/// use reportmd_renderer::render_markdown;
///
/// let html = render_markdown("## Outcomes\n\nAll **pass**.", "");
/// assert_eq!(html, "<h2>Outcomes</h2><p>All <strong>pass</strong>.</p>");
/// ```
#[must_use]
pub fn render_markdown(markdown: &str, base_url: &str) -> String {
    let normalized = markdown.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    Scanner::new(base_url).render(&lines)
}

/// Cursor-driven line scanner holding the open block and the output.
struct Scanner<'a> {
    base_url: &'a str,
    open: OpenBlock,
    html: String,
}

impl<'a> Scanner<'a> {
    fn new(base_url: &'a str) -> Self {
        Self {
            base_url,
            open: OpenBlock::None,
            html: String::new(),
        }
    }

    fn render(mut self, lines: &[&str]) -> String {
        let mut index = 0;
        while index < lines.len() {
            index = self.step(lines, index);
        }
        self.flush_open();

        if self.html.is_empty() {
            EMPTY_PLACEHOLDER.to_owned()
        } else {
            self.html
        }
    }

    /// Process the line at `index` and return the next cursor position.
    fn step(&mut self, lines: &[&str], index: usize) -> usize {
        let raw = lines[index];
        let trimmed = raw.trim();

        // Inside a fence nothing else is recognized until the closer
        if self.open.is_code() {
            if trimmed.starts_with("```") {
                self.flush_open();
            } else {
                self.open.push_code_line(raw);
            }
            return index + 1;
        }

        if trimmed.is_empty() {
            self.flush_open();
            return index + 1;
        }

        if trimmed.starts_with("```") {
            // The language tag after the backticks is discarded
            self.flush_open();
            self.open = OpenBlock::Code(Vec::new());
            return index + 1;
        }

        if trimmed.starts_with('!') && !FULL_IMAGE_RE.is_match(trimmed) {
            self.flush_open();
            self.bare_image(trimmed);
            return index + 1;
        }

        if trimmed.contains('|')
            && index + 1 < lines.len()
            && is_separator_row(lines[index + 1].trim())
        {
            self.flush_open();
            let table = parse_table(lines, index, self.base_url);
            self.html.push_str(&table.html);
            return table.next_index;
        }

        if let Some(caps) = HEADING_RE.captures(trimmed) {
            self.flush_open();
            let level = caps[1].len();
            write!(
                self.html,
                "<h{level}>{}</h{level}>",
                render_inline(&caps[2], self.base_url)
            )
            .unwrap();
            return index + 1;
        }

        if let Some(caps) = UNORDERED_RE.captures(trimmed) {
            self.push_list_item(ListKind::Unordered, &caps[1]);
            return index + 1;
        }

        if let Some(caps) = ORDERED_RE.captures(trimmed) {
            self.push_list_item(ListKind::Ordered, &caps[1]);
            return index + 1;
        }

        self.push_paragraph_line(trimmed);
        index + 1
    }

    /// Emit a bare image line: `!path` with the extension fixed up,
    /// wrapped in a `markdown-image` div.
    fn bare_image(&mut self, trimmed: &str) {
        let mut path = trimmed[1..].trim().to_owned();
        if !has_image_extension(&path) {
            path.push_str(".png");
        }
        let src = resolve_url(&path, self.base_url);
        let alt = path
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("image");
        write!(
            self.html,
            r#"<div class="markdown-image"><img src="{}" alt="{}"></div>"#,
            escape_html(&src),
            escape_html(alt)
        )
        .unwrap();
    }

    /// Append a rendered `<li>`, flushing first unless a list of the
    /// same kind is already open.
    fn push_list_item(&mut self, kind: ListKind, text: &str) {
        let item = format!("<li>{}</li>", render_inline(text, self.base_url));
        if let OpenBlock::List(open_kind, items) = &mut self.open
            && *open_kind == kind
        {
            items.push(item);
            return;
        }
        self.flush_open();
        self.open = OpenBlock::List(kind, vec![item]);
    }

    /// Append a plain line to the paragraph buffer, ending any open list.
    fn push_paragraph_line(&mut self, trimmed: &str) {
        if let OpenBlock::Paragraph(fragments) = &mut self.open {
            fragments.push(trimmed.to_owned());
            return;
        }
        self.flush_open();
        self.open = OpenBlock::Paragraph(vec![trimmed.to_owned()]);
    }

    /// Close whichever block is open into the output buffer.
    fn flush_open(&mut self) {
        self.open.take().close_into(&mut self.html, self.base_url);
    }
}

/// Whether a path already ends in a recognized image extension.
fn has_image_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_placeholder() {
        assert_eq!(render_markdown("", ""), EMPTY_PLACEHOLDER);
        assert_eq!(render_markdown("\n\n   \n", ""), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_paragraph_lines_join_with_space() {
        assert_eq!(render_markdown("A\nB\n\nC", ""), "<p>A B</p><p>C</p>");
    }

    #[test]
    fn test_paragraph_lines_trimmed() {
        assert_eq!(render_markdown("  A  \n\tB", ""), "<p>A B</p>");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(render_markdown("# One", ""), "<h1>One</h1>");
        assert_eq!(render_markdown("### Title", ""), "<h3>Title</h3>");
        assert_eq!(render_markdown("###### Six", ""), "<h6>Six</h6>");
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        assert_eq!(render_markdown("####### Seven", ""), "<p>####### Seven</p>");
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        assert_eq!(render_markdown("#Title", ""), "<p>#Title</p>");
    }

    #[test]
    fn test_heading_interrupts_paragraph() {
        assert_eq!(render_markdown("text\n# Head", ""), "<p>text</p><h1>Head</h1>");
    }

    #[test]
    fn test_unordered_markers() {
        assert_eq!(
            render_markdown("- a\n* b\n+ c", ""),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render_markdown("1. first\n2. second\n10. tenth", ""),
            "<ol><li>first</li><li>second</li><li>tenth</li></ol>"
        );
    }

    #[test]
    fn test_list_kind_switch_closes_previous() {
        assert_eq!(
            render_markdown("- a\n1. b", ""),
            "<ul><li>a</li></ul><ol><li>b</li></ol>"
        );
    }

    #[test]
    fn test_blank_line_splits_lists() {
        assert_eq!(
            render_markdown("- a\n\n- b", ""),
            "<ul><li>a</li></ul><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_plain_line_ends_list() {
        assert_eq!(render_markdown("- a\nplain", ""), "<ul><li>a</li></ul><p>plain</p>");
    }

    #[test]
    fn test_paragraph_then_list() {
        assert_eq!(render_markdown("intro\n- a", ""), "<p>intro</p><ul><li>a</li></ul>");
    }

    #[test]
    fn test_code_fence_escapes_content() {
        assert_eq!(
            render_markdown("```\n<script>\n```", ""),
            "<pre><code>&lt;script&gt;</code></pre>"
        );
    }

    #[test]
    fn test_code_fence_language_discarded() {
        assert_eq!(
            render_markdown("```python\nprint(1)\n```", ""),
            "<pre><code>print(1)</code></pre>"
        );
    }

    #[test]
    fn test_code_fence_preserves_blank_and_marker_lines() {
        let input = "```\n- not a list\n\n# not a heading\n```";
        assert_eq!(
            render_markdown(input, ""),
            "<pre><code>- not a list\n\n# not a heading</code></pre>"
        );
    }

    #[test]
    fn test_code_fence_keeps_indentation() {
        assert_eq!(
            render_markdown("```\n    indented\n```", ""),
            "<pre><code>    indented</code></pre>"
        );
    }

    #[test]
    fn test_unterminated_fence_flushes_at_end() {
        assert_eq!(render_markdown("```\ntrailing", ""), "<pre><code>trailing</code></pre>");
    }

    #[test]
    fn test_fence_interrupts_paragraph() {
        assert_eq!(
            render_markdown("text\n```\ncode\n```", ""),
            "<p>text</p><pre><code>code</code></pre>"
        );
    }

    #[test]
    fn test_table_in_document() {
        assert_eq!(
            render_markdown("| A | B |\n|---|---|\n| 1 | 2 |", ""),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_text_after_table() {
        assert_eq!(
            render_markdown("| A |\n|---|\n| 1 |\nplain text", ""),
            "<table><thead><tr><th>A</th></tr></thead>\
             <tbody><tr><td>1</td></tr></tbody></table><p>plain text</p>"
        );
    }

    #[test]
    fn test_table_interrupts_paragraph() {
        assert_eq!(
            render_markdown("para\n| A |\n|---|", ""),
            "<p>para</p><table><thead><tr><th>A</th></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn test_pipe_line_without_separator_is_paragraph() {
        assert_eq!(render_markdown("| A | B |", ""), "<p>| A | B |</p>");
    }

    #[test]
    fn test_spaced_separator_is_not_a_table() {
        assert_eq!(
            render_markdown("| A | B |\n| --- | --- |", ""),
            "<p>| A | B | | --- | --- |</p>"
        );
    }

    #[test]
    fn test_dash_only_separator_forms_table() {
        assert_eq!(
            render_markdown("A | B\n---\n1 | 2", ""),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_bare_image_line() {
        assert_eq!(
            render_markdown("!charts/run-1.default_quiz.gpt-4o.png", ""),
            r#"<div class="markdown-image"><img src="charts/run-1.default_quiz.gpt-4o.png" alt="run-1.default_quiz.gpt-4o.png"></div>"#
        );
    }

    #[test]
    fn test_bare_image_appends_png() {
        assert_eq!(
            render_markdown("!charts/accuracy", ""),
            r#"<div class="markdown-image"><img src="charts/accuracy.png" alt="accuracy.png"></div>"#
        );
    }

    #[test]
    fn test_bare_image_resolves_against_base() {
        assert_eq!(
            render_markdown("!chart.png", "/reports/run-1/report.md"),
            r#"<div class="markdown-image"><img src="/reports/run-1/chart.png" alt="chart.png"></div>"#
        );
    }

    #[test]
    fn test_bare_image_keeps_known_extension_case_insensitively() {
        let html = render_markdown("!shot.JPG", "");
        assert!(html.contains(r#"src="shot.JPG""#));
    }

    #[test]
    fn test_full_image_line_is_paragraph() {
        assert_eq!(
            render_markdown("![q1](charts/q1.png)", "/api/assets/run-1/report.md"),
            r#"<p><img src="/api/assets/run-1/charts/q1.png" alt="q1"></p>"#
        );
    }

    #[test]
    fn test_bare_image_outranks_table_start() {
        let html = render_markdown("!a | b\n---", "");
        assert!(html.starts_with(r#"<div class="markdown-image">"#));
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(render_markdown("A\r\nB\r\n\r\nC", ""), "<p>A B</p><p>C</p>");
    }

    #[test]
    fn test_inline_in_headings_and_lists() {
        assert_eq!(
            render_markdown("## **Bold** title\n- `code` item", ""),
            "<h2><strong>Bold</strong> title</h2><ul><li><code>code</code> item</li></ul>"
        );
    }

    #[test]
    fn test_generated_report_shape() {
        let markdown = r"# Pop Quiz: default_quiz

Source: https://example.com/quiz

## Outcomes

| Model | Outcome |
|-------|---------|
| gpt-4o | Mostly B |
| claude-3 | Mixed |

## Choices by Question

| Question | gpt-4o | claude-3 |
|------------------------------|
| q1 | A | B |

![run-1.default_quiz.gpt-4o](charts/run-1.default_quiz.gpt-4o.png)
";
        let html = render_markdown(markdown, "/api/assets/run-1/reports/report.md");

        assert!(html.starts_with("<h1>Pop Quiz: default_quiz</h1>"));
        assert!(html.contains("<p>Source: https://example.com/quiz</p>"));
        assert!(html.contains("<h2>Outcomes</h2>"));
        assert!(html.contains("<tr><td>gpt-4o</td><td>Mostly B</td></tr>"));
        assert!(html.contains("<th>Question</th><th>gpt-4o</th><th>claude-3</th>"));
        assert!(html.contains(
            r#"<p><img src="/api/assets/run-1/reports/charts/run-1.default_quiz.gpt-4o.png" alt="run-1.default_quiz.gpt-4o"></p>"#
        ));
    }
}
