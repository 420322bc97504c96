//! Open-block accumulator for the block scanner.

use crate::escape::escape_html;
use crate::inline::render_inline;

/// List flavor of an open list block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    /// Opening tag for the list container.
    pub(crate) fn open_tag(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    /// Closing tag for the list container.
    pub(crate) fn close_tag(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }
}

/// The single block accumulator that may be open between lines.
///
/// Exactly one variant exists at a time, so "at most one open block"
/// holds by construction. `Paragraph` holds trimmed source fragments,
/// `List` holds already-rendered `<li>` fragments, and `Code` holds raw
/// untrimmed lines.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) enum OpenBlock {
    #[default]
    None,
    Paragraph(Vec<String>),
    List(ListKind, Vec<String>),
    Code(Vec<String>),
}

impl OpenBlock {
    /// Whether the scanner is inside a code fence.
    pub(crate) fn is_code(&self) -> bool {
        matches!(self, Self::Code(_))
    }

    /// Append a raw line to the open code buffer. No-op for other blocks.
    pub(crate) fn push_code_line(&mut self, line: &str) {
        if let Self::Code(lines) = self {
            lines.push(line.to_owned());
        }
    }

    /// Take the current block, leaving `None` open.
    pub(crate) fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Render the block to its HTML form and append it to `out`.
    ///
    /// Closing `None` emits nothing, so a flush is always safe.
    pub(crate) fn close_into(self, out: &mut String, base_url: &str) {
        match self {
            Self::None => {}
            Self::Paragraph(fragments) => {
                out.push_str("<p>");
                out.push_str(&render_inline(&fragments.join(" "), base_url));
                out.push_str("</p>");
            }
            Self::List(kind, items) => {
                out.push_str(kind.open_tag());
                for item in &items {
                    out.push_str(item);
                }
                out.push_str(kind.close_tag());
            }
            Self::Code(lines) => {
                out.push_str("<pre><code>");
                out.push_str(&escape_html(&lines.join("\n")));
                out.push_str("</code></pre>");
            }
        }
    }
}
