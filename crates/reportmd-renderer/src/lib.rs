//! Constrained-markdown report renderer.
//!
//! Renders the markdown dialect emitted by automated benchmark report
//! generators into safe, embeddable HTML fragments: headings,
//! paragraphs, flat ordered and unordered lists, fenced code blocks,
//! pipe tables, bold/italic/inline code, links, images, and bare `!path`
//! image lines. General CommonMark constructs outside that subset
//! (blockquotes, nested lists, reference links, raw HTML passthrough)
//! are deliberately unsupported and degrade to literal text.
//!
//! # Architecture
//!
//! A block-level line scanner ([`render_markdown`]) owns the scan cursor
//! and dispatches each line to headings, lists, code fences, tables,
//! bare images, or paragraphs. Inline text goes through a span pass
//! (code spans, links, images, emphasis) with [`escape_html`] applied to
//! every piece of literal text exactly once and [`resolve_url`] applied
//! to every link or image target.
//!
//! Rendering is a total function with no error channel: malformed input
//! degrades to literal text, and a document with no content yields a
//! fixed placeholder rather than an empty string.
//!
//! # Example
//!
//! ```
//! use reportmd_renderer::render_markdown;
//!
//! let html = render_markdown(
//!     "# Report\n\n| Model | Outcome |\n|---|---|\n| gpt-4o | Mostly B |",
//!     "/api/assets/run-1/reports/report.md",
//! );
//! assert!(html.starts_with("<h1>Report</h1>"));
//! assert!(html.contains("<td>Mostly B</td>"));
//! ```

mod escape;
mod inline;
mod renderer;
mod resolve;
mod state;
mod table;

pub use escape::escape_html;
pub use renderer::render_markdown;
pub use resolve::resolve_url;
