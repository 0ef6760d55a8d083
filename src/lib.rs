//! inkmark - syntax highlighting and Markdown rendering for the terminal
//!
//! Parsed Markdown ([`document::BlockNode`] trees) and fenced source code are
//! rendered into a backend-agnostic [`layout::LayoutNode`] tree. The
//! [`terminal`] backend lays that tree out and writes it with crossterm.
//!
//! ```no_run
//! use inkmark::{render_markdown, HighlighterRegistry, RenderConfig};
//!
//! let config = RenderConfig::default();
//! let registry = HighlighterRegistry::new();
//! let node = render_markdown("# Hello\n\n```sql\nSELECT 1;\n```\n", &config, &registry)?;
//! let lines = inkmark::terminal::layout(&node, 80);
//! inkmark::terminal::write_lines(&mut std::io::stdout(), &lines, true)?;
//! # Ok::<(), inkmark::RenderError>(())
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod markdown;
pub mod syntax;
pub mod terminal;

pub use config::RenderConfig;
pub use document::{render_document, BlockNode, DocumentRenderer, InlineNode};
pub use error::{RenderError, Result};
pub use layout::LayoutNode;
pub use syntax::HighlighterRegistry;

/// Parse Markdown source and render it into a layout tree
pub fn render_markdown(
    source: &str,
    config: &RenderConfig,
    registry: &HighlighterRegistry,
) -> Result<LayoutNode> {
    let blocks = markdown::parse(source);
    render_document(&blocks, config, registry)
}
