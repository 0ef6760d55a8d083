//! Document model and renderer
//!
//! A parsed document is a tree of [`BlockNode`]s whose text content is a
//! tree of [`InlineNode`]s. The renderer walks it and produces a
//! [`LayoutNode`](crate::layout::LayoutNode) tree, handing fenced code to
//! the highlighter registry.
//!
//! Rendering recurses once per level of nesting in the input.

mod block;
pub mod emoji;
mod inline;

pub use block::{render_document, DocumentRenderer};
pub use inline::{render_inline, render_inlines};

/// Column alignment declared by a table's delimiter row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlign {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// One cell of a table row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub blocks: Vec<BlockNode>,
}

impl TableCell {
    pub fn new(blocks: Vec<BlockNode>) -> Self {
        Self { blocks }
    }

    /// A cell holding a single paragraph
    pub fn paragraph(content: Vec<InlineNode>) -> Self {
        Self::new(vec![BlockNode::Paragraph(content)])
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    /// Header rows define the table's columns
    pub header: bool,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self { header: true, cells }
    }

    pub fn data(cells: Vec<TableCell>) -> Self {
        Self {
            header: false,
            cells,
        }
    }
}

/// Block-level document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    Paragraph(Vec<InlineNode>),
    Heading {
        level: u8,
        content: Vec<InlineNode>,
    },
    List {
        ordered: bool,
        /// Start number written in the source; rendering always counts from 1
        start: Option<u64>,
        /// Each item is a sequence of blocks
        items: Vec<Vec<BlockNode>>,
    },
    Quote(Vec<BlockNode>),
    CodeBlock {
        /// Language tag from the fence's info string
        tag: Option<String>,
        /// Code lines without their line terminators
        lines: Vec<String>,
    },
    ThematicBreak,
    Table {
        rows: Vec<TableRow>,
        alignments: Vec<ColumnAlign>,
    },
    /// A block kind with no rendering; renders as empty content
    Other { kind: String },
}

/// Inline features that are accepted but never drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedInline {
    FootnoteReference,
    Math,
    RawMarkup,
    Autolink,
    Abbreviation,
    SmartPunctuation,
    TaskListMarker,
    /// Delimiter-only marker left behind by a parser
    DelimiterMarker,
}

/// Inline document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Literal(String),
    Emphasis {
        /// `*`, `_` or `~`
        delimiter: char,
        count: u8,
        children: Vec<InlineNode>,
    },
    CodeSpan(String),
    Link {
        url: String,
        image: bool,
        children: Vec<InlineNode>,
    },
    LineBreak,
    Container(Vec<InlineNode>),
    /// Emoji short-code without the surrounding colons
    Emoji(String),
    Unsupported(UnsupportedInline),
    /// An inline shape the renderer does not know; rendering it fails
    Other { kind: String },
}

impl InlineNode {
    /// Convenience constructor for literal text
    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Literal(text.into())
    }
}
