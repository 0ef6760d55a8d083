//! Block renderer

use tracing::{debug, trace};

use super::inline::render_inlines;
use super::{BlockNode, ColumnAlign, InlineNode, TableCell, TableRow};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::layout::{
    escape_text, Border, Column, DisplayText, Justify, LayoutNode, Panel, Rule, Table, TextRun,
};
use crate::syntax::{HighlighterRegistry, Style};

/// Width of the list marker column
const MARKER_WIDTH: usize = 3;

/// Render a whole document
///
/// Each block is followed by a hard line break.
pub fn render_document(
    blocks: &[BlockNode],
    config: &RenderConfig,
    registry: &HighlighterRegistry,
) -> Result<LayoutNode> {
    DocumentRenderer::new(config, registry).render_document(blocks)
}

/// Renders block trees with a fixed configuration and registry
#[derive(Debug, Clone, Copy)]
pub struct DocumentRenderer<'a> {
    config: &'a RenderConfig,
    registry: &'a HighlighterRegistry,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(config: &'a RenderConfig, registry: &'a HighlighterRegistry) -> Self {
        Self { config, registry }
    }

    /// Render a whole document, one block after another
    pub fn render_document(&self, blocks: &[BlockNode]) -> Result<LayoutNode> {
        let mut children = Vec::with_capacity(blocks.len() * 2);
        for block in blocks {
            children.push(self.render_block(block)?);
            children.push(TextRun::line_break().into());
        }
        Ok(LayoutNode::Stack(children))
    }

    /// Render one block
    pub fn render_block(&self, block: &BlockNode) -> Result<LayoutNode> {
        match block {
            BlockNode::Paragraph(content) => self.paragraph(content, Justify::Left),
            BlockNode::Heading { level, content } => self.heading(*level, content),
            BlockNode::List { ordered, items, .. } => self.list(*ordered, items),
            BlockNode::Quote(children) => self.quote(children),
            BlockNode::CodeBlock { tag, lines } => Ok(self.code_block(tag.as_deref(), lines)),
            BlockNode::ThematicBreak => Ok(LayoutNode::Rule(Rule::default())),
            BlockNode::Table { rows, alignments } => self.table(rows, alignments),
            BlockNode::Other { kind } => {
                trace!(%kind, "skipping block");
                Ok(LayoutNode::empty())
            }
        }
    }

    fn paragraph(&self, content: &[InlineNode], justify: Justify) -> Result<LayoutNode> {
        render_inlines(content, &Style::default(), justify)
    }

    fn heading(&self, level: u8, content: &[InlineNode]) -> Result<LayoutNode> {
        let headings = &self.config.headings;
        match level {
            1 => {
                let mut text = String::new();
                collect_literals(content, &mut text);
                Ok(LayoutNode::Display(DisplayText {
                    text: escape_text(&text),
                    color: headings.level1,
                }))
            }
            2 | 3 => {
                let style = &headings.level2_to_4;
                let rendered = render_inlines(content, style, Justify::Left)?;
                let underline_char = if level == 2 { '=' } else { '-' };
                let width = rendered.plain_text().chars().count();
                let underline =
                    TextRun::new(underline_char.to_string().repeat(width), style.clone());
                Ok(LayoutNode::Stack(vec![rendered, underline.into()]))
            }
            4 => render_inlines(content, &headings.level2_to_4, Justify::Left),
            _ => render_inlines(content, &headings.level5_plus, Justify::Left),
        }
    }

    fn list(&self, ordered: bool, items: &[Vec<BlockNode>]) -> Result<LayoutNode> {
        let list = &self.config.list;
        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let marker = if ordered {
                format!("{}.", index + 1)
            } else {
                list.marker.to_string()
            };
            let content = item
                .iter()
                .map(|block| self.render_block(block))
                .collect::<Result<Vec<_>>>()?;
            rows.push(vec![
                TextRun::new(marker, list.marker_style.clone()).into(),
                LayoutNode::Stack(content),
            ]);
        }

        Ok(LayoutNode::Table(Table {
            columns: vec![
                Column::blank(Justify::Left, Some(MARKER_WIDTH)),
                Column::blank(Justify::Left, None),
            ],
            rows,
            border: Border::None,
            border_style: Style::default(),
            show_header: false,
        }))
    }

    fn quote(&self, children: &[BlockNode]) -> Result<LayoutNode> {
        let content = children
            .iter()
            .map(|child| match child {
                BlockNode::Paragraph(content) => self.paragraph(content, Justify::Left),
                other => self.render_block(other),
            })
            .collect::<Result<Vec<_>>>()?;

        let frame = &self.config.quote_block;
        Ok(LayoutNode::Panel(Panel {
            child: Box::new(LayoutNode::Stack(content)),
            border: frame.border,
            border_style: frame.border_style.clone(),
            padding: frame.padding,
            header: None,
        }))
    }

    fn code_block(&self, tag: Option<&str>, lines: &[String]) -> LayoutNode {
        let code = lines.join("\n");
        let code = code.trim();

        let highlighted = tag.and_then(|tag| {
            let node = self.registry.highlight(tag, code);
            if node.is_none() {
                debug!(tag, "no highlighter registered, rendering plain");
            }
            node.map(|node| (tag, node))
        });

        let (child, header) = match highlighted {
            Some((tag, node)) => (node, Some(escape_text(tag))),
            None => (TextRun::code(code, Style::default()).into(), None),
        };

        let frame = &self.config.code_block;
        LayoutNode::Panel(Panel {
            child: Box::new(child),
            border: frame.border,
            border_style: frame.border_style.clone(),
            padding: frame.padding,
            header,
        })
    }

    /// Render a table
    ///
    /// The first header row defines the columns. Short rows are padded with
    /// empty cells and long rows are truncated. Without a header row the
    /// widest row sets the column count and headers are hidden.
    fn table(&self, rows: &[TableRow], alignments: &[ColumnAlign]) -> Result<LayoutNode> {
        let header = rows.iter().find(|row| row.header);
        let column_count = match header {
            Some(row) => row.cells.len(),
            None => rows.iter().map(|row| row.cells.len()).max().unwrap_or(0),
        };
        let justify_at = |i: usize| justify_for(alignments.get(i).copied().unwrap_or_default());

        let columns = (0..column_count)
            .map(|i| -> Result<Column> {
                let justify = justify_at(i);
                let header = match header.and_then(|row| row.cells.get(i)) {
                    Some(cell) => self.table_cell(cell, justify)?,
                    None => LayoutNode::empty(),
                };
                Ok(Column {
                    header,
                    justify,
                    width: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut body = Vec::new();
        for row in rows {
            if header.is_some_and(|first| std::ptr::eq(first, row)) {
                continue;
            }
            let cells = (0..column_count)
                .map(|i| match row.cells.get(i) {
                    Some(cell) => self.table_cell(cell, justify_at(i)),
                    None => Ok(LayoutNode::empty()),
                })
                .collect::<Result<Vec<_>>>()?;
            body.push(cells);
        }

        let table = &self.config.table;
        Ok(LayoutNode::Table(Table {
            columns,
            rows: body,
            border: table.border,
            border_style: table.border_style.clone(),
            show_header: header.is_some(),
        }))
    }

    fn table_cell(&self, cell: &TableCell, justify: Justify) -> Result<LayoutNode> {
        let children = cell
            .blocks
            .iter()
            .map(|block| match block {
                BlockNode::Paragraph(content) => self.paragraph(content, justify),
                other => self.render_block(other),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(LayoutNode::Composite(children))
    }
}

/// Append the text of every literal in an inline tree, ignoring styling
fn collect_literals(nodes: &[InlineNode], out: &mut String) {
    for node in nodes {
        match node {
            InlineNode::Literal(text) => out.push_str(text),
            InlineNode::Emphasis { children, .. }
            | InlineNode::Link { children, .. }
            | InlineNode::Container(children) => collect_literals(children, out),
            _ => {}
        }
    }
}

fn justify_for(align: ColumnAlign) -> Justify {
    match align {
        ColumnAlign::Center => Justify::Center,
        ColumnAlign::Right => Justify::Right,
        ColumnAlign::Left | ColumnAlign::None => Justify::Left,
    }
}
