//! Inline renderer

use tracing::trace;

use super::{emoji, InlineNode};
use crate::error::{RenderError, Result};
use crate::layout::{Justify, LayoutNode, TextRun};
use crate::syntax::{Color, Style};

/// Render a sequence of inline nodes into one composite
pub fn render_inlines(
    nodes: &[InlineNode],
    ambient: &Style,
    justify: Justify,
) -> Result<LayoutNode> {
    let children = nodes
        .iter()
        .map(|node| render_inline(node, ambient, justify))
        .collect::<Result<Vec<_>>>()?;
    Ok(LayoutNode::Composite(children))
}

/// Render one inline node under an ambient style and justification
///
/// Unsupported features render as empty content. An [`InlineNode::Other`]
/// fails with [`RenderError::UnsupportedInline`].
pub fn render_inline(node: &InlineNode, ambient: &Style, justify: Justify) -> Result<LayoutNode> {
    let node = match node {
        InlineNode::Literal(text) => text_run(text, ambient, justify),
        InlineNode::Container(children) => render_inlines(children, ambient, justify)?,
        InlineNode::Emphasis {
            delimiter,
            count,
            children,
        } => {
            let style = emphasis_style(ambient, *delimiter, *count);
            render_inlines(children, &style, justify)?
        }
        InlineNode::CodeSpan(code) => TextRun::code(code, code_span_style()).into(),
        InlineNode::Link {
            url,
            image: true,
            ..
        } => text_run(&format!("[image: {url}]"), ambient, justify),
        InlineNode::Link { url, children, .. } => {
            let style = ambient.clone().with_link(url.as_str());
            render_inlines(children, &style, justify)?
        }
        InlineNode::LineBreak => TextRun::line_break().into(),
        InlineNode::Emoji(code) => match emoji::lookup(code) {
            Some(glyph) => TextRun::new(glyph, ambient.clone())
                .with_justify(justify)
                .into(),
            None => text_run(&format!(":{code}:"), ambient, justify),
        },
        InlineNode::Unsupported(kind) => {
            trace!(?kind, "skipping unsupported inline");
            LayoutNode::empty()
        }
        InlineNode::Other { kind } => return Err(RenderError::UnsupportedInline(kind.clone())),
    };
    Ok(node)
}

fn text_run(text: &str, style: &Style, justify: Justify) -> LayoutNode {
    TextRun::literal(text, style.clone())
        .with_justify(justify)
        .into()
}

/// Style for children of an emphasis node
///
/// `~` strikes through regardless of count; otherwise one delimiter is
/// italic and two are bold white.
fn emphasis_style(ambient: &Style, delimiter: char, count: u8) -> Style {
    let style = ambient.clone();
    if delimiter == '~' {
        return style.with_strikethrough();
    }
    match count {
        1 => style.with_italic(),
        2 => style.with_bold().with_fg(Color::White),
        _ => style,
    }
}

fn code_span_style() -> Style {
    Style::bg(Color::BrightBlack)
}
