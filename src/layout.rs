//! Backend-agnostic layout tree
//!
//! The document renderer and the highlighters produce a [`LayoutNode`]
//! tree. A backend (see [`crate::terminal`]) turns it into output. Trees are
//! built once per render and never mutated afterwards.
//!
//! Text reaching a [`TextRun`] through [`TextRun::literal`] or
//! [`TextRun::code`] is escaped exactly once, at construction.

use serde::Deserialize;

use crate::syntax::{Color, Style};

/// Horizontal alignment of text within its available width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Border drawn around a panel or table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Border {
    #[default]
    None,
    /// A single vertical bar on the left edge
    Left,
    Square,
    Rounded,
}

/// Blank cells around a panel's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Padding {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Padding {
    pub fn new(top: usize, right: usize, bottom: usize, left: usize) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same padding on every side
    pub fn uniform(n: usize) -> Self {
        Self::new(n, n, n, n)
    }

    /// Padding on the left edge only
    pub fn left(n: usize) -> Self {
        Self::new(0, 0, 0, n)
    }
}

/// A run of text drawn in one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: Style,
    pub justify: Justify,
}

impl TextRun {
    /// Create a run from text that is already safe to display
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            justify: Justify::Left,
        }
    }

    /// Create a run from prose, escaping it for display
    pub fn literal(raw: &str, style: Style) -> Self {
        Self::new(escape_text(raw), style)
    }

    /// Create a run from source code, escaping it for display
    pub fn code(raw: &str, style: Style) -> Self {
        Self::new(escape_code(raw), style)
    }

    /// A hard line break
    pub fn line_break() -> Self {
        Self::new("\n", Style::default())
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }

    /// Builder: set justification
    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }
}

/// A child framed by a border, with padding and an optional header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub child: Box<LayoutNode>,
    pub border: Border,
    pub border_style: Style,
    pub padding: Padding,
    pub header: Option<String>,
}

/// One table column: its header, alignment and optional fixed width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: LayoutNode,
    pub justify: Justify,
    pub width: Option<usize>,
}

impl Column {
    /// A column without header content
    pub fn blank(justify: Justify, width: Option<usize>) -> Self {
        Self {
            header: LayoutNode::empty(),
            justify,
            width,
        }
    }
}

/// A grid of cells; every row has exactly one cell per column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<LayoutNode>>,
    pub border: Border,
    pub border_style: Style,
    pub show_header: bool,
}

/// A full-width horizontal rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub style: Style,
}

/// Large display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub text: String,
    pub color: Color,
}

/// A unit of visual structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutNode {
    Text(TextRun),
    Panel(Panel),
    /// Children laid out top to bottom
    Stack(Vec<LayoutNode>),
    Table(Table),
    /// Children flowed one after another on the same line
    Composite(Vec<LayoutNode>),
    Rule(Rule),
    Display(DisplayText),
}

impl LayoutNode {
    /// Content that draws nothing
    pub fn empty() -> Self {
        LayoutNode::Composite(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LayoutNode::Composite(children) if children.iter().all(LayoutNode::is_empty))
    }

    /// Concatenated text of every run and display text, in tree order
    ///
    /// Stack children are separated by newlines. Borders, rules and padding
    /// are not included.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            LayoutNode::Text(run) => out.push_str(&run.text),
            LayoutNode::Display(display) => out.push_str(&display.text),
            LayoutNode::Panel(panel) => {
                if let Some(header) = &panel.header {
                    out.push_str(header);
                    out.push('\n');
                }
                panel.child.collect_text(out);
            }
            LayoutNode::Composite(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            LayoutNode::Stack(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    child.collect_text(out);
                }
            }
            LayoutNode::Table(table) => {
                for row in &table.rows {
                    let cells: Vec<String> = row.iter().map(LayoutNode::plain_text).collect();
                    out.push_str(&cells.join("\t"));
                    out.push('\n');
                }
            }
            LayoutNode::Rule(_) => {}
        }
    }
}

impl From<TextRun> for LayoutNode {
    fn from(run: TextRun) -> Self {
        LayoutNode::Text(run)
    }
}

/// Escape prose for display
///
/// Control characters other than newline are replaced by caret notation
/// so they cannot drive the terminal.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

/// Escape source code for display
///
/// Tabs expand to four spaces and carriage returns are dropped; other
/// control characters are escaped as for prose.
pub fn escape_code(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\t' => out.push_str("    "),
            '\r' => {}
            _ => push_escaped(&mut out, ch),
        }
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push('\n'),
        '\u{7f}' => out.push_str("^?"),
        c if (c as u32) < 0x20 => {
            out.push('^');
            out.push(char::from(b'@' + c as u8));
        }
        c if c.is_control() => out.push('\u{fffd}'),
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_controls() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a\x1b[31mb"), "a^[[31mb");
        assert_eq!(escape_text("one\ntwo"), "one\ntwo");
        assert_eq!(escape_text("tab\there"), "tab^Ihere");
        assert_eq!(escape_text("del\x7f"), "del^?");
    }

    #[test]
    fn test_escape_code_tabs_and_cr() {
        assert_eq!(escape_code("\tx = 1;\r\n"), "    x = 1;\n");
        assert_eq!(escape_code("bell\x07"), "bell^G");
    }

    #[test]
    fn test_literal_escapes_once() {
        let run = TextRun::literal("^[", Style::default());
        assert_eq!(run.text, "^[");
        let run = TextRun::literal("\x1b", Style::default());
        assert_eq!(run.text, "^[");
    }

    #[test]
    fn test_empty_node() {
        assert!(LayoutNode::empty().is_empty());
        assert!(LayoutNode::Composite(vec![LayoutNode::empty()]).is_empty());
        assert!(!LayoutNode::Rule(Rule::default()).is_empty());
    }

    #[test]
    fn test_plain_text_stack() {
        let node = LayoutNode::Stack(vec![
            TextRun::new("one", Style::default()).into(),
            LayoutNode::Composite(vec![
                TextRun::new("t", Style::default()).into(),
                TextRun::new("wo", Style::default()).into(),
            ]),
        ]);
        assert_eq!(node.plain_text(), "one\ntwo");
    }
}
