//! Terminal backend using crossterm
//!
//! Lays a [`LayoutNode`] tree out into lines of styled segments for a given
//! width, then writes them either with crossterm style commands or as plain
//! text.

use std::io::Write;

use crossterm::{
    queue,
    style::{
        Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal,
};
use unicode_width::UnicodeWidthChar;

use crate::error::Result;
use crate::layout::{Border, Column, Justify, LayoutNode, Padding, Panel, Table};
use crate::syntax::{Color, Style};

/// Width used when the terminal size is unknown
pub const DEFAULT_WIDTH: usize = 80;

/// Display width of a character
fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Display width of a string
fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Current terminal width, if stdout is a terminal
pub fn terminal_width() -> Option<usize> {
    terminal::size().ok().map(|(cols, _)| cols as usize).filter(|&cols| cols > 0)
}

/// A run of text in one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

/// One output line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display width of the line
    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| str_width(&s.text)).sum()
    }

    /// Append text, merging with the last segment when the style matches
    pub fn push(&mut self, text: &str, style: &Style) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.style == *style => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                style: style.clone(),
            }),
        }
    }

    fn push_char(&mut self, ch: char, style: &Style) {
        match self.segments.last_mut() {
            Some(last) if last.style == *style => last.text.push(ch),
            _ => self.segments.push(Segment {
                text: ch.to_string(),
                style: style.clone(),
            }),
        }
    }

    fn push_spaces(&mut self, n: usize) {
        if n > 0 {
            self.push(&" ".repeat(n), &Style::default());
        }
    }

    fn append(&mut self, other: Line) {
        for segment in other.segments {
            self.push(&segment.text, &segment.style);
        }
    }

    /// Pad with spaces on the right up to `width`
    fn pad_to(mut self, width: usize) -> Self {
        let w = self.width();
        self.push_spaces(width.saturating_sub(w));
        self
    }

    /// Place the line within `width` according to `justify`, padding both sides
    fn aligned(self, width: usize, justify: Justify) -> Self {
        let pad = width.saturating_sub(self.width());
        let left = match justify {
            Justify::Left => 0,
            Justify::Center => pad / 2,
            Justify::Right => pad,
        };
        let mut line = Line::new();
        line.push_spaces(left);
        line.append(self);
        line.pad_to(width)
    }

    /// The line's text without styling
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Lay a node out into lines no wider than `width`
///
/// Text wraps at character boundaries. Lines are not padded on the right
/// unless they sit inside a panel or table.
pub fn layout(node: &LayoutNode, width: usize) -> Vec<Line> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut flow = Flow::new(width);
    place(node, width, &mut flow, &mut lines);
    flow.finish(&mut lines);
    lines
}

/// Lay a node out and return its plain text, one line per output line
pub fn render_plain(node: &LayoutNode, width: usize) -> String {
    layout(node, width)
        .iter()
        .map(|line| line.plain().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn place(node: &LayoutNode, width: usize, flow: &mut Flow, lines: &mut Vec<Line>) {
    match node {
        LayoutNode::Text(run) => flow.text(&run.text, &run.style, run.justify),
        LayoutNode::Composite(children) => {
            for child in children {
                place(child, width, flow, lines);
            }
        }
        LayoutNode::Display(display) => {
            let style = Style::fg(display.color).with_bold();
            flow.text(&display.text.to_uppercase(), &style, Justify::Left);
        }
        LayoutNode::Stack(children) => {
            flow.finish(lines);
            for child in children {
                lines.extend(layout(child, width));
            }
        }
        LayoutNode::Rule(rule) => {
            flow.finish(lines);
            let mut line = Line::new();
            line.push(&"─".repeat(width), &rule.style);
            lines.push(line);
        }
        LayoutNode::Panel(panel) => {
            flow.finish(lines);
            lines.extend(layout_panel(panel, width));
        }
        LayoutNode::Table(table) => {
            flow.finish(lines);
            lines.extend(layout_table(table, width));
        }
    }
}

/// Inline text flow with hard breaks and character wrapping
struct Flow {
    width: usize,
    out: Vec<Line>,
    current: Line,
    justify: Justify,
    started: bool,
    pending_break: bool,
}

impl Flow {
    fn new(width: usize) -> Self {
        Self {
            width,
            out: Vec::new(),
            current: Line::new(),
            justify: Justify::Left,
            started: false,
            pending_break: false,
        }
    }

    fn text(&mut self, text: &str, style: &Style, justify: Justify) {
        for ch in text.chars() {
            if ch == '\n' {
                if self.pending_break {
                    self.break_line();
                }
                self.started = true;
                self.pending_break = true;
                continue;
            }
            if self.pending_break {
                self.break_line();
                self.pending_break = false;
            }
            if !self.started || self.current.segments.is_empty() {
                self.justify = justify;
            }
            let w = char_width(ch);
            if self.current.width() + w > self.width && self.current.width() > 0 {
                self.break_line();
            }
            self.started = true;
            self.current.push_char(ch, style);
        }
    }

    fn break_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.out.push(justify_line(line, self.width, self.justify));
    }

    fn finish(&mut self, lines: &mut Vec<Line>) {
        if self.started {
            self.break_line();
        }
        lines.append(&mut self.out);
        self.started = false;
        self.pending_break = false;
        self.justify = Justify::Left;
    }
}

/// Left-pad a centered or right-justified line; left lines are unchanged
fn justify_line(line: Line, width: usize, justify: Justify) -> Line {
    match justify {
        Justify::Left => line,
        other => {
            let pad = width.saturating_sub(line.width());
            let left = if other == Justify::Center { pad / 2 } else { pad };
            let mut out = Line::new();
            out.push_spaces(left);
            out.append(line);
            out
        }
    }
}

/// Box-drawing glyphs for a bordered panel or table
struct Glyphs {
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
    horizontal: &'static str,
    vertical: &'static str,
    top_tee: &'static str,
    bottom_tee: &'static str,
    left_tee: &'static str,
    right_tee: &'static str,
    cross: &'static str,
}

const SQUARE: Glyphs = Glyphs {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    horizontal: "─",
    vertical: "│",
    top_tee: "┬",
    bottom_tee: "┴",
    left_tee: "├",
    right_tee: "┤",
    cross: "┼",
};

const ROUNDED: Glyphs = Glyphs {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    ..SQUARE
};

fn glyphs(border: Border) -> Option<&'static Glyphs> {
    match border {
        Border::Square => Some(&SQUARE),
        Border::Rounded => Some(&ROUNDED),
        Border::None | Border::Left => None,
    }
}

fn layout_panel(panel: &Panel, width: usize) -> Vec<Line> {
    let Padding {
        top,
        right,
        bottom,
        left,
    } = panel.padding;
    let boxed = glyphs(panel.border);
    let (edge_left, edge_right) = match panel.border {
        Border::None => (0, 0),
        Border::Left => (1, 0),
        Border::Square | Border::Rounded => (1, 1),
    };
    let inner = width
        .saturating_sub(edge_left + edge_right + left + right)
        .max(1);
    let content_width = inner + left + right;

    let mut body = Vec::new();
    if let (None, Some(header)) = (boxed, &panel.header) {
        let mut line = Line::new();
        line.push_spaces(left);
        line.push(header, &panel.border_style.clone().with_bold());
        body.push(line);
    }
    body.extend((0..top).map(|_| Line::new()));
    for line in layout(&panel.child, inner) {
        let mut padded = Line::new();
        padded.push_spaces(left);
        padded.append(line.pad_to(inner));
        body.push(padded);
    }
    body.extend((0..bottom).map(|_| Line::new()));

    let mut lines = Vec::new();
    if let Some(g) = boxed {
        let mut top_line = Line::new();
        top_line.push(g.top_left, &panel.border_style);
        let mut fill = content_width;
        if let Some(header) = &panel.header {
            let title = format!(" {header} ");
            let title_width = str_width(&title);
            if title_width < content_width {
                top_line.push(g.horizontal, &panel.border_style);
                top_line.push(&title, &panel.border_style);
                fill = content_width - title_width - 1;
            }
        }
        top_line.push(&g.horizontal.repeat(fill), &panel.border_style);
        top_line.push(g.top_right, &panel.border_style);
        lines.push(top_line);
    }

    for line in body {
        let mut out = Line::new();
        match boxed {
            Some(g) => out.push(g.vertical, &panel.border_style),
            None if panel.border == Border::Left => out.push("│", &panel.border_style),
            None => {}
        }
        out.append(line.pad_to(content_width));
        if let Some(g) = boxed {
            out.push(g.vertical, &panel.border_style);
        }
        lines.push(out);
    }

    if let Some(g) = boxed {
        let mut bottom_line = Line::new();
        bottom_line.push(g.bottom_left, &panel.border_style);
        bottom_line.push(&g.horizontal.repeat(content_width), &panel.border_style);
        bottom_line.push(g.bottom_right, &panel.border_style);
        lines.push(bottom_line);
    }
    lines
}

/// Widest line of a node laid out at `width`
fn natural_width(node: &LayoutNode, width: usize) -> usize {
    layout(node, width)
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
}

/// Compute column widths that fit `available`
///
/// Fixed widths are honoured; flexible columns take their natural width
/// and shrink proportionally when the total does not fit.
fn column_widths(table: &Table, available: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| match column.width {
            Some(width) => width,
            None => {
                let header = if table.show_header {
                    natural_width(&column.header, available)
                } else {
                    0
                };
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| natural_width(cell, available))
                    .fold(header, usize::max)
                    .max(1)
            }
        })
        .collect();

    let total: usize = widths.iter().sum();
    if total > available {
        let fixed: usize = table
            .columns
            .iter()
            .zip(&widths)
            .filter(|(column, _)| column.width.is_some())
            .map(|(_, width)| width)
            .sum();
        let flexible = total - fixed;
        let room = available.saturating_sub(fixed);
        if flexible > 0 {
            for (column, width) in table.columns.iter().zip(widths.iter_mut()) {
                if column.width.is_none() {
                    *width = (*width * room / flexible).max(1);
                }
            }
        }
    }
    widths
}

fn layout_table(table: &Table, width: usize) -> Vec<Line> {
    if table.columns.is_empty() {
        return Vec::new();
    }

    let boxed = glyphs(table.border);
    let n = table.columns.len();
    // Bordered tables pad each cell by one space on both sides
    let (cell_pad, overhead) = match boxed {
        Some(_) => (1, 3 * n + 1),
        None => (0, n - 1),
    };
    let widths = column_widths(table, width.saturating_sub(overhead).max(n));

    let rule = |left: &str, mid: &str, right: &str, g: &Glyphs| {
        let mut line = Line::new();
        line.push(left, &table.border_style);
        for (i, w) in widths.iter().enumerate() {
            if i > 0 {
                line.push(mid, &table.border_style);
            }
            line.push(&g.horizontal.repeat(w + 2 * cell_pad), &table.border_style);
        }
        line.push(right, &table.border_style);
        line
    };

    let row_lines = |cells: Vec<&LayoutNode>| -> Vec<Line> {
        let laid_out: Vec<Vec<Line>> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| layout(cell, *w))
            .collect();
        let height = laid_out.iter().map(Vec::len).max().unwrap_or(0).max(1);
        (0..height)
            .map(|row| {
                let mut line = Line::new();
                if let Some(g) = boxed {
                    line.push(g.vertical, &table.border_style);
                }
                for (i, (column, w)) in table.columns.iter().zip(&widths).enumerate() {
                    if i > 0 {
                        match boxed {
                            Some(g) => line.push(g.vertical, &table.border_style),
                            None => line.push_spaces(1),
                        }
                    }
                    let cell_line = laid_out[i].get(row).cloned().unwrap_or_default();
                    line.push_spaces(cell_pad);
                    line.append(align_cell(cell_line, *w, column));
                    line.push_spaces(cell_pad);
                }
                if let Some(g) = boxed {
                    line.push(g.vertical, &table.border_style);
                }
                line
            })
            .collect()
    };

    let mut lines = Vec::new();
    if let Some(g) = boxed {
        lines.push(rule(g.top_left, g.top_tee, g.top_right, g));
    }
    if table.show_header {
        lines.extend(row_lines(table.columns.iter().map(|c| &c.header).collect()));
        if let Some(g) = boxed {
            lines.push(rule(g.left_tee, g.cross, g.right_tee, g));
        }
    }
    let empty = LayoutNode::empty();
    for row in &table.rows {
        let cells = (0..n).map(|i| row.get(i).unwrap_or(&empty)).collect();
        lines.extend(row_lines(cells));
    }
    if let Some(g) = boxed {
        lines.push(rule(g.bottom_left, g.bottom_tee, g.bottom_right, g));
    }
    lines
}

/// Align a cell line within its column
fn align_cell(line: Line, width: usize, column: &Column) -> Line {
    if line.width() >= width {
        return line;
    }
    line.aligned(width, column.justify)
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::White => TermColor::Grey,
        Color::BrightBlack => TermColor::DarkGrey,
        Color::BrightRed => TermColor::Red,
        Color::BrightGreen => TermColor::Green,
        Color::BrightYellow => TermColor::Yellow,
        Color::BrightBlue => TermColor::Blue,
        Color::BrightMagenta => TermColor::Magenta,
        Color::BrightCyan => TermColor::Cyan,
        Color::BrightWhite => TermColor::White,
    }
}

/// Write lines to `out`, with ANSI styling when `color` is set
///
/// Trailing spaces are trimmed from plain output.
pub fn write_lines<W: Write>(out: &mut W, lines: &[Line], color: bool) -> Result<()> {
    for line in lines {
        if color {
            for segment in &line.segments {
                write_segment(out, segment)?;
            }
        } else {
            queue!(out, Print(line.plain().trim_end()))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}

/// A link target may only be emitted when it cannot end the OSC 8 sequence
fn is_safe_link(url: &str) -> bool {
    !url.chars().any(char::is_control)
}

fn write_segment<W: Write>(out: &mut W, segment: &Segment) -> Result<()> {
    let style = &segment.style;
    if style.is_default() {
        queue!(out, Print(&segment.text))?;
        return Ok(());
    }

    if style.fg != Color::Default {
        queue!(out, SetForegroundColor(term_color(style.fg)))?;
    }
    if style.bg != Color::Default {
        queue!(out, SetBackgroundColor(term_color(style.bg)))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.strikethrough {
        queue!(out, SetAttribute(Attribute::CrossedOut))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }

    match style.link.as_deref().filter(|url| is_safe_link(url)) {
        // OSC 8 hyperlink
        Some(url) => queue!(
            out,
            Print(format!("\x1b]8;;{url}\x1b\\")),
            Print(&segment.text),
            Print("\x1b]8;;\x1b\\")
        )?,
        None => queue!(out, Print(&segment.text))?,
    }

    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DisplayText, Rule, TextRun};

    fn text(s: &str) -> LayoutNode {
        TextRun::new(s, Style::default()).into()
    }

    fn plain_lines(node: &LayoutNode, width: usize) -> Vec<String> {
        layout(node, width).iter().map(Line::plain).collect()
    }

    #[test]
    fn test_flow_breaks() {
        assert!(plain_lines(&text(""), 10).is_empty());
        assert_eq!(plain_lines(&text("\n"), 10), vec![""]);
        assert_eq!(plain_lines(&text("a\n"), 10), vec!["a"]);
        assert_eq!(plain_lines(&text("a\n\nb"), 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_flow_wraps_by_width() {
        assert_eq!(plain_lines(&text("abcdef"), 4), vec!["abcd", "ef"]);
        // Wide characters take two cells
        assert_eq!(plain_lines(&text("日本語"), 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_justify() {
        let node: LayoutNode = TextRun::new("ab", Style::default())
            .with_justify(Justify::Right)
            .into();
        assert_eq!(plain_lines(&node, 6), vec!["    ab"]);
        let node: LayoutNode = TextRun::new("ab", Style::default())
            .with_justify(Justify::Center)
            .into();
        assert_eq!(plain_lines(&node, 6), vec!["  ab"]);
    }

    #[test]
    fn test_segments_merge_by_style() {
        let node = LayoutNode::Composite(vec![
            text("a"),
            text("b"),
            TextRun::new("c", Style::fg(Color::Red)).into(),
        ]);
        let lines = layout(&node, 10);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].segments.len(), 2);
        assert_eq!(lines[0].segments[0].text, "ab");
    }

    #[test]
    fn test_stack_and_rule() {
        let node = LayoutNode::Stack(vec![text("top"), LayoutNode::Rule(Rule::default())]);
        assert_eq!(plain_lines(&node, 5), vec!["top", "─────"]);
    }

    #[test]
    fn test_display_text_upper_bold() {
        let node = LayoutNode::Display(DisplayText {
            text: "Title".to_string(),
            color: Color::White,
        });
        let lines = layout(&node, 20);
        assert_eq!(lines[0].plain(), "TITLE");
        assert!(lines[0].segments[0].style.bold);
    }

    #[test]
    fn test_left_border_panel() {
        let node = LayoutNode::Panel(Panel {
            child: Box::new(text("code")),
            border: Border::Left,
            border_style: Style::fg(Color::Blue),
            padding: Padding::left(1),
            header: None,
        });
        assert_eq!(plain_lines(&node, 8), vec!["│ code  "]);
    }

    #[test]
    fn test_square_panel_with_header() {
        let node = LayoutNode::Panel(Panel {
            child: Box::new(text("x")),
            border: Border::Square,
            border_style: Style::default(),
            padding: Padding::default(),
            header: Some("sql".to_string()),
        });
        assert_eq!(
            plain_lines(&node, 9),
            vec!["┌─ sql ─┐", "│x      │", "└───────┘"]
        );
    }

    #[test]
    fn test_borderless_table() {
        let node = LayoutNode::Table(Table {
            columns: vec![
                Column::blank(Justify::Left, Some(3)),
                Column::blank(Justify::Left, None),
            ],
            rows: vec![vec![text("1."), text("one")], vec![text("2."), text("two")]],
            border: Border::None,
            border_style: Style::default(),
            show_header: false,
        });
        assert_eq!(plain_lines(&node, 20), vec!["1.  one", "2.  two"]);
    }

    #[test]
    fn test_square_table_with_alignment() {
        let node = LayoutNode::Table(Table {
            columns: vec![
                Column {
                    header: text("name"),
                    justify: Justify::Left,
                    width: None,
                },
                Column {
                    header: text("n"),
                    justify: Justify::Right,
                    width: None,
                },
            ],
            rows: vec![vec![text("a"), text("10")]],
            border: Border::Square,
            border_style: Style::default(),
            show_header: true,
        });
        assert_eq!(
            plain_lines(&node, 40),
            vec![
                "┌──────┬────┐",
                "│ name │  n │",
                "├──────┼────┤",
                "│ a    │ 10 │",
                "└──────┴────┘",
            ]
        );
    }

    #[test]
    fn test_table_shrinks_to_width() {
        let node = LayoutNode::Table(Table {
            columns: vec![Column::blank(Justify::Left, None)],
            rows: vec![vec![text("abcdefghij")]],
            border: Border::Square,
            border_style: Style::default(),
            show_header: false,
        });
        let lines = layout(&node, 8);
        assert!(lines.iter().all(|line| line.width() <= 8));
        assert_eq!(lines[1].plain(), "│ abcd │");
    }

    #[test]
    fn test_write_plain() {
        let lines = layout(&LayoutNode::Stack(vec![text("a  "), text("b")]), 10);
        let mut out = Vec::new();
        write_lines(&mut out, &lines, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_write_drops_link_with_control_characters() {
        let style = Style::default().with_link("a\u{7}\u{1b}]2;title\u{7}b");
        let lines = layout(&TextRun::new("x", style).into(), 10);
        let mut out = Vec::new();
        write_lines(&mut out, &lines, true).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(!written.contains("\x1b]8;;"));
        assert!(!written.contains("\x1b]2;"));
        assert!(!written.contains('\u{7}'));
        assert!(written.contains('x'));
    }

    #[test]
    fn test_write_color_and_link() {
        let style = Style::fg(Color::Red).with_bold().with_link("https://x.y");
        let lines = layout(&TextRun::new("hi", style).into(), 10);
        let mut out = Vec::new();
        write_lines(&mut out, &lines, true).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b]8;;https://x.y\x1b\\hi\x1b]8;;\x1b\\"));
        assert!(written.contains("\x1b["));
        assert!(written.ends_with('\n'));
    }
}
