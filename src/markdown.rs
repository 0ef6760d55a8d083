//! Markdown front end
//!
//! Parses Markdown with pulldown-cmark and converts the event stream into
//! the [`BlockNode`] tree the document renderer consumes.

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use tracing::trace;

use crate::document::{
    BlockNode, ColumnAlign, InlineNode, TableCell, TableRow, UnsupportedInline,
};

/// Emoji short-code pattern, e.g. `:rocket:`
const EMOJI_PATTERN: &str = r":([a-z0-9_+\-]+):";

/// Parse Markdown source into blocks
pub fn parse(source: &str) -> Vec<BlockNode> {
    MarkdownParser::new().parse(source)
}

/// Markdown to [`BlockNode`] converter
#[derive(Debug, Clone)]
pub struct MarkdownParser {
    options: Options,
    emoji: Option<Regex>,
}

impl MarkdownParser {
    /// Create a parser with strikethrough, tables, footnotes, task lists
    /// and math enabled
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_MATH,
            emoji: Regex::new(EMOJI_PATTERN).ok(),
        }
    }

    /// Builder: turn emoji short-code detection on or off
    pub fn with_emoji(mut self, enabled: bool) -> Self {
        self.emoji = if enabled {
            Regex::new(EMOJI_PATTERN).ok()
        } else {
            None
        };
        self
    }

    /// Parse Markdown source into blocks
    pub fn parse(&self, source: &str) -> Vec<BlockNode> {
        let events: Vec<Event<'_>> = Parser::new_ext(source, self.options).collect();
        let mut i = 0;
        let mut blocks = Vec::new();
        while i < events.len() {
            blocks.extend(self.collect_blocks(&events, &mut i, &|_| false));
        }
        blocks
    }

    /// Collect blocks until a matching End tag (consumed)
    fn collect_blocks(
        &self,
        events: &[Event<'_>],
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> Vec<BlockNode> {
        let mut blocks = Vec::new();

        while *i < events.len() {
            match &events[*i] {
                Event::End(tag_end) if is_end(tag_end) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::Paragraph) => {
                    *i += 1;
                    let content =
                        self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Paragraph));
                    blocks.push(BlockNode::Paragraph(content));
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    let level = heading_level_to_u8(*level);
                    *i += 1;
                    let content =
                        self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Heading(_)));
                    blocks.push(BlockNode::Heading { level, content });
                }
                Event::Start(Tag::BlockQuote(_)) => {
                    *i += 1;
                    let children =
                        self.collect_blocks(events, i, &|e| matches!(e, TagEnd::BlockQuote(_)));
                    blocks.push(BlockNode::Quote(children));
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let tag = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|word| word.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    *i += 1;
                    let text = collect_text(events, i);
                    let lines = text.lines().map(|line| line.to_string()).collect();
                    blocks.push(BlockNode::CodeBlock { tag, lines });
                }
                Event::Start(Tag::List(start)) => {
                    let start = *start;
                    *i += 1;
                    let items = self.collect_items(events, i);
                    blocks.push(BlockNode::List {
                        ordered: start.is_some(),
                        start,
                        items,
                    });
                }
                Event::Start(Tag::Table(alignments)) => {
                    let alignments = alignments.iter().map(convert_alignment).collect();
                    *i += 1;
                    let rows = self.collect_table(events, i);
                    blocks.push(BlockNode::Table { rows, alignments });
                }
                Event::Rule => {
                    *i += 1;
                    blocks.push(BlockNode::ThematicBreak);
                }
                event if is_inline_event(event) => {
                    // Tight list items carry their text without a paragraph
                    let mut content = Vec::new();
                    while *i < events.len() && is_inline_event(&events[*i]) {
                        self.push_inline(events, i, &mut content);
                    }
                    blocks.push(BlockNode::Paragraph(content));
                }
                Event::Start(tag) => {
                    let kind = block_kind_name(tag);
                    trace!(kind, "skipping block");
                    skip_container(events, i);
                    blocks.push(BlockNode::Other {
                        kind: kind.to_string(),
                    });
                }
                _ => {
                    *i += 1;
                }
            }
        }

        blocks
    }

    fn collect_items(&self, events: &[Event<'_>], i: &mut usize) -> Vec<Vec<BlockNode>> {
        let mut items = Vec::new();

        while *i < events.len() {
            match &events[*i] {
                Event::End(TagEnd::List(_)) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::Item) => {
                    *i += 1;
                    items.push(self.collect_blocks(events, i, &|e| matches!(e, TagEnd::Item)));
                }
                _ => {
                    *i += 1;
                }
            }
        }

        items
    }

    fn collect_table(&self, events: &[Event<'_>], i: &mut usize) -> Vec<TableRow> {
        let mut rows = Vec::new();

        while *i < events.len() {
            match &events[*i] {
                Event::End(TagEnd::Table) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::TableHead) => {
                    *i += 1;
                    let cells = self.collect_cells(events, i, &|e| matches!(e, TagEnd::TableHead));
                    rows.push(TableRow::header(cells));
                }
                Event::Start(Tag::TableRow) => {
                    *i += 1;
                    let cells = self.collect_cells(events, i, &|e| matches!(e, TagEnd::TableRow));
                    rows.push(TableRow::data(cells));
                }
                _ => {
                    *i += 1;
                }
            }
        }

        rows
    }

    fn collect_cells(
        &self,
        events: &[Event<'_>],
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> Vec<TableCell> {
        let mut cells = Vec::new();

        while *i < events.len() {
            match &events[*i] {
                Event::End(tag_end) if is_end(tag_end) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::TableCell) => {
                    *i += 1;
                    let content =
                        self.collect_inlines(events, i, &|e| matches!(e, TagEnd::TableCell));
                    cells.push(TableCell::paragraph(content));
                }
                _ => {
                    *i += 1;
                }
            }
        }

        cells
    }

    /// Collect inline nodes until a matching End tag (consumed)
    fn collect_inlines(
        &self,
        events: &[Event<'_>],
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> Vec<InlineNode> {
        let mut inlines = Vec::new();

        while *i < events.len() {
            match &events[*i] {
                Event::End(tag_end) if is_end(tag_end) => {
                    *i += 1;
                    break;
                }
                _ => self.push_inline(events, i, &mut inlines),
            }
        }

        inlines
    }

    /// Convert the inline event at `i` (and its children) and advance past it
    fn push_inline(&self, events: &[Event<'_>], i: &mut usize, out: &mut Vec<InlineNode>) {
        let event = &events[*i];
        *i += 1;

        let node = match event {
            Event::Text(text) => {
                self.push_text(text, out);
                return;
            }
            Event::Code(code) => InlineNode::CodeSpan(code.to_string()),
            Event::SoftBreak | Event::HardBreak => InlineNode::LineBreak,
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                InlineNode::Unsupported(UnsupportedInline::Math)
            }
            Event::InlineHtml(_) | Event::Html(_) => {
                InlineNode::Unsupported(UnsupportedInline::RawMarkup)
            }
            Event::FootnoteReference(_) => {
                InlineNode::Unsupported(UnsupportedInline::FootnoteReference)
            }
            Event::TaskListMarker(_) => InlineNode::Unsupported(UnsupportedInline::TaskListMarker),
            Event::Start(Tag::Emphasis) => InlineNode::Emphasis {
                delimiter: '*',
                count: 1,
                children: self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis)),
            },
            Event::Start(Tag::Strong) => InlineNode::Emphasis {
                delimiter: '*',
                count: 2,
                children: self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong)),
            },
            Event::Start(Tag::Strikethrough) => InlineNode::Emphasis {
                delimiter: '~',
                count: 2,
                children: self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough)),
            },
            Event::Start(Tag::Link {
                link_type: LinkType::Autolink | LinkType::Email,
                ..
            }) => {
                self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                InlineNode::Unsupported(UnsupportedInline::Autolink)
            }
            Event::Start(Tag::Link { dest_url, .. }) => InlineNode::Link {
                url: dest_url.to_string(),
                image: false,
                children: self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Link)),
            },
            Event::Start(Tag::Image { dest_url, .. }) => InlineNode::Link {
                url: dest_url.to_string(),
                image: true,
                children: self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Image)),
            },
            Event::Start(Tag::Superscript) => InlineNode::Container(
                self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Superscript)),
            ),
            Event::Start(Tag::Subscript) => InlineNode::Container(
                self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Subscript)),
            ),
            Event::Start(_) => {
                *i -= 1;
                skip_container(events, i);
                return;
            }
            Event::End(_) | Event::Rule => return,
        };
        out.push(node);
    }

    /// Push text, splitting out emoji short-codes
    fn push_text(&self, text: &str, out: &mut Vec<InlineNode>) {
        let Some(emoji) = &self.emoji else {
            out.push(InlineNode::text(text));
            return;
        };

        let mut last = 0;
        for captures in emoji.captures_iter(text) {
            let (Some(whole), Some(code)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            if whole.start() > last {
                out.push(InlineNode::text(&text[last..whole.start()]));
            }
            out.push(InlineNode::Emoji(code.as_str().to_string()));
            last = whole.end();
        }
        if last < text.len() {
            out.push(InlineNode::text(&text[last..]));
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_inline_event(event: &Event<'_>) -> bool {
    match event {
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineMath(_)
        | Event::DisplayMath(_)
        | Event::InlineHtml(_)
        | Event::FootnoteReference(_)
        | Event::SoftBreak
        | Event::HardBreak
        | Event::TaskListMarker(_) => true,
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Superscript
                | Tag::Subscript
                | Tag::Link { .. }
                | Tag::Image { .. }
        ),
        _ => false,
    }
}

/// Concatenate text events up to the end of a code block (consumed)
fn collect_text(events: &[Event<'_>], i: &mut usize) -> String {
    let mut text = String::new();
    while *i < events.len() {
        match &events[*i] {
            Event::End(TagEnd::CodeBlock) => {
                *i += 1;
                break;
            }
            Event::Text(s) => text.push_str(s),
            _ => {}
        }
        *i += 1;
    }
    text
}

/// Skip a Start event and everything up to its matching End
fn skip_container(events: &[Event<'_>], i: &mut usize) {
    let mut depth = 0usize;
    while *i < events.len() {
        match &events[*i] {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        *i += 1;
        if depth == 0 {
            break;
        }
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn convert_alignment(alignment: &Alignment) -> ColumnAlign {
    match alignment {
        Alignment::None => ColumnAlign::None,
        Alignment::Left => ColumnAlign::Left,
        Alignment::Center => ColumnAlign::Center,
        Alignment::Right => ColumnAlign::Right,
    }
}

fn block_kind_name(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::HtmlBlock => "HtmlBlock",
        Tag::FootnoteDefinition(_) => "FootnoteDefinition",
        Tag::MetadataBlock(_) => "MetadataBlock",
        Tag::DefinitionList => "DefinitionList",
        _ => "Block",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_with_emphasis() {
        let blocks = parse("a *b* **c** ~~d~~");
        assert_eq!(
            blocks,
            vec![BlockNode::Paragraph(vec![
                InlineNode::text("a "),
                InlineNode::Emphasis {
                    delimiter: '*',
                    count: 1,
                    children: vec![InlineNode::text("b")],
                },
                InlineNode::text(" "),
                InlineNode::Emphasis {
                    delimiter: '*',
                    count: 2,
                    children: vec![InlineNode::text("c")],
                },
                InlineNode::text(" "),
                InlineNode::Emphasis {
                    delimiter: '~',
                    count: 2,
                    children: vec![InlineNode::text("d")],
                },
            ])]
        );
    }

    #[test]
    fn test_headings() {
        let blocks = parse("# One\n\n##### Five\n");
        assert_eq!(
            blocks,
            vec![
                BlockNode::Heading {
                    level: 1,
                    content: vec![InlineNode::text("One")],
                },
                BlockNode::Heading {
                    level: 5,
                    content: vec![InlineNode::text("Five")],
                },
            ]
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let blocks = parse("```sql extra\nSELECT 1;\nSELECT 2;\n```\n");
        assert_eq!(
            blocks,
            vec![BlockNode::CodeBlock {
                tag: Some("sql".to_string()),
                lines: vec!["SELECT 1;".to_string(), "SELECT 2;".to_string()],
            }]
        );
    }

    #[test]
    fn test_indented_code_block_has_no_tag() {
        let blocks = parse("    let x = 1;\n");
        assert_eq!(
            blocks,
            vec![BlockNode::CodeBlock {
                tag: None,
                lines: vec!["let x = 1;".to_string()],
            }]
        );
    }

    #[test]
    fn test_tight_list_items_become_paragraphs() {
        let blocks = parse("3. a\n4. b\n");
        assert_eq!(
            blocks,
            vec![BlockNode::List {
                ordered: true,
                start: Some(3),
                items: vec![
                    vec![BlockNode::Paragraph(vec![InlineNode::text("a")])],
                    vec![BlockNode::Paragraph(vec![InlineNode::text("b")])],
                ],
            }]
        );
    }

    #[test]
    fn test_nested_list() {
        let blocks = parse("- a\n  - b\n");
        let BlockNode::List { ordered, items, .. } = &blocks[0] else {
            panic!("expected list");
        };
        assert!(!ordered);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].len(), 2);
        assert!(matches!(items[0][1], BlockNode::List { ordered: false, .. }));
    }

    #[test]
    fn test_quote() {
        let blocks = parse("> quoted\n");
        assert_eq!(
            blocks,
            vec![BlockNode::Quote(vec![BlockNode::Paragraph(vec![
                InlineNode::text("quoted")
            ])])]
        );
    }

    #[test]
    fn test_table() {
        let blocks = parse("| a | b |\n|---|--:|\n| 1 | 2 |\n");
        let BlockNode::Table { rows, alignments } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(alignments, &vec![ColumnAlign::None, ColumnAlign::Right]);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].header);
        assert!(!rows[1].header);
        assert_eq!(rows[1].cells[1], TableCell::paragraph(vec![InlineNode::text("2")]));
    }

    #[test]
    fn test_links_and_images() {
        let blocks = parse("[site](https://a.b) ![cat](c.png) <https://x.y>");
        let BlockNode::Paragraph(content) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            content[0],
            InlineNode::Link {
                url: "https://a.b".to_string(),
                image: false,
                children: vec![InlineNode::text("site")],
            }
        );
        assert!(matches!(content[2], InlineNode::Link { image: true, .. }));
        assert_eq!(
            content[4],
            InlineNode::Unsupported(UnsupportedInline::Autolink)
        );
    }

    #[test]
    fn test_breaks_become_line_breaks() {
        let blocks = parse("a\nb  \nc");
        let BlockNode::Paragraph(content) = &blocks[0] else {
            panic!("expected paragraph");
        };
        let breaks = content
            .iter()
            .filter(|node| **node == InlineNode::LineBreak)
            .count();
        assert_eq!(breaks, 2);
    }

    #[test]
    fn test_emoji_split() {
        let blocks = parse("ship it :rocket: now");
        assert_eq!(
            blocks,
            vec![BlockNode::Paragraph(vec![
                InlineNode::text("ship it "),
                InlineNode::Emoji("rocket".to_string()),
                InlineNode::text(" now"),
            ])]
        );

        let blocks = MarkdownParser::new().with_emoji(false).parse(":rocket:");
        assert_eq!(
            blocks,
            vec![BlockNode::Paragraph(vec![InlineNode::text(":rocket:")])]
        );
    }

    #[test]
    fn test_unsupported_inlines() {
        let blocks = parse("- [x] done <b>hi</b> $x$\n");
        let BlockNode::List { items, .. } = &blocks[0] else {
            panic!("expected list");
        };
        let BlockNode::Paragraph(content) = &items[0][0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            content[0],
            InlineNode::Unsupported(UnsupportedInline::TaskListMarker)
        );
        assert!(content.contains(&InlineNode::Unsupported(UnsupportedInline::RawMarkup)));
        assert!(content.contains(&InlineNode::Unsupported(UnsupportedInline::Math)));
    }

    #[test]
    fn test_html_block_is_other() {
        let blocks = parse("<div>\nhi\n</div>\n\ntext\n");
        assert_eq!(
            blocks[0],
            BlockNode::Other {
                kind: "HtmlBlock".to_string()
            }
        );
        assert_eq!(blocks[1], BlockNode::Paragraph(vec![InlineNode::text("text")]));
    }

    #[test]
    fn test_thematic_break() {
        assert_eq!(parse("---\n"), vec![BlockNode::ThematicBreak]);
    }
}
