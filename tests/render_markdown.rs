//! End-to-end rendering of Markdown source through the terminal backend

use inkmark::syntax::{Color, Style};
use inkmark::terminal::{self, render_plain};
use inkmark::{render_markdown, HighlighterRegistry, LayoutNode, RenderConfig};

fn render(source: &str) -> LayoutNode {
    render_markdown(source, &RenderConfig::default(), &HighlighterRegistry::new()).unwrap()
}

fn plain(source: &str, width: usize) -> String {
    render_plain(&render(source), width)
}

/// Collect every styled segment whose text contains `needle`
fn styles_of(node: &LayoutNode, needle: &str) -> Vec<Style> {
    terminal::layout(node, 80)
        .into_iter()
        .flat_map(|line| line.segments)
        .filter(|segment| segment.text.contains(needle))
        .map(|segment| segment.style)
        .collect()
}

#[test]
fn test_document_blocks_are_separated() {
    let source = "# Title\n\nSome *text*.\n\n- one\n- two\n";
    assert_eq!(
        plain(source, 40),
        "TITLE\n\nSome text.\n\n○   one\n○   two\n"
    );
}

#[test]
fn test_ordered_list_markers() {
    assert_eq!(plain("3. a\n4. b\n", 40), "1.  a\n2.  b\n");
}

#[test]
fn test_underlined_headings() {
    assert_eq!(plain("## Sub\n\n### Deep\n", 40), "Sub\n===\n\nDeep\n----\n");
}

#[test]
fn test_thematic_break_fills_width() {
    assert_eq!(plain("---\n", 10), format!("{}\n", "─".repeat(10)));
}

#[test]
fn test_quote_panel() {
    assert_eq!(plain("> quoted\n", 20), "│\n│ quoted\n│\n");
}

#[test]
fn test_code_block_with_known_tag() {
    let source = "```sql\nSELECT 1;\n```\n";
    assert_eq!(plain(source, 30), "│ sql\n│ SELECT 1;\n");

    let node = render(source);
    let keyword = styles_of(&node, "SELECT");
    assert_eq!(keyword[0].fg, Color::Cyan);
}

#[test]
fn test_code_block_with_unknown_tag_is_plain() {
    let source = "```rust\nfn main() {}\n```\n";
    assert_eq!(plain(source, 30), "│ fn main() {}\n");
    let node = render(source);
    assert!(styles_of(&node, "fn main").iter().all(Style::is_default));
}

#[test]
fn test_table_with_alignment() {
    let source = "| a | b |\n|---|--:|\n| 1 | 22 |\n";
    assert_eq!(
        plain(source, 40),
        "┌───┬────┐\n│ a │  b │\n├───┼────┤\n│ 1 │ 22 │\n└───┴────┘\n"
    );
}

#[test]
fn test_inline_styles() {
    let node = render("**bold** and ~~gone~~ and `code`\n");
    assert!(styles_of(&node, "bold")[0].bold);
    assert!(styles_of(&node, "gone")[0].strikethrough);
    assert_eq!(styles_of(&node, "code")[0].bg, Color::BrightBlack);
}

#[test]
fn test_links_and_images() {
    let node = render("[site](https://example.com) ![cat](cat.png)\n");
    let link = &styles_of(&node, "site")[0];
    assert_eq!(link.link.as_deref(), Some("https://example.com"));
    assert_eq!(render_plain(&node, 80), "site [image: cat.png]\n");
}

#[test]
fn test_emoji_short_codes() {
    assert_eq!(plain("ship it :rocket: :nope:\n", 40), "ship it 🚀 :nope:\n");
}

#[test]
fn test_control_characters_are_escaped() {
    assert_eq!(plain("a\u{1b}[31mb\n", 40), "a^[[31mb\n");
}

#[test]
fn test_unsupported_inlines_render_nothing() {
    assert_eq!(plain("x <b>y</b> z\n", 40), "x y z\n");
}

#[test]
fn test_config_changes_output() {
    let config = RenderConfig::from_toml_str(
        r#"
[list]
marker = "*"

[highlight.sql]
Keyword = { fg = "red", bold = true }
"#,
    )
    .unwrap();
    let registry = HighlighterRegistry::from_config(&config).unwrap();

    let node = render_markdown("- item\n", &config, &registry).unwrap();
    assert_eq!(render_plain(&node, 40), "*   item\n");

    let node = render_markdown("```sql\nselect x\n```\n", &config, &registry).unwrap();
    let keyword = &styles_of(&node, "select")[0];
    assert_eq!(keyword.fg, Color::Red);
    assert!(keyword.bold);
}

#[test]
fn test_wrapping_respects_width() {
    let node = render("aaaa bbbb cccc\n");
    let lines = terminal::layout(&node, 6);
    assert!(lines.iter().all(|line| line.width() <= 6));
    assert_eq!(render_plain(&node, 6), "aaaa b\nbbb cc\ncc\n");
}

#[test]
fn test_partial_quote_frame_keeps_border() {
    let config = RenderConfig::from_toml_str("[quote_block]\npadding = { left = 2 }\n").unwrap();
    let node = render_markdown("> quoted\n", &config, &HighlighterRegistry::new()).unwrap();
    assert_eq!(render_plain(&node, 20), "│  quoted\n");
}

#[test]
fn test_link_target_cannot_inject_control_sequences() {
    let node = render("[x](<a\u{7}\u{1b}]2;title\u{7}b>)\n");
    let lines = terminal::layout(&node, 40);
    let mut out = Vec::new();
    terminal::write_lines(&mut out, &lines, true).unwrap();
    let written = String::from_utf8(out).unwrap();
    assert!(!written.contains("\u{1b}]2;"));
    assert!(!written.contains('\u{7}'));
}
