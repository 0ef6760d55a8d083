//! Markup (XML/HTML) lexer

use crate::syntax::cursor::Cursor;
use crate::syntax::style::{Color, Style};
use crate::syntax::tokens::{Token, TokenKind, TokenSink};

use super::BuiltinLanguage;

/// Lexical kinds of the markup language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    /// Runs of spaces, tabs and line breaks
    Whitespace,
    /// Character data outside of tags
    Text,
    /// `<!-- ... -->`
    Comment,
    /// `<![CDATA[ ... ]]>`
    CData,
    /// `<!DOCTYPE ...>`
    DocumentTypeDeclaration,
    /// `<? ... ?>`
    ProcessingInstruction,
    /// `<`
    OpeningAngleBracket,
    /// `>`
    ClosingAngleBracket,
    /// Name of a start or self-closing tag
    ElementName,
    /// Name of an end tag
    EndElement,
    AttributeName,
    AttributeEquals,
    AttributeQuote,
    AttributeValue,
    /// `/` of a self-closing tag
    SelfClosingSlash,
}

impl TokenKind for MarkupKind {
    const ALL: &'static [Self] = &[
        MarkupKind::Whitespace,
        MarkupKind::Text,
        MarkupKind::Comment,
        MarkupKind::CData,
        MarkupKind::DocumentTypeDeclaration,
        MarkupKind::ProcessingInstruction,
        MarkupKind::OpeningAngleBracket,
        MarkupKind::ClosingAngleBracket,
        MarkupKind::ElementName,
        MarkupKind::EndElement,
        MarkupKind::AttributeName,
        MarkupKind::AttributeEquals,
        MarkupKind::AttributeQuote,
        MarkupKind::AttributeValue,
        MarkupKind::SelfClosingSlash,
    ];

    fn default_style(&self) -> Style {
        match self {
            MarkupKind::Whitespace => Style::default(),
            MarkupKind::Text => Style::fg(Color::BrightCyan),
            MarkupKind::Comment => Style::fg(Color::Green),
            MarkupKind::CData => Style::fg(Color::Magenta),
            MarkupKind::DocumentTypeDeclaration => Style::fg(Color::Cyan),
            MarkupKind::ProcessingInstruction => Style::fg(Color::Cyan),
            MarkupKind::OpeningAngleBracket => Style::fg(Color::BrightBlue),
            MarkupKind::ClosingAngleBracket => Style::fg(Color::BrightBlue),
            MarkupKind::ElementName => Style::fg(Color::Blue),
            MarkupKind::EndElement => Style::fg(Color::Blue),
            MarkupKind::AttributeName => Style::fg(Color::Cyan),
            MarkupKind::AttributeEquals => Style::fg(Color::BrightBlue),
            MarkupKind::AttributeQuote => Style::fg(Color::Blue),
            MarkupKind::AttributeValue => Style::fg(Color::White),
            MarkupKind::SelfClosingSlash => Style::fg(Color::BrightBlue),
        }
    }

    fn fallback_style() -> Style {
        Style::fg(Color::BrightCyan)
    }

    fn name(&self) -> &'static str {
        match self {
            MarkupKind::Whitespace => "Whitespace",
            MarkupKind::Text => "Text",
            MarkupKind::Comment => "Comment",
            MarkupKind::CData => "CData",
            MarkupKind::DocumentTypeDeclaration => "DocumentTypeDeclaration",
            MarkupKind::ProcessingInstruction => "ProcessingInstruction",
            MarkupKind::OpeningAngleBracket => "OpeningAngleBracket",
            MarkupKind::ClosingAngleBracket => "ClosingAngleBracket",
            MarkupKind::ElementName => "ElementName",
            MarkupKind::EndElement => "EndElement",
            MarkupKind::AttributeName => "AttributeName",
            MarkupKind::AttributeEquals => "AttributeEquals",
            MarkupKind::AttributeQuote => "AttributeQuote",
            MarkupKind::AttributeValue => "AttributeValue",
            MarkupKind::SelfClosingSlash => "SelfClosingSlash",
        }
    }
}

/// Create the markup language entry
pub fn markup_language() -> BuiltinLanguage {
    BuiltinLanguage::new("xml", &["xml", "html", "svg"], |overrides| {
        super::lexer_factory("xml", scan, overrides)
    })
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, ':' | '-' | '_' | '.')
}

fn is_attribute_name_char(ch: char) -> bool {
    !is_space(ch) && !matches!(ch, '=' | '>' | '/' | '<' | '"' | '\'')
}

/// Scan markup text into tokens
///
/// Unterminated comments, CDATA sections, declarations and processing
/// instructions run to the end of input.
pub fn scan(text: &str) -> Vec<Token<MarkupKind>> {
    let mut cursor = Cursor::new(text);
    let mut sink = TokenSink::new();

    while let Some(ch) = cursor.peek() {
        let start = cursor.pos();
        if is_space(ch) {
            cursor.eat_while(is_space);
            sink.push(start, cursor.pos(), MarkupKind::Whitespace);
        } else if ch == '<' {
            scan_angle(&mut cursor, &mut sink);
        } else {
            cursor.eat_while(|c| c != '<');
            sink.push(start, cursor.pos(), MarkupKind::Text);
        }
    }

    sink.finish()
}

/// Scan a construct opened by `<`
fn scan_angle(cursor: &mut Cursor<'_>, sink: &mut TokenSink<MarkupKind>) {
    let start = cursor.pos();

    if cursor.starts_with("<!--") {
        cursor.eat_through("<!--");
        cursor.eat_through("-->");
        sink.push(start, cursor.pos(), MarkupKind::Comment);
        return;
    }
    if cursor.starts_with("<![CDATA[") {
        cursor.eat_through("<![CDATA[");
        cursor.eat_through("]]>");
        sink.push(start, cursor.pos(), MarkupKind::CData);
        return;
    }
    if cursor.starts_with("<!DOCTYPE") || cursor.starts_with("<!doctype") {
        cursor.eat_through(">");
        sink.push(start, cursor.pos(), MarkupKind::DocumentTypeDeclaration);
        return;
    }
    if cursor.starts_with("<?") {
        cursor.eat_through("<?");
        cursor.eat_through("?>");
        sink.push(start, cursor.pos(), MarkupKind::ProcessingInstruction);
        return;
    }

    cursor.bump();
    sink.push(start, cursor.pos(), MarkupKind::OpeningAngleBracket);

    if cursor.at('/') {
        // The slash of an end tag stays a gap.
        cursor.bump();
        let name_start = cursor.pos();
        cursor.eat_while(is_name_char);
        sink.push(name_start, cursor.pos(), MarkupKind::EndElement);
        scan_whitespace(cursor, sink);
        scan_close(cursor, sink);
        return;
    }

    let name_start = cursor.pos();
    cursor.eat_while(is_name_char);
    sink.push(name_start, cursor.pos(), MarkupKind::ElementName);
    scan_attributes(cursor, sink);

    if cursor.at('/') && cursor.peek_nth(1) == Some('>') {
        let slash = cursor.pos();
        cursor.bump();
        sink.push(slash, cursor.pos(), MarkupKind::SelfClosingSlash);
    }
    scan_close(cursor, sink);
}

fn scan_attributes(cursor: &mut Cursor<'_>, sink: &mut TokenSink<MarkupKind>) {
    while let Some(ch) = cursor.peek() {
        let before = cursor.pos();
        match ch {
            '>' | '<' => break,
            '/' if cursor.peek_nth(1) == Some('>') => break,
            '/' => {
                cursor.bump();
            }
            c if is_space(c) => scan_whitespace(cursor, sink),
            _ => scan_attribute(cursor, sink),
        }
        if cursor.pos() == before {
            cursor.bump();
        }
    }
}

/// Scan one `name = "value"` triplet; any part may be missing
fn scan_attribute(cursor: &mut Cursor<'_>, sink: &mut TokenSink<MarkupKind>) {
    let name_start = cursor.pos();
    cursor.eat_while(is_attribute_name_char);
    sink.push(name_start, cursor.pos(), MarkupKind::AttributeName);
    scan_whitespace(cursor, sink);

    let has_equals = cursor.at('=');
    if has_equals {
        let eq = cursor.pos();
        cursor.bump();
        sink.push(eq, cursor.pos(), MarkupKind::AttributeEquals);
        scan_whitespace(cursor, sink);
    }

    match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            let open = cursor.pos();
            cursor.bump();
            sink.push(open, cursor.pos(), MarkupKind::AttributeQuote);

            let value_start = cursor.pos();
            cursor.eat_while(|c| c != quote);
            sink.push(value_start, cursor.pos(), MarkupKind::AttributeValue);

            if cursor.at(quote) {
                let close = cursor.pos();
                cursor.bump();
                sink.push(close, cursor.pos(), MarkupKind::AttributeQuote);
            }
        }
        Some(c) if has_equals && !is_space(c) && c != '>' => {
            let value_start = cursor.pos();
            cursor.eat_while(|c| !is_space(c) && c != '>');
            sink.push(value_start, cursor.pos(), MarkupKind::AttributeValue);
        }
        _ => {}
    }
}

fn scan_whitespace(cursor: &mut Cursor<'_>, sink: &mut TokenSink<MarkupKind>) {
    let start = cursor.pos();
    cursor.eat_while(is_space);
    sink.push(start, cursor.pos(), MarkupKind::Whitespace);
}

fn scan_close(cursor: &mut Cursor<'_>, sink: &mut TokenSink<MarkupKind>) {
    if cursor.at('>') {
        let start = cursor.pos();
        cursor.bump();
        sink.push(start, cursor.pos(), MarkupKind::ClosingAngleBracket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MarkupKind::*;

    fn kinds(text: &str) -> Vec<MarkupKind> {
        scan(text).iter().map(|t| t.kind).collect()
    }

    fn texts(text: &str) -> Vec<&str> {
        scan(text).iter().map(|t| t.text(text)).collect()
    }

    #[test]
    fn test_self_closing_with_attribute() {
        let source = r#"<a b="1"/>"#;
        assert_eq!(
            kinds(source),
            vec![
                OpeningAngleBracket,
                ElementName,
                Whitespace,
                AttributeName,
                AttributeEquals,
                AttributeQuote,
                AttributeValue,
                AttributeQuote,
                SelfClosingSlash,
                ClosingAngleBracket,
            ]
        );
        assert_eq!(
            texts(source),
            vec!["<", "a", " ", "b", "=", "\"", "1", "\"", "/", ">"]
        );
    }

    #[test]
    fn test_element_with_text() {
        let source = "<p>hi there</p>";
        assert_eq!(
            kinds(source),
            vec![
                OpeningAngleBracket,
                ElementName,
                ClosingAngleBracket,
                Text,
                OpeningAngleBracket,
                EndElement,
                ClosingAngleBracket,
            ]
        );
        assert_eq!(texts(source)[3], "hi there");
        assert_eq!(texts(source)[5], "p");
    }

    #[test]
    fn test_comment_cdata_doctype_pi() {
        let source = "<?xml version=\"1.0\"?><!DOCTYPE note><!-- c --><![CDATA[<x>]]>";
        assert_eq!(
            kinds(source),
            vec![ProcessingInstruction, DocumentTypeDeclaration, Comment, CData]
        );
        assert_eq!(texts(source)[3], "<![CDATA[<x>]]>");
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let source = "<a/><!-- never closed";
        let tokens = scan(source);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, Comment);
        assert_eq!(last.span.end(), source.len());
    }

    #[test]
    fn test_unterminated_attribute_value() {
        let source = "<a href='x";
        let tokens = scan(source);
        assert_eq!(tokens.last().unwrap().kind, AttributeValue);
        assert_eq!(tokens.last().unwrap().span.end(), source.len());
    }

    #[test]
    fn test_single_quoted_and_unquoted_values() {
        let source = "<td class='x' width=10>";
        assert_eq!(
            texts(source),
            vec!["<", "td", " ", "class", "=", "'", "x", "'", " ", "width", "=", "10", ">"]
        );
    }

    #[test]
    fn test_bare_angle_bracket_does_not_loop() {
        let source = "< <<>";
        let tokens = scan(source);
        assert!(tokens.iter().all(|t| !t.span.is_empty()));
        assert_eq!(tokens.last().unwrap().kind, ClosingAngleBracket);
    }

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in MarkupKind::ALL {
            assert_eq!(MarkupKind::from_name(kind.name()), Some(*kind));
        }
    }
}
