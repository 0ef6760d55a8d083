//! JSON lexer

use crate::syntax::cursor::Cursor;
use crate::syntax::style::{Color, Style};
use crate::syntax::tokens::{Token, TokenKind, TokenSink};

use super::BuiltinLanguage;

/// Lexical kinds of JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    /// Object key: a string followed by `:`
    MemberName,
    StringValue,
    Number,
    /// `true`, `false` or `null`
    Literal,
    Colon,
    Comma,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    /// Any character the lexer has no class for
    NotDefined,
}

impl TokenKind for JsonKind {
    const ALL: &'static [Self] = &[
        JsonKind::MemberName,
        JsonKind::StringValue,
        JsonKind::Number,
        JsonKind::Literal,
        JsonKind::Colon,
        JsonKind::Comma,
        JsonKind::OpenBrace,
        JsonKind::CloseBrace,
        JsonKind::OpenBracket,
        JsonKind::CloseBracket,
        JsonKind::NotDefined,
    ];

    fn default_style(&self) -> Style {
        match self {
            JsonKind::MemberName => Style::fg(Color::BrightBlue),
            JsonKind::StringValue => Style::fg(Color::Red),
            JsonKind::Number => Style::fg(Color::Green),
            JsonKind::Literal => Style::fg(Color::Yellow).with_bold(),
            JsonKind::Colon | JsonKind::Comma => Style::fg(Color::BrightBlack),
            JsonKind::OpenBrace
            | JsonKind::CloseBrace
            | JsonKind::OpenBracket
            | JsonKind::CloseBracket => Style::fg(Color::BrightBlack),
            JsonKind::NotDefined => Style::fg(Color::BrightRed).with_underline(),
        }
    }

    fn fallback_style() -> Style {
        Style::default()
    }

    fn name(&self) -> &'static str {
        match self {
            JsonKind::MemberName => "MemberName",
            JsonKind::StringValue => "StringValue",
            JsonKind::Number => "Number",
            JsonKind::Literal => "Literal",
            JsonKind::Colon => "Colon",
            JsonKind::Comma => "Comma",
            JsonKind::OpenBrace => "OpenBrace",
            JsonKind::CloseBrace => "CloseBrace",
            JsonKind::OpenBracket => "OpenBracket",
            JsonKind::CloseBracket => "CloseBracket",
            JsonKind::NotDefined => "NotDefined",
        }
    }
}

/// Create the JSON language entry
pub fn json_language() -> BuiltinLanguage {
    BuiltinLanguage::new("json", &["json"], |overrides| {
        super::lexer_factory("json", scan, overrides)
    })
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E')
}

/// Scan JSON text into tokens
///
/// The lexer is lenient: malformed input still produces tokens, with stray
/// characters marked [`JsonKind::NotDefined`].
pub fn scan(text: &str) -> Vec<Token<JsonKind>> {
    let mut cursor = Cursor::new(text);
    let mut sink = TokenSink::new();

    while let Some(ch) = cursor.peek() {
        let start = cursor.pos();

        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        if ch == '"' {
            scan_string(&mut cursor);
            sink.push(start, cursor.pos(), JsonKind::StringValue);
            continue;
        }

        if ch == '-' || ch.is_ascii_digit() {
            cursor.bump();
            cursor.eat_while(is_number_char);
            sink.push(start, cursor.pos(), JsonKind::Number);
            continue;
        }

        if ch.is_ascii_alphabetic() {
            cursor.eat_while(|c| c.is_ascii_alphanumeric());
            let kind = match &text[start..cursor.pos()] {
                "true" | "false" | "null" => JsonKind::Literal,
                _ => JsonKind::NotDefined,
            };
            sink.push(start, cursor.pos(), kind);
            continue;
        }

        let kind = match ch {
            ':' => {
                if let Some(previous) = sink.last_mut() {
                    if previous.kind == JsonKind::StringValue {
                        previous.kind = JsonKind::MemberName;
                    }
                }
                JsonKind::Colon
            }
            ',' => JsonKind::Comma,
            '{' => JsonKind::OpenBrace,
            '}' => JsonKind::CloseBrace,
            '[' => JsonKind::OpenBracket,
            ']' => JsonKind::CloseBracket,
            _ => JsonKind::NotDefined,
        };
        cursor.bump();
        sink.push(start, cursor.pos(), kind);
    }

    sink.finish()
}

/// Advance over a string; a backslash escapes the character after it
fn scan_string(cursor: &mut Cursor<'_>) {
    cursor.bump();
    while let Some(ch) = cursor.bump() {
        match ch {
            '\\' => {
                cursor.bump();
            }
            '"' => break,
            _ => {}
        }
    }
}
