//! Script language (JavaScript/TypeScript) lexer

use crate::syntax::cursor::Cursor;
use crate::syntax::style::{Color, Style};
use crate::syntax::tokens::{Token, TokenKind, TokenSink};

use super::BuiltinLanguage;

/// Lexical kinds of the script language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// `// ...` through the end of the line, or `/* ... */`
    Comment,
    /// `"..."`, `'...'` or `` `...` ``
    StringValue,
    Number,
    /// Case-sensitive reserved word
    Keyword,
    Identifier,
    /// `=`
    Equals,
    Operator,
    Dot,
    Comma,
    /// `;`
    SequenceTerminator,
    OpenParenthesis,
    CloseParenthesis,
    /// `{`, `}`, `[` or `]`
    Bracket,
    /// Any character the lexer has no class for
    NotDefined,
}

impl TokenKind for ScriptKind {
    const ALL: &'static [Self] = &[
        ScriptKind::Comment,
        ScriptKind::StringValue,
        ScriptKind::Number,
        ScriptKind::Keyword,
        ScriptKind::Identifier,
        ScriptKind::Equals,
        ScriptKind::Operator,
        ScriptKind::Dot,
        ScriptKind::Comma,
        ScriptKind::SequenceTerminator,
        ScriptKind::OpenParenthesis,
        ScriptKind::CloseParenthesis,
        ScriptKind::Bracket,
        ScriptKind::NotDefined,
    ];

    fn default_style(&self) -> Style {
        match self {
            ScriptKind::Comment => Style::fg(Color::Green).with_italic(),
            ScriptKind::StringValue => Style::fg(Color::BrightCyan),
            ScriptKind::Number => Style::fg(Color::Blue),
            ScriptKind::Keyword => Style::fg(Color::BrightBlue).with_bold(),
            ScriptKind::Identifier => Style::fg(Color::White),
            ScriptKind::Equals => Style::fg(Color::Yellow),
            ScriptKind::Operator => Style::fg(Color::Yellow),
            ScriptKind::Dot | ScriptKind::Comma | ScriptKind::SequenceTerminator => {
                Style::fg(Color::White)
            }
            ScriptKind::OpenParenthesis | ScriptKind::CloseParenthesis | ScriptKind::Bracket => {
                Style::fg(Color::BrightBlue)
            }
            ScriptKind::NotDefined => Style::fg(Color::Cyan),
        }
    }

    fn fallback_style() -> Style {
        Style::fg(Color::BrightCyan)
    }

    fn name(&self) -> &'static str {
        match self {
            ScriptKind::Comment => "Comment",
            ScriptKind::StringValue => "StringValue",
            ScriptKind::Number => "Number",
            ScriptKind::Keyword => "Keyword",
            ScriptKind::Identifier => "Identifier",
            ScriptKind::Equals => "Equals",
            ScriptKind::Operator => "Operator",
            ScriptKind::Dot => "Dot",
            ScriptKind::Comma => "Comma",
            ScriptKind::SequenceTerminator => "SequenceTerminator",
            ScriptKind::OpenParenthesis => "OpenParenthesis",
            ScriptKind::CloseParenthesis => "CloseParenthesis",
            ScriptKind::Bracket => "Bracket",
            ScriptKind::NotDefined => "NotDefined",
        }
    }
}

/// Reserved words, including the TypeScript additions
const KEYWORDS: &[&str] = &[
    "abstract", "arguments", "as", "asserts", "async", "await", "boolean", "break", "byte", "case",
    "catch", "char", "class", "const", "constructor", "continue", "debugger", "declare", "default",
    "delete", "do", "double", "else", "enum", "eval", "export", "extends", "false", "final",
    "finally", "float", "for", "from", "function", "get", "global", "goto", "if", "implements",
    "import", "in", "infer", "instanceof", "interface", "is", "keyof", "let", "module",
    "namespace", "native", "never", "new", "null", "number", "object", "of", "package", "private",
    "protected", "public", "readonly", "require", "return", "satisfies", "set", "short", "static",
    "string", "super", "switch", "symbol", "this", "throw", "true", "try", "type", "typeof",
    "undefined", "unique", "unknown", "var", "void", "volatile", "while", "with", "yield",
];

/// Create the script language entry
pub fn script_language() -> BuiltinLanguage {
    BuiltinLanguage::new(
        "javascript",
        &["javascript", "js", "typescript", "ts"],
        |overrides| super::lexer_factory("javascript", scan, overrides),
    )
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Scan script text into tokens
///
/// Whitespace is left as gap. Unterminated strings and block comments run
/// to the end of input.
pub fn scan(text: &str) -> Vec<Token<ScriptKind>> {
    let mut cursor = Cursor::new(text);
    let mut sink = TokenSink::new();

    while let Some(ch) = cursor.peek() {
        let start = cursor.pos();

        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        if ch == '/' && cursor.peek_nth(1) == Some('*') {
            cursor.eat_through("/*");
            cursor.eat_through("*/");
            sink.push(start, cursor.pos(), ScriptKind::Comment);
            continue;
        }

        if ch == '/' && cursor.peek_nth(1) == Some('/') {
            cursor.eat_line();
            sink.push(start, cursor.pos(), ScriptKind::Comment);
            continue;
        }

        if matches!(ch, '"' | '\'' | '`') {
            scan_string(&mut cursor, ch);
            sink.push(start, cursor.pos(), ScriptKind::StringValue);
            continue;
        }

        if ch.is_ascii_digit() {
            cursor.eat_while(|c| c.is_ascii_digit() || c == '.');
            sink.push(start, cursor.pos(), ScriptKind::Number);
            continue;
        }

        if is_ident_start(ch) {
            cursor.eat_while(is_ident_char);
            let word = &text[start..cursor.pos()];
            let kind = if KEYWORDS.contains(&word) {
                ScriptKind::Keyword
            } else {
                ScriptKind::Identifier
            };
            sink.push(start, cursor.pos(), kind);
            continue;
        }

        let kind = match ch {
            '=' => ScriptKind::Equals,
            '*' | '+' | '-' | '/' | '%' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' | ':' => {
                ScriptKind::Operator
            }
            '.' => ScriptKind::Dot,
            ',' => ScriptKind::Comma,
            ';' => ScriptKind::SequenceTerminator,
            '(' => ScriptKind::OpenParenthesis,
            ')' => ScriptKind::CloseParenthesis,
            '{' | '}' | '[' | ']' => ScriptKind::Bracket,
            _ => ScriptKind::NotDefined,
        };
        cursor.bump();
        sink.push(start, cursor.pos(), kind);
    }

    sink.finish()
}

/// Advance over a string literal opened by `quote`; a backslash escapes
/// the character after it
fn scan_string(cursor: &mut Cursor<'_>, quote: char) {
    cursor.bump();
    while let Some(ch) = cursor.bump() {
        if ch == '\\' {
            cursor.bump();
        } else if ch == quote {
            break;
        }
    }
}
