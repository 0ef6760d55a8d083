//! Query language (SQL) lexer

use crate::syntax::cursor::Cursor;
use crate::syntax::style::{Color, Style};
use crate::syntax::tokens::{Token, TokenKind, TokenSink};

use super::BuiltinLanguage;

/// Lexical kinds of the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Single-quoted string, `''` escapes a quote
    StringValue,
    Number,
    /// Case-insensitive reserved word
    Keyword,
    Identifier,
    /// Arithmetic and comparison operators
    Operator,
    Comma,
    Dot,
    OpenParenthesis,
    CloseParenthesis,
    /// `;`
    SequenceTerminator,
    /// Any character the lexer has no class for
    NotDefined,
    /// `-- ...` through the end of the line
    Comment,
}

impl TokenKind for QueryKind {
    const ALL: &'static [Self] = &[
        QueryKind::StringValue,
        QueryKind::Number,
        QueryKind::Keyword,
        QueryKind::Identifier,
        QueryKind::Operator,
        QueryKind::Comma,
        QueryKind::Dot,
        QueryKind::OpenParenthesis,
        QueryKind::CloseParenthesis,
        QueryKind::SequenceTerminator,
        QueryKind::NotDefined,
        QueryKind::Comment,
    ];

    fn default_style(&self) -> Style {
        match self {
            QueryKind::StringValue => Style::fg(Color::BrightCyan),
            QueryKind::Number => Style::fg(Color::Blue),
            QueryKind::Keyword => Style::fg(Color::Cyan).with_bold(),
            QueryKind::Identifier => Style::fg(Color::White),
            QueryKind::Comment => Style::fg(Color::Green).with_italic(),
            QueryKind::Operator
            | QueryKind::Comma
            | QueryKind::Dot
            | QueryKind::OpenParenthesis
            | QueryKind::CloseParenthesis
            | QueryKind::SequenceTerminator
            | QueryKind::NotDefined => Style::fg(Color::BrightBlue),
        }
    }

    fn fallback_style() -> Style {
        Style::fg(Color::BrightCyan)
    }

    fn name(&self) -> &'static str {
        match self {
            QueryKind::StringValue => "StringValue",
            QueryKind::Number => "Number",
            QueryKind::Keyword => "Keyword",
            QueryKind::Identifier => "Identifier",
            QueryKind::Operator => "Operator",
            QueryKind::Comma => "Comma",
            QueryKind::Dot => "Dot",
            QueryKind::OpenParenthesis => "OpenParenthesis",
            QueryKind::CloseParenthesis => "CloseParenthesis",
            QueryKind::SequenceTerminator => "SequenceTerminator",
            QueryKind::NotDefined => "NotDefined",
            QueryKind::Comment => "Comment",
        }
    }
}

/// Reserved words, upper case; matched case-insensitively
const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "IN", "IS", "NULL", "LIKE", "BETWEEN", "ON",
    "GROUP", "BY", "ORDER", "ASC", "DESC", "LIMIT", "OFFSET", "TOP", "AS", "CASE", "WHEN", "THEN",
    "ELSE", "END", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "JOIN", "INNER", "LEFT",
    "RIGHT", "FULL", "OUTER", "CROSS", "CREATE", "TABLE", "ALTER", "DROP", "INDEX", "VIEW",
    "TRIGGER", "PROCEDURE", "FUNCTION", "EXISTS", "UNION", "ALL", "DISTINCT", "HAVING", "EXPLAIN",
    "DESCRIBE", "SHOW", "USE", "DATABASE", "SCHEMA", "GRANT", "REVOKE", "COMMIT", "ROLLBACK",
    "TRANSACTION", "SAVEPOINT", "TO", "LOCK", "UNLOCK", "BEGIN", "RETURN", "DECLARE", "FETCH",
    "CURSOR", "OPEN", "CLOSE", "NEXT", "PREVIOUS", "FIRST", "LAST", "ABSOLUTE", "RELATIVE",
    "ROWNUM", "ROWCOUNT", "OVER", "PARTITION", "INT", "BIGINT", "SMALLINT", "TINYINT", "DECIMAL",
    "NUMERIC", "FLOAT", "REAL", "BIT", "CHAR", "VARCHAR", "TEXT", "NCHAR", "NVARCHAR", "NTEXT",
    "DATE", "TIME", "DATETIME", "DATETIME2", "SMALLDATETIME", "TIMESTAMP", "BINARY", "VARBINARY",
    "IMAGE", "UNIQUEIDENTIFIER", "XML", "JSON", "SQL_VARIANT", "ENUM", "WITH", "RECURSIVE", "CTE",
    "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "CHECK", "DEFAULT", "UNIQUE", "CONSTRAINT", "AVG",
    "SUM", "COUNT", "MIN", "MAX", "ABS", "CEIL", "CEILING", "FLOOR", "ROUND", "EXP", "LOG",
    "LOG10", "POWER", "SQRT", "MOD", "PI", "SIN", "COS", "TAN", "ASIN", "ACOS", "ATAN", "ATAN2",
    "RAND", "SIGN",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Create the query language entry
pub fn query_language() -> BuiltinLanguage {
    BuiltinLanguage::new("sql", &["sql"], |overrides| {
        super::lexer_factory("sql", scan, overrides)
    })
}

/// Scan query text into tokens
///
/// Whitespace is left as gap. An unterminated string runs to the end of
/// input.
pub fn scan(text: &str) -> Vec<Token<QueryKind>> {
    let mut cursor = Cursor::new(text);
    let mut sink = TokenSink::new();

    while let Some(ch) = cursor.peek() {
        let start = cursor.pos();

        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        if ch == '-' && cursor.peek_nth(1) == Some('-') {
            cursor.eat_line();
            sink.push(start, cursor.pos(), QueryKind::Comment);
            continue;
        }

        if ch == '\'' {
            scan_string(&mut cursor);
            sink.push(start, cursor.pos(), QueryKind::StringValue);
            continue;
        }

        if ch.is_ascii_digit() {
            cursor.eat_while(|c| c.is_ascii_digit() || c == '.');
            sink.push(start, cursor.pos(), QueryKind::Number);
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
            let word = &text[start..cursor.pos()];
            let kind = if is_keyword(word) {
                QueryKind::Keyword
            } else {
                QueryKind::Identifier
            };
            sink.push(start, cursor.pos(), kind);
            continue;
        }

        let kind = match ch {
            '=' | '>' | '<' | '!' | '+' | '-' | '*' | '/' | '%' => QueryKind::Operator,
            ',' => QueryKind::Comma,
            '.' => QueryKind::Dot,
            '(' => QueryKind::OpenParenthesis,
            ')' => QueryKind::CloseParenthesis,
            ';' => QueryKind::SequenceTerminator,
            _ => QueryKind::NotDefined,
        };
        cursor.bump();
        sink.push(start, cursor.pos(), kind);
    }

    sink.finish()
}

/// Advance over a string literal; `''` inside it is a literal quote
fn scan_string(cursor: &mut Cursor<'_>) {
    cursor.bump();
    while let Some(ch) = cursor.bump() {
        if ch == '\'' {
            if cursor.at('\'') {
                cursor.bump();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use QueryKind::*;

    fn pairs(text: &str) -> Vec<(QueryKind, &str)> {
        scan(text).iter().map(|t| (t.kind, t.text(text))).collect()
    }

    #[test]
    fn test_doubled_quote_and_comment() {
        let source = "SELECT 'a''b' FROM t; -- c\n";
        assert_eq!(
            pairs(source),
            vec![
                (Keyword, "SELECT"),
                (StringValue, "'a''b'"),
                (Keyword, "FROM"),
                (Identifier, "t"),
                (SequenceTerminator, ";"),
                (Comment, "-- c\n"),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            pairs("select Count(*) from users"),
            vec![
                (Keyword, "select"),
                (Keyword, "Count"),
                (OpenParenthesis, "("),
                (Operator, "*"),
                (CloseParenthesis, ")"),
                (Keyword, "from"),
                (Identifier, "users"),
            ]
        );
    }

    #[test]
    fn test_numbers_dots_and_operators() {
        assert_eq!(
            pairs("a.b>=1.5,#"),
            vec![
                (Identifier, "a"),
                (Dot, "."),
                (Identifier, "b"),
                (Operator, ">"),
                (Operator, "="),
                (Number, "1.5"),
                (Comma, ","),
                (NotDefined, "#"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let source = "SELECT 'open";
        let tokens = scan(source);
        assert_eq!(tokens.last().unwrap().kind, StringValue);
        assert_eq!(tokens.last().unwrap().span.end(), source.len());
    }

    #[test]
    fn test_comment_at_end_without_newline() {
        assert_eq!(pairs("1 -- done"), vec![(Number, "1"), (Comment, "-- done")]);
    }

    #[test]
    fn test_single_dash_is_operator() {
        assert_eq!(pairs("-1"), vec![(Operator, "-"), (Number, "1")]);
    }
}
