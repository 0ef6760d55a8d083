//! Span compositor
//!
//! Stitches a token list and the gaps between tokens into a run sequence
//! that covers the source exactly once. Concatenating the run texts always
//! reproduces the source.

use super::style::Style;
use super::styles::StyleMap;
use super::tokens::{Token, TokenKind};

/// A slice of source text with the style it is drawn in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun<'a> {
    pub text: &'a str,
    pub style: Style,
}

/// Accumulator threaded through one compose pass
struct RunBuilder<'a> {
    source: &'a str,
    cursor: usize,
    runs: Vec<StyledRun<'a>>,
}

impl<'a> RunBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            runs: Vec::new(),
        }
    }

    /// Emit `[cursor, end)` in the given style and move the cursor to `end`
    fn emit(&mut self, end: usize, style: Style) {
        if end <= self.cursor {
            return;
        }
        self.runs.push(StyledRun {
            text: &self.source[self.cursor..end],
            style,
        });
        self.cursor = end;
    }

    fn finish(mut self, fallback: Style) -> Vec<StyledRun<'a>> {
        let len = self.source.len();
        self.emit(len, fallback);
        self.runs
    }
}

/// Compose tokens and gaps into styled runs
///
/// Tokens may arrive in any order; they are sorted by start with ties kept
/// in emission order. Gaps take the map's fallback style. Should two tokens
/// overlap, the later-starting one keeps the shared region. Tokens whose
/// bounds fall outside the source or off a char boundary are treated as gap.
pub fn compose<'a, K: TokenKind>(
    source: &'a str,
    tokens: &[Token<K>],
    styles: &StyleMap<K>,
) -> Vec<StyledRun<'a>> {
    let mut ordered: Vec<&Token<K>> = tokens
        .iter()
        .filter(|token| source.get(token.span.start..token.span.end()).is_some())
        .collect();
    ordered.sort_by_key(|token| token.span.start);

    let fallback = styles.fallback();
    let mut builder = RunBuilder::new(source);

    for (i, token) in ordered.iter().enumerate() {
        let start = token.span.start.max(builder.cursor);
        let mut end = token.span.end();
        if let Some(next) = ordered.get(i + 1) {
            end = end.min(next.span.start);
        }
        if end <= start {
            continue;
        }
        builder.emit(start, fallback.clone());
        builder.emit(end, styles.style(token.kind));
    }

    builder.finish(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::builtin::query::{self, QueryKind};
    use crate::syntax::style::Color;
    use crate::syntax::tokens::Span;

    fn joined(runs: &[StyledRun<'_>]) -> String {
        runs.iter().map(|run| run.text).collect()
    }

    #[test]
    fn test_empty_source() {
        let runs = compose::<QueryKind>("", &[], &StyleMap::new());
        assert!(runs.is_empty());
        assert_eq!(joined(&runs), "");
    }

    #[test]
    fn test_gaps_use_fallback() {
        let styles = StyleMap::new().with_fallback(Style::fg(Color::Red));
        let source = "SELECT  1";
        let runs = compose(source, &query::scan(source), &styles);

        assert_eq!(joined(&runs), source);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].text, "  ");
        assert_eq!(runs[1].style, Style::fg(Color::Red));
        assert_eq!(runs[0].style, QueryKind::Keyword.default_style());
    }

    #[test]
    fn test_unsorted_tokens() {
        let source = "a,b";
        let tokens = vec![
            Token::new(Span::new(2, 1), QueryKind::Identifier),
            Token::new(Span::new(0, 1), QueryKind::Identifier),
            Token::new(Span::new(1, 1), QueryKind::Comma),
        ];
        let runs = compose(source, &tokens, &StyleMap::new());
        let texts: Vec<_> = runs.iter().map(|run| run.text).collect();
        assert_eq!(texts, vec!["a", ",", "b"]);
    }

    #[test]
    fn test_overlap_later_start_wins() {
        let source = "abcdef";
        let tokens = vec![
            Token::new(Span::new(0, 4), QueryKind::Identifier),
            Token::new(Span::new(2, 4), QueryKind::Keyword),
        ];
        let runs = compose(source, &tokens, &StyleMap::new());
        assert_eq!(joined(&runs), source);
        assert_eq!(runs[0].text, "ab");
        assert_eq!(runs[1].text, "cdef");
        assert_eq!(runs[1].style, QueryKind::Keyword.default_style());
    }

    #[test]
    fn test_out_of_bounds_token_becomes_gap() {
        let source = "é1";
        let tokens = vec![
            Token::new(Span::new(1, 1), QueryKind::Number),
            Token::new(Span::new(2, 5), QueryKind::Number),
        ];
        let runs = compose(source, &tokens, &StyleMap::new());
        assert_eq!(joined(&runs), source);
        assert_eq!(runs.len(), 1);
    }
}
