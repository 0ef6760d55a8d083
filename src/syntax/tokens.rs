//! Spans and tokens shared by every lexer
//!
//! A lexer turns source text into an ordered list of [`Token`]s, each a
//! half-open byte range tagged with a kind from that language's closed
//! kind enumeration.

use std::fmt;
use std::hash::Hash;

use super::style::Style;

/// Half-open byte range `[start, start + len)` into a source string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Length of the span in bytes
    pub len: usize,
}

impl Span {
    /// Create a span from a start offset and a length
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Create a span from start and end offsets
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// Byte offset where this span ends (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slice the source text covered by this span
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end()]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

/// A closed set of lexical kinds for one language
///
/// Implemented by each built-in lexer's kind enum. The names double as
/// the keys accepted in configuration files.
pub trait TokenKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every kind of this language, in declaration order
    const ALL: &'static [Self];

    /// Get the default style for this kind
    fn default_style(&self) -> Style;

    /// Style used for source text not covered by any token
    fn fallback_style() -> Style;

    /// Get a human-readable name for this kind
    fn name(&self) -> &'static str;

    /// Parse a kind from its name (for TOML loading)
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// A span tagged with a lexical kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<K> {
    pub span: Span,
    pub kind: K,
}

impl<K> Token<K> {
    pub fn new(span: Span, kind: K) -> Self {
        Self { span, kind }
    }

    /// Slice the source text covered by this token
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

impl<K: fmt::Debug> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.span, self.kind)
    }
}

/// Accumulates tokens during a scan, dropping zero-length spans
#[derive(Debug)]
pub(crate) struct TokenSink<K> {
    tokens: Vec<Token<K>>,
}

impl<K> TokenSink<K> {
    pub(crate) fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub(crate) fn push(&mut self, start: usize, end: usize, kind: K) {
        if end > start {
            self.tokens.push(Token::new(Span::from_bounds(start, end), kind));
        }
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Token<K>> {
        self.tokens.last_mut()
    }

    pub(crate) fn finish(self) -> Vec<Token<K>> {
        self.tokens
    }
}
