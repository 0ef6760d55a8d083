//! Lexer-backed highlighters
//!
//! A highlighter turns raw code into a styled [`LayoutNode`]. The built-in
//! ones pair a lexer's `scan` function with a [`StyleMap`] and run the
//! result through the span compositor.

use std::fmt;
use std::sync::Arc;

use super::compose::{compose, StyledRun};
use super::styles::StyleMap;
use super::tokens::{Token, TokenKind};
use crate::layout::{LayoutNode, TextRun};

/// Shared factory turning code into a highlighted layout node
pub type HighlighterFactory = Arc<dyn Fn(&str) -> LayoutNode + Send + Sync>;

/// A highlighter built from a lexer and a style map
#[derive(Clone)]
pub struct LexerHighlighter<K: TokenKind> {
    name: &'static str,
    scan: fn(&str) -> Vec<Token<K>>,
    styles: StyleMap<K>,
}

impl<K: TokenKind> LexerHighlighter<K> {
    /// Create a highlighter using the kinds' default styles
    pub fn new(name: &'static str, scan: fn(&str) -> Vec<Token<K>>) -> Self {
        Self {
            name,
            scan,
            styles: StyleMap::new(),
        }
    }

    /// Builder: replace the style map
    pub fn with_styles(mut self, styles: StyleMap<K>) -> Self {
        self.styles = styles;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn styles(&self) -> &StyleMap<K> {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleMap<K> {
        &mut self.styles
    }

    /// Scan code into tokens
    pub fn tokens(&self, code: &str) -> Vec<Token<K>> {
        (self.scan)(code)
    }

    /// Scan and compose code into styled runs covering it exactly
    pub fn runs<'a>(&self, code: &'a str) -> Vec<StyledRun<'a>> {
        compose(code, &self.tokens(code), &self.styles)
    }

    /// Highlight code into a layout node
    ///
    /// Leading and trailing whitespace is trimmed before scanning.
    pub fn highlight(&self, code: &str) -> LayoutNode {
        let runs = self
            .runs(code.trim())
            .into_iter()
            .map(|run| LayoutNode::Text(TextRun::code(run.text, run.style)))
            .collect();
        LayoutNode::Composite(runs)
    }

    /// Wrap this highlighter into a shareable factory
    pub fn into_factory(self) -> HighlighterFactory {
        Arc::new(move |code: &str| self.highlight(code))
    }
}

impl<K: TokenKind> fmt::Debug for LexerHighlighter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexerHighlighter")
            .field("name", &self.name)
            .field("styles", &self.styles)
            .finish()
    }
}
