//! Built-in highlighters
//!
//! This module provides the bespoke lexers for the languages highlighted
//! out of the box, and the registry entries that expose them.

pub mod json;
pub mod markup;
pub mod query;
pub mod script;

use super::highlighter::{HighlighterFactory, LexerHighlighter};
use super::styles::StyleOverrides;
use super::tokens::{Token, TokenKind};
use crate::error::Result;

type BuildFn = fn(&StyleOverrides) -> Result<HighlighterFactory>;

/// A built-in language and the tags it is registered under
pub struct BuiltinLanguage {
    /// Primary tag, also used to label configuration errors
    pub name: &'static str,
    /// Every tag the language is registered under
    pub tags: &'static [&'static str],
    build: BuildFn,
}

impl BuiltinLanguage {
    fn new(name: &'static str, tags: &'static [&'static str], build: BuildFn) -> Self {
        Self { name, tags, build }
    }

    /// Build the highlighter with the given style overrides applied
    pub fn build(&self, overrides: &StyleOverrides) -> Result<HighlighterFactory> {
        (self.build)(overrides)
    }

    /// Check if a (normalized) tag belongs to this language
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

/// Get all built-in languages
pub fn all_languages() -> Vec<BuiltinLanguage> {
    vec![
        markup::markup_language(),
        query::query_language(),
        script::script_language(),
        json::json_language(),
    ]
}

fn lexer_factory<K: TokenKind>(
    name: &'static str,
    scan: fn(&str) -> Vec<Token<K>>,
    overrides: &StyleOverrides,
) -> Result<HighlighterFactory> {
    let mut highlighter = LexerHighlighter::new(name, scan);
    highlighter.styles_mut().apply(name, overrides)?;
    Ok(highlighter.into_factory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_lowercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for language in all_languages() {
            assert!(language.has_tag(language.name));
            for tag in language.tags {
                assert_eq!(*tag, tag.to_lowercase());
                assert!(seen.insert(*tag), "duplicate tag {tag}");
            }
        }
    }

    #[test]
    fn test_build_with_defaults() {
        for language in all_languages() {
            let factory = language.build(&StyleOverrides::new()).unwrap();
            assert!(!factory("1").is_empty());
        }
    }
}
