//! Per-kind style lookup with caller overrides
//!
//! Every lexer kind has a documented default style (see each kind's
//! `default_style`). A [`StyleMap`] layers caller overrides on top, plus an
//! optional override for the gap fallback style.

use std::collections::{BTreeMap, HashMap};

use super::style::Style;
use super::tokens::TokenKind;
use crate::error::{RenderError, Result};

/// Kind-name keyed style overrides, as read from a configuration file
pub type StyleOverrides = BTreeMap<String, Style>;

/// Key that addresses the gap fallback slot in [`StyleOverrides`]
pub const FALLBACK_KEY: &str = "fallback";

/// Style lookup for one language's token kinds
#[derive(Debug, Clone)]
pub struct StyleMap<K: TokenKind> {
    overrides: HashMap<K, Style>,
    fallback: Option<Style>,
}

impl<K: TokenKind> StyleMap<K> {
    /// Create a map with no overrides
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            fallback: None,
        }
    }

    /// Builder: override the style for one kind
    pub fn with(mut self, kind: K, style: Style) -> Self {
        self.set(kind, style);
        self
    }

    /// Builder: override the gap fallback style
    pub fn with_fallback(mut self, style: Style) -> Self {
        self.fallback = Some(style);
        self
    }

    /// Override the style for one kind
    pub fn set(&mut self, kind: K, style: Style) {
        self.overrides.insert(kind, style);
    }

    /// Drop the override for one kind, restoring its default
    pub fn clear(&mut self, kind: K) {
        self.overrides.remove(&kind);
    }

    /// Style for a kind: the override if present, else the kind's default
    pub fn style(&self, kind: K) -> Style {
        self.overrides
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_style())
    }

    /// Style for text not covered by any token
    pub fn fallback(&self) -> Style {
        self.fallback.clone().unwrap_or_else(K::fallback_style)
    }

    /// Apply overrides keyed by kind name
    ///
    /// `language` only labels the error for an unknown key.
    pub fn apply(&mut self, language: &str, overrides: &StyleOverrides) -> Result<()> {
        for (key, style) in overrides {
            if key == FALLBACK_KEY {
                self.fallback = Some(style.clone());
                continue;
            }
            let kind = K::from_name(key).ok_or_else(|| RenderError::UnknownStyleKey {
                language: language.to_string(),
                key: key.clone(),
            })?;
            self.set(kind, style.clone());
        }
        Ok(())
    }
}

impl<K: TokenKind> Default for StyleMap<K> {
    fn default() -> Self {
        Self::new()
    }
}
