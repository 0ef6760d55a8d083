//! Highlighter registry
//!
//! Maps language tags to highlighter factories. Tags are normalized to
//! trimmed lowercase, so lookup is case-insensitive.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::builtin;
use super::highlighter::HighlighterFactory;
use super::styles::StyleOverrides;
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::layout::LayoutNode;

/// Normalize a language tag for lookup
fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Language tag to highlighter mapping
///
/// Cloning is cheap: factories are shared, so a clone can be adjusted
/// without affecting renders that hold the original.
#[derive(Clone)]
pub struct HighlighterRegistry {
    entries: HashMap<String, HighlighterFactory>,
}

impl HighlighterRegistry {
    /// Create a registry seeded with the built-in languages
    pub fn new() -> Self {
        let empty = StyleOverrides::new();
        let mut registry = Self::empty();
        for language in builtin::all_languages() {
            match language.build(&empty) {
                Ok(factory) => registry.register_language(language.tags, factory),
                // Default styles never fail to apply
                Err(err) => debug!(language = language.name, %err, "skipping built-in language"),
            }
        }
        registry
    }

    /// Create a registry with no entries
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a seeded registry with the configured style overrides applied
    ///
    /// Each `[highlight.<tag>]` table may name any tag of a built-in
    /// language; it applies to every tag of that language. Tables naming
    /// tags of the same language are merged, with tables whose tag sorts
    /// later winning on a shared key.
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        let languages = builtin::all_languages();

        let mut overrides: HashMap<&'static str, StyleOverrides> = HashMap::new();
        for (tag, styles) in &config.highlight {
            let tag = normalize(tag);
            let language = languages
                .iter()
                .find(|language| language.has_tag(&tag))
                .ok_or_else(|| RenderError::UnknownLanguage(tag.clone()))?;
            overrides
                .entry(language.name)
                .or_default()
                .extend(styles.iter().map(|(key, style)| (key.clone(), style.clone())));
        }

        let empty = StyleOverrides::new();
        let mut registry = Self::empty();
        for language in &languages {
            let styles = overrides.get(language.name).unwrap_or(&empty);
            let factory = language.build(styles)?;
            registry.register_language(language.tags, factory);
        }
        Ok(registry)
    }

    fn register_language(&mut self, tags: &[&str], factory: HighlighterFactory) {
        for tag in tags {
            self.register(tag, Arc::clone(&factory));
        }
    }

    /// Register or replace the highlighter for a tag
    pub fn register(&mut self, tag: &str, factory: HighlighterFactory) {
        let tag = normalize(tag);
        trace!(%tag, "registering highlighter");
        self.entries.insert(tag, factory);
    }

    /// Register a plain function or closure as the highlighter for a tag
    pub fn register_fn<F>(&mut self, tag: &str, highlight: F)
    where
        F: Fn(&str) -> LayoutNode + Send + Sync + 'static,
    {
        self.register(tag, Arc::new(highlight));
    }

    /// Remove the highlighter for a tag, returning it if present
    pub fn remove(&mut self, tag: &str) -> Option<HighlighterFactory> {
        let removed = self.entries.remove(&normalize(tag));
        debug!(tag, removed = removed.is_some(), "removing highlighter");
        removed
    }

    /// Reuse the highlighter registered under `existing` for `new_tag`
    ///
    /// Returns false if `existing` is not registered.
    pub fn alias(&mut self, existing: &str, new_tag: &str) -> bool {
        match self.get(existing).cloned() {
            Some(factory) => {
                self.register(new_tag, factory);
                true
            }
            None => false,
        }
    }

    /// Look up the highlighter for a tag
    pub fn get(&self, tag: &str) -> Option<&HighlighterFactory> {
        self.entries.get(&normalize(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Highlight code with the highlighter for a tag, if one is registered
    pub fn highlight(&self, tag: &str, code: &str) -> Option<LayoutNode> {
        self.get(tag).map(|factory| factory(code))
    }

    /// List registered tags, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.entries.keys().map(|s| s.as_str()).collect();
        tags.sort();
        tags
    }
}

impl Default for HighlighterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HighlighterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlighterRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}
