//! Syntax and styling module
//!
//! This module provides the styling infrastructure shared by the code
//! highlighters and the document renderer:
//! - Colors and styles
//! - The span/token model and the per-language lexers
//! - The span compositor and style maps
//! - The highlighter registry

mod cursor;
mod style;

pub mod builtin;
pub mod compose;
pub mod highlighter;
pub mod registry;
pub mod styles;
pub mod tokens;

pub use compose::{compose, StyledRun};
pub use highlighter::{HighlighterFactory, LexerHighlighter};
pub use registry::HighlighterRegistry;
pub use style::{Color, Style};
pub use styles::{StyleMap, StyleOverrides, FALLBACK_KEY};
pub use tokens::{Span, Token, TokenKind};
