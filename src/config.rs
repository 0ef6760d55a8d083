//! Configuration file support
//!
//! Loads render settings from ~/.inkmark.toml (or %USERPROFILE%\.inkmark.toml
//! on Windows). Every key is optional; missing keys keep their defaults.
//!
//! Example:
//! ```toml
//! [headings]
//! level1 = "bright_magenta"
//! level2_to_4 = { fg = "cyan", bold = true }
//!
//! [code_block]
//! border = "rounded"
//! padding = { left = 2 }
//!
//! [list]
//! marker = "*"
//!
//! [highlight.sql]
//! Keyword = { fg = "magenta", bold = true }
//! fallback = { fg = "white" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::layout::{Border, Padding};
use crate::syntax::{Color, Style, StyleOverrides};

/// Styles for the heading tiers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingConfig {
    /// Color of level-1 display text
    pub level1: Color,
    /// Style for levels 2 to 4
    pub level2_to_4: Style,
    /// Secondary style for levels 5 and deeper
    pub level5_plus: Style,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            level1: Color::White,
            level2_to_4: Style::fg(Color::Yellow).with_bold(),
            level5_plus: Style::fg(Color::Yellow),
        }
    }
}

/// Border and padding of a framed block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    pub border: Border,
    pub border_style: Style,
    pub padding: Padding,
}

impl FrameConfig {
    pub fn new(border: Border, border_style: Style, padding: Padding) -> Self {
        Self {
            border,
            border_style,
            padding,
        }
    }

    /// Default frame of fenced and indented code
    pub fn code_block() -> Self {
        Self::new(Border::Left, Style::fg(Color::Blue), Padding::left(1))
    }

    /// Default frame of block quotes
    pub fn quote_block() -> Self {
        Self::new(Border::Left, Style::fg(Color::Green), Padding::uniform(1))
    }
}

/// A `[code_block]` or `[quote_block]` table; unset keys keep the block's
/// own default
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrameTable {
    border: Option<Border>,
    border_style: Option<Style>,
    padding: Option<Padding>,
}

impl FrameTable {
    fn over(self, base: FrameConfig) -> FrameConfig {
        FrameConfig {
            border: self.border.unwrap_or(base.border),
            border_style: self.border_style.unwrap_or(base.border_style),
            padding: self.padding.unwrap_or(base.padding),
        }
    }
}

fn code_block_frame<'de, D>(deserializer: D) -> std::result::Result<FrameConfig, D::Error>
where
    D: Deserializer<'de>,
{
    FrameTable::deserialize(deserializer).map(|table| table.over(FrameConfig::code_block()))
}

fn quote_block_frame<'de, D>(deserializer: D) -> std::result::Result<FrameConfig, D::Error>
where
    D: Deserializer<'de>,
{
    FrameTable::deserialize(deserializer).map(|table| table.over(FrameConfig::quote_block()))
}

/// Bullet glyph and style for unordered lists
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
    pub marker: char,
    pub marker_style: Style,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            marker: '○',
            marker_style: Style::fg(Color::Green),
        }
    }
}

/// Table border settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub border: Border,
    pub border_style: Style,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            border: Border::Square,
            border_style: Style::fg(Color::White),
        }
    }
}

/// Render configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub headings: HeadingConfig,
    #[serde(deserialize_with = "code_block_frame")]
    pub code_block: FrameConfig,
    #[serde(deserialize_with = "quote_block_frame")]
    pub quote_block: FrameConfig,
    pub list: ListConfig,
    pub table: TableConfig,
    /// Per-language style overrides, keyed by language tag then kind name
    pub highlight: BTreeMap<String, StyleOverrides>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            headings: HeadingConfig::default(),
            code_block: FrameConfig::code_block(),
            quote_block: FrameConfig::quote_block(),
            list: ListConfig::default(),
            table: TableConfig::default(),
            highlight: BTreeMap::new(),
        }
    }
}

impl RenderConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".inkmark.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".inkmark.toml"))
        }
    }

    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), "loading config file");
        toml::from_str(&contents).map_err(|source| RenderError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
