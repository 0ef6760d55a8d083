//! Error types for inkmark

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for inkmark operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Render and configuration error types
#[derive(Error, Debug)]
pub enum RenderError {
    /// An inline node shape the renderer was never taught
    #[error("Unsupported inline kind: {0}")]
    UnsupportedInline(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown style key {key:?} for language {language:?}")]
    UnknownStyleKey { language: String, key: String },

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
}
