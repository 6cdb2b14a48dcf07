//! Error types for the highlighting engine

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for highlighting operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighting error types
///
/// Nothing here is fatal to editing: definition-level failures are
/// reported once at load or compile time and the document falls back
/// to plain text. The per-block hot path never returns an error.
#[derive(Error, Debug)]
pub enum HighlightError {
    /// Requested syntax definition file does not exist
    #[error("syntax definition not found: {0}")]
    DefinitionNotFound(PathBuf),

    /// Syntax definition file exists but is not valid TOML
    #[error("malformed syntax definition {path}: {source}")]
    DefinitionParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A pattern in a definition failed to compile as a regex.
    /// The offending rule is skipped; the rest of the definition
    /// still highlights.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// I/O error while reading a definition or theme file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
