//! Syntax definitions and the definition loader
//!
//! A [`SyntaxDefinition`] is the declarative, file-type-specific source
//! of highlighting patterns: ordered regex lists per category plus the
//! comment delimiters. Definitions are loaded lazily from TOML files and
//! cached by path for the life of the process; reloading replaces the
//! cache entry wholesale.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{HighlightError, Result};

/// Per-file-type highlighting rule source
///
/// Pattern lists hold raw regex source strings in the order the
/// definition file supplies them. Blank entries are ignored at compile
/// time. Never mutated after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxDefinition {
    /// Definition name (e.g. "C")
    pub name: String,
    /// Compile all patterns with case folding
    pub case_insensitive: bool,
    /// Keyword patterns
    pub keywords: Vec<String>,
    /// Type name patterns
    pub types: Vec<String>,
    /// Class name patterns
    pub classes: Vec<String>,
    /// Function name patterns
    pub functions: Vec<String>,
    /// Constant patterns
    pub constants: Vec<String>,
    /// Single-line comment pattern (blank = none)
    pub line_comment: String,
    /// Block comment start pattern (blank = block comments disabled)
    pub block_comment_start: String,
    /// Block comment end pattern (blank = block comments disabled)
    pub block_comment_end: String,
}

impl SyntaxDefinition {
    /// The no-highlighting fallback: matches nothing, colors nothing
    ///
    /// Attached when a requested definition cannot be loaded, so the
    /// document renders as plain text instead of raising an error.
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            ..Default::default()
        }
    }

    /// Whether this definition supplies block comment delimiters
    pub fn has_block_comments(&self) -> bool {
        !self.block_comment_start.is_empty() && !self.block_comment_end.is_empty()
    }

    /// Parse definition TOML contents
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let table: toml::Table = contents.parse()?;
        let mut def = Self::default();

        if let Some(name) = table.get("name").and_then(|v| v.as_str()) {
            def.name = name.to_string();
        }
        def.case_insensitive = table
            .get("case-insensitive")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        def.keywords = string_list(&table, "keywords");
        def.types = string_list(&table, "types");
        def.classes = string_list(&table, "classes");
        def.functions = string_list(&table, "functions");
        def.constants = string_list(&table, "constants");

        def.line_comment = string_field(&table, "line-comment");
        def.block_comment_start = string_field(&table, "block-comment-start");
        def.block_comment_end = string_field(&table, "block-comment-end");

        Ok(def)
    }

    /// Load a definition from a TOML file without caching
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HighlightError::DefinitionNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|source| HighlightError::DefinitionParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn string_list(table: &toml::Table, key: &str) -> Vec<String> {
    table
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn string_field(table: &toml::Table, key: &str) -> String {
    table
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Path-keyed definition cache
///
/// The first load of a path parses the file; subsequent loads return
/// the cached instance without touching the filesystem. Clones share
/// one cache, so every document in the process sees the same
/// definitions. Entries are read-only once inserted.
#[derive(Debug, Clone, Default)]
pub struct DefinitionLoader {
    cache: Arc<Mutex<HashMap<PathBuf, Arc<SyntaxDefinition>>>>,
}

impl DefinitionLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a definition, parsing it on first request for this path
    pub fn load(&self, path: &Path) -> Result<Arc<SyntaxDefinition>> {
        if let Some(def) = self.cache.lock().unwrap().get(path) {
            tracing::debug!(path = %path.display(), "definition cache hit");
            return Ok(Arc::clone(def));
        }
        self.reload(path)
    }

    /// Parse the file now so later loads are cache hits
    pub fn preload(&self, path: &Path) -> Result<()> {
        self.load(path).map(|_| ())
    }

    /// Re-parse a definition and replace the cache entry wholesale
    pub fn reload(&self, path: &Path) -> Result<Arc<SyntaxDefinition>> {
        let def = Arc::new(SyntaxDefinition::load(path)?);
        tracing::debug!(path = %path.display(), name = %def.name, "definition loaded");
        self.cache
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), Arc::clone(&def));
        Ok(def)
    }
}
