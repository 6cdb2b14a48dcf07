//! quill-syntax: incremental syntax highlighting for the Quill editor
//!
//! Highlighting is per block (line), driven by declarative rule sets:
//! regex pattern lists per syntactic category, a single-line comment
//! pattern and block comment delimiters, loaded from TOML files and
//! combined with a theme snapshot into an ordered rule list. Block
//! comments that cross line boundaries are resolved with a single bit
//! of state carried from each block to the next, so edits re-highlight
//! only the blocks they can actually affect.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_syntax::{
//!     DefinitionLoader, HighlightManager, InMemoryDocument, SyntaxDefinition, Theme,
//! };
//!
//! let mut manager = HighlightManager::new(DefinitionLoader::new(), Theme::default());
//! manager.set_definition(Arc::new(SyntaxDefinition {
//!     name: "c".to_string(),
//!     keywords: vec![r"\b(if|return)\b".to_string()],
//!     block_comment_start: r"/\*".to_string(),
//!     block_comment_end: r"\*/".to_string(),
//!     ..Default::default()
//! }));
//!
//! let mut doc = InMemoryDocument::from_text("if x; /* spans\nblocks */ return;");
//! manager.poll(&mut doc);
//! assert!(doc.attr_at(0, 0).is_some());
//! ```

mod compile;
mod definition;
mod error;
mod highlight;
mod host;
mod manager;
mod spell;
mod style;
mod theme;

pub use compile::{compile, BlockCommentRule, CompiledRule, CompiledRules};
pub use definition::{DefinitionLoader, SyntaxDefinition};
pub use error::{HighlightError, Result};
pub use highlight::{BlockResult, BlockState};
pub use host::{DocumentModel, InMemoryDocument, SettingsSource};
pub use manager::HighlightManager;
pub use spell::{SpellChecker, WordListChecker};
pub use style::{resolve_attr, Color, HighlightedRange, TextAttribute, Weight};
pub use theme::{Category, Theme};
