//! Host collaborator interfaces
//!
//! The engine never reaches into global state. It is driven through two
//! narrow seams the editor shell implements: a [`DocumentModel`] that
//! supplies per-block text and stores applied formats plus the one-bit
//! carry, and a [`SettingsSource`] that supplies theme snapshots and
//! definition paths. [`InMemoryDocument`] is a line-vector
//! implementation used by tests and headless hosts.

use std::path::PathBuf;

use crate::highlight::BlockState;
use crate::style::{resolve_attr, HighlightedRange, TextAttribute};
use crate::theme::Theme;

/// The document/text-storage collaborator
///
/// Blocks are lines, addressed by index. The carry state is an explicit
/// per-block value owned by the document, written back after each block
/// is highlighted and read as "previous block state" when highlighting
/// resumes at the next block.
pub trait DocumentModel {
    /// Number of blocks in the document
    fn block_count(&self) -> usize;

    /// Text of one block, without its line terminator
    fn block_text(&self, index: usize) -> &str;

    /// Stored carry-out state of a block
    fn block_state(&self, index: usize) -> BlockState;

    /// Store a block's carry-out state
    fn set_block_state(&mut self, index: usize, state: BlockState);

    /// Drop all formatting on a block before re-applying ranges
    fn clear_format(&mut self, index: usize);

    /// Apply one computed range to a block
    ///
    /// May be called repeatedly with overlapping ranges: the last call
    /// wins for non-underline attributes, underline-only ranges merge
    /// into whatever is already there.
    fn set_format(&mut self, index: usize, range: &HighlightedRange);
}

/// Read-only view of the settings/theme collaborator
pub trait SettingsSource {
    /// Snapshot of the active theme
    fn current_theme(&self) -> Theme;

    /// Path of the syntax definition for a file type tag, if any
    fn definition_path(&self, file_type: &str) -> Option<PathBuf>;
}

/// A line-vector document for tests and headless hosts
///
/// Stores the applied ranges per block and resolves them on demand, so
/// the overwrite/additive semantics of [`DocumentModel::set_format`]
/// are observable.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    blocks: Vec<String>,
    states: Vec<BlockState>,
    formats: Vec<Vec<HighlightedRange>>,
}

impl InMemoryDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from text, one block per line
    pub fn from_text(text: &str) -> Self {
        let blocks: Vec<String> = text.lines().map(|l| l.to_string()).collect();
        let states = vec![BlockState::default(); blocks.len()];
        let formats = vec![Vec::new(); blocks.len()];
        Self {
            blocks,
            states,
            formats,
        }
    }

    /// Replace the text of one block, as an edit would
    ///
    /// The stored carry and formats for the block are left stale on
    /// purpose; re-highlighting is the manager's job.
    pub fn set_block_text(&mut self, index: usize, text: &str) {
        self.blocks[index] = text.to_string();
    }

    /// Effective attribute at a byte position of a block, if any
    pub fn attr_at(&self, index: usize, pos: usize) -> Option<TextAttribute> {
        resolve_attr(&self.formats[index], pos)
    }

    /// Ranges applied to a block, in application order
    pub fn applied_ranges(&self, index: usize) -> &[HighlightedRange] {
        &self.formats[index]
    }
}

impl DocumentModel for InMemoryDocument {
    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block_text(&self, index: usize) -> &str {
        &self.blocks[index]
    }

    fn block_state(&self, index: usize) -> BlockState {
        self.states[index]
    }

    fn set_block_state(&mut self, index: usize, state: BlockState) {
        self.states[index] = state;
    }

    fn clear_format(&mut self, index: usize) {
        self.formats[index].clear();
    }

    fn set_format(&mut self, index: usize, range: &HighlightedRange) {
        self.formats[index].push(range.clone());
    }
}
