//! Highlighting manager
//!
//! Per-document coordinator: owns the attached definition, the compiled
//! rules for the current theme snapshot, the spell-check toggle and the
//! deferred-refresh slot. One manager per document; managers for
//! different documents share only the read-only definition cache and
//! may run in parallel. Within a document, highlighting is strictly
//! sequential in block order because of the one-bit carry.

use std::path::Path;
use std::sync::Arc;

use crate::compile::{compile, CompiledRules};
use crate::definition::{DefinitionLoader, SyntaxDefinition};
use crate::error::{HighlightError, Result};
use crate::highlight::BlockState;
use crate::host::{DocumentModel, SettingsSource};
use crate::spell::SpellChecker;
use crate::theme::Theme;

/// Single-slot coalescing queue for deferred re-highlight requests
///
/// A settings or definition change requests a refresh; requests made
/// before the slot is drained collapse into one. Dropping superseded
/// requests is safe because highlighting is idempotent: running it
/// once with the final state converges to the correct answer.
#[derive(Debug, Default)]
struct RefreshSlot {
    pending: bool,
}

impl RefreshSlot {
    fn request(&mut self) {
        self.pending = true;
    }

    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Highlighting façade for a single document
pub struct HighlightManager {
    loader: DefinitionLoader,
    definition: Arc<SyntaxDefinition>,
    theme: Theme,
    rules: CompiledRules,
    spell_checker: Option<Arc<dyn SpellChecker>>,
    spell_enabled: bool,
    refresh: RefreshSlot,
}

impl HighlightManager {
    /// Create a manager with no definition attached (plain text)
    pub fn new(loader: DefinitionLoader, theme: Theme) -> Self {
        let definition = Arc::new(SyntaxDefinition::plain());
        let rules = compile(&definition, &theme);
        Self {
            loader,
            definition,
            theme,
            rules,
            spell_checker: None,
            spell_enabled: false,
            refresh: RefreshSlot::default(),
        }
    }

    /// Attach the definition at `path` and request a deferred refresh
    ///
    /// On any load failure the manager falls back to the plain-text
    /// definition, so the document renders unhighlighted rather than
    /// interrupting editing; the returned error is a non-fatal notice
    /// for the shell's status line.
    pub fn attach_definition(&mut self, path: &Path) -> Result<()> {
        match self.loader.load(path) {
            Ok(definition) => {
                self.set_definition(definition);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "definition unavailable, using plain text");
                self.set_definition(Arc::new(SyntaxDefinition::plain()));
                Err(err)
            }
        }
    }

    /// Attach the definition the settings map to a file type tag
    pub fn attach_for_file_type(
        &mut self,
        settings: &dyn SettingsSource,
        file_type: &str,
    ) -> Result<()> {
        match settings.definition_path(file_type) {
            Some(path) => self.attach_definition(&path),
            None => {
                self.set_definition(Arc::new(SyntaxDefinition::plain()));
                Ok(())
            }
        }
    }

    /// Attach an already-built definition
    pub fn set_definition(&mut self, definition: Arc<SyntaxDefinition>) {
        self.definition = definition;
        self.recompile();
        self.refresh.request();
    }

    /// Recompile rules against a new theme snapshot
    ///
    /// The attached definition is kept; only the attribute bindings
    /// change. Requests a deferred refresh.
    pub fn theme_changed(&mut self, theme: Theme) {
        self.theme = theme;
        self.recompile();
        self.refresh.request();
    }

    /// Toggle the spell-check pass
    pub fn set_spell_check_enabled(&mut self, enabled: bool) {
        if self.spell_enabled != enabled {
            self.spell_enabled = enabled;
            self.refresh.request();
        }
    }

    /// Whether the spell-check pass is enabled
    pub fn spell_check_enabled(&self) -> bool {
        self.spell_enabled
    }

    /// Attach the spell checker queried by the spell pass
    ///
    /// With no checker attached the pass is a silent no-op.
    pub fn attach_spell_checker(&mut self, checker: Arc<dyn SpellChecker>) {
        self.spell_checker = Some(checker);
        self.refresh.request();
    }

    /// The currently attached definition
    pub fn definition(&self) -> &SyntaxDefinition {
        &self.definition
    }

    /// Patterns from the attached definition that failed to compile,
    /// for batch reporting
    pub fn skipped_patterns(&self) -> &[HighlightError] {
        &self.rules.skipped
    }

    /// Whether a deferred refresh is waiting to be drained
    pub fn refresh_pending(&self) -> bool {
        self.refresh.pending
    }

    /// Drain the refresh slot, running a full pass if one was pending
    ///
    /// Called by the host's scheduling primitive after the current
    /// event turn, never inline during file load. Returns whether a
    /// pass ran.
    pub fn poll<D: DocumentModel + ?Sized>(&mut self, doc: &mut D) -> bool {
        if self.refresh.take() {
            self.refresh_all(doc);
            true
        } else {
            false
        }
    }

    /// Highlight every block, front to back
    pub fn refresh_all<D: DocumentModel + ?Sized>(&self, doc: &mut D) {
        let mut carry = BlockState::Closed;
        for index in 0..doc.block_count() {
            carry = self.apply_block(doc, index, carry);
        }
    }

    /// Re-highlight from the first dirty block until the carry settles
    ///
    /// The dirty block is always re-highlighted; the walk continues to
    /// the following block only while a block's carry-out actually
    /// changed from its stored value, so an edit that does not open or
    /// close a comment span touches exactly one block. Returns the
    /// index one past the last block touched.
    pub fn rehighlight_from<D: DocumentModel + ?Sized>(
        &self,
        doc: &mut D,
        first_dirty: usize,
    ) -> usize {
        let count = doc.block_count();
        if first_dirty >= count {
            return first_dirty;
        }

        let mut carry = if first_dirty == 0 {
            BlockState::Closed
        } else {
            doc.block_state(first_dirty - 1)
        };

        let mut index = first_dirty;
        while index < count {
            let stored_out = doc.block_state(index);
            carry = self.apply_block(doc, index, carry);
            index += 1;
            if carry == stored_out {
                break;
            }
        }
        index
    }

    /// Highlight one block and write the results back to the document
    fn apply_block<D: DocumentModel + ?Sized>(
        &self,
        doc: &mut D,
        index: usize,
        carry_in: BlockState,
    ) -> BlockState {
        let result = self
            .rules
            .highlight_block(doc.block_text(index), carry_in, self.active_spell());
        doc.clear_format(index);
        for range in &result.ranges {
            doc.set_format(index, range);
        }
        doc.set_block_state(index, result.end_state);
        result.end_state
    }

    fn recompile(&mut self) {
        self.rules = compile(&self.definition, &self.theme);
    }

    fn active_spell(&self) -> Option<&dyn SpellChecker> {
        if self.spell_enabled {
            self.spell_checker.as_deref()
        } else {
            None
        }
    }
}
