//! Rule compilation
//!
//! Combines a [`SyntaxDefinition`] with a [`Theme`] snapshot into the
//! ordered list of (pattern, attribute) pairs the block highlighter
//! consumes. Compilation is pure and deterministic: the same definition
//! and theme always produce the same rule sequence.

use regex::{Regex, RegexBuilder};

use crate::definition::SyntaxDefinition;
use crate::error::HighlightError;
use crate::style::TextAttribute;
use crate::theme::{Category, Theme};

/// Fixed built-in pattern for string literals: the shortest run
/// between two double-quote characters
const QUOTE_PATTERN: &str = r#""[^"]*""#;

/// A pattern bound to a concrete visual attribute, ready to apply
#[derive(Debug)]
pub struct CompiledRule {
    /// Category this rule came from
    pub category: Category,
    /// Compiled pattern
    pub pattern: Regex,
    /// Attribute applied to every match
    pub attr: TextAttribute,
}

/// Compiled block comment delimiters with their attribute
#[derive(Debug)]
pub struct BlockCommentRule {
    /// Pattern that opens a block comment
    pub start: Regex,
    /// Pattern that closes a block comment
    pub end: Regex,
    /// Attribute for the whole span
    pub attr: TextAttribute,
}

/// The ordered work unit consumed per block
///
/// Rule order encodes precedence: category rules first, then the quote
/// rule, then the single-line comment rule, with block comment spans
/// resolved last. Later ranges win where they overlap, so quoted
/// strings override keywords inside them and comments override
/// everything to their right.
#[derive(Debug)]
pub struct CompiledRules {
    /// Ordinary single-block rules, in application order
    pub rules: Vec<CompiledRule>,
    /// Block comment delimiters; `None` when the definition supplies
    /// no delimiters, which disables that phase entirely
    pub block_comment: Option<BlockCommentRule>,
    /// Patterns skipped because they failed to compile, collected once
    /// per compilation for batch reporting
    pub skipped: Vec<HighlightError>,
}

/// Compile a definition against a theme snapshot
///
/// A pattern that fails to compile is skipped and logged; the rest of
/// the definition still highlights. Compilation itself never fails.
pub fn compile(def: &SyntaxDefinition, theme: &Theme) -> CompiledRules {
    let mut rules = Vec::new();
    let mut skipped = Vec::new();

    let categories = [
        (&def.keywords, Category::Keyword),
        (&def.types, Category::Type),
        (&def.classes, Category::Class),
        (&def.functions, Category::Function),
        (&def.constants, Category::Constant),
    ];

    for (patterns, category) in categories {
        for pattern in patterns {
            if pattern.trim().is_empty() {
                continue;
            }
            match compile_pattern(pattern, def.case_insensitive) {
                Ok(regex) => rules.push(CompiledRule {
                    category,
                    pattern: regex,
                    attr: theme.attr(category),
                }),
                Err(err) => skip(&mut skipped, &def.name, err),
            }
        }
    }

    // Quote rule is a fixed built-in, placed after the category rules
    // so string contents override keyword matches inside them
    match compile_pattern(QUOTE_PATTERN, false) {
        Ok(regex) => rules.push(CompiledRule {
            category: Category::Quote,
            pattern: regex,
            attr: theme.attr(Category::Quote),
        }),
        Err(err) => skip(&mut skipped, &def.name, err),
    }

    // Single-line comments last: they take precedence over everything
    // to their right
    if !def.line_comment.trim().is_empty() {
        match compile_pattern(&def.line_comment, def.case_insensitive) {
            Ok(regex) => rules.push(CompiledRule {
                category: Category::Comment,
                pattern: regex,
                attr: theme.attr(Category::Comment),
            }),
            Err(err) => skip(&mut skipped, &def.name, err),
        }
    }

    let block_comment = if def.has_block_comments() {
        let start = compile_pattern(&def.block_comment_start, def.case_insensitive);
        let end = compile_pattern(&def.block_comment_end, def.case_insensitive);
        match (start, end) {
            (Ok(start), Ok(end)) => Some(BlockCommentRule {
                start,
                end,
                attr: theme.attr(Category::BlockComment),
            }),
            (start, end) => {
                // One bad delimiter disables the phase; half a block
                // comment rule cannot terminate spans
                for err in [start.err(), end.err()].into_iter().flatten() {
                    skip(&mut skipped, &def.name, err);
                }
                None
            }
        }
    } else {
        None
    };

    CompiledRules {
        rules,
        block_comment,
        skipped,
    }
}

fn compile_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, HighlightError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| HighlightError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn skip(skipped: &mut Vec<HighlightError>, definition: &str, err: HighlightError) {
    tracing::warn!(definition, %err, "skipping unusable pattern");
    skipped.push(err);
}
