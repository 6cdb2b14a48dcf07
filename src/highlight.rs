//! The incremental block highlighter
//!
//! One block (line) is highlighted at a time, in three passes: ordinary
//! pattern rules, block comment resolution, then spell underlining. The
//! only thing carried between blocks is a single bit (whether a block
//! comment is still open at the end of the block), so re-highlighting
//! after an edit touches the edited block and at most the run of blocks
//! whose carry actually changed, never the whole document.

use crate::compile::CompiledRules;
use crate::spell::{self, SpellChecker};
use crate::style::HighlightedRange;

/// The one-bit carry between consecutive blocks
///
/// The first block of a document starts from `Closed`. Correctness of
/// block N+1 depends only on this bit from block N, not on any other
/// block's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockState {
    /// No block comment continues past the end of the block
    #[default]
    Closed,
    /// An unterminated block comment is open at the end of the block
    Open,
}

impl BlockState {
    /// Whether a block comment is open at the end of the block
    pub fn is_open(&self) -> bool {
        matches!(self, BlockState::Open)
    }
}

/// Result of highlighting a single block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockResult {
    /// Styled ranges in application order
    pub ranges: Vec<HighlightedRange>,
    /// Carry for the next block
    pub end_state: BlockState,
}

impl CompiledRules {
    /// Highlight one block of text
    ///
    /// `prev_state` is the carry-out of the preceding block (`Closed`
    /// for the first block). Ranges are emitted in application order:
    /// rule matches, then block comment spans, then spell underlines.
    /// Never fails; a pattern that cannot match contributes nothing.
    pub fn highlight_block(
        &self,
        text: &str,
        prev_state: BlockState,
        spell: Option<&dyn SpellChecker>,
    ) -> BlockResult {
        let mut ranges = Vec::new();

        // Pass 1: every rule scans the whole block for non-overlapping
        // matches. Emission order is precedence: later rules win where
        // ranges overlap.
        for rule in &self.rules {
            for m in rule.pattern.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                ranges.push(HighlightedRange::new(m.start(), m.end() - m.start(), rule.attr));
            }
        }

        // Pass 2: block comment spans, emitted after the rule ranges so
        // comments take final precedence.
        let end_state = self.resolve_block_comments(text, prev_state, &mut ranges);

        // Pass 3: spell underlines are additive and never clear the
        // formatting the syntax passes applied.
        if let Some(checker) = spell {
            ranges.extend(spell::misspelled_ranges(text, checker));
        }

        BlockResult { ranges, end_state }
    }

    /// Resolve block comment spans against the carried-in state
    fn resolve_block_comments(
        &self,
        text: &str,
        prev_state: BlockState,
        ranges: &mut Vec<HighlightedRange>,
    ) -> BlockState {
        let Some(rule) = &self.block_comment else {
            // No delimiters: the phase is a no-op and the carry is
            // always closed. This also clears a stale Open carried
            // over from a previously attached definition.
            return BlockState::Closed;
        };

        let mut carried_in = prev_state.is_open();
        let mut search_from = 0;

        loop {
            let span_start = if carried_in {
                0
            } else {
                match rule.start.find_at(text, search_from) {
                    Some(m) => m.start(),
                    None => return BlockState::Closed,
                }
            };

            // The end search begins at the span start itself (block
            // start when carried in), so "/*/" is a complete comment.
            match rule.end.find_at(text, span_start) {
                Some(end) => {
                    let span_end = end.end();
                    if span_end > span_start {
                        ranges.push(HighlightedRange::new(
                            span_start,
                            span_end - span_start,
                            rule.attr,
                        ));
                    }
                    carried_in = false;
                    // Keep scanning: a block may hold several spans.
                    search_from = span_end.max(span_start + 1);
                    if search_from >= text.len() {
                        return BlockState::Closed;
                    }
                }
                None => {
                    if text.len() > span_start {
                        ranges.push(HighlightedRange::new(
                            span_start,
                            text.len() - span_start,
                            rule.attr,
                        ));
                    }
                    return BlockState::Open;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::definition::SyntaxDefinition;
    use crate::spell::WordListChecker;
    use crate::style::resolve_attr;
    use crate::theme::Theme;

    fn c_like() -> SyntaxDefinition {
        SyntaxDefinition {
            name: "test".to_string(),
            keywords: vec![r"\b(if|while|class|return)\b".to_string()],
            types: vec![r"\b(int|char)\b".to_string()],
            line_comment: "//[^\n]*".to_string(),
            block_comment_start: r"/\*".to_string(),
            block_comment_end: r"\*/".to_string(),
            ..Default::default()
        }
    }

    fn rules() -> CompiledRules {
        compile(&c_like(), &Theme::default())
    }

    fn attr_at(result: &BlockResult, pos: usize) -> Option<crate::style::TextAttribute> {
        resolve_attr(&result.ranges, pos)
    }

    #[test]
    fn test_keyword_and_type_rules() {
        let theme = Theme::default();
        let result = rules().highlight_block("if x { int y; }", BlockState::Closed, None);
        assert_eq!(result.end_state, BlockState::Closed);
        assert_eq!(attr_at(&result, 0), Some(theme.keyword));
        assert_eq!(attr_at(&result, 7), Some(theme.type_name));
        assert_eq!(attr_at(&result, 3), None); // plain "x"
    }

    #[test]
    fn test_idempotent() {
        let rules = rules();
        let a = rules.highlight_block("int x; /* open", BlockState::Closed, None);
        let b = rules.highlight_block("int x; /* open", BlockState::Closed, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_span_across_two_blocks() {
        let theme = Theme::default();
        let rules = rules();

        // Block 1 opens a comment that does not close
        let block1 = "int x; /* start of comment";
        let r1 = rules.highlight_block(block1, BlockState::Closed, None);
        assert_eq!(r1.end_state, BlockState::Open);
        assert_eq!(attr_at(&r1, 7), Some(theme.block_comment));
        assert_eq!(attr_at(&r1, block1.len() - 1), Some(theme.block_comment));
        assert_eq!(attr_at(&r1, 0), Some(theme.type_name)); // "int" before the span

        // Block 2 closes it and returns to ordinary rules
        let block2 = "still comment */ int y;";
        let r2 = rules.highlight_block(block2, BlockState::Open, None);
        assert_eq!(r2.end_state, BlockState::Closed);
        assert_eq!(attr_at(&r2, 0), Some(theme.block_comment));
        assert_eq!(attr_at(&r2, 15), Some(theme.block_comment)); // the '/' of "*/"
        assert_eq!(attr_at(&r2, 17), Some(theme.type_name)); // "int" after the span
        assert_eq!(attr_at(&r2, 16), None); // the space between
    }

    #[test]
    fn test_quote_overrides_keyword() {
        let theme = Theme::default();
        let result = rules().highlight_block(r#"x = "class";"#, BlockState::Closed, None);
        // The quoted occurrence is a string, not a keyword
        assert_eq!(attr_at(&result, 6), Some(theme.quote));
        assert_eq!(attr_at(&result, 4), Some(theme.quote)); // opening quote
    }

    #[test]
    fn test_keyword_outside_quotes_still_wins() {
        let theme = Theme::default();
        let result = rules().highlight_block(r#"class c = "class";"#, BlockState::Closed, None);
        assert_eq!(attr_at(&result, 0), Some(theme.keyword));
        assert_eq!(attr_at(&result, 12), Some(theme.quote));
    }

    #[test]
    fn test_line_comment_overrides_quote() {
        let theme = Theme::default();
        let result = rules().highlight_block(r#"// a "quoted" remark"#, BlockState::Closed, None);
        assert_eq!(attr_at(&result, 6), Some(theme.comment));
        assert_eq!(attr_at(&result, 0), Some(theme.comment));
    }

    #[test]
    fn test_block_comment_overrides_rules() {
        let theme = Theme::default();
        let result = rules().highlight_block("int /* int */ x", BlockState::Closed, None);
        assert_eq!(attr_at(&result, 0), Some(theme.type_name));
        assert_eq!(attr_at(&result, 7), Some(theme.block_comment));
        assert_eq!(result.end_state, BlockState::Closed);
    }

    #[test]
    fn test_multiple_spans_in_one_block() {
        let theme = Theme::default();
        let result = rules().highlight_block("/* a */ if /* b */", BlockState::Closed, None);
        assert_eq!(result.end_state, BlockState::Closed);
        assert_eq!(attr_at(&result, 3), Some(theme.block_comment));
        assert_eq!(attr_at(&result, 8), Some(theme.keyword)); // "if" between spans
        assert_eq!(attr_at(&result, 15), Some(theme.block_comment));
    }

    #[test]
    fn test_second_span_left_open() {
        let result = rules().highlight_block("/* a */ x /* b", BlockState::Closed, None);
        assert_eq!(result.end_state, BlockState::Open);
    }

    #[test]
    fn test_slash_star_slash_is_complete() {
        // The end search starts at the span start, so the '*' serves
        // both delimiters
        let result = rules().highlight_block("/*/", BlockState::Closed, None);
        assert_eq!(result.end_state, BlockState::Closed);
        assert_eq!(result.ranges.last().unwrap().len, 3);
    }

    #[test]
    fn test_carried_state_spans_blank_block() {
        let result = rules().highlight_block("", BlockState::Open, None);
        assert_eq!(result.end_state, BlockState::Open);
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn test_carry_without_end_covers_whole_block() {
        let theme = Theme::default();
        let result = rules().highlight_block("no end here", BlockState::Open, None);
        assert_eq!(result.end_state, BlockState::Open);
        assert_eq!(attr_at(&result, 0), Some(theme.block_comment));
        assert_eq!(attr_at(&result, 10), Some(theme.block_comment));
    }

    #[test]
    fn test_no_delimiters_clears_stale_open() {
        let mut def = c_like();
        def.block_comment_start = String::new();
        def.block_comment_end = String::new();
        let rules = compile(&def, &Theme::default());
        let result = rules.highlight_block("int x;", BlockState::Open, None);
        assert_eq!(result.end_state, BlockState::Closed);
        // Ordinary rules still ran
        assert!(!result.ranges.is_empty());
    }

    #[test]
    fn test_zero_length_matches_emit_nothing() {
        let mut def = c_like();
        def.keywords.push("z*".to_string());
        let rules = compile(&def, &Theme::default());
        let result = rules.highlight_block("a zz b", BlockState::Closed, None);
        // Only the non-empty "zz" match from the degenerate pattern
        let from_z: Vec<_> = result.ranges.iter().filter(|r| r.start == 2).collect();
        assert_eq!(from_z.len(), 1);
        assert_eq!(from_z[0].len, 2);
        assert!(result.ranges.iter().all(|r| r.len > 0));
    }

    #[test]
    fn test_spell_pass_is_additive_inside_comment() {
        let theme = Theme::default();
        let checker = WordListChecker::new(["end"]);
        let result = rules().highlight_block("// teh end", BlockState::Closed, Some(&checker));

        // "teh" keeps the comment color and gains the underline
        let at_teh = attr_at(&result, 4).unwrap();
        assert_eq!(at_teh.color, theme.comment.color);
        assert!(at_teh.underline);

        // "end" is spelled fine: comment color, no underline
        let at_end = attr_at(&result, 8).unwrap();
        assert_eq!(at_end.color, theme.comment.color);
        assert!(!at_end.underline);

        // The underline range itself is additive, not replacing
        let underline = result.ranges.iter().find(|r| r.underline_only).unwrap();
        assert_eq!(underline.start, 3);
        assert_eq!(underline.len, 3);
    }

    #[test]
    fn test_no_spell_checker_is_a_noop() {
        let with = rules().highlight_block("int x;", BlockState::Closed, None);
        assert!(with.ranges.iter().all(|r| !r.underline_only));
    }

    #[test]
    fn test_plain_definition_produces_no_ranges() {
        let rules = compile(&SyntaxDefinition::plain(), &Theme::default());
        let result = rules.highlight_block("if x { /* c */ }", BlockState::Closed, None);
        // Only the built-in quote rule exists and nothing here is quoted
        assert!(result.ranges.is_empty());
        assert_eq!(result.end_state, BlockState::Closed);
    }

    #[test]
    fn test_block_state_default() {
        assert_eq!(BlockState::default(), BlockState::Closed);
        assert!(!BlockState::Closed.is_open());
        assert!(BlockState::Open.is_open());
    }
}
