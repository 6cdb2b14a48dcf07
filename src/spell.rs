//! Spell-check adapter
//!
//! The engine only ever asks two questions of a spell checker: is this
//! word correct, and what might the writer have meant. The system
//! checker lives in the editor shell; this module owns the word
//! segmentation and the underline pass, plus a wordlist-backed checker
//! for tests and offline use.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::style::HighlightedRange;

/// Query interface to an external spell checker
pub trait SpellChecker {
    /// Whether a word is spelled correctly
    fn is_correct(&self, word: &str) -> bool;

    /// Replacement candidates for a word, best first. Always finite.
    fn suggestions(&self, word: &str) -> Vec<String>;
}

/// Iterate the checkable words of a block with their byte offsets
///
/// Boundary policy, applied uniformly everywhere: UAX-29 word
/// boundaries. A contraction like "don't" is one word; a hyphenated
/// compound like "well-known" splits at the hyphen and each part is
/// checked on its own. Runs without an alphabetic character (numbers,
/// punctuation, whitespace) are not words.
pub fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_word_bound_indices()
        .filter(|(_, word)| word.chars().any(char::is_alphabetic))
}

/// Run the spell pass over one block
///
/// Emits an additive underline range per misspelled word. Underlines
/// never replace color or weight applied by the syntax passes.
pub fn misspelled_ranges(text: &str, checker: &dyn SpellChecker) -> Vec<HighlightedRange> {
    words(text)
        .filter(|(_, word)| !checker.is_correct(word))
        .map(|(start, word)| HighlightedRange::underline(start, word.len()))
        .collect()
}

/// A spell checker backed by a plain word list
///
/// Lookup is case-insensitive, so "The" and "the" are both correct if
/// either is listed. Suggestions are list entries within one edit of
/// the queried word, alphabetically ordered.
#[derive(Debug, Default)]
pub struct WordListChecker {
    words: HashSet<String>,
}

impl WordListChecker {
    /// Build a checker from an iterator of known-good words
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl SpellChecker for WordListChecker {
    fn is_correct(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    fn suggestions(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let mut candidates: Vec<String> = self
            .words
            .iter()
            .filter(|known| within_one_edit(&word, known))
            .cloned()
            .collect();
        candidates.sort();
        candidates
    }
}

/// Whether `a` and `b` differ by at most one insertion, deletion or
/// substitution
fn within_one_edit(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if long.len() - short.len() > 1 {
        return false;
    }

    let mut i = 0;
    let mut j = 0;
    let mut edited = false;
    while i < short.len() && j < long.len() {
        if short[i] == long[j] {
            i += 1;
            j += 1;
            continue;
        }
        if edited {
            return false;
        }
        edited = true;
        if short.len() == long.len() {
            i += 1; // substitution
        }
        j += 1; // insertion into the longer word
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> WordListChecker {
        WordListChecker::new(["the", "quick", "brown", "fox", "don't", "well", "known"])
    }

    #[test]
    fn test_word_boundaries() {
        let found: Vec<(usize, &str)> = words("the quick, brown fox!").collect();
        assert_eq!(
            found,
            vec![(0, "the"), (4, "quick"), (11, "brown"), (17, "fox")]
        );
    }

    #[test]
    fn test_contraction_is_one_word() {
        let found: Vec<&str> = words("don't panic").map(|(_, w)| w).collect();
        assert_eq!(found, vec!["don't", "panic"]);
    }

    #[test]
    fn test_hyphenation_splits() {
        let found: Vec<&str> = words("well-known").map(|(_, w)| w).collect();
        assert_eq!(found, vec!["well", "known"]);
    }

    #[test]
    fn test_numbers_are_not_words() {
        assert_eq!(words("42 7f").count(), 1); // only "7f" has a letter
    }

    #[test]
    fn test_is_correct_case_insensitive() {
        let checker = checker();
        assert!(checker.is_correct("The"));
        assert!(checker.is_correct("QUICK"));
        assert!(!checker.is_correct("teh"));
    }

    #[test]
    fn test_misspelled_ranges() {
        let checker = checker();
        let ranges = misspelled_ranges("the qick fox", &checker);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, 4);
        assert_eq!(ranges[0].len, 4);
        assert!(ranges[0].underline_only);
        assert!(ranges[0].attr.underline);
    }

    #[test]
    fn test_suggestions_within_one_edit() {
        let checker = checker();
        assert_eq!(checker.suggestions("qick"), vec!["quick".to_string()]);
        assert_eq!(checker.suggestions("browns"), vec!["brown".to_string()]);
        assert!(checker.suggestions("xyzzy").is_empty());
    }

    #[test]
    fn test_within_one_edit() {
        assert!(within_one_edit("fox", "fox"));
        assert!(within_one_edit("fx", "fox"));
        assert!(within_one_edit("fax", "fox"));
        assert!(within_one_edit("foxy", "fox"));
        assert!(!within_one_edit("fat", "fox"));
        assert!(!within_one_edit("foxes", "fox"));
    }
}
