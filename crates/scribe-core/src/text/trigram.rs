//! Trigram similarity with the same semantics as PostgreSQL's `pg_trgm`.
//!
//! The in-memory store uses this so search ranks results the way the
//! database does.

use std::collections::HashSet;

/// Extract the set of trigrams of `text`.
///
/// The text is lower-cased and split into words of alphanumeric characters.
/// Every word is padded with two spaces in front and one behind before the
/// three-character windows are taken.
pub fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let mut set = HashSet::new();

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars().flat_map(char::to_lowercase))
            .chain(std::iter::once(' '))
            .collect();

        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// Similarity of two strings in `[0, 1]`: shared trigrams over all trigrams.
pub fn similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let common = left.intersection(&right).count();
    let union = left.len() + right.len() - common;

    common as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigrams_pad_each_word() {
        let set = trigrams("Cat");
        assert_eq!(set.len(), 4);
        assert!(set.contains(&[' ', ' ', 'c']));
        assert!(set.contains(&[' ', 'c', 'a']));
        assert!(set.contains(&['c', 'a', 't']));
        assert!(set.contains(&['a', 't', ' ']));
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("Hello", "hello"), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // cat: 4 trigrams, cats: 5 trigrams, 3 shared.
        assert_eq!(similarity("cat", "cats"), 0.5);
    }

    #[test]
    fn test_punctuation_separates_words() {
        assert_eq!(similarity("hello, world", "hello world"), 1.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("!!!", "anything"), 0.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }
}
