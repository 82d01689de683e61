//! Cheap English-language estimate based on a short list of common words.

use std::collections::HashSet;
use std::sync::LazyLock;

static ENGLISH_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "the", "and", "is", "to", "of", "for", "that", "with", "this", "have", "from", "be", "are",
        "was", "were", "been", "i", "you", "he", "she", "we", "they", "my", "your", "his", "her",
        "it", "what", "which", "who", "when", "where", "why", "how", "can", "will", "would",
        "should", "could", "do", "does", "did", "get", "got", "go", "going", "make", "made",
        "know", "think", "want", "need", "like", "help", "work", "use", "ask", "say", "tell",
        "give", "find", "become", "leave", "feel", "try", "meet", "include", "continue", "set",
        "learn", "change", "lead", "understand",
    ])
});

const TOKEN_SEPARATORS: &[char] = &[
    ' ', '\t', '\n', '\r', '.', ',', '!', '?', ';', ':', '-', '(', ')', '[', ']', '{', '}', '"',
    '\'',
];

/// Short texts need one or two common English words; texts of 200+
/// characters need at least 10% of their tokens to be common words.
/// Empty text counts as English.
pub fn is_english_text(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }

    let lower = text.to_lowercase();
    let mut total_words = 0usize;
    let mut english_words = 0usize;
    for token in lower.split(TOKEN_SEPARATORS).filter(|t| !t.is_empty()) {
        total_words += 1;
        if ENGLISH_WORDS.contains(token) {
            english_words += 1;
        }
    }

    let len = text.chars().count();
    if len < 50 {
        return english_words >= 1;
    }
    if len < 200 {
        return english_words >= 2;
    }
    if total_words > 0 {
        return english_words as f64 / total_words as f64 >= 0.1;
    }
    true
}
