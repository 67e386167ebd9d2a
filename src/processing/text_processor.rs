//! Text normalization and tokenization

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Normalized view of one document.
///
/// `folded` is lowercase and single-spaced and feeds every matching step.
/// `original` keeps case and line breaks (with blank lines dropped and runs of
/// horizontal whitespace collapsed) for the line-oriented profile heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    original: String,
    folded: String,
}

impl NormalizedText {
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }
}

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    hyphen_break: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            hyphen_break: Regex::new(r"(\p{L})-[ \t]*\r?\n[ \t]*(\p{Ll})")
                .expect("Invalid hyphenation regex"),
        }
    }

    /// Undo common PDF text-layer artifacts: ligature glyphs, soft hyphens and
    /// words hyphenated across a line break.
    pub fn strip_pdf_artifacts(&self, text: &str) -> String {
        let mut cleaned = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\u{FB00}' => cleaned.push_str("ff"),
                '\u{FB01}' => cleaned.push_str("fi"),
                '\u{FB02}' => cleaned.push_str("fl"),
                '\u{FB03}' => cleaned.push_str("ffi"),
                '\u{FB04}' => cleaned.push_str("ffl"),
                '\u{FB05}' | '\u{FB06}' => cleaned.push_str("st"),
                '\u{00AD}' => {}
                c => cleaned.push(c),
            }
        }

        self.hyphen_break.replace_all(&cleaned, "$1$2").into_owned()
    }

    /// Strip control characters, unify punctuation and collapse whitespace.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let cleaned: String = raw
            .replace("\r\n", "\n")
            .chars()
            .filter_map(normalize_char)
            .collect();

        let original = cleaned
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let folded = original
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        NormalizedText { original, folded }
    }

    /// Tokenize text into lowercase terms using Unicode segmentation
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().count() > 1)
            .filter(|word| word.chars().any(|c| c.is_alphabetic()))
            .filter(|word| !self.stop_words.contains(word.as_str()))
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

fn normalize_char(c: char) -> Option<char> {
    match c {
        '\n' => Some('\n'),
        '\r' => Some('\n'),
        '\u{2018}' | '\u{2019}' | '\u{201B}' => Some('\''),
        '\u{201C}' | '\u{201D}' => Some('"'),
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => Some('-'),
        '\u{2026}' => Some('.'),
        '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => None,
        c if c.is_control() => Some(' '),
        c => Some(c),
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "etc", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "must",
    "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "same", "shall", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "upon", "us", "very", "via", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "within", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_views() {
        let processor = TextProcessor::new();
        let text = "  Jane   Doe \r\n\r\n\tSenior\u{00A0}Engineer\u{0007}\n“Rust” — Python  ";

        let normalized = processor.normalize(text);

        assert_eq!(normalized.original(), "Jane Doe\nSenior Engineer\n\"Rust\" - Python");
        assert_eq!(normalized.folded(), "jane doe senior engineer \"rust\" - python");
    }

    #[test]
    fn test_normalize_empty() {
        let processor = TextProcessor::new();
        let normalized = processor.normalize(" \n\t ");

        assert!(normalized.is_empty());
        assert_eq!(normalized.original(), "");
    }

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming is awesome, and a 2024 X factor!");

        assert_eq!(tokens, vec!["rust", "programming", "awesome", "factor"]);
        assert!(processor.is_stop_word("and"));
    }

    #[test]
    fn test_strip_pdf_artifacts() {
        let processor = TextProcessor::new();
        let text = "Of\u{FB01}ce soft\u{00AD}ware engi-\nneering\nWell-Known";
        assert_eq!(processor.strip_pdf_artifacts(text), "Office software engineering\nWell-Known");
    }

    #[test]
    fn test_hyphenated_capital_is_kept() {
        let processor = TextProcessor::new();
        assert_eq!(processor.strip_pdf_artifacts("Python-\nDjango"), "Python-\nDjango");
        // the compiled pattern is reused across calls
        assert_eq!(processor.strip_pdf_artifacts("data-\nbase"), "database");
    }
}
