//! Text normalization pipeline
//!
//! Turns raw document text into a sequence of normalized terms through a
//! composable chain: letter-only word splitting, stop-word removal, and
//! Snowball stemming. The chain is pure and deterministic, so repeated
//! runs over the same corpus always produce the same term sequences.

use std::collections::HashSet;

use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use stop_words::LANGUAGE;

/// Trait for tokenizers that turn raw text into normalized terms
pub trait Tokenizer: Send + Sync + Clone + 'static {
    /// Tokenize the input text into a sequence of terms
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits text into maximal runs of alphabetic characters, lowercased.
///
/// Apostrophes are deleted in place rather than acting as separators, so
/// "don't" becomes "dont". Every other non-letter character (whitespace,
/// punctuation, digits) terminates the current word.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterTokenizer;

const fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

impl Tokenizer for LetterTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            if c.is_alphabetic() {
                current.extend(c.to_lowercase());
            } else if !is_apostrophe(c) && !current.is_empty() {
                terms.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            terms.push(current);
        }

        terms
    }
}

/// Supported normalization languages
///
/// Limited to languages covered by both the Snowball stemmer and the
/// stop-word lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    French,
    German,
    Russian,
    Spanish,
}

impl Language {
    fn to_algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Russian => Algorithm::Russian,
            Language::Spanish => Algorithm::Spanish,
        }
    }

    fn to_stop_words_language(self) -> LANGUAGE {
        match self {
            Language::English => LANGUAGE::English,
            Language::French => LANGUAGE::French,
            Language::German => LANGUAGE::German,
            Language::Russian => LANGUAGE::Russian,
            Language::Spanish => LANGUAGE::Spanish,
        }
    }
}

/// Parse a language string into a Language enum
///
/// Supports common language codes and names; falls back to English.
pub fn parse_language(s: &str) -> Language {
    match s.to_lowercase().as_str() {
        "en" | "english" => Language::English,
        "fr" | "french" => Language::French,
        "de" | "german" => Language::German,
        "ru" | "russian" => Language::Russian,
        "es" | "spanish" => Language::Spanish,
        _ => Language::English,
    }
}

/// Stop word filter - wraps another tokenizer and drops stop words
///
/// Uses the stop-words crate for language-specific word lists. Must sit
/// before stemming in the chain: the lists contain surface forms, and a
/// stemmed term no longer matches them.
#[derive(Debug, Clone)]
pub struct StopWordFilter<T: Tokenizer> {
    inner: T,
    stop_words: HashSet<String>,
}

impl<T: Tokenizer> StopWordFilter<T> {
    /// Create a stop word filter wrapping the given tokenizer
    pub fn new(inner: T, language: Language) -> Self {
        let stop_words: HashSet<String> = stop_words::get(language.to_stop_words_language())
            .into_iter()
            .collect();
        Self { inner, stop_words }
    }

    /// Create with English stop words
    pub fn english(inner: T) -> Self {
        Self::new(inner, Language::English)
    }

    /// Check if a word is a stop word
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl<T: Tokenizer> Tokenizer for StopWordFilter<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.inner
            .tokenize(text)
            .into_iter()
            .filter(|term| !self.stop_words.contains(term))
            .collect()
    }
}

/// Stemming filter - wraps another tokenizer and stems each term
///
/// Uses the Snowball stemming algorithm via rust-stemmers.
#[derive(Debug, Clone)]
pub struct StemmerFilter<T: Tokenizer> {
    inner: T,
    language: Language,
}

impl<T: Tokenizer> StemmerFilter<T> {
    /// Create a stemming filter for the given language
    pub fn new(inner: T, language: Language) -> Self {
        Self { inner, language }
    }
}

impl<T: Tokenizer> Tokenizer for StemmerFilter<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let stemmer = rust_stemmers::Stemmer::create(self.language.to_algorithm());
        self.inner
            .tokenize(text)
            .into_iter()
            .map(|term| stemmer.stem(&term).into_owned())
            .collect()
    }
}

/// The standard normalization chain: letter splitting, then stop-word
/// removal, then stemming.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    chain: StemmerFilter<StopWordFilter<LetterTokenizer>>,
}

impl TextNormalizer {
    /// Create the standard chain for the given language
    pub fn new(language: Language) -> Self {
        Self {
            chain: StemmerFilter::new(StopWordFilter::new(LetterTokenizer, language), language),
        }
    }

    /// Create the standard English chain
    pub fn english() -> Self {
        Self::new(Language::English)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Tokenizer for TextNormalizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.chain.tokenize(text)
    }
}
