//! Corpus ingestion: vocabulary interning and document feature vectors
//!
//! Terms are interned with `lasso` so feature vectors key on a compact
//! `Spur` instead of repeated string allocations. The vocabulary is built
//! incrementally while documents are ingested and frozen before
//! clustering begins; after that, both the vocabulary and every feature
//! vector are immutable for the rest of the run.

use std::fs;
use std::path::{Path, PathBuf};

use lasso::{Rodeo, RodeoReader};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

pub use lasso::Spur;

use crate::error::{Error, Result};
use crate::tokenizer::Tokenizer;
use crate::ClusterId;

/// Sparse term-count vector with dense semantics: terms absent from the
/// map count as zero in every comparison.
pub type FeatureVector = FxHashMap<Spur, f64>;

/// A document: its source path, raw term counts, and cluster assignment.
///
/// `cluster` is `None` until the first assignment pass, then always
/// `Some(i)` with `i` in `[0, k)`.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub features: FeatureVector,
    pub cluster: Option<ClusterId>,
}

/// Accumulates the set of distinct terms seen across the corpus.
///
/// Additive only: a term, once interned, is never removed. Freeze into a
/// [`Vocabulary`] before clustering.
#[derive(Default)]
pub struct VocabularyBuilder {
    interner: Rodeo,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }

    /// Intern a term, marking it present in the vocabulary
    pub fn get_or_intern(&mut self, term: &str) -> Spur {
        self.interner.get_or_intern(term)
    }

    /// Freeze the vocabulary; no further terms can be added
    pub fn freeze(self) -> Vocabulary {
        Vocabulary {
            reader: self.interner.into_reader(),
        }
    }
}

/// The frozen set of all distinct terms observed across the corpus
pub struct Vocabulary {
    reader: RodeoReader,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.reader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    /// Look up a term's key, if it was ever interned
    pub fn get(&self, term: &str) -> Option<Spur> {
        self.reader.get(term)
    }

    /// Resolve a key back to its term string
    pub fn resolve(&self, term: Spur) -> &str {
        self.reader.resolve(&term)
    }

    /// All term keys, in interning order
    pub fn terms(&self) -> impl Iterator<Item = Spur> + '_ {
        self.reader.iter().map(|(key, _)| key)
    }

    /// All (key, term) pairs, in interning order
    pub fn iter(&self) -> impl Iterator<Item = (Spur, &str)> {
        self.reader.iter()
    }
}

/// An ingested corpus, ready for clustering
pub struct Corpus {
    pub documents: Vec<Document>,
    pub vocabulary: Vocabulary,
}

/// Builds a [`Corpus`] by reading and normalizing documents.
///
/// Terms shorter than `min_term_len` bytes are discarded before they
/// reach either the feature vector or the vocabulary.
pub struct CorpusBuilder<T: Tokenizer> {
    tokenizer: T,
    min_term_len: usize,
    vocabulary: VocabularyBuilder,
    documents: Vec<Document>,
}

impl<T: Tokenizer> CorpusBuilder<T> {
    pub fn new(tokenizer: T, min_term_len: usize) -> Self {
        Self {
            tokenizer,
            min_term_len,
            vocabulary: VocabularyBuilder::new(),
            documents: Vec::new(),
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn term_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Read one file, normalize it, and add it to the corpus.
    ///
    /// On an I/O error the corpus is left unchanged; the caller decides
    /// whether to surface or swallow the failure.
    pub fn ingest(&mut self, path: &Path) -> Result<()> {
        let terms = Self::read_terms(&self.tokenizer, self.min_term_len, path)?;
        self.push_document(path.to_path_buf(), terms);
        Ok(())
    }

    /// Ingest many files, parallelizing the read + tokenize stage.
    ///
    /// The vocabulary merge runs serially afterwards, in `paths` order,
    /// so corpus order and term interning order are deterministic
    /// regardless of thread scheduling. Returns the per-file failures;
    /// failed files are excluded from the corpus.
    pub fn ingest_all(&mut self, paths: &[PathBuf]) -> Vec<(PathBuf, Error)> {
        let results: Vec<Result<Vec<String>>> = paths
            .par_iter()
            .map(|path| Self::read_terms(&self.tokenizer, self.min_term_len, path))
            .collect();

        let mut failures = Vec::new();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(terms) => self.push_document(path.clone(), terms),
                Err(err) => failures.push((path.clone(), err)),
            }
        }
        failures
    }

    /// Freeze the vocabulary and yield the immutable corpus
    pub fn build(self) -> Corpus {
        Corpus {
            documents: self.documents,
            vocabulary: self.vocabulary.freeze(),
        }
    }

    fn read_terms(tokenizer: &T, min_term_len: usize, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(tokenizer
            .tokenize(&text)
            .into_iter()
            .filter(|term| term.len() >= min_term_len)
            .collect())
    }

    fn push_document(&mut self, path: PathBuf, terms: Vec<String>) {
        let mut features = FeatureVector::default();
        for term in &terms {
            let key = self.vocabulary.get_or_intern(term);
            *features.entry(key).or_insert(0.0) += 1.0;
        }
        self.documents.push(Document {
            path,
            features,
            cluster: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::LetterTokenizer;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_ingest_counts_terms() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "alpha alpha beta");

        let mut builder = CorpusBuilder::new(LetterTokenizer, 1);
        builder.ingest(&path).unwrap();
        let corpus = builder.build();

        assert_eq!(corpus.documents.len(), 1);
        assert_eq!(corpus.vocabulary.len(), 2);

        let doc = &corpus.documents[0];
        let alpha = corpus.vocabulary.get("alpha").unwrap();
        let beta = corpus.vocabulary.get("beta").unwrap();
        assert_eq!(doc.features[&alpha], 2.0);
        assert_eq!(doc.features[&beta], 1.0);
        assert_eq!(doc.cluster, None);
    }

    #[test]
    fn test_min_term_length_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "tiny word lengthy vocabulary");

        let mut builder = CorpusBuilder::new(LetterTokenizer, 5);
        builder.ingest(&path).unwrap();
        let corpus = builder.build();

        // Terms below the minimum never reach the vocabulary or a vector.
        assert!(corpus.vocabulary.get("tiny").is_none());
        assert!(corpus.vocabulary.get("word").is_none());
        assert!(corpus.vocabulary.get("lengthy").is_some());
        assert!(corpus.vocabulary.get("vocabulary").is_some());
        assert_eq!(corpus.documents[0].features.len(), 2);
    }

    #[test]
    fn test_ingest_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let mut builder = CorpusBuilder::new(LetterTokenizer, 1);
        let err = builder.ingest(&missing).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(builder.document_count(), 0);
    }

    #[test]
    fn test_ingest_all_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(&dir, "a.txt", "alpha");
        let missing = dir.path().join("missing.txt");
        let b = write_file(&dir, "b.txt", "beta");

        let mut builder = CorpusBuilder::new(LetterTokenizer, 1);
        let failures = builder.ingest_all(&[a.clone(), missing.clone(), b.clone()]);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);

        let corpus = builder.build();
        assert_eq!(corpus.documents.len(), 2);
        // Corpus order follows the input path order, not completion order.
        assert_eq!(corpus.documents[0].path, a);
        assert_eq!(corpus.documents[1].path, b);
    }

    #[test]
    fn test_ingest_all_deterministic_interning() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_file(&dir, "a.txt", "alpha beta"),
            write_file(&dir, "b.txt", "gamma alpha"),
        ];

        let mut builder = CorpusBuilder::new(LetterTokenizer, 1);
        builder.ingest_all(&paths);
        let corpus = builder.build();

        let order: Vec<&str> = corpus.vocabulary.iter().map(|(_, term)| term).collect();
        assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_empty_document_still_ingested() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.txt", "12 34 !!");

        let mut builder = CorpusBuilder::new(LetterTokenizer, 1);
        builder.ingest(&path).unwrap();
        let corpus = builder.build();

        assert_eq!(corpus.documents.len(), 1);
        assert!(corpus.documents[0].features.is_empty());
        assert!(corpus.vocabulary.is_empty());
    }
}
