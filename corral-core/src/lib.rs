//! Corral - topical clustering for text corpora
//!
//! Groups a corpus of text documents into a fixed number of topical
//! clusters using k-means over bag-of-words feature vectors:
//! - Composable text normalization chain (letter-only splitting,
//!   stop-word removal, Snowball stemming)
//! - Interned vocabulary with sparse per-document term counts
//! - Exact squared-Euclidean k-means with seeded random initialization
//! - Per-cluster term ranking for human-readable summaries

pub mod corpus;
pub mod error;
pub mod kmeans;
pub mod report;
pub mod tokenizer;

pub use corpus::{Corpus, CorpusBuilder, Document, FeatureVector, Vocabulary, VocabularyBuilder};
pub use error::{Error, Result};
pub use kmeans::{Centroid, KMeansConfig, cluster};
pub use report::{ClusterSummary, TermWeight, summarize};
pub use tokenizer::{
    Language, LetterTokenizer, StemmerFilter, StopWordFilter, TextNormalizer, Tokenizer,
    parse_language,
};

/// Index of a cluster in `[0, k)`.
pub type ClusterId = usize;
