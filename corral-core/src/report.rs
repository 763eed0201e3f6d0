//! Per-cluster summaries: ranked vocabulary and member documents

use std::path::PathBuf;

use serde::Serialize;

use crate::corpus::{Document, Vocabulary};
use crate::kmeans::Centroid;
use crate::ClusterId;

/// A term with its centroid weight
#[derive(Debug, Clone, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f64,
}

/// Human-readable description of one cluster
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub cluster: ClusterId,
    /// Member count as of the final update pass
    pub size: usize,
    /// Vocabulary terms ranked by centroid weight, descending
    pub top_terms: Vec<TermWeight>,
    /// Member documents in corpus order, up to the display cap
    pub documents: Vec<PathBuf>,
}

/// Summarize each cluster: its `top_terms` highest-weighted vocabulary
/// terms and up to `max_documents` member documents in corpus order.
///
/// Ties in term weight keep vocabulary order (stable sort).
pub fn summarize(
    documents: &[Document],
    centroids: &[Centroid],
    vocabulary: &Vocabulary,
    top_terms: usize,
    max_documents: usize,
) -> Vec<ClusterSummary> {
    centroids
        .iter()
        .enumerate()
        .map(|(index, centroid)| {
            let mut ranked: Vec<(&str, f64)> = vocabulary
                .iter()
                .map(|(key, term)| {
                    (term, centroid.features.get(&key).copied().unwrap_or(0.0))
                })
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

            ClusterSummary {
                cluster: index,
                size: centroid.size,
                top_terms: ranked
                    .into_iter()
                    .take(top_terms)
                    .map(|(term, weight)| TermWeight {
                        term: term.to_string(),
                        weight,
                    })
                    .collect(),
                documents: documents
                    .iter()
                    .filter(|doc| doc.cluster == Some(index))
                    .take(max_documents)
                    .map(|doc| doc.path.clone())
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{FeatureVector, VocabularyBuilder};

    fn fixture() -> (Vec<Document>, Vec<Centroid>, Vocabulary) {
        let mut vocabulary = VocabularyBuilder::new();
        let alpha = vocabulary.get_or_intern("alpha");
        let beta = vocabulary.get_or_intern("beta");
        vocabulary.get_or_intern("gamma");

        let documents = (0..4)
            .map(|i| Document {
                path: PathBuf::from(format!("doc{i}.md")),
                features: FeatureVector::default(),
                cluster: Some(usize::from(i == 3)),
            })
            .collect();

        let mut features = FeatureVector::default();
        features.insert(beta, 3.0);
        features.insert(alpha, 1.0);
        let centroids = vec![
            Centroid { features, size: 3 },
            Centroid {
                features: FeatureVector::default(),
                size: 1,
            },
        ];

        (documents, centroids, vocabulary.freeze())
    }

    #[test]
    fn test_terms_ranked_by_weight() {
        let (documents, centroids, vocabulary) = fixture();
        let summaries = summarize(&documents, &centroids, &vocabulary, 3, 20);

        let terms: Vec<&str> = summaries[0]
            .top_terms
            .iter()
            .map(|t| t.term.as_str())
            .collect();
        assert_eq!(terms, vec!["beta", "alpha", "gamma"]);
        assert_eq!(summaries[0].top_terms[0].weight, 3.0);
        assert_eq!(summaries[0].top_terms[2].weight, 0.0);
    }

    #[test]
    fn test_top_terms_cap() {
        let (documents, centroids, vocabulary) = fixture();
        let summaries = summarize(&documents, &centroids, &vocabulary, 1, 20);

        assert_eq!(summaries[0].top_terms.len(), 1);
        assert_eq!(summaries[0].top_terms[0].term, "beta");
    }

    #[test]
    fn test_ties_keep_vocabulary_order() {
        let (documents, centroids, vocabulary) = fixture();

        // Cluster 1 has the all-zero centroid: every term ties at 0.0.
        let summaries = summarize(&documents, &centroids, &vocabulary, 3, 20);
        let terms: Vec<&str> = summaries[1]
            .top_terms
            .iter()
            .map(|t| t.term.as_str())
            .collect();
        assert_eq!(terms, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_documents_in_corpus_order_with_cap() {
        let (documents, centroids, vocabulary) = fixture();

        let summaries = summarize(&documents, &centroids, &vocabulary, 3, 2);
        assert_eq!(
            summaries[0].documents,
            vec![PathBuf::from("doc0.md"), PathBuf::from("doc1.md")]
        );
        assert_eq!(summaries[0].size, 3);

        assert_eq!(summaries[1].documents, vec![PathBuf::from("doc3.md")]);
        assert_eq!(summaries[1].size, 1);
    }
}
