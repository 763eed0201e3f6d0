//! K-means clustering over document feature vectors
//!
//! Standard Lloyd iteration with random-seed initialization: centroids
//! start as deep copies of k randomly chosen documents, then alternate
//! assignment and mean-update passes until no document changes cluster or
//! the iteration cap is reached. Distances are exact squared Euclidean
//! over the full vocabulary; k-means finds a local optimum only, and
//! cluster quality is sensitive to the seed.

use rand::prelude::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{Document, FeatureVector, Vocabulary};
use crate::error::{Error, Result};
use crate::ClusterId;

/// Default cap on assignment/update iterations. Hitting the cap is not an
/// error; the last computed centroids are returned.
pub const DEFAULT_MAX_ITERS: usize = 20;

/// Configuration for a k-means run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Number of clusters
    pub clusters: usize,
    /// Maximum iterations
    pub max_iters: usize,
    /// Random seed for centroid initialization
    pub seed: u64,
}

impl KMeansConfig {
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters,
            max_iters: DEFAULT_MAX_ITERS,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iters(mut self, iters: usize) -> Self {
        self.max_iters = iters;
        self
    }
}

/// Mean feature vector of one cluster's member documents.
///
/// Centroids have no identity beyond their index in the returned
/// sequence; `size` is the member count as of the last update pass.
#[derive(Debug, Clone)]
pub struct Centroid {
    pub features: FeatureVector,
    pub size: usize,
}

/// Cluster `documents` into `config.clusters` groups.
///
/// Mutates each document's `cluster` field to its final assignment and
/// returns the centroids. Fails with [`Error::InsufficientCorpus`] when
/// the corpus has 2 or fewer documents or no more documents than
/// requested clusters; centroids are sampled from the documents without
/// replacement, so k must stay below the corpus size.
pub fn cluster(
    config: &KMeansConfig,
    documents: &mut [Document],
    vocabulary: &Vocabulary,
) -> Result<Vec<Centroid>> {
    let k = config.clusters;
    if k == 0 || documents.len() <= 2 || documents.len() <= k {
        return Err(Error::InsufficientCorpus {
            have: documents.len(),
            clusters: k,
        });
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);

    // Pick k documents at random, without replacement, and deep-copy
    // their vectors as the initial means.
    let mut indices: Vec<usize> = (0..documents.len()).collect();
    indices.shuffle(&mut rng);
    let mut centroids: Vec<Centroid> = indices[..k]
        .iter()
        .map(|&i| Centroid {
            features: documents[i].features.clone(),
            size: 0,
        })
        .collect();

    for iteration in 0..config.max_iters {
        // Assignment: each document moves to its nearest centroid. The
        // per-document computation is independent, so this is a parallel
        // map; the order-preserving collect keeps results deterministic.
        let assignments: Vec<ClusterId> = documents
            .par_iter()
            .map(|doc| nearest_centroid(&doc.features, &centroids, vocabulary))
            .collect();

        let mut changed = 0usize;
        for (doc, &assignment) in documents.iter_mut().zip(&assignments) {
            if doc.cluster != Some(assignment) {
                doc.cluster = Some(assignment);
                changed += 1;
            }
        }
        debug!(iteration, changed, "assignment pass");

        // Zero reassignments: converged. The update step is skipped.
        if changed == 0 {
            break;
        }

        // Update: recompute each centroid as the elementwise mean of its
        // members. A cluster with no members keeps its previous centroid.
        for (index, centroid) in centroids.iter_mut().enumerate() {
            let mut sum = FeatureVector::default();
            let mut size = 0usize;
            for doc in documents.iter().filter(|d| d.cluster == Some(index)) {
                for (&term, &count) in &doc.features {
                    *sum.entry(term).or_insert(0.0) += count;
                }
                size += 1;
            }
            if size > 0 {
                for value in sum.values_mut() {
                    *value /= size as f64;
                }
                centroid.features = sum;
            }
            centroid.size = size;
        }
    }

    Ok(centroids)
}

/// Index of the nearest centroid; ties break to the lowest index.
fn nearest_centroid(
    features: &FeatureVector,
    centroids: &[Centroid],
    vocabulary: &Vocabulary,
) -> ClusterId {
    let mut best_index = 0;
    let mut best_dist = f64::MAX;

    for (index, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(features, &centroid.features, vocabulary);
        if dist < best_dist {
            best_dist = dist;
            best_index = index;
        }
    }

    best_index
}

/// Squared Euclidean distance over the full vocabulary.
///
/// Iterates every vocabulary term; entries missing from either vector
/// count as zero. O(|vocabulary|) per pair.
fn squared_distance(a: &FeatureVector, b: &FeatureVector, vocabulary: &Vocabulary) -> f64 {
    let mut dist = 0.0;
    for term in vocabulary.terms() {
        let x = a.get(&term).copied().unwrap_or(0.0);
        let y = b.get(&term).copied().unwrap_or(0.0);
        let delta = x - y;
        dist += delta * delta;
    }
    dist
}
