//! In-memory vector index with cosine similarity search.

use super::types::ScoredId;
use super::{IndexError, Result};
use std::collections::HashMap;
use tracing::debug;

/// An in-memory index of document embeddings.
///
/// Each document identifier maps to exactly one vector. Queries perform a
/// linear scan, scoring every stored vector against the query with cosine
/// similarity, so a query costs O(n * d) for n documents of dimension d.
/// That is fine for the document counts of a single student's team.
///
/// # Dimension
///
/// All vectors in the index share one dimension. It is either fixed up front
/// with [`with_dimension`](Self::with_dimension) or locked by the first
/// vector stored. A locked-by-insertion dimension is released again when the
/// index becomes empty.
///
/// # Ordering
///
/// Entries keep the position of their first insertion, including across
/// overwrites. Results with equal scores are returned in that order.
///
/// # Example
///
/// ```
/// use caseload_core::similarity::SimilarityIndex;
///
/// let mut index = SimilarityIndex::new();
/// index.put("A", vec![1.0, 0.0]).unwrap();
/// index.put("B", vec![0.0, 1.0]).unwrap();
/// index.put("C", vec![1.0, 1.0]).unwrap();
///
/// let hits = index.query(&[1.0, 0.0], 2).unwrap();
/// assert_eq!(hits[0].document_id, "A");
/// assert_eq!(hits[1].document_id, "C");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
    fixed_dimension: Option<usize>,
}

#[derive(Debug, Clone)]
struct Entry {
    document_id: String,
    vector: Vec<f32>,
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index that only accepts vectors of `dimension` components.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            fixed_dimension: Some(dimension),
            ..Self::default()
        }
    }

    /// The dimension vectors must have, if one is known yet.
    pub fn dimension(&self) -> Option<usize> {
        self.fixed_dimension
            .or_else(|| self.entries.first().map(|entry| entry.vector.len()))
    }

    /// Inserts the vector for `document_id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - [`IndexError::EmptyVector`] if `vector` has no components
    /// - [`IndexError::DimensionMismatch`] if its length differs from
    ///   [`dimension`](Self::dimension)
    /// - [`IndexError::NonFinite`] if any component is NaN or infinite
    ///
    /// The index is left unchanged on error.
    pub fn put(&mut self, document_id: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        let document_id = document_id.into();

        if vector.is_empty() {
            return Err(IndexError::EmptyVector { document_id });
        }

        if let Some(expected) = self.dimension() {
            // An overwrite of the only entry may change the locked dimension.
            let sole_entry = self.fixed_dimension.is_none()
                && self.entries.len() == 1
                && self.positions.contains_key(&document_id);
            if vector.len() != expected && !sole_entry {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        if let Some(position) = vector.iter().position(|x| !x.is_finite()) {
            return Err(IndexError::NonFinite {
                document_id,
                position,
            });
        }

        match self.positions.get(&document_id) {
            Some(&slot) => {
                debug!(document_id = %document_id, "Overwriting stored embedding");
                self.entries[slot].vector = vector;
            }
            None => {
                self.positions.insert(document_id.clone(), self.entries.len());
                self.entries.push(Entry {
                    document_id,
                    vector,
                });
            }
        }

        Ok(())
    }

    /// Returns the `k` stored documents most similar to `query_vector`.
    ///
    /// Results are sorted by descending cosine similarity; ties keep
    /// insertion order. Fewer than `k` results are returned when the index
    /// holds fewer documents. An empty index yields an empty result for any
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] if the index is non-empty
    /// and `query_vector` has a different length than the stored vectors.
    pub fn query(&self, query_vector: &[f32], k: usize) -> Result<Vec<ScoredId>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if let Some(expected) = self.dimension() {
            if query_vector.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: query_vector.len(),
                });
            }
        }

        let mut results: Vec<ScoredId> = self
            .entries
            .iter()
            .map(|entry| ScoredId {
                document_id: entry.document_id.clone(),
                score: cosine_similarity(query_vector, &entry.vector),
            })
            .collect();

        // Stable sort, so equal scores stay in insertion order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);

        debug!(candidates = self.entries.len(), returned = results.len(), "Similarity query");
        Ok(results)
    }

    /// Removes the vector for `document_id`. Returns whether one was stored.
    pub fn remove(&mut self, document_id: &str) -> bool {
        let Some(slot) = self.positions.remove(document_id) else {
            return false;
        };

        self.entries.remove(slot);
        for position in self.positions.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        true
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.positions.contains_key(document_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }
}

/// Computes cosine similarity between two vectors.
///
/// Returns values from -1.0 (opposite) to 1.0 (same direction), with 0.0
/// for orthogonal vectors. Mismatched lengths, zero magnitude and any
/// non-finite result also score 0.0, so a score is always comparable.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    // Accumulated in f64: squares of extreme f32 components stay finite and non-zero.
    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    let magnitude_a: f64 = a.iter().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    let similarity = (dot_product / (magnitude_a * magnitude_b)) as f32;
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(results: &[ScoredId]) -> Vec<&str> {
        results.iter().map(|r| r.document_id.as_str()).collect()
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![0.3, -1.2, 4.0, 0.5];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);

        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);

        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_extreme_magnitudes() {
        let large = [1e20_f32, 0.0];
        let tiny = [1e-25_f32, 0.0];
        assert!((cosine_similarity(&large, &large) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&tiny, &tiny) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&large, &tiny) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&large, &[0.0, 1e20]).abs() < 1e-6);
    }

    #[test]
    fn test_query_ranks_extreme_magnitudes() {
        let mut index = SimilarityIndex::new();
        index.put("other", vec![0.0, 1.0]).unwrap();
        index.put("big", vec![1e20, 0.0]).unwrap();
        index.put("small", vec![1e-25, 1e-25]).unwrap();

        let results = index.query(&[1e20, 0.0], 3).unwrap();
        assert_eq!(ids(&results), vec!["big", "small", "other"]);
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert!((results[1].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!(results[2].score.abs() < 1e-6);
    }

    #[test]
    fn test_query_ranks_by_similarity() {
        let mut index = SimilarityIndex::new();
        index.put("A", vec![1.0, 0.0]).unwrap();
        index.put("B", vec![0.0, 1.0]).unwrap();
        index.put("C", vec![1.0, 1.0]).unwrap();

        let results = index.query(&[1.0, 0.0], 2).unwrap();
        assert_eq!(ids(&results), vec!["A", "C"]);
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert!((results[1].score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_query_empty_index() {
        let index = SimilarityIndex::new();
        assert!(index.query(&[0.4, 0.1, 0.9], 3).unwrap().is_empty());

        let fixed = SimilarityIndex::with_dimension(1536);
        assert!(fixed.query(&[1.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_query_never_exceeds_k_or_len() {
        let mut index = SimilarityIndex::new();
        for i in 0..5 {
            index.put(format!("doc-{}", i), vec![i as f32 + 1.0, 1.0]).unwrap();
        }

        assert_eq!(index.query(&[1.0, 1.0], 3).unwrap().len(), 3);
        assert_eq!(index.query(&[1.0, 1.0], 10).unwrap().len(), 5);
        assert!(index.query(&[1.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_put_overwrites_existing_id() {
        let mut index = SimilarityIndex::new();
        let v1 = vec![1.0, 0.0, 0.0];
        let v2 = vec![0.0, 0.0, 1.0];

        index.put("X", v1).unwrap();
        index.put("Y", vec![0.0, 1.0, 0.0]).unwrap();
        index.put("X", v2.clone()).unwrap();

        assert_eq!(index.len(), 2);
        let results = index.query(&v2, 3).unwrap();
        assert_eq!(results[0].document_id, "X");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results.iter().filter(|r| r.document_id == "X").count(), 1);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut index = SimilarityIndex::new();
        index.put("first", vec![2.0, 0.0]).unwrap();
        index.put("second", vec![0.0, 3.0]).unwrap();
        index.put("third", vec![5.0, 0.0]).unwrap();
        // Overwriting keeps "first" ahead of "third".
        index.put("first", vec![1.0, 0.0]).unwrap();

        let results = index.query(&[1.0, 0.0], 3).unwrap();
        assert_eq!(ids(&results), vec!["first", "third", "second"]);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let mut index = SimilarityIndex::new();
        index.put("zero", vec![0.0, 0.0]).unwrap();
        index.put("real", vec![0.0, 1.0]).unwrap();

        let results = index.query(&[0.0, 1.0], 2).unwrap();
        assert_eq!(ids(&results), vec!["real", "zero"]);
        assert_eq!(results[1].score, 0.0);

        let results = index.query(&[0.0, 0.0], 2).unwrap();
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_put_rejects_malformed_vectors() {
        let mut index = SimilarityIndex::new();
        index.put("A", vec![1.0, 0.0]).unwrap();

        assert!(matches!(
            index.put("B", vec![1.0, 0.0, 0.0]),
            Err(IndexError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            index.put("C", vec![f32::INFINITY, 0.0]),
            Err(IndexError::NonFinite { position: 0, .. })
        ));
        assert!(matches!(index.put("D", vec![]), Err(IndexError::EmptyVector { .. })));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_fixed_dimension() {
        let mut index = SimilarityIndex::with_dimension(3);
        assert_eq!(index.dimension(), Some(3));
        assert!(index.put("A", vec![1.0, 0.0]).is_err());
        index.put("A", vec![1.0, 0.0, 0.0]).unwrap();

        assert!(matches!(
            index.query(&[1.0, 0.0], 1),
            Err(IndexError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_clear_releases_inferred_dimension() {
        let mut index = SimilarityIndex::new();
        index.put("A", vec![1.0, 0.0]).unwrap();
        assert_eq!(index.dimension(), Some(2));

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
        index.put("B", vec![1.0, 0.0, 0.0]).unwrap();
        assert_eq!(index.dimension(), Some(3));
    }

    #[test]
    fn test_remove_keeps_positions_consistent() {
        let mut index = SimilarityIndex::new();
        index.put("A", vec![1.0, 0.0]).unwrap();
        index.put("B", vec![1.0, 0.0]).unwrap();
        index.put("C", vec![1.0, 0.0]).unwrap();

        assert!(index.remove("A"));
        assert!(!index.remove("A"));
        assert!(!index.contains("A"));

        index.put("C", vec![1.0, 0.0]).unwrap();
        index.put("D", vec![1.0, 0.0]).unwrap();
        let results = index.query(&[1.0, 0.0], 5).unwrap();
        assert_eq!(ids(&results), vec!["B", "C", "D"]);
    }
}
