use crate::document::DocumentRef;

/// A stored document identifier paired with its similarity to a query.
///
/// Returned by [`SimilarityIndex::query`](super::SimilarityIndex::query),
/// ordered by descending score.
///
/// # Score Range
///
/// Cosine similarity ranges from -1.0 to 1.0:
/// - `1.0` - Same direction (perfect match)
/// - `0.0` - Orthogonal, or either vector has zero magnitude
/// - `-1.0` - Opposite direction
///
/// The mock embedder only produces non-negative components, so its scores
/// stay between 0.0 and 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredId {
    pub document_id: String,
    pub score: f32,
}

impl ScoredId {
    pub fn new(document_id: impl Into<String>, score: f32) -> Self {
        Self {
            document_id: document_id.into(),
            score,
        }
    }
}

/// Maps ranked identifiers onto the caller's document list.
///
/// Rank order is preserved. Identifiers with no matching document are
/// dropped silently; the index may hold embeddings for documents the caller
/// no longer lists.
pub fn resolve(ranked: &[ScoredId], documents: &[DocumentRef]) -> Vec<DocumentRef> {
    ranked
        .iter()
        .filter_map(|hit| documents.iter().find(|doc| doc.id == hit.document_id))
        .cloned()
        .collect()
}
