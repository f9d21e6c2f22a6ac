//! Similarity-ranked document retrieval.
//!
//! Documents are represented by embedding vectors. Given a query vector, the
//! index ranks stored documents by cosine similarity and returns the top-k
//! identifiers, which callers resolve against their own document list.
//!
//! # Components
//!
//! - [`SimilarityIndex`]: identifier → vector mapping with flat-scan top-k
//!   queries
//! - [`cosine_similarity`]: the scoring function
//! - [`resolve`]: maps ranked identifiers onto [`DocumentRef`]s
//!
//! [`DocumentRef`]: crate::document::DocumentRef

mod index;
mod types;

pub use index::{cosine_similarity, SimilarityIndex};
pub use types::{resolve, ScoredId};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector for '{document_id}' has a non-finite component at position {position}")]
    NonFinite { document_id: String, position: usize },

    #[error("Vector for '{document_id}' is empty")]
    EmptyVector { document_id: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;
