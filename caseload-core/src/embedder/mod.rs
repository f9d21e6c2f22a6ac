//! Embedding generation.
//!
//! An [`Embedder`] turns text into a fixed-length vector. Two backends are
//! provided:
//!
//! - [`RandomEmbedder`]: uniform random vectors, the default. Rankings are
//!   meaningless but every code path behaves as with a real model.
//! - [`OllamaEmbedder`]: calls an Ollama-compatible `/api/embed` endpoint.
//!
//! Use [`create_embedder`] to build the backend named in the configuration.

mod ollama;
mod random;

pub use ollama::OllamaEmbedder;
pub use random::RandomEmbedder;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during embedding generation.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API response contained no embeddings.
    #[error("No embeddings returned")]
    NoEmbeddings,

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    UnexpectedDimension { expected: usize, actual: usize },
}

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Converts text into embedding vectors.
///
/// Implementations must return vectors of exactly [`dimension`](Self::dimension)
/// components so they can be compared with cosine similarity.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generates an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of the vectors this embedder produces.
    fn dimension(&self) -> usize;
}

/// Creates the embedder selected by `config.backend`.
pub fn create_embedder(config: &EmbeddingConfig) -> Arc<dyn Embedder> {
    match &config.backend {
        EmbeddingBackend::Random { seed } => {
            let embedder = match seed {
                Some(seed) => RandomEmbedder::seeded(config.dimension, *seed),
                None => RandomEmbedder::new(config.dimension),
            };
            Arc::new(embedder)
        }
        EmbeddingBackend::Ollama { base_url, model } => {
            Arc::new(OllamaEmbedder::new(base_url, model, config.dimension))
        }
    }
}
