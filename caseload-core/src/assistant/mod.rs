//! Document-aware assistant.
//!
//! The assistant ties together an [`Embedder`] and a [`SimilarityIndex`]:
//!
//! 1. **Ingestion**: each uploaded document's text is embedded and stored
//!    under the document's identifier.
//! 2. **Retrieval**: a question is embedded and the index returns the top-k
//!    most similar documents, resolved against the caller's document list.
//! 3. **Reply**: the chat turn answers with the configured reply and the
//!    relevant documents. No language model is involved.

mod types;

pub use types::{ChatReply, ChatTurn, Role};

use crate::config::{AssistantConfig, Config};
use crate::document::{Document, DocumentRef};
use crate::embedder::{create_embedder, EmbedError, Embedder};
use crate::similarity::{resolve, IndexError, ScoredId, SimilarityIndex};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Conversation has no messages")]
    EmptyConversation,
}

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Answers questions with the documents most relevant to them.
///
/// # Thread Safety
///
/// The assistant is `Clone`; clones share the same index through
/// `Arc<RwLock>`. Queries take a read lock, ingestion a write lock, and the
/// most recent write for an identifier wins.
///
/// # Lifecycle
///
/// There is no global instance. Construct one with [`new`](Self::new) or
/// [`from_config`](Self::from_config) and pass it to whatever needs it. The
/// index lives as long as the last clone.
///
/// # Example
///
/// ```no_run
/// # use caseload_core::{Assistant, Config, Document, DocumentType};
/// # async fn example() -> caseload_core::assistant::Result<()> {
/// let assistant = Assistant::from_config(&Config::default());
///
/// let doc = Document::new("1", "Reading plan", DocumentType::Plan, "Phonics twice a week", "Sarah Wilson");
/// assistant.ingest(&doc).await?;
///
/// let related = assistant.find_similar_documents("phonics", &[doc.to_ref()]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Assistant {
    embedder: Arc<dyn Embedder>,
    index: Arc<RwLock<SimilarityIndex>>,
    top_k: usize,
    replies: AssistantConfig,
}

impl Assistant {
    /// Creates an assistant using `embedder` for all vectors.
    ///
    /// The index only accepts vectors of the embedder's dimension.
    pub fn new(config: &Config, embedder: Arc<dyn Embedder>) -> Self {
        let index = SimilarityIndex::with_dimension(embedder.dimension());
        Self {
            embedder,
            index: Arc::new(RwLock::new(index)),
            top_k: config.retrieval.top_k,
            replies: config.assistant.clone(),
        }
    }

    /// Creates an assistant with the embedder named in the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, create_embedder(&config.embedding))
    }

    /// The shared index backing this assistant.
    pub fn index(&self) -> Arc<RwLock<SimilarityIndex>> {
        Arc::clone(&self.index)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Stores a precomputed vector for `document_id`.
    pub async fn put(&self, document_id: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        self.index.write().await.put(document_id, vector)?;
        Ok(())
    }

    /// Embeds `content` and stores it under `document_id`.
    ///
    /// Re-ingesting an identifier replaces its previous embedding.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding fails or the embedder returns a vector
    /// the index rejects. The index is unchanged in both cases.
    pub async fn store_document_embedding(&self, document_id: &str, content: &str) -> Result<()> {
        let embedding = self.embedder.embed(content).await?;
        self.put(document_id, embedding).await?;
        debug!(document_id, "Stored document embedding");
        Ok(())
    }

    /// Embeds and stores a document's content.
    pub async fn ingest(&self, document: &Document) -> Result<()> {
        self.store_document_embedding(&document.id, &document.content)
            .await
    }

    /// Ingests documents in order, stopping at the first failure.
    ///
    /// Returns the number of documents ingested. Documents ingested before a
    /// failure stay in the index.
    pub async fn ingest_all(&self, documents: &[Document]) -> Result<usize> {
        for document in documents {
            self.ingest(document).await?;
        }
        info!("Ingested {} documents", documents.len());
        Ok(documents.len())
    }

    /// Ranks stored documents against `query_vector` and resolves the top `k`
    /// against `documents`.
    pub async fn query(
        &self,
        query_vector: &[f32],
        documents: &[DocumentRef],
        k: usize,
    ) -> Result<Vec<DocumentRef>> {
        let ranked = self.index.read().await.query(query_vector, k)?;
        Ok(resolve(&ranked, documents))
    }

    /// Embeds `query` and returns the top `k` identifiers with their scores.
    pub async fn rank(&self, query: &str, k: usize) -> Result<Vec<ScoredId>> {
        if self.index.read().await.is_empty() {
            debug!("Index is empty, skipping query embedding");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let ranked = self.index.read().await.query(&query_embedding, k)?;

        for (i, hit) in ranked.iter().enumerate() {
            debug!("Result {}: score={}, document={}", i + 1, hit.score, hit.document_id);
        }
        Ok(ranked)
    }

    /// Returns the configured number of documents most similar to `query`.
    ///
    /// Only documents present in `documents` are returned; stored embeddings
    /// for anything else are skipped.
    pub async fn find_similar_documents(
        &self,
        query: &str,
        documents: &[DocumentRef],
    ) -> Result<Vec<DocumentRef>> {
        let ranked = self.rank(query, self.top_k).await?;
        let resolved = resolve(&ranked, documents);
        info!("Found {} relevant documents", resolved.len());
        Ok(resolved)
    }

    /// Answers the last message of a conversation.
    ///
    /// Never fails: errors are reported through [`ChatReply::error`].
    pub async fn chat(&self, messages: &[ChatTurn], documents: &[DocumentRef]) -> ChatReply {
        match self.try_chat(messages, documents).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                ChatReply::failure(e.to_string())
            }
        }
    }

    async fn try_chat(&self, messages: &[ChatTurn], documents: &[DocumentRef]) -> Result<ChatReply> {
        let question = messages
            .last()
            .ok_or(AssistantError::EmptyConversation)?;

        let relevant_docs = self
            .find_similar_documents(&question.content, documents)
            .await?;

        Ok(ChatReply::success(&self.replies.reply, relevant_docs))
    }

    /// Number of documents with a stored embedding.
    pub async fn count(&self) -> usize {
        self.index.read().await.len()
    }

    /// Drops the embedding for `document_id`. Returns whether one existed.
    pub async fn remove(&self, document_id: &str) -> bool {
        self.index.write().await.remove(document_id)
    }

    /// Removes all stored embeddings.
    pub async fn clear(&self) {
        self.index.write().await.clear();
    }
}
