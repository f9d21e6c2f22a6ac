//! caseload-core - Service layer for a special-education team dashboard
//!
//! Provides the components behind the dashboard's document assistant and
//! team communication:
//! - Similarity-ranked document retrieval over embeddings
//! - Embedding backends (mock random vectors, Ollama)
//! - The document assistant used by the chat widget
//! - Chat threads and notifications with snapshot subscriptions
//! - Configuration management
//!
//! ## Primary API
//!
//! Most callers construct an [`Assistant`] from a [`Config`] and pass it,
//! together with a [`ChatService`] and [`NotificationCenter`], to whatever
//! serves the dashboard.

// Public modules
pub mod assistant;
pub mod chat;
pub mod config;
pub mod document;
pub mod embedder;
pub mod notification;
pub mod similarity;
pub mod subscription;

// Public exports
pub use assistant::{Assistant, AssistantError, ChatReply, ChatTurn};
pub use chat::{ChatError, ChatService};
pub use config::{Config, ConfigError};
pub use document::{Document, DocumentRef, DocumentType};
pub use embedder::{create_embedder, EmbedError, Embedder};
pub use notification::{NotificationCenter, NotificationDraft, NotificationKind};
pub use similarity::{cosine_similarity, IndexError, ScoredId, SimilarityIndex};
pub use subscription::Subscription;
