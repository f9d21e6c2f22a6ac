//! caseload - Service layer for a special-education collaboration dashboard
//!
//! This is the convenience wrapper crate that re-exports the caseload
//! components.
//!
//! # Quick Start
//!
//! ```toml
//! [dependencies]
//! caseload = "0.1"
//! ```
//!
//! ```no_run
//! use caseload::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let assistant = Assistant::from_config(&Config::load_or_default());
//! let doc = Document::new("1", "Reading plan", DocumentType::Plan, "Phonics practice", "Sarah Wilson");
//! assistant.ingest(&doc).await?;
//!
//! let reply = assistant.chat(&[ChatTurn::user("How is reading going?")], &[doc.to_ref()]).await;
//! println!("{}", reply.display_text("Please try again."));
//! # Ok(())
//! # }
//! ```

// Re-export core
pub use caseload_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use caseload_core::chat::{MessageDraft, Participant};
    pub use caseload_core::{
        Assistant, ChatReply, ChatService, ChatTurn, Config, Document, DocumentRef, DocumentType,
        Embedder, NotificationCenter, NotificationDraft, NotificationKind, SimilarityIndex,
    };
}
