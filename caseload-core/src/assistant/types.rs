use crate::document::DocumentRef;
use serde::{Deserialize, Serialize};

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single turn in a conversation with the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// The assistant's answer to a conversation.
///
/// A failed turn carries `error` with an empty message and no documents;
/// use [`display_text`](Self::display_text) to get what the user should see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub relevant_docs: Vec<DocumentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    pub fn success(message: impl Into<String>, relevant_docs: Vec<DocumentRef>) -> Self {
        Self {
            message: message.into(),
            relevant_docs,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            relevant_docs: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The reply text, or `apology` if the turn failed.
    pub fn display_text<'a>(&'a self, apology: &'a str) -> &'a str {
        if self.is_error() {
            apology
        } else {
            &self.message
        }
    }
}
