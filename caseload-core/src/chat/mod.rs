//! Team chat threads.
//!
//! Threads hold a fixed set of participants and an append-only message list.
//! Every mutation publishes a fresh snapshot of all threads to subscribers.

mod types;

pub use types::{
    Attachment, AttachmentKind, ChatMessage, ChatThread, Mention, MessageDraft, Participant,
};

use crate::subscription::{self, Subscription};
use chrono::{TimeZone, Utc};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat thread not found: {0}")]
    ThreadNotFound(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;

/// Stores chat threads and notifies subscribers of changes.
///
/// Threads are kept in creation order. Identifiers are UUIDv7 strings.
pub struct ChatService {
    threads: Mutex<Vec<ChatThread>>,
    updates: watch::Sender<Vec<ChatThread>>,
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatService {
    pub fn new() -> Self {
        Self::with_threads(Vec::new())
    }

    /// Creates a service seeded with a sample progress discussion.
    pub fn with_demo_thread() -> Self {
        Self::with_threads(vec![demo_thread()])
    }

    fn with_threads(threads: Vec<ChatThread>) -> Self {
        Self {
            updates: subscription::channel(threads.clone()),
            threads: Mutex::new(threads),
        }
    }

    /// Subscribes to thread snapshots.
    ///
    /// The current threads are available immediately through
    /// [`Subscription::current`].
    pub fn subscribe(&self) -> Subscription<Vec<ChatThread>> {
        Subscription::new(self.updates.subscribe())
    }

    pub async fn threads(&self) -> Vec<ChatThread> {
        self.threads.lock().await.clone()
    }

    pub async fn thread(&self, thread_id: &str) -> Option<ChatThread> {
        self.threads
            .lock()
            .await
            .iter()
            .find(|thread| thread.id == thread_id)
            .cloned()
    }

    /// Appends a message to a thread and returns the new message's id.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ThreadNotFound`] if no thread has `thread_id`.
    pub async fn send_message(&self, thread_id: &str, draft: MessageDraft) -> Result<String> {
        let mut threads = self.threads.lock().await;
        let thread = threads
            .iter_mut()
            .find(|thread| thread.id == thread_id)
            .ok_or_else(|| ChatError::ThreadNotFound(thread_id.to_string()))?;

        let now = Utc::now();
        let id = Uuid::now_v7().to_string();
        thread.messages.push(draft.into_message(id.clone(), now));
        thread.last_activity = now;
        debug!(thread_id, message_id = %id, "Message sent");

        self.updates.send_replace(threads.clone());
        Ok(id)
    }

    /// Creates an empty thread and returns its id.
    pub async fn create_thread(
        &self,
        participants: Vec<Participant>,
        title: impl Into<String>,
    ) -> String {
        let thread = ChatThread {
            id: Uuid::now_v7().to_string(),
            title: title.into(),
            participants,
            messages: Vec::new(),
            last_activity: Utc::now(),
        };
        let id = thread.id.clone();
        info!(thread_id = %id, title = %thread.title, "Thread created");

        let mut threads = self.threads.lock().await;
        threads.push(thread);
        self.updates.send_replace(threads.clone());
        id
    }
}

fn demo_thread() -> ChatThread {
    let at = |minute: u32| {
        Utc.with_ymd_and_hms(2024, 1, 10, 10, minute, 0)
            .single()
            .unwrap_or_else(Utc::now)
    };

    ChatThread {
        id: "1".to_string(),
        title: "Student Progress Discussion".to_string(),
        participants: vec![
            Participant::new("1", "Sarah Wilson", "Teacher"),
            Participant::new("2", "Mike Brown", "Therapist"),
            Participant::new("3", "Jane Doe", "Parent"),
        ],
        messages: vec![
            MessageDraft::new("1", "Sarah Wilson", "Great progress in reading comprehension this week!")
                .into_message("1".to_string(), at(0)),
            MessageDraft::new("2", "Mike Brown", "I noticed improvement in social interactions as well.")
                .into_message("2".to_string(), at(5)),
        ],
        last_activity: at(5),
    }
}
