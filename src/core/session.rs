// src/core/session.rs — Session state store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider::{DocumentHandle, Role};

/// One conversation turn in the transcript. Immutable once created,
/// append-only; order reconstructs the dialogue for the next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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
}

/// State of one interactive session: the manual currently in play, its
/// remote handle, and the ordered transcript.
///
/// The handle is present only while `current_file` is set and its upload
/// succeeded; replacing the file discards both the handle and the
/// transcript in one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    current_file: Option<String>,
    document: Option<DocumentHandle>,
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            current_file: None,
            document: None,
            messages: Vec::new(),
        }
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Record the selected file. A different name invalidates the old
    /// handle and empties the transcript; the same name is a no-op.
    pub fn set_current_file(&mut self, name: &str) {
        if self.current_file.as_deref() != Some(name) {
            self.current_file = Some(name.to_string());
            self.document = None;
            self.messages.clear();
        }
    }

    pub fn set_document(&mut self, handle: DocumentHandle) {
        self.document = Some(handle);
    }

    /// Drop the bound handle without touching file name or transcript.
    /// Used when the remote store reports the handle expired.
    pub fn clear_document(&mut self) {
        self.document = None;
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
