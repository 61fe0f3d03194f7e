// src/provider/mod.rs — Remote collaborator layer

pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::ManualMateError;

/// Opaque reference to a file previously uploaded to the remote store,
/// exchanged instead of re-sending raw bytes. The remote store expires
/// unused handles after a fixed retention window (documented 48 hours).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Resource name on the store, e.g. "files/abc123".
    pub name: String,
    /// URI the inference service dereferences when grounding answers.
    pub uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One unit of conversational context sent to the inference service:
/// either the grounding document or a role-tagged text message.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    Document(DocumentHandle),
    Text { role: Role, content: String },
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::Text {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Text {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Remote file store: takes raw bytes, returns a handle valid for the
/// retention window.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(
        &self,
        bytes: &[u8],
        suggested_name: &str,
    ) -> Result<DocumentHandle, ManualMateError>;
}

/// Stateless request/response generation service. No streaming; one
/// response per call. Persona and history are replayed in `turns` on
/// every call because the service keeps no session memory.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn generate(&self, turns: &[Turn]) -> Result<String, ManualMateError>;
}
