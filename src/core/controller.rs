// src/core/controller.rs — Interaction controller

use std::sync::Arc;

use super::assembler;
use super::binding::DocumentBinder;
use super::session::{Message, Session};
use crate::infra::errors::ManualMateError;
use crate::provider::Inference;

/// Repaint signal handed back to the UI layer after every event. State
/// mutation and rendering stay decoupled: the controller never draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh;

/// Observable session status for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Uploading,
    Answering,
    Error(String),
}

/// Owns the session and processes external events one at a time. The
/// blocking remote calls are the only suspension points; a second event
/// is not accepted until the current one completes.
pub struct Controller {
    session: Session,
    binder: DocumentBinder,
    inference: Arc<dyn Inference>,
    status: Status,
}

impl Controller {
    pub fn new(binder: DocumentBinder, inference: Arc<dyn Inference>) -> Self {
        Self {
            session: Session::new(),
            binder,
            inference,
            status: Status::Idle,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// A manual was selected: bind it, uploading if this file has no live
    /// handle. On failure nothing stays bound and the error is visible in
    /// the status flag.
    pub async fn on_file_selected(&mut self, bytes: &[u8], name: &str) -> Refresh {
        self.status = Status::Uploading;

        match self.binder.ensure_bound(&mut self.session, bytes, name).await {
            Ok(handle) => {
                tracing::info!(file = name, handle = %handle.name, "manual ready");
                self.status = Status::Idle;
            }
            Err(e) => {
                tracing::warn!(file = name, error = %e, "binding failed");
                self.status = Status::Error(format!("Error processing file: {}", e));
            }
        }

        Refresh
    }

    /// A question was submitted. Rejected up front when no manual is
    /// bound; otherwise the exchange is appended to the transcript.
    /// Inference failures become assistant turns rather than errors —
    /// the transcript shows what happened instead of dropping it.
    pub async fn on_question_submitted(&mut self, text: &str) -> Refresh {
        if self.session.document().is_none() {
            self.status = Status::Error(ManualMateError::NoDocument.to_string());
            return Refresh;
        }

        self.session.push(Message::user(text));

        self.status = Status::Answering;
        let answer = match assembler::build_request(&self.session, text) {
            Ok(turns) => self.inference.generate(&turns).await,
            Err(e) => Err(e),
        };

        match answer {
            Ok(reply) => {
                self.session.push(Message::assistant(reply));
            }
            Err(ManualMateError::DocumentExpired) => {
                // Retention window passed on the remote store. Unbind so
                // the next file selection re-uploads instead of failing
                // the same way again.
                self.session.clear_document();
                self.session.push(Message::assistant(format!(
                    "Sorry, I encountered an error: {}",
                    ManualMateError::DocumentExpired
                )));
            }
            Err(e) => {
                tracing::warn!(error = %e, "inference failed");
                self.session
                    .push(Message::assistant(format!("Sorry, I encountered an error: {}", e)));
            }
        }

        self.status = Status::Idle;
        Refresh
    }

    /// Empty the transcript; the bound manual stays bound.
    pub fn on_clear_requested(&mut self) -> Refresh {
        self.session.clear_messages();
        self.status = Status::Idle;
        Refresh
    }
}
