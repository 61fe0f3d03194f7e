// src/infra/errors.rs — Error types for ManualMate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManualMateError {
    // Remote store errors (recoverable — user may retry the same file)
    #[error("Upload failed: {message}")]
    Upload { message: String, retriable: bool },

    // Remote generation errors (recoverable — recorded into the transcript)
    #[error("Inference failed: {message}")]
    Inference { message: String, retriable: bool },

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The remote store expired the bound file (48 h retention window).
    /// Equivalent to "re-upload required", never fatal.
    #[error("The uploaded manual has expired on the remote store; open it again to re-upload")]
    DocumentExpired,

    // Precondition errors (rejected before any remote call)
    #[error("No manual is loaded. Open a PDF manual first.")]
    NoDocument,

    #[error("No API key configured. Set GOOGLE_API_KEY (or GEMINI_API_KEY).")]
    NoApiKey,

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ManualMateError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ManualMateError::Upload {
                retriable: true,
                ..
            } | ManualMateError::Inference {
                retriable: true,
                ..
            } | ManualMateError::RateLimited { .. }
        )
    }
}
