// src/core/binding.rs — Document binding manager

use std::sync::Arc;

use super::session::Session;
use crate::infra::config::UploadConfig;
use crate::infra::errors::ManualMateError;
use crate::provider::{DocumentHandle, DocumentStore};

/// Decides when a selected file must be (re-)uploaded to the remote store
/// and when the existing handle can be reused.
pub struct DocumentBinder {
    store: Arc<dyn DocumentStore>,
    max_size_bytes: u64,
}

impl DocumentBinder {
    pub fn new(store: Arc<dyn DocumentStore>, upload: &UploadConfig) -> Self {
        Self {
            store,
            max_size_bytes: upload.max_size_bytes(),
        }
    }

    /// Bind `name` to a live remote handle, uploading only when needed.
    ///
    /// Selecting a different file resets the session (handle and
    /// transcript); re-selecting the bound file returns the existing
    /// handle without a second upload. On upload failure the handle
    /// stays absent so the next selection can retry.
    pub async fn ensure_bound(
        &self,
        session: &mut Session,
        bytes: &[u8],
        name: &str,
    ) -> Result<DocumentHandle, ManualMateError> {
        self.validate(bytes, name)?;

        session.set_current_file(name);

        if let Some(handle) = session.document() {
            tracing::debug!(file = name, handle = %handle.name, "reusing bound handle");
            return Ok(handle.clone());
        }

        let handle = self.store.upload(bytes, name).await?;
        session.set_document(handle.clone());
        Ok(handle)
    }

    /// Local checks the remote store would reject anyway: wrong type or
    /// oversized file. Fails before any bytes leave the machine.
    fn validate(&self, bytes: &[u8], name: &str) -> Result<(), ManualMateError> {
        let is_pdf = std::path::Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ManualMateError::Upload {
                message: format!("'{}' is not a PDF manual", name),
                retriable: false,
            });
        }

        if bytes.len() as u64 > self.max_size_bytes {
            return Err(ManualMateError::Upload {
                message: format!(
                    "'{}' is {} bytes, over the {} byte limit",
                    name,
                    bytes.len(),
                    self.max_size_bytes
                ),
                retriable: false,
            });
        }

        Ok(())
    }
}
