// src/provider/google.rs — Google Generative AI (Gemini) file store and inference client

use async_trait::async_trait;
use std::time::Duration;

use super::{DocumentHandle, DocumentStore, Inference, Role, Turn};
use crate::infra::config::UploadConfig;
use crate::infra::errors::ManualMateError;

pub struct GeminiClient {
    api_key: String,
    model: String,
    upload: UploadConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, upload: UploadConfig) -> Self {
        Self {
            api_key,
            model,
            upload,
            client: reqwest::Client::new(),
        }
    }

    /// Read the API key from the environment, matching the google-genai SDK
    /// convention: GOOGLE_API_KEY first, GEMINI_API_KEY as fallback.
    pub fn api_key_from_env() -> Result<String, ManualMateError> {
        std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| ManualMateError::NoApiKey)
    }

    fn base_url(&self) -> &str {
        "https://generativelanguage.googleapis.com/v1beta"
    }

    fn upload_url(&self) -> &str {
        "https://generativelanguage.googleapis.com/upload/v1beta/files"
    }

    /// Wait for an uploaded file to leave the PROCESSING state. Large PDFs
    /// are indexed server-side before they can ground a generate call.
    async fn await_active(&self, handle: &DocumentHandle) -> Result<(), ManualMateError> {
        let url = format!("{}/{}?key={}", self.base_url(), handle.name, self.api_key);

        for attempt in 0..self.upload.poll_attempts {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| ManualMateError::Upload {
                    message: format!("Failed to poll file state: {}", e),
                    retriable: e.is_timeout() || e.is_connect(),
                })?;

            let body: serde_json::Value =
                resp.json().await.map_err(|e| ManualMateError::Upload {
                    message: format!("Failed to parse file state: {}", e),
                    retriable: false,
                })?;

            match body["state"].as_str() {
                Some("ACTIVE") => return Ok(()),
                Some("FAILED") => {
                    return Err(ManualMateError::Upload {
                        message: format!("Remote store could not process '{}'", handle.name),
                        retriable: false,
                    });
                }
                _ => {
                    tracing::debug!(
                        file = %handle.name,
                        attempt,
                        "file still processing"
                    );
                    tokio::time::sleep(Duration::from_millis(self.upload.poll_interval_ms)).await;
                }
            }
        }

        Err(ManualMateError::Upload {
            message: format!(
                "File '{}' did not become active after {} polls",
                handle.name, self.upload.poll_attempts
            ),
            retriable: true,
        })
    }
}

/// Build the generateContent `contents` array from assembled turns.
///
/// The document turn becomes a user content carrying a file_data part;
/// text turns map User -> "user" and Assistant -> "model" per the Gemini
/// wire format.
pub(crate) fn build_contents(turns: &[Turn]) -> Vec<serde_json::Value> {
    turns
        .iter()
        .map(|turn| match turn {
            Turn::Document(handle) => serde_json::json!({
                "role": "user",
                "parts": [{
                    "file_data": {
                        "mime_type": handle.mime_type,
                        "file_uri": handle.uri,
                    }
                }],
            }),
            Turn::Text { role, content } => {
                let wire_role = match role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                serde_json::json!({
                    "role": wire_role,
                    "parts": [{ "text": content }],
                })
            }
        })
        .collect()
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn extract_text(resp: &serde_json::Value) -> String {
    let parts = resp["candidates"][0]["content"]["parts"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let mut content = String::new();
    for part in &parts {
        if let Some(text) = part["text"].as_str() {
            content.push_str(text);
        }
    }
    content
}

#[async_trait]
impl DocumentStore for GeminiClient {
    async fn upload(
        &self,
        bytes: &[u8],
        suggested_name: &str,
    ) -> Result<DocumentHandle, ManualMateError> {
        let metadata = serde_json::json!({
            "file": { "display_name": suggested_name }
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|e| ManualMateError::Upload {
                        message: e.to_string(),
                        retriable: false,
                    })?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes.to_vec())
                    .file_name(suggested_name.to_string())
                    .mime_str("application/pdf")
                    .map_err(|e| ManualMateError::Upload {
                        message: e.to_string(),
                        retriable: false,
                    })?,
            );

        let url = format!("{}?uploadType=multipart&key={}", self.upload_url(), self.api_key);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ManualMateError::Upload {
                message: e.to_string(),
                retriable: e.is_timeout() || e.is_connect(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ManualMateError::Upload {
                message: format!("HTTP {}: {}", status, error_body),
                retriable: status.is_server_error(),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| ManualMateError::Upload {
                message: format!("Failed to parse upload response: {}", e),
                retriable: false,
            })?;

        let file = &resp["file"];
        let handle = DocumentHandle {
            name: file["name"].as_str().unwrap_or_default().to_string(),
            uri: file["uri"].as_str().unwrap_or_default().to_string(),
            mime_type: file["mimeType"]
                .as_str()
                .unwrap_or("application/pdf")
                .to_string(),
        };

        if handle.name.is_empty() || handle.uri.is_empty() {
            return Err(ManualMateError::Upload {
                message: format!("Upload response missing file resource: {}", resp),
                retriable: false,
            });
        }

        tracing::info!(file = %handle.name, "uploaded manual to remote store");

        if file["state"].as_str() != Some("ACTIVE") {
            self.await_active(&handle).await?;
        }

        Ok(handle)
    }
}

#[async_trait]
impl Inference for GeminiClient {
    async fn generate(&self, turns: &[Turn]) -> Result<String, ManualMateError> {
        let body = serde_json::json!({
            "contents": build_contents(turns),
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url(),
            self.model,
            self.api_key,
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ManualMateError::Inference {
                message: e.to_string(),
                retriable: e.is_timeout() || e.is_connect(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ManualMateError::RateLimited {
                retry_after_ms: 5000,
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // A 403/404 naming the file resource means the handle expired
            // on the store (48 h retention) — signal re-upload, not failure.
            if (status == reqwest::StatusCode::FORBIDDEN
                || status == reqwest::StatusCode::NOT_FOUND)
                && error_body.contains("files/")
            {
                return Err(ManualMateError::DocumentExpired);
            }
            return Err(ManualMateError::Inference {
                message: format!("HTTP {}: {}", status, error_body),
                retriable: status.is_server_error(),
            });
        }

        let resp: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ManualMateError::Inference {
                    message: format!("Failed to parse response: {}", e),
                    retriable: false,
                })?;

        tracing::debug!(
            input_tokens = resp["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0),
            output_tokens = resp["usageMetadata"]["candidatesTokenCount"].as_u64().unwrap_or(0),
            "generateContent usage"
        );

        Ok(extract_text(&resp))
    }
}
