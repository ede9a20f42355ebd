//! Model backend seam.
//!
//! The relay talks to the model through a synchronous capability: one prompt
//! in, one JSON mapping out. Callers are expected to run it off the async
//! request loop (see [`super::worker_pool::ModelWorkers`]).

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::runtime::Handle;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("backend invalid response: {0}")]
    InvalidResponse(String),
    #[error("no tokio runtime available to drive the backend request")]
    NoRuntime,
}

/// Blocking "generate(model, prompt) -> mapping" capability.
pub trait ModelBackend: Send + Sync + 'static {
    fn generate(&self, model: &str, prompt: &str) -> Result<Value, BackendError>;
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama `/api/generate` client, non-streaming.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    http: Client,
    base: String,
}

impl OllamaBackend {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base: host.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn generate_async(&self, model: &str, prompt: &str) -> Result<Value, BackendError> {
        let url = format!("{}/api/generate", self.base);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("cannot reach {url}: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            // Ollama reports failures as {"error": "..."}.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

impl ModelBackend for OllamaBackend {
    /// Blocks the current thread until Ollama answers. Must be called from a
    /// blocking-capable thread (e.g. inside `spawn_blocking`), never from an
    /// async task.
    fn generate(&self, model: &str, prompt: &str) -> Result<Value, BackendError> {
        let handle = Handle::try_current().map_err(|_| BackendError::NoRuntime)?;
        handle.block_on(self.generate_async(model, prompt))
    }
}
