// src/services/worker_pool.rs
use std::{fmt::Debug, sync::Arc};

use serde_json::Value;
use tokio::sync::Semaphore;

use super::model_backend::ModelBackend;
use crate::error::AppError;

/// Runs blocking model calls on tokio's blocking pool, at most `max_inflight`
/// at a time. Callers past the bound wait for a free slot.
#[derive(Clone)]
pub struct ModelWorkers {
    backend: Arc<dyn ModelBackend>,
    model: String,
    permits: Arc<Semaphore>,
    max_inflight: usize,
}

impl Debug for ModelWorkers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelWorkers")
            .field("model", &self.model)
            .field("max_inflight", &self.max_inflight)
            .field("available", &self.permits.available_permits())
            .finish()
    }
}

impl ModelWorkers {
    pub fn new(backend: Arc<dyn ModelBackend>, model: impl Into<String>, max_inflight: usize) -> Self {
        let max_inflight = max_inflight.max(1);
        Self {
            backend,
            model: model.into(),
            permits: Arc::new(Semaphore::new(max_inflight)),
            max_inflight,
        }
    }

    pub fn max_inflight(&self) -> usize {
        self.max_inflight
    }

    /// Slots not currently taken by a backend call.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Sends `prompt` to the backend and returns the extracted answer.
    pub async fn generate(&self, prompt: String) -> Result<Value, AppError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::Worker("worker pool is closed".to_string()))?;

        let backend = self.backend.clone();
        let model = self.model.clone();

        tracing::debug!(model = %model, prompt_len = prompt.len(), "dispatching backend call");

        // The permit moves into the worker so the slot stays taken until the
        // backend call returns, even if the HTTP request is dropped first.
        let reply = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            backend.generate(&model, &prompt)
        })
        .await
        .map_err(|e| AppError::Worker(e.to_string()))??;

        Ok(extract_response(reply))
    }
}

/// Picks the `response` field out of a backend mapping, or hands back the
/// whole reply when there is no such field.
pub fn extract_response(reply: Value) -> Value {
    match reply {
        Value::Object(mut map) => match map.remove("response") {
            Some(answer) => answer,
            None => Value::Object(map),
        },
        other => other,
    }
}
