// src/state.rs
use std::sync::Arc;

use crate::services::{model_backend::ModelBackend, worker_pool::ModelWorkers};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub workers: ModelWorkers,
}

impl AppState {
    pub fn new(backend: Arc<dyn ModelBackend>, model: impl Into<String>, max_inflight: usize) -> Self {
        Self {
            workers: ModelWorkers::new(backend, model, max_inflight),
        }
    }
}
