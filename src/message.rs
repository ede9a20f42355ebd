// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateRequest {
    pub query: String,
}

/// `response` carries the model's text, or the whole backend payload when
/// the backend reply had no `response` field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateResponse {
    pub response: Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
