// src/services/relay_client.rs
use std::{future::Future, time::Duration};

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::message::GenerateRequest;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Something that can turn a prompt into the relay's reply text.
pub trait RelayApi {
    fn generate(&self, query: &str) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// HTTP client for the relay's `POST /generate/` endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/generate/", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RelayApi for RelayClient {
    async fn generate(&self, query: &str) -> Result<String, ClientError> {
        let body = GenerateRequest {
            query: query.to_string(),
        };

        let reply: Value = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply_text(&reply))
    }
}

/// Text of the `response` field. Missing or null gives an empty string,
/// non-string values are shown as compact JSON.
pub fn reply_text(reply: &Value) -> String {
    match reply.get("response") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_has_single_slash() {
        let client = RelayClient::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8000/generate/");
    }

    #[test]
    fn reply_text_shapes() {
        assert_eq!(reply_text(&json!({"response": "hi"})), "hi");
        assert_eq!(reply_text(&json!({"other": "hi"})), "");
        assert_eq!(reply_text(&json!({"response": null})), "");
        assert_eq!(
            reply_text(&json!({"response": {"model": "m"}})),
            r#"{"model":"m"}"#
        );
    }
}
