// src/config.rs
use std::{net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_RELAY_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MODEL: &str = "finetuned_model:latest";
pub const DEFAULT_MAX_INFLIGHT: usize = 8;
pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CHAT_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the relay binary.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub addr: SocketAddr,
    pub model: String,
    pub max_inflight: usize,
    pub ollama_host: String,
    pub ollama_timeout: Duration,
}

/// Settings for the terminal chat client.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub relay_url: String,
    pub timeout: Duration,
    pub width: usize,
}

impl RelayConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_inflight: usize = parse_or(&lookup, "RELAY_MAX_INFLIGHT", DEFAULT_MAX_INFLIGHT)?;
        if max_inflight == 0 {
            return Err(ConfigError::Invalid {
                key: "RELAY_MAX_INFLIGHT",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            addr: parse_or(&lookup, "RELAY_ADDR", default_addr())?,
            model: lookup("RELAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_inflight,
            ollama_host: lookup("OLLAMA_HOST")
                .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            ollama_timeout: Duration::from_secs(parse_or(
                &lookup,
                "OLLAMA_TIMEOUT_SECS",
                DEFAULT_OLLAMA_TIMEOUT_SECS,
            )?),
        })
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs: u64 = parse_or(&lookup, "CHAT_TIMEOUT_SECS", DEFAULT_CHAT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "CHAT_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            relay_url: lookup("RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            width: parse_or(&lookup, "CHAT_WIDTH", DEFAULT_CHAT_WIDTH)?,
        })
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
