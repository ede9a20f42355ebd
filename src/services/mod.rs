// src/services/mod.rs
pub mod chat_session;
pub mod model_backend;
pub mod relay_client;
pub mod transcript_view;
pub mod worker_pool;
