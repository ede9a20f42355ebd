// src/routes/mod.rs
pub mod generate;

use crate::state::SharedState;
use axum::{Router, routing::post};
use generate::generate_handler;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/generate/", post(generate_handler))
        .route("/generate", post(generate_handler))
        .layer(TraceLayer::new_for_http())
}
