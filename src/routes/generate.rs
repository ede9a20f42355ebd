use axum::{Json, extract::State};

use crate::{
    error::AppError,
    message::{GenerateRequest, GenerateResponse},
    state::SharedState,
};

pub async fn generate_handler(
    State(state): State<SharedState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    // No validation: empty prompts go to the model like any other.
    let response = state.workers.generate(payload.query).await?;
    Ok(Json(GenerateResponse { response }))
}
