use axum::extract::{Path, State};
use axum::Json;

use pia_core::models::evaluation::Evaluation;
use pia_service::EvaluationInput;
use pia_structure::Reference;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_evaluation(
    State(state): State<AppState>,
    Path((id, reference)): Path<(u64, Reference)>,
) -> Result<Json<Evaluation>, ApiError> {
    state
        .manager
        .find_evaluation(id, reference)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no evaluation at {reference}")))
}

pub async fn save_evaluation(
    State(state): State<AppState>,
    Path((id, reference)): Path<(u64, Reference)>,
    Json(input): Json<EvaluationInput>,
) -> Result<Json<Evaluation>, ApiError> {
    Ok(Json(state.manager.save_evaluation(id, reference, input).await?))
}
