use axum::extract::{Path, State};
use axum::Json;

use pia_core::models::answer::{Answer, AnswerData};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_answer(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(u64, u32)>,
) -> Result<Json<Answer>, ApiError> {
    state
        .manager
        .find_answer(id, question_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no answer to question {question_id}")))
}

pub async fn save_answer(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(u64, u32)>,
    Json(data): Json<AnswerData>,
) -> Result<Json<Answer>, ApiError> {
    Ok(Json(state.manager.save_answer(id, question_id, data).await?))
}
