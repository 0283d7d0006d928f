use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pia_core::models::measure::Measure;
use pia_structure::Reference;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewMeasure {
    pub item: Reference,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MeasureBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn add_measure(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<NewMeasure>,
) -> Result<(StatusCode, Json<Measure>), ApiError> {
    let measure = state
        .manager
        .add_measure(id, body.item, body.title, body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(measure)))
}

pub async fn update_measure(
    State(state): State<AppState>,
    Path((id, measure_id)): Path<(u64, u32)>,
    Json(body): Json<MeasureBody>,
) -> Result<Json<Measure>, ApiError> {
    let measure = state
        .manager
        .update_measure(id, measure_id, body.title, body.content)
        .await?;
    Ok(Json(measure))
}

pub async fn remove_measure(
    State(state): State<AppState>,
    Path((id, measure_id)): Path<(u64, u32)>,
) -> Result<StatusCode, ApiError> {
    state.manager.remove_measure(id, measure_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
