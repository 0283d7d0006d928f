use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use pia_aggregate::export::ExportPayload;
use pia_core::models::records::AssessmentRecords;
use pia_core::models::revision::Revision;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_revisions(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Revision>>, ApiError> {
    Ok(Json(state.revisions.list_revisions(id).await?))
}

pub async fn create_revision(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<(StatusCode, Json<Revision>), ApiError> {
    let revision = state.revisions.create_revision(id).await?;
    Ok((StatusCode::CREATED, Json(revision)))
}

/// The parsed snapshot a revision holds.
pub async fn get_revision(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ExportPayload>, ApiError> {
    Ok(Json(state.revisions.load_revision_export(id).await?))
}

pub async fn restore_revision(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AssessmentRecords>, ApiError> {
    Ok(Json(state.revisions.restore_revision(id).await?))
}
