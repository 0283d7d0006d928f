use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pia_aggregate::export::ExportPayload;
use pia_aggregate::preview::PreviewTree;
use pia_core::models::assessment::Assessment;
use pia_core::models::records::AssessmentRecords;
use pia_service::{Listing, ListingEntry, ListingMode, Preferences, SortKey, SortOrder};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub mode: ListingMode,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

/// Listing rows with progress, sorted the way the home screen shows them.
pub async fn list_pias(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ListingEntry>>, ApiError> {
    let prefs = Preferences {
        sort_order: query.order,
        sort_value: query.sort,
        ..Default::default()
    };
    let mut listing = Listing::new(query.mode, prefs);
    listing.refresh(state.manager.as_ref()).await?;
    Ok(Json(listing.entries().to_vec()))
}

#[derive(Debug, Deserialize)]
pub struct CreatePia {
    pub name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub evaluator_name: String,
    #[serde(default)]
    pub validator_name: String,
}

pub async fn create_pia(
    State(state): State<AppState>,
    Json(body): Json<CreatePia>,
) -> Result<(StatusCode, Json<Assessment>), ApiError> {
    let mut assessment = Assessment::new(body.name, jiff::Timestamp::now());
    assessment.author_name = body.author_name;
    assessment.evaluator_name = body.evaluator_name;
    assessment.validator_name = body.validator_name;
    let created = state.manager.create(assessment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_pia(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(state.manager.get(id).await?))
}

pub async fn update_pia(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(mut assessment): Json<Assessment>,
) -> Result<Json<Assessment>, ApiError> {
    assessment.id = id;
    Ok(Json(state.manager.update_details(assessment).await?))
}

pub async fn delete_pia(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.manager.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_pia(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(state.manager.archive(id).await?))
}

pub async fn unarchive_pia(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(state.manager.unarchive(id).await?))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<u8>, ApiError> {
    Ok(Json(state.manager.calculate_progress(id).await?))
}

pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PreviewTree>, ApiError> {
    Ok(Json(state.manager.build_preview(id).await?))
}

pub async fn get_export(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ExportPayload>, ApiError> {
    Ok(Json(state.manager.build_export(id).await?))
}

/// Create a new assessment from an export file. The body is taken as text
/// so that format errors surface as service errors, not extractor rejections.
pub async fn import_pia(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<AssessmentRecords>), ApiError> {
    let imported = state.manager.import_json(&body).await?;
    Ok((StatusCode::CREATED, Json(imported)))
}
