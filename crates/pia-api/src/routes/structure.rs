use axum::Json;

use pia_structure::StructureCatalog;

/// The built-in questionnaire new assessments follow.
pub async fn default_structure() -> Json<StructureCatalog> {
    Json(pia_structure::default_catalog().clone())
}
