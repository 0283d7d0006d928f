//! pia-api
//!
//! HTTP surface over the assessment services, deployed as a Lambda.

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/structure", get(routes::structure::default_structure))
        .route(
            "/pias",
            get(routes::pias::list_pias).post(routes::pias::create_pia),
        )
        .route("/pias/import", post(routes::pias::import_pia))
        .route(
            "/pias/{id}",
            get(routes::pias::get_pia)
                .put(routes::pias::update_pia)
                .delete(routes::pias::delete_pia),
        )
        .route("/pias/{id}/archive", post(routes::pias::archive_pia))
        .route("/pias/{id}/unarchive", post(routes::pias::unarchive_pia))
        .route("/pias/{id}/progress", get(routes::pias::get_progress))
        .route("/pias/{id}/preview", get(routes::pias::get_preview))
        .route("/pias/{id}/export", get(routes::pias::get_export))
        .route(
            "/pias/{id}/answers/{question_id}",
            get(routes::answers::get_answer).put(routes::answers::save_answer),
        )
        .route("/pias/{id}/measures", post(routes::measures::add_measure))
        .route(
            "/pias/{id}/measures/{measure_id}",
            put(routes::measures::update_measure).delete(routes::measures::remove_measure),
        )
        .route(
            "/pias/{id}/evaluations/{reference}",
            get(routes::evaluations::get_evaluation).put(routes::evaluations::save_evaluation),
        )
        .route(
            "/pias/{id}/revisions",
            get(routes::revisions::list_revisions).post(routes::revisions::create_revision),
        )
        .route("/revisions/{id}", get(routes::revisions::get_revision))
        .route(
            "/revisions/{id}/restore",
            post(routes::revisions::restore_revision),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
