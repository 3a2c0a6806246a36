use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all xhub endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            "/studies",
            get(handler::list_studies).post(handler::create_study),
        )
        .route(
            "/studies/:study",
            get(handler::get_study).delete(handler::delete_study),
        )
        .route(
            "/studies/:study/trials",
            get(handler::list_trials).post(handler::create_trial),
        )
        .route(
            "/studies/:study/trials/:trial",
            get(handler::get_trial).delete(handler::delete_trial),
        )
        .route(
            "/studies/:study/files",
            get(handler::list_study_files).post(handler::create_study_file),
        )
        .route(
            "/studies/:study/files/:file",
            get(handler::get_study_file).delete(handler::delete_study_file),
        )
        .route(
            "/files/:study/:trial",
            get(handler::list_trial_files).post(handler::create_trial_file),
        )
        .route(
            "/files/:study/:trial/:file",
            get(handler::get_trial_file).delete(handler::delete_trial_file),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
