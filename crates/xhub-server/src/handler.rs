//! Request handlers.
//!
//! Every route maps onto one of four generic operations (create into a
//! scope, list a scope, get a path, delete a path); the per-route handlers
//! only turn URL parameters into a [`Scope`] or [`ResourcePath`].

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use xhub_resources::API_VERSION;
use xhub_types::{ResourcePath, Scope};

use crate::body::{CreateRequest, CreatedBody, DeletedBody, HealthResponse, ItemBody};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "xhub-server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": API_VERSION,
    }))
}

// ---------------------------------------------------------------------------
// Generic operations
// ---------------------------------------------------------------------------

/// Store the body's `data` as a new member of `scope`. Responds 201.
///
/// The stored key always comes from `scope` plus the body's `id`; an `id`
/// given as a full key must already point into `scope`. Everything that can
/// reject the request is checked before the write.
async fn create_in(state: &AppState, scope: Scope, body: &[u8]) -> ServerResult<Response> {
    let request = CreateRequest::from_slice(body)?;
    let store = state.store();
    let path = store.resolve(&scope, &request.id)?;
    let key = store.codec().encode(&path);
    let url = format!("{}{}", store.base_url(), key);
    let location = HeaderValue::try_from(url.as_str())
        .map_err(|e| ServerError::BadRequest(format!("{key:?} cannot form a URL: {e}")))?;

    state
        .run(move |store| store.create(&path, request.payload()))
        .await?;
    let created = CreatedBody {
        id: key.as_str().to_string(),
        url,
    };
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

/// List the members of `scope`. An empty scope is an empty array.
async fn list_in(state: &AppState, scope: Scope) -> ServerResult<Response> {
    let collection = state.run(move |store| store.list(&scope)).await?;
    let items = collection
        .into_iter()
        .map(ItemBody::try_from)
        .collect::<ServerResult<Vec<_>>>()?;
    Ok(Json(items).into_response())
}

/// Return the stored payload at `path`, or 204 if there is none.
async fn get_at(state: &AppState, path: ResourcePath) -> ServerResult<Response> {
    match state.run(move |store| store.get(&path)).await? {
        Some(resource) => Ok((
            [(header::CONTENT_TYPE, "application/json")],
            resource.data,
        )
            .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Delete `path` and its descendants. Absent resources still get a 200.
async fn delete_at(state: &AppState, path: ResourcePath) -> ServerResult<Response> {
    let deleted = state
        .run(move |store| {
            let report = store.delete(&path)?;
            let id = store.codec().encode(&path);
            Ok(DeletedBody::new(id.as_str().to_string(), report))
        })
        .await?;
    Ok(Json(deleted).into_response())
}

// ---------------------------------------------------------------------------
// Studies
// ---------------------------------------------------------------------------

pub async fn create_study(State(state): State<AppState>, body: Bytes) -> ServerResult<Response> {
    create_in(&state, Scope::Studies, &body).await
}

pub async fn list_studies(State(state): State<AppState>) -> ServerResult<Response> {
    list_in(&state, Scope::Studies).await
}

pub async fn get_study(
    State(state): State<AppState>,
    Path(study): Path<String>,
) -> ServerResult<Response> {
    get_at(&state, ResourcePath::study(&study)?).await
}

pub async fn delete_study(
    State(state): State<AppState>,
    Path(study): Path<String>,
) -> ServerResult<Response> {
    delete_at(&state, ResourcePath::study(&study)?).await
}

// ---------------------------------------------------------------------------
// Trials
// ---------------------------------------------------------------------------

pub async fn create_trial(
    State(state): State<AppState>,
    Path(study): Path<String>,
    body: Bytes,
) -> ServerResult<Response> {
    create_in(&state, Scope::trials(&study)?, &body).await
}

pub async fn list_trials(
    State(state): State<AppState>,
    Path(study): Path<String>,
) -> ServerResult<Response> {
    list_in(&state, Scope::trials(&study)?).await
}

pub async fn get_trial(
    State(state): State<AppState>,
    Path((study, trial)): Path<(String, String)>,
) -> ServerResult<Response> {
    get_at(&state, ResourcePath::trial(&study, &trial)?).await
}

pub async fn delete_trial(
    State(state): State<AppState>,
    Path((study, trial)): Path<(String, String)>,
) -> ServerResult<Response> {
    delete_at(&state, ResourcePath::trial(&study, &trial)?).await
}

// ---------------------------------------------------------------------------
// Study files
// ---------------------------------------------------------------------------

pub async fn create_study_file(
    State(state): State<AppState>,
    Path(study): Path<String>,
    body: Bytes,
) -> ServerResult<Response> {
    create_in(&state, Scope::study_files(&study)?, &body).await
}

pub async fn list_study_files(
    State(state): State<AppState>,
    Path(study): Path<String>,
) -> ServerResult<Response> {
    list_in(&state, Scope::study_files(&study)?).await
}

pub async fn get_study_file(
    State(state): State<AppState>,
    Path((study, file)): Path<(String, String)>,
) -> ServerResult<Response> {
    get_at(&state, ResourcePath::study_file(&study, &file)?).await
}

pub async fn delete_study_file(
    State(state): State<AppState>,
    Path((study, file)): Path<(String, String)>,
) -> ServerResult<Response> {
    delete_at(&state, ResourcePath::study_file(&study, &file)?).await
}

// ---------------------------------------------------------------------------
// Trial files
// ---------------------------------------------------------------------------

pub async fn create_trial_file(
    State(state): State<AppState>,
    Path((study, trial)): Path<(String, String)>,
    body: Bytes,
) -> ServerResult<Response> {
    create_in(&state, Scope::trial_files(&study, &trial)?, &body).await
}

pub async fn list_trial_files(
    State(state): State<AppState>,
    Path((study, trial)): Path<(String, String)>,
) -> ServerResult<Response> {
    list_in(&state, Scope::trial_files(&study, &trial)?).await
}

pub async fn get_trial_file(
    State(state): State<AppState>,
    Path((study, trial, file)): Path<(String, String, String)>,
) -> ServerResult<Response> {
    get_at(&state, ResourcePath::trial_file(&study, &trial, &file)?).await
}

pub async fn delete_trial_file(
    State(state): State<AppState>,
    Path((study, trial, file)): Path<(String, String, String)>,
) -> ServerResult<Response> {
    delete_at(&state, ResourcePath::trial_file(&study, &trial, &file)?).await
}
