//! Request handlers for the five target operations.
//!
//! Each handler walks the same pipeline in the same order: authenticate,
//! project-active check, body validation, then the store operation. The raw
//! body bytes and the original URI path are what the signature covers, so
//! both are taken verbatim from the request.

use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::auth::authenticate;
use crate::error::SimulatorError;
use crate::response;
use crate::state::AppState;
use crate::validation::{parse_add_request, parse_update_request};

fn ensure_active(state: &AppState) -> Result<(), SimulatorError> {
    if state.config.active {
        Ok(())
    } else {
        Err(SimulatorError::ProjectInactive)
    }
}

/// `POST /targets`
pub async fn add_target(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SimulatorError> {
    let account = authenticate(&state, "POST", uri.path(), &headers, &body)?;
    ensure_active(&state)?;

    let new_target = parse_add_request(&body, &state.config)?;
    let target_id = account.store.create(new_target, &state.config).await?;
    Ok(response::created(target_id))
}

/// `GET /targets/{target_id}`
pub async fn get_target(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(target_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SimulatorError> {
    let account = authenticate(&state, "GET", uri.path(), &headers, &body)?;
    ensure_active(&state)?;

    let target = account.store.get(&target_id, &state.config).await?;
    Ok(response::target_read(&target))
}

/// `GET /targets`
pub async fn list_targets(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SimulatorError> {
    let account = authenticate(&state, "GET", uri.path(), &headers, &body)?;
    ensure_active(&state)?;

    Ok(response::target_list(account.store.list().await))
}

/// `PUT /targets/{target_id}`
pub async fn update_target(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(target_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SimulatorError> {
    let account = authenticate(&state, "PUT", uri.path(), &headers, &body)?;
    ensure_active(&state)?;

    let patch = parse_update_request(&body, &state.config)?;
    account.store.update(&target_id, patch, &state.config).await?;
    Ok(response::success())
}

/// `DELETE /targets/{target_id}`
pub async fn delete_target(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(target_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, SimulatorError> {
    let account = authenticate(&state, "DELETE", uri.path(), &headers, &body)?;
    ensure_active(&state)?;

    account.store.delete(&target_id).await?;
    Ok(response::success())
}
