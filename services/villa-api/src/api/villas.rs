//! Villa API handlers.
//!
//! # Purpose
//! CRUD surface for villa listings under `/api/VillaAPI`. Handlers validate
//! ids and bodies locally, enforce case-insensitive name uniqueness, and map
//! store outcomes onto status codes.
//!
//! # Key invariants
//! - An id of 0 is never a valid path id.
//! - A create body must not carry an id; the store assigns it.
//! - Name uniqueness is checked before the write and again by the store, so a
//!   racing duplicate create still ends in the same 400.
use crate::api::error::{
    ApiError, api_bad_request, api_internal, api_internal_message, api_not_found,
    api_validation, api_validation_field,
};
use crate::api::{VILLA_EXISTS, require_body};
use crate::app::AppState;
use crate::model::Villa;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use villa_model::{
    PatchDocument, PatchOperation, Validate, VillaCreateDto, VillaDto, VillaUpdateDto, apply_patch,
};

/// Fields a patch document may not touch.
const VILLA_READ_ONLY: &[&str] = &["id"];

#[utoipa::path(
    get,
    path = "/api/VillaAPI",
    tag = "villas",
    responses(
        (status = 200, description = "List villas", body = [VillaDto])
    )
)]
pub(crate) async fn list_villas(
    State(state): State<AppState>,
) -> Result<Json<Vec<VillaDto>>, ApiError> {
    let items = state
        .store
        .list_villas()
        .await
        .map_err(|err| api_internal("failed to list villas", &err))?;
    Ok(Json(items.into_iter().map(VillaDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/VillaAPI/{id}",
    tag = "villas",
    params(
        ("id" = i32, Path, description = "Villa id")
    ),
    responses(
        (status = 200, description = "Villa", body = VillaDto),
        (status = 400, description = "Invalid id", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Villa not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_villa(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<VillaDto>, ApiError> {
    if id == 0 {
        tracing::warn!("rejected villa lookup with id 0");
        return Err(api_bad_request("invalid villa id"));
    }
    match state.store.get_villa(id).await {
        Ok(villa) => Ok(Json(VillaDto::from(villa))),
        Err(StoreError::NotFound(_)) => Err(api_not_found("villa not found")),
        Err(err) => Err(api_internal("failed to load villa", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/api/VillaAPI",
    tag = "villas",
    request_body = VillaCreateDto,
    responses(
        (status = 201, description = "Villa created", body = VillaDto),
        (status = 400, description = "Missing body or duplicate name", body = villa_model::ValidationErrors),
        (status = 500, description = "Body carried a store-assigned id", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_villa(
    State(state): State<AppState>,
    body: Result<Json<Option<VillaCreateDto>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let create = require_body(body)?;
    create.validate().map_err(api_validation)?;
    if create.id != 0 {
        tracing::error!(id = create.id, "villa create carried a preset id");
        return Err(api_internal_message("villa id must not be set on create"));
    }

    let existing = state
        .store
        .find_villa_by_name(&create.name)
        .await
        .map_err(|err| api_internal("failed to check villa name", &err))?;
    if existing.is_some() {
        return Err(api_validation_field("name", VILLA_EXISTS));
    }

    match state.store.create_villa(Villa::from(create)).await {
        Ok(villa) => {
            let location = format!("/api/VillaAPI/{}", villa.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(VillaDto::from(villa)),
            ))
        }
        Err(StoreError::Conflict(_)) => Err(api_validation_field("name", VILLA_EXISTS)),
        Err(err) => Err(api_internal("failed to create villa", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/api/VillaAPI/{id}",
    tag = "villas",
    params(
        ("id" = i32, Path, description = "Villa id")
    ),
    request_body = VillaUpdateDto,
    responses(
        (status = 204, description = "Villa replaced"),
        (status = 400, description = "Id mismatch or invalid body", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Villa not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_villa(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    body: Result<Json<Option<VillaUpdateDto>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let update = require_body(body)?;
    if update.id == 0 || update.id != id {
        tracing::warn!(path_id = id, body_id = update.id, "rejected villa update id");
        return Err(api_bad_request("villa id does not match the request path"));
    }
    update.validate().map_err(api_validation)?;
    write_villa(&state, update).await
}

#[utoipa::path(
    patch,
    path = "/api/VillaAPI/{id}",
    tag = "villas",
    params(
        ("id" = i32, Path, description = "Villa id")
    ),
    request_body = [PatchOperation],
    responses(
        (status = 204, description = "Villa patched"),
        (status = 400, description = "Invalid id or patch failure", body = villa_model::ValidationErrors),
        (status = 404, description = "Villa not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_villa(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    body: Result<Json<Option<PatchDocument>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let document = require_body(body)?;
    if id == 0 {
        return Err(api_bad_request("invalid villa id"));
    }
    let current = match state.store.get_villa(id).await {
        Ok(villa) => VillaUpdateDto::from(villa),
        Err(StoreError::NotFound(_)) => return Err(api_not_found("villa not found")),
        Err(err) => return Err(api_internal("failed to load villa", &err)),
    };

    let patched = apply_patch(&current, &document, VILLA_READ_ONLY).map_err(|errors| {
        tracing::warn!(villa_id = id, "rejected villa patch");
        api_validation(errors)
    })?;
    if patched == current {
        return Ok(StatusCode::NO_CONTENT);
    }
    patched.validate().map_err(api_validation)?;
    write_villa(&state, patched).await
}

async fn write_villa(state: &AppState, update: VillaUpdateDto) -> Result<StatusCode, ApiError> {
    match state.store.update_villa(Villa::from(update)).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("villa not found")),
        Err(StoreError::Conflict(_)) => Err(api_validation_field("name", VILLA_EXISTS)),
        Err(err) => Err(api_internal("failed to update villa", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/VillaAPI/{id}",
    tag = "villas",
    params(
        ("id" = i32, Path, description = "Villa id")
    ),
    responses(
        (status = 204, description = "Villa deleted"),
        (status = 400, description = "Invalid id", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Villa not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_villa(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if id == 0 {
        return Err(api_bad_request("invalid villa id"));
    }
    match state.store.delete_villa(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("villa not found")),
        Err(err) => Err(api_internal("failed to delete villa", &err)),
    }
}
