//! Villa number API handlers.
//!
//! # Purpose
//! CRUD surface for numbered units under `/api/VillaNumberAPI`. Results are
//! wrapped in the [`ApiResponse`] envelope; the transport status always
//! equals the envelope's `statusCode`.
//!
//! # Key invariants
//! - A villa number may only reference an existing villa, on create, update,
//!   and patch alike. The check is read-then-write.
//! - Validation conflicts (duplicate number, unknown villa, shape errors) are
//!   400 with a field-keyed body, not an envelope.
//! - Unexpected store faults do not become 500: the envelope's success flag is
//!   cleared, the fault text is recorded, and the status keeps whatever value
//!   the handler had set before the fault.
//! - A successful envelope with status 204 is sent as an empty 204.
use crate::api::error::{ApiError, api_validation, api_validation_field};
use crate::api::{VILLA_ID_INVALID, VILLA_NUMBER_EXISTS, require_body};
use crate::app::AppState;
use crate::model::VillaNumber;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use villa_model::envelope::{EmptyEnvelope, VillaNumberEnvelope, VillaNumberListEnvelope};
use villa_model::{
    ApiResponse, Empty, PatchDocument, PatchOperation, Validate, VillaNumberCreateDto,
    VillaNumberDto, VillaNumberUpdateDto, apply_patch,
};

/// Fields a patch document may not touch.
const VILLA_NUMBER_READ_ONLY: &[&str] = &["villaNo"];

fn envelope_response<T: Serialize>(envelope: ApiResponse<T>) -> Response {
    let status = StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::OK);
    if status == StatusCode::NO_CONTENT && envelope.is_success {
        return status.into_response();
    }
    (status, Json(envelope)).into_response()
}

/// Record an unexpected store fault in the envelope.
fn fault<T>(envelope: &mut ApiResponse<T>, err: &StoreError) {
    tracing::error!(error = ?err, "villa number storage error");
    envelope.record_fault(err.to_string());
}

enum Reference {
    Valid,
    Invalid,
    Fault(StoreError),
}

async fn check_villa_reference(state: &AppState, villa_id: i32) -> Reference {
    match state.store.villa_exists(villa_id).await {
        Ok(true) => Reference::Valid,
        Ok(false) => Reference::Invalid,
        Err(err) => Reference::Fault(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/VillaNumberAPI",
    tag = "villa-numbers",
    responses(
        (status = 200, description = "List villa numbers", body = VillaNumberListEnvelope)
    )
)]
pub(crate) async fn list_villa_numbers(State(state): State<AppState>) -> Response {
    let mut envelope = ApiResponse::<Vec<VillaNumberDto>>::new();
    match state.store.list_villa_numbers().await {
        Ok(items) => envelope.set_result(
            StatusCode::OK.as_u16(),
            items.into_iter().map(VillaNumberDto::from).collect(),
        ),
        Err(err) => fault(&mut envelope, &err),
    }
    envelope_response(envelope)
}

#[utoipa::path(
    get,
    path = "/api/VillaNumberAPI/{villa_no}",
    tag = "villa-numbers",
    params(
        ("villa_no" = i32, Path, description = "Villa number")
    ),
    responses(
        (status = 200, description = "Villa number", body = VillaNumberEnvelope),
        (status = 400, description = "Invalid villa number", body = VillaNumberEnvelope),
        (status = 404, description = "Villa number not found", body = VillaNumberEnvelope)
    )
)]
pub(crate) async fn get_villa_number(
    Path(villa_no): Path<i32>,
    State(state): State<AppState>,
) -> Response {
    let mut envelope = ApiResponse::<VillaNumberDto>::new();
    if villa_no == 0 {
        envelope.set_status(StatusCode::BAD_REQUEST.as_u16());
        return envelope_response(envelope);
    }
    match state.store.get_villa_number(villa_no).await {
        Ok(number) => envelope.set_result(StatusCode::OK.as_u16(), VillaNumberDto::from(number)),
        Err(StoreError::NotFound(_)) => envelope.set_status(StatusCode::NOT_FOUND.as_u16()),
        Err(err) => fault(&mut envelope, &err),
    }
    envelope_response(envelope)
}

#[utoipa::path(
    post,
    path = "/api/VillaNumberAPI",
    tag = "villa-numbers",
    request_body = VillaNumberCreateDto,
    responses(
        (status = 201, description = "Villa number created", body = VillaNumberEnvelope),
        (status = 400, description = "Duplicate number or unknown villa", body = villa_model::ValidationErrors)
    )
)]
pub(crate) async fn create_villa_number(
    State(state): State<AppState>,
    body: Result<Json<Option<VillaNumberCreateDto>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let create = require_body(body)?;
    create.validate().map_err(api_validation)?;

    let mut envelope = ApiResponse::<VillaNumberDto>::new();
    match state.store.villa_number_exists(create.villa_no).await {
        Ok(true) => return Err(api_validation_field("villaNo", VILLA_NUMBER_EXISTS)),
        Ok(false) => {}
        Err(err) => {
            fault(&mut envelope, &err);
            return Ok(envelope_response(envelope));
        }
    }
    match check_villa_reference(&state, create.villa_id).await {
        Reference::Valid => {}
        Reference::Invalid => return Err(api_validation_field("villaID", VILLA_ID_INVALID)),
        Reference::Fault(err) => {
            fault(&mut envelope, &err);
            return Ok(envelope_response(envelope));
        }
    }

    match state.store.create_villa_number(VillaNumber::from(create)).await {
        Ok(number) => {
            let location = format!("/api/VillaNumberAPI/{}", number.villa_no);
            envelope.set_result(StatusCode::CREATED.as_u16(), VillaNumberDto::from(number));
            let mut response = envelope_response(envelope);
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
            Ok(response)
        }
        Err(StoreError::Conflict(_)) => Err(api_validation_field("villaNo", VILLA_NUMBER_EXISTS)),
        Err(err) => {
            fault(&mut envelope, &err);
            Ok(envelope_response(envelope))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/VillaNumberAPI/{villa_no}",
    tag = "villa-numbers",
    params(
        ("villa_no" = i32, Path, description = "Villa number")
    ),
    request_body = VillaNumberUpdateDto,
    responses(
        (status = 204, description = "Villa number replaced"),
        (status = 400, description = "Number mismatch or unknown villa", body = EmptyEnvelope),
        (status = 404, description = "Villa number not found", body = EmptyEnvelope)
    )
)]
pub(crate) async fn update_villa_number(
    Path(villa_no): Path<i32>,
    State(state): State<AppState>,
    body: Result<Json<Option<VillaNumberUpdateDto>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let update = require_body(body)?;
    let mut envelope = ApiResponse::<Empty>::new();
    if update.villa_no == 0 || update.villa_no != villa_no {
        tracing::warn!(
            path_no = villa_no,
            body_no = update.villa_no,
            "rejected villa number update"
        );
        envelope.set_status(StatusCode::BAD_REQUEST.as_u16());
        return Ok(envelope_response(envelope));
    }
    update.validate().map_err(api_validation)?;
    write_villa_number(&state, envelope, update).await
}

#[utoipa::path(
    patch,
    path = "/api/VillaNumberAPI/{villa_no}",
    tag = "villa-numbers",
    params(
        ("villa_no" = i32, Path, description = "Villa number")
    ),
    request_body = [PatchOperation],
    responses(
        (status = 204, description = "Villa number patched"),
        (status = 400, description = "Invalid number or patch failure", body = villa_model::ValidationErrors),
        (status = 404, description = "Villa number not found", body = EmptyEnvelope)
    )
)]
pub(crate) async fn patch_villa_number(
    Path(villa_no): Path<i32>,
    State(state): State<AppState>,
    body: Result<Json<Option<PatchDocument>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let document = require_body(body)?;
    let mut envelope = ApiResponse::<Empty>::new();
    if villa_no == 0 {
        envelope.set_status(StatusCode::BAD_REQUEST.as_u16());
        return Ok(envelope_response(envelope));
    }
    let current = match state.store.get_villa_number(villa_no).await {
        Ok(number) => VillaNumberUpdateDto::from(number),
        Err(StoreError::NotFound(_)) => {
            envelope.set_status(StatusCode::NOT_FOUND.as_u16());
            return Ok(envelope_response(envelope));
        }
        Err(err) => {
            fault(&mut envelope, &err);
            return Ok(envelope_response(envelope));
        }
    };

    let patched =
        apply_patch(&current, &document, VILLA_NUMBER_READ_ONLY).map_err(api_validation)?;
    if patched == current {
        envelope.set_status(StatusCode::NO_CONTENT.as_u16());
        return Ok(envelope_response(envelope));
    }
    patched.validate().map_err(api_validation)?;
    write_villa_number(&state, envelope, patched).await
}

/// Re-check the villa reference, then replace the stored row.
async fn write_villa_number(
    state: &AppState,
    mut envelope: ApiResponse<Empty>,
    update: VillaNumberUpdateDto,
) -> Result<Response, ApiError> {
    match check_villa_reference(state, update.villa_id).await {
        Reference::Valid => {}
        Reference::Invalid => return Err(api_validation_field("villaID", VILLA_ID_INVALID)),
        Reference::Fault(err) => {
            fault(&mut envelope, &err);
            return Ok(envelope_response(envelope));
        }
    }
    match state
        .store
        .update_villa_number(VillaNumber::from(update))
        .await
    {
        Ok(_) => envelope.set_status(StatusCode::NO_CONTENT.as_u16()),
        Err(StoreError::NotFound(_)) => envelope.set_status(StatusCode::NOT_FOUND.as_u16()),
        Err(err) => fault(&mut envelope, &err),
    }
    Ok(envelope_response(envelope))
}

#[utoipa::path(
    delete,
    path = "/api/VillaNumberAPI/{villa_no}",
    tag = "villa-numbers",
    params(
        ("villa_no" = i32, Path, description = "Villa number")
    ),
    responses(
        (status = 204, description = "Villa number deleted"),
        (status = 400, description = "Invalid villa number", body = EmptyEnvelope),
        (status = 404, description = "Villa number not found", body = EmptyEnvelope)
    )
)]
pub(crate) async fn delete_villa_number(
    Path(villa_no): Path<i32>,
    State(state): State<AppState>,
) -> Response {
    let mut envelope = ApiResponse::<Empty>::new();
    if villa_no == 0 {
        envelope.set_status(StatusCode::BAD_REQUEST.as_u16());
        return envelope_response(envelope);
    }
    match state.store.delete_villa_number(villa_no).await {
        Ok(()) => envelope.set_status(StatusCode::NO_CONTENT.as_u16()),
        Err(StoreError::NotFound(_)) => envelope.set_status(StatusCode::NOT_FOUND.as_u16()),
        Err(err) => fault(&mut envelope, &err),
    }
    envelope_response(envelope)
}
