//! OpenAPI schema aggregation for the villa API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document served
//! at `/api/openapi.json` and rendered by Swagger UI at `/docs`.
use crate::api::{
    system,
    types::{ErrorResponse, HealthStatus, SystemInfo},
    villa_numbers, villas,
};
use utoipa::OpenApi;
use villa_model::envelope::{EmptyEnvelope, VillaNumberEnvelope, VillaNumberListEnvelope};
use villa_model::{
    Empty, PatchOperation, ValidationErrors, VillaCreateDto, VillaDto, VillaNumberCreateDto,
    VillaNumberDto, VillaNumberUpdateDto, VillaUpdateDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "villa-api",
        version = "v1",
        description = "Villa listings and villa numbers HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        villas::list_villas,
        villas::get_villa,
        villas::create_villa,
        villas::update_villa,
        villas::patch_villa,
        villas::delete_villa,
        villa_numbers::list_villa_numbers,
        villa_numbers::get_villa_number,
        villa_numbers::create_villa_number,
        villa_numbers::update_villa_number,
        villa_numbers::patch_villa_number,
        villa_numbers::delete_villa_number
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        ValidationErrors,
        PatchOperation,
        VillaDto,
        VillaCreateDto,
        VillaUpdateDto,
        VillaNumberDto,
        VillaNumberCreateDto,
        VillaNumberUpdateDto,
        Empty,
        VillaNumberEnvelope,
        VillaNumberListEnvelope,
        EmptyEnvelope
    )),
    tags(
        (name = "system", description = "Health and service metadata"),
        (name = "villas", description = "Villa management"),
        (name = "villa-numbers", description = "Villa number management")
    )
)]
pub struct ApiDoc;
