mod common;

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use common::{TestApp, memory_app, read_bytes, read_json, stale_lookup_app};
use http_helpers::{empty_request, json_request};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use villa_api::app::{AppState, build_router};
use villa_api::model::{Villa, VillaNumber};
use villa_api::store::memory::InMemoryStore;
use villa_api::store::{StoreError, StoreResult, VillaStore};

async fn create_villa(app: &TestApp, name: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/VillaAPI",
            json!({ "name": name, "sqft": 1200, "occupancy": 4 }),
        ))
        .await
        .expect("villa");
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn create_number(app: &TestApp, villa_no: i32, villa_id: i32) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/VillaNumberAPI",
            json!({ "villaNo": villa_no, "villaID": villa_id, "details": "Ground floor" }),
        ))
        .await
        .expect("villa number")
}

#[tokio::test]
async fn create_validates_number_and_villa_reference() {
    let app = memory_app();
    create_villa(&app, "Seaside").await;

    let response = create_number(&app, 101, 1).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/api/VillaNumberAPI/101"
    );
    let body = read_json(response).await;
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["isSuccess"], true);
    assert_eq!(body["result"]["villaNo"], 101);
    assert_eq!(body["result"]["villaID"], 1);

    let response = create_number(&app, 101, 1).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["villaNo"][0], "Villa Number already exists!");

    let response = create_number(&app, 102, 999).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["villaID"][0], "Villa ID is Invalid!");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI/102"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_and_list_wrap_results_in_envelope() {
    let app = memory_app();
    create_villa(&app, "Seaside").await;
    assert_eq!(create_number(&app, 202, 1).await.status(), StatusCode::CREATED);
    assert_eq!(create_number(&app, 201, 1).await.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["isSuccess"], true);
    assert_eq!(body["result"][0]["villaNo"], 201);
    assert_eq!(body["result"][1]["villaNo"], 202);
    assert_eq!(body["errorMessages"], json!([]));

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI/201"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["result"]["details"], "Ground floor");
    assert_eq!(body["result"]["specialDetails"], serde_json::Value::Null);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI/0"))
        .await
        .expect("zero");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["isSuccess"], false);
}

#[tokio::test]
async fn update_revalidates_villa_reference() {
    let app = memory_app();
    create_villa(&app, "Seaside").await;
    create_villa(&app, "Harbor").await;
    assert_eq!(create_number(&app, 101, 1).await.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/VillaNumberAPI/101",
            json!({ "villaNo": 102, "villaID": 1 }),
        ))
        .await
        .expect("mismatch");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["isSuccess"], false);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/VillaNumberAPI/101",
            json!({ "villaNo": 101, "villaID": 999 }),
        ))
        .await
        .expect("bad reference");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["villaID"][0], "Villa ID is Invalid!");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/VillaNumberAPI/101",
            json!({ "villaNo": 101, "villaID": 2, "specialDetails": "Corner unit" }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(read_bytes(response).await.is_empty());

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI/101"))
        .await
        .expect("get");
    let body = read_json(response).await;
    assert_eq!(body["result"]["villaID"], 2);
    assert_eq!(body["result"]["specialDetails"], "Corner unit");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/VillaNumberAPI/303",
            json!({ "villaNo": 303, "villaID": 1 }),
        ))
        .await
        .expect("missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_updates_fields_and_protects_number() {
    let app = memory_app();
    create_villa(&app, "Seaside").await;
    assert_eq!(create_number(&app, 101, 1).await.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/VillaNumberAPI/101",
            json!([{ "op": "replace", "path": "/villaNo", "value": 500 }]),
        ))
        .await
        .expect("number");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await.get("/villaNo").is_some());

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/VillaNumberAPI/101",
            json!([{ "op": "replace", "path": "/villaId", "value": 42 }]),
        ))
        .await
        .expect("reference");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["villaID"][0], "Villa ID is Invalid!");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/VillaNumberAPI/101",
            json!([{ "op": "add", "path": "/specialDetails", "value": "Sea view" }]),
        ))
        .await
        .expect("patch");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI/101"))
        .await
        .expect("get");
    assert_eq!(
        read_json(response).await["result"]["specialDetails"],
        "Sea view"
    );
}

#[tokio::test]
async fn delete_returns_no_content_then_not_found() {
    let app = memory_app();
    create_villa(&app, "Seaside").await;
    assert_eq!(create_number(&app, 101, 1).await.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/VillaNumberAPI/101"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/VillaNumberAPI/101"))
        .await
        .expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["isSuccess"], false);
}

#[tokio::test]
async fn duplicate_number_rejected_at_write_is_validation_error() {
    let app = stale_lookup_app();
    create_villa(&app, "Seaside").await;
    assert_eq!(create_number(&app, 101, 1).await.status(), StatusCode::CREATED);

    let response = create_number(&app, 101, 1).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["villaNo"][0], "Villa Number already exists!");
    assert!(body.get("isSuccess").is_none());
}

/// Villa reads work; every villa number operation fails unexpectedly.
struct FailingNumberStore {
    villas: InMemoryStore,
}

fn outage() -> StoreError {
    StoreError::Unexpected(anyhow::anyhow!("villa number table unavailable"))
}

#[async_trait]
impl VillaStore for FailingNumberStore {
    async fn list_villas(&self) -> StoreResult<Vec<Villa>> {
        self.villas.list_villas().await
    }
    async fn get_villa(&self, id: i32) -> StoreResult<Villa> {
        self.villas.get_villa(id).await
    }
    async fn find_villa_by_name(&self, name: &str) -> StoreResult<Option<Villa>> {
        self.villas.find_villa_by_name(name).await
    }
    async fn villa_exists(&self, id: i32) -> StoreResult<bool> {
        self.villas.villa_exists(id).await
    }
    async fn create_villa(&self, villa: Villa) -> StoreResult<Villa> {
        self.villas.create_villa(villa).await
    }
    async fn update_villa(&self, villa: Villa) -> StoreResult<Villa> {
        self.villas.update_villa(villa).await
    }
    async fn delete_villa(&self, id: i32) -> StoreResult<()> {
        self.villas.delete_villa(id).await
    }
    async fn list_villa_numbers(&self) -> StoreResult<Vec<VillaNumber>> {
        Err(outage())
    }
    async fn get_villa_number(&self, _villa_no: i32) -> StoreResult<VillaNumber> {
        Err(outage())
    }
    async fn villa_number_exists(&self, _villa_no: i32) -> StoreResult<bool> {
        Err(outage())
    }
    async fn create_villa_number(&self, _number: VillaNumber) -> StoreResult<VillaNumber> {
        Err(outage())
    }
    async fn update_villa_number(&self, _number: VillaNumber) -> StoreResult<VillaNumber> {
        Err(outage())
    }
    async fn delete_villa_number(&self, _villa_no: i32) -> StoreResult<()> {
        Err(outage())
    }
    async fn health_check(&self) -> StoreResult<()> {
        Err(outage())
    }
    fn is_durable(&self) -> bool {
        false
    }
    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

fn failing_app() -> TestApp {
    let store = FailingNumberStore {
        villas: InMemoryStore::new(),
    };
    build_router(AppState::new(Arc::new(store))).into_service()
}

#[tokio::test]
async fn store_faults_are_recorded_in_envelope_with_prior_status() {
    let app = failing_app();
    create_villa(&app, "Seaside").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/VillaNumberAPI"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["isSuccess"], false);
    assert_eq!(
        body["errorMessages"],
        json!(["villa number table unavailable"])
    );
    assert_eq!(body["result"], serde_json::Value::Null);

    let response = create_number(&app, 101, 1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["errorMessages"].as_array().map(Vec::len), Some(1));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/VillaNumberAPI/101",
            json!({ "villaNo": 101, "villaID": 1 }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["isSuccess"], false);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/VillaNumberAPI/101"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["isSuccess"], false);
}

#[tokio::test]
async fn failing_health_check_is_internal_error() {
    let app = failing_app();
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/health"))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["code"], "internal");
}
