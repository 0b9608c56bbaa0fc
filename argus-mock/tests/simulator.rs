//! Integration tests for the simulator HTTP surface.
//!
//! These drive the router with fully signed requests, the same way a real
//! client would, and assert the exact (status, result_code) pairings and
//! their precedence.

use std::sync::Arc;
use std::time::Duration;

use argus_core::Clock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use argus_core::{authorization_header, rfc_1123_date, FixedClock};
use argus_mock::{mock_router, Account, Simulator, SimulatorConfig};

const PNG: &[u8] = include_bytes!("fixtures/rgb.png");

struct TestSim {
    app: Router,
    clock: Arc<FixedClock>,
    account: Arc<Account>,
}

fn test_sim_with(config: impl FnOnce(&mut SimulatorConfig)) -> TestSim {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    let mut cfg = SimulatorConfig {
        clock: clock.clone(),
        processing_delay: Duration::from_secs(1),
        ..SimulatorConfig::default()
    };
    config(&mut cfg);

    let simulator = Arc::new(Simulator::new(cfg));
    let account = simulator.register_random_account();
    TestSim {
        app: mock_router(simulator),
        clock,
        account,
    }
}

fn test_sim() -> TestSim {
    test_sim_with(|_| {})
}

fn signed_request(
    account: &Account,
    date: &str,
    method: &str,
    path: &str,
    body: Vec<u8>,
    content_type: &str,
) -> Request<Body> {
    let authorization = authorization_header(
        &account.access_key,
        account.secret_key.as_bytes(),
        method,
        &body,
        content_type,
        date,
        path,
    );

    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("Authorization", authorization)
        .header("Date", date);
    if !content_type.is_empty() {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

impl TestSim {
    fn date(&self) -> String {
        rfc_1123_date(self.clock.now())
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> (StatusCode, Value) {
        self.send_as(&self.account, method, path, body, content_type)
            .await
    }

    async fn send_as(
        &self,
        account: &Account,
        method: &str,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> (StatusCode, Value) {
        let request = signed_request(account, &self.date(), method, path, body, content_type);
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn add_target(&self, name: &str) -> String {
        let body = serde_json::to_vec(&add_body(name)).unwrap();
        let (status, json) = self.send("POST", "/targets", body, "application/json").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["result_code"], "TargetCreated");
        json["target_id"].as_str().unwrap().to_string()
    }

    /// Let the lifecycle engine finish processing everything pending.
    fn finish_processing(&self) {
        self.clock.advance(chrono::Duration::seconds(2));
    }
}

fn add_body(name: &str) -> Value {
    json!({
        "name": name,
        "width": 1,
        "image": BASE64.encode(PNG),
    })
}

fn assert_failure(status: StatusCode, json: &Value, expected_status: StatusCode, code: &str) {
    assert_eq!(status, expected_status);
    assert_eq!(json["result_code"], code);
    assert!(json["transaction_id"].is_string());
}

#[tokio::test]
async fn test_add_and_get_target() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;

    let (status, json) = sim
        .send("GET", &format!("/targets/{target_id}"), Vec::new(), "")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result_code"], "Success");
    assert_eq!(json["status"], "processing");
    assert_eq!(json["target_record"]["target_id"], target_id.as_str());
    assert_eq!(json["target_record"]["name"], "x");
    assert_eq!(json["target_record"]["width"], 1.0);
    assert_eq!(json["target_record"]["active_flag"], true);
    assert!(json["target_record"].get("tracking_rating").is_none());
}

#[tokio::test]
async fn test_duplicate_name_same_owner() {
    let sim = test_sim();
    sim.add_target("x").await;

    let body = serde_json::to_vec(&add_body("x")).unwrap();
    let (status, json) = sim.send("POST", "/targets", body, "application/json").await;
    assert_failure(status, &json, StatusCode::FORBIDDEN, "TargetNameExist");
}

#[tokio::test]
async fn test_duplicate_name_different_owners() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    let simulator = Arc::new(Simulator::new(SimulatorConfig {
        clock: clock.clone(),
        ..SimulatorConfig::default()
    }));
    let first = simulator.register_random_account();
    let second = simulator.register_random_account();
    let app = mock_router(simulator);

    for account in [&first, &second] {
        let body = serde_json::to_vec(&add_body("x")).unwrap();
        let request = signed_request(
            account,
            &rfc_1123_date(clock.now()),
            "POST",
            "/targets",
            body,
            "application/json",
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_bad_signature_wins_over_bad_body() {
    let sim = test_sim();

    // Invalid body AND a signature computed with the wrong secret.
    let body = b"{\"unexpected\": 1".to_vec();
    let date = sim.date();
    let authorization = authorization_header(
        &sim.account.access_key,
        b"wrong-secret",
        "POST",
        &body,
        "application/json",
        &date,
        "/targets",
    );
    let request = Request::builder()
        .method("POST")
        .uri("/targets")
        .header("Authorization", authorization)
        .header("Date", date)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = sim.app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_failure(status, &json, StatusCode::UNAUTHORIZED, "AuthenticationFailure");
}

#[tokio::test]
async fn test_stale_date_rejected() {
    let sim = test_sim();

    let stale = rfc_1123_date(sim.clock.now() - chrono::Duration::minutes(10));
    let request = signed_request(&sim.account, &stale, "GET", "/targets", Vec::new(), "");
    let response = sim.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inactive_project_fails_everything() {
    let sim = test_sim_with(|cfg| cfg.active = false);

    let body = serde_json::to_vec(&add_body("x")).unwrap();
    let (status, json) = sim.send("POST", "/targets", body, "application/json").await;
    assert_failure(status, &json, StatusCode::FORBIDDEN, "ProjectInactive");

    // The active check also precedes body validation.
    let (status, json) = sim
        .send("POST", "/targets", b"garbage".to_vec(), "application/json")
        .await;
    assert_failure(status, &json, StatusCode::FORBIDDEN, "ProjectInactive");

    let (status, json) = sim.send("GET", "/targets", Vec::new(), "").await;
    assert_failure(status, &json, StatusCode::FORBIDDEN, "ProjectInactive");
}

#[tokio::test]
async fn test_unknown_target_is_not_found() {
    let sim = test_sim();
    let missing = "/targets/ffffffffffffffffffffffffffffffff";

    let (status, json) = sim.send("GET", missing, Vec::new(), "").await;
    assert_failure(status, &json, StatusCode::NOT_FOUND, "UnknownTarget");

    let (status, json) = sim
        .send("PUT", missing, b"{}".to_vec(), "application/json")
        .await;
    assert_failure(status, &json, StatusCode::NOT_FOUND, "UnknownTarget");

    let (status, json) = sim.send("DELETE", missing, Vec::new(), "").await;
    assert_failure(status, &json, StatusCode::NOT_FOUND, "UnknownTarget");
}

#[tokio::test]
async fn test_unexpected_field_rejected() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;
    sim.finish_processing();

    let body = serde_json::to_vec(&json!({ "extra_thing": 1 })).unwrap();
    let (status, json) = sim
        .send("PUT", &format!("/targets/{target_id}"), body, "application/json")
        .await;
    assert_failure(status, &json, StatusCode::BAD_REQUEST, "Fail");
}

#[tokio::test]
async fn test_update_gated_while_processing() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;

    // Valid body, any content type: still rejected while processing.
    let body = serde_json::to_vec(&json!({ "name": "renamed" })).unwrap();
    let (status, json) = sim
        .send("PUT", &format!("/targets/{target_id}"), body, "other/content_type")
        .await;
    assert_failure(status, &json, StatusCode::FORBIDDEN, "TargetStatusNotSuccess");
}

#[tokio::test]
async fn test_update_after_processing_resets_status() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;
    sim.finish_processing();

    let path = format!("/targets/{target_id}");
    let (status, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["target_record"]["tracking_rating"], 5);

    // A width update succeeds and forces the target back into processing.
    let body = serde_json::to_vec(&json!({ "width": 0.1 })).unwrap();
    let (status, json) = sim.send("PUT", &path, body, "application/json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result_code"], "Success");

    let (_, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(json["status"], "processing");
    assert_eq!(json["target_record"]["width"], 0.1);
    assert!(json["target_record"].get("tracking_rating").is_none());
}

#[tokio::test]
async fn test_width_invalid_leaves_record_untouched() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;
    sim.finish_processing();
    let path = format!("/targets/{target_id}");

    for width in [json!(-1), json!("10"), json!(null)] {
        let body = serde_json::to_vec(&json!({ "width": width })).unwrap();
        let (status, json) = sim.send("PUT", &path, body, "application/json").await;
        assert_failure(status, &json, StatusCode::BAD_REQUEST, "Fail");
    }

    let (_, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(json["target_record"]["width"], 1.0);
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn test_metadata_validation_matrix() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;
    sim.finish_processing();
    let path = format!("/targets/{target_id}");

    // null and valid base64 succeed.
    for metadata in [json!(null), json!(BASE64.encode(b"Some data"))] {
        let body = serde_json::to_vec(&json!({ "application_metadata": metadata })).unwrap();
        let (status, json) = sim.send("PUT", &path, body, "application/json").await;
        assert_eq!(status, StatusCode::OK, "metadata: {json}");
    }

    // A non-base64 string gets the distinct, more severe status.
    let body = serde_json::to_vec(&json!({ "application_metadata": "a" })).unwrap();
    let (status, json) = sim.send("PUT", &path, body, "application/json").await;
    assert_failure(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "Fail");

    // A non-string non-null value is a generic type failure.
    let body = serde_json::to_vec(&json!({ "application_metadata": 1 })).unwrap();
    let (status, json) = sim.send("PUT", &path, body, "application/json").await;
    assert_failure(status, &json, StatusCode::BAD_REQUEST, "Fail");
}

#[tokio::test]
async fn test_bad_image_and_too_large() {
    let sim = test_sim_with(|cfg| cfg.max_image_bytes = 16);

    let mut body = add_body("x");
    body["image"] = json!(BASE64.encode(b"Not an image"));
    let bytes = serde_json::to_vec(&body).unwrap();
    let (status, json) = sim.send("POST", "/targets", bytes, "application/json").await;
    assert_failure(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "BadImage");

    // The fixture decodes fine but is over the 16-byte ceiling.
    let bytes = serde_json::to_vec(&add_body("x")).unwrap();
    let (status, json) = sim.send("POST", "/targets", bytes, "application/json").await;
    assert_failure(status, &json, StatusCode::UNPROCESSABLE_ENTITY, "ImageTooLarge");
}

#[tokio::test]
async fn test_oversized_body_aborted_without_envelope() {
    let sim = test_sim_with(|cfg| cfg.request_body_limit = 64);

    let mut body = add_body("x");
    body["application_metadata"] = json!(BASE64.encode(vec![0u8; 256]));
    let bytes = serde_json::to_vec(&body).unwrap();
    let (status, json) = sim.send("POST", "/targets", bytes, "application/json").await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    // No result envelope; the request was cut off at the transport layer.
    assert!(json.get("result_code").is_none());
}

#[tokio::test]
async fn test_list_targets_insertion_order() {
    let sim = test_sim();
    let a = sim.add_target("a").await;
    let b = sim.add_target("b").await;

    let (status, json) = sim.send("GET", "/targets", Vec::new(), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result_code"], "Success");
    assert_eq!(json["results"], json!([a, b]));
}

#[tokio::test]
async fn test_delete_then_read_is_not_found() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;
    let path = format!("/targets/{target_id}");

    // Deletion is permitted even while the target is still processing.
    let (status, json) = sim.send("DELETE", &path, Vec::new(), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result_code"], "Success");

    let (status, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_failure(status, &json, StatusCode::NOT_FOUND, "UnknownTarget");
}

#[tokio::test]
async fn test_full_target_lifecycle() {
    let sim = test_sim();
    let target_id = sim.add_target("x").await;
    let path = format!("/targets/{target_id}");

    let (_, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(json["status"], "processing");

    sim.finish_processing();
    let (_, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(json["status"], "success");

    let body = serde_json::to_vec(&json!({ "active_flag": false })).unwrap();
    let (status, _) = sim.send("PUT", &path, body, "application/json").await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(json["target_record"]["active_flag"], false);

    let (status, _) = sim.send("DELETE", &path, Vec::new(), "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = sim.send("GET", &path, Vec::new(), "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
