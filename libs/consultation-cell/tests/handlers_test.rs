use axum::body::{to_bytes, Body};
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use consultation_cell::router::consultation_routes;
use shared_models::entities::Role;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUsers};

struct TestApp {
    app: Router,
    doctor_id: i64,
    patient_id: i64,
    token: String,
}

async fn test_app() -> TestApp {
    let state = TestConfig::default().to_state();
    let doctor = state
        .store
        .save_user(TestUsers::doctor("daniel@example.com"))
        .await
        .unwrap();
    let patient = state
        .store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();
    let token = JwtTestUtils::create_test_token(
        doctor.id,
        &[Role::Doctor],
        &state.config.jwt_secret,
        None,
    );
    TestApp {
        app: consultation_routes(state.clone()),
        doctor_id: doctor.id,
        patient_id: patient.id,
        token,
    }
}

fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token));
    match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn creating_a_session_defaults_to_online_with_a_room() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(authed(
            "POST",
            "/",
            &t.token,
            Some(json!({
                "topic": "Back pain",
                "doctorId": t.doctor_id,
                "patientId": t.patient_id
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["mode"], "ONLINE");
    assert!(body["videoRoom"].as_str().unwrap().starts_with("chc-"));
    assert!(body["sessionStart"].is_null());
    assert!(body["sessionEnd"].is_null());
}

#[tokio::test]
async fn unresolved_references_map_to_not_found() {
    let t = test_app().await;

    for (payload, message) in [
        (
            json!({ "doctorId": 9999, "patientId": t.patient_id }),
            "Doctor not found",
        ),
        (
            json!({ "doctorId": t.doctor_id, "patientId": 9999 }),
            "Patient not found",
        ),
        (
            json!({
                "doctorId": t.doctor_id,
                "patientId": t.patient_id,
                "appointmentId": 9999
            }),
            "Appointment not found",
        ),
    ] {
        let response = t
            .app
            .clone()
            .oneshot(authed("POST", "/", &t.token, Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn malformed_session_timestamp_is_a_bad_request() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(authed(
            "POST",
            "/",
            &t.token,
            Some(json!({
                "doctorId": t.doctor_id,
                "patientId": t.patient_id,
                "sessionStart": "yesterday"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid timestamp format"));
}

#[tokio::test]
async fn start_and_end_transition_over_http() {
    let t = test_app().await;

    let created = t
        .app
        .clone()
        .oneshot(authed(
            "POST",
            "/",
            &t.token,
            Some(json!({ "doctorId": t.doctor_id, "patientId": t.patient_id })),
        ))
        .await
        .unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    let started = t
        .app
        .clone()
        .oneshot(authed("POST", &format!("/{}/start", id), &t.token, None))
        .await
        .unwrap();
    assert_eq!(started.status(), StatusCode::OK);
    assert!(!body_json(started).await["sessionStart"].is_null());

    let ended = t
        .app
        .clone()
        .oneshot(authed("POST", &format!("/{}/end", id), &t.token, None))
        .await
        .unwrap();
    assert_eq!(ended.status(), StatusCode::OK);
    assert!(!body_json(ended).await["sessionEnd"].is_null());
}

#[tokio::test]
async fn transitions_on_missing_sessions_are_not_found() {
    let t = test_app().await;

    for uri in ["/999/start", "/999/end", "/abc/start"] {
        let response = t
            .app
            .clone()
            .oneshot(authed("POST", uri, &t.token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn update_keeps_unmentioned_fields() {
    let t = test_app().await;

    let created = t
        .app
        .clone()
        .oneshot(authed(
            "POST",
            "/",
            &t.token,
            Some(json!({
                "topic": "Back pain",
                "doctorId": t.doctor_id,
                "patientId": t.patient_id
            })),
        ))
        .await
        .unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    let updated = t
        .app
        .oneshot(authed(
            "PUT",
            &format!("/{}", id),
            &t.token,
            Some(json!({ "notes": "Follow up in two weeks" })),
        ))
        .await
        .unwrap();

    assert_eq!(updated.status(), StatusCode::OK);
    let body = body_json(updated).await;
    assert_eq!(body["notes"], "Follow up in two weeks");
    assert_eq!(body["topic"], "Back pain");
}

#[tokio::test]
async fn join_info_is_stable_and_public() {
    let t = test_app().await;

    let created = t
        .app
        .clone()
        .oneshot(authed(
            "POST",
            "/",
            &t.token,
            Some(json!({ "doctorId": t.doctor_id, "patientId": t.patient_id })),
        ))
        .await
        .unwrap();
    let session = body_json(created).await;
    let id = session["id"].as_i64().unwrap();

    let response = t
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/{}/join-info", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // The room attached at creation wins; join-info never reassigns it.
    assert_eq!(body["room"], session["videoRoom"]);
    assert_eq!(
        body["url"].as_str().unwrap(),
        format!("https://meet.jit.si/{}", session["videoRoom"].as_str().unwrap())
    );
}

#[tokio::test]
async fn protected_routes_reject_missing_tokens() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
