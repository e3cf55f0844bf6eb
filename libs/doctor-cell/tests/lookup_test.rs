use std::sync::Arc;

use axum::body::{to_bytes, Body};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use doctor_cell::router::doctor_routes;
use doctor_cell::services::DoctorLookupService;
use shared_models::entities::ConsultationSession;
use shared_store::{EntityStore, MemoryStore};
use shared_utils::test_utils::{TestConfig, TestUsers};

async fn open_session(store: &dyn EntityStore, doctor_id: i64, patient_id: i64) -> i64 {
    store
        .save_session(ConsultationSession {
            id: 0,
            topic: None,
            mode: "ONLINE".to_string(),
            session_start: None,
            session_end: None,
            notes: None,
            prescription: None,
            doctor_id,
            patient_id,
            appointment_id: None,
            video_room: Some("chc-0123456789abcdef".to_string()),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn only_unoccupied_doctors_are_listed() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let free = store
        .save_user(TestUsers::doctor("free@example.com"))
        .await
        .unwrap();
    let busy = store
        .save_user(TestUsers::doctor("busy@example.com"))
        .await
        .unwrap();
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();
    open_session(store.as_ref(), busy.id, patient.id).await;

    let service = DoctorLookupService::new(store);
    let listed = service.available_doctors().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, free.id);
    assert_eq!(listed[0].role, "DOCTOR");
    assert!(listed[0].available);
}

#[tokio::test]
async fn ending_a_session_frees_the_doctor() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let doctor = store
        .save_user(TestUsers::doctor("daniel@example.com"))
        .await
        .unwrap();
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();
    let session_id = open_session(store.as_ref(), doctor.id, patient.id).await;

    let service = DoctorLookupService::new(store.clone());
    assert!(service.available_doctors().await.unwrap().is_empty());

    let mut session = store.find_session(session_id).await.unwrap().unwrap();
    session.session_end = Some(chrono::Utc::now());
    store.save_session(session).await.unwrap();

    let listed = service.available_doctors().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, doctor.id);
}

#[tokio::test]
async fn non_doctors_never_appear() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();
    store
        .save_user(TestUsers::admin("alice@example.com"))
        .await
        .unwrap();

    let service = DoctorLookupService::new(store);
    assert!(service.available_doctors().await.unwrap().is_empty());
}

#[tokio::test]
async fn the_directory_endpoint_is_public_and_never_errors_on_empty() {
    let state = TestConfig::default().to_state();
    let app = doctor_routes(state.clone());

    // Empty store, no Authorization header.
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/doctors").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, Value::Array(vec![]));

    let doctor = state
        .store
        .save_user(TestUsers::doctor("daniel@example.com"))
        .await
        .unwrap();
    let response = app
        .oneshot(Request::builder().uri("/doctors").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["id"], doctor.id);
    assert_eq!(body[0]["name"], "daniel");
    assert_eq!(body[0]["available"], true);
}
