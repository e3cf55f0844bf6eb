use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use consultation_cell::router::consultation_routes;
use doctor_cell::router::doctor_routes;
use notification_cell::router::notification_routes;
use shared_store::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Community Health API is running!" }))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/consultations", consultation_routes(state.clone()))
        .nest("/api/notifications", notification_routes(state.clone()))
        .nest("/api/public", doctor_routes(state.clone()))
}
