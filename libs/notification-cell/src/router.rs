// libs/notification-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_store::AppState;

use crate::handlers::*;

/// Notification routes. Public in the current configuration.
pub fn notification_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/mark-read", post(mark_read))
        .with_state(state)
}
