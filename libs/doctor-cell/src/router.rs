// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_store::AppState;

use crate::handlers::*;

/// Doctor directory routes, mounted under the public surface.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/doctors", get(list_available_doctors))
        .with_state(state)
}
