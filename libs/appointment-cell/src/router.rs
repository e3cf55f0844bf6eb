// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

/// Appointment routes. join-info is public; everything else sits behind the
/// access guard.
pub fn appointment_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/{id}/join-info", get(appointment_join_info));

    let protected_routes = Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/upcoming", get(list_upcoming_appointments))
        .route(
            "/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
