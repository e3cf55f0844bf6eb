// libs/consultation-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

/// Consultation routes. join-info is public; everything else sits behind the
/// access guard.
pub fn consultation_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/{id}/join-info", get(consultation_join_info));

    let protected_routes = Router::new()
        .route("/", get(list_consultations).post(create_consultation))
        .route("/upcoming", get(list_upcoming_consultations))
        .route(
            "/{id}",
            get(get_consultation)
                .put(update_consultation)
                .delete(delete_consultation),
        )
        .route("/{id}/start", post(start_consultation))
        .route("/{id}/end", post(end_consultation))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
