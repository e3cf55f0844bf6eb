// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::DoctorSummary;
use crate::services::DoctorLookupService;

/// An empty list is a normal answer, not an error.
#[axum::debug_handler]
pub async fn list_available_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DoctorSummary>>, AppError> {
    let service = DoctorLookupService::new(state.store.clone());
    Ok(Json(service.available_doctors().await?))
}
