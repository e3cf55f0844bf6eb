// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::entities::{Appointment, AppointmentStatus};
use shared_models::error::AppError;
use shared_store::AppState;
use video_link_cell::models::JoinInfo;
use video_link_cell::services::VideoLinkService;

use crate::models::{parse_schedule, AppointmentDraft, AppointmentPatch, AppointmentRequest};
use crate::services::AppointmentLifecycleService;

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    debug!("User {} booking appointment", user.id);

    // Required patient reference; doctor is optional and an unresolved
    // doctor id is simply dropped.
    if state.store.find_user(request.patient_id).await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .is_none()
    {
        return Err(AppError::NotFound("Patient not found".to_string()));
    }
    let doctor_id = match request.doctor_id {
        Some(id) => state
            .store
            .find_user(id)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
            .map(|d| d.id),
        None => None,
    };

    let scheduled_at = match request.scheduled_at.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(parse_schedule(raw)?),
        _ => None,
    };

    let service = AppointmentLifecycleService::new(state.store.clone());
    let saved = service
        .create(AppointmentDraft {
            title: request.title,
            scheduled_at,
            notes: request.notes,
            status: request.status.map(AppointmentStatus::from),
            patient_id: request.patient_id,
            doctor_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentLifecycleService::new(state.store.clone());
    match service.get_by_id(&id).await? {
        Some(appointment) => Ok(Json(appointment)),
        None => Err(AppError::NotFound(format!(
            "Appointment not found with id: {}",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = AppointmentLifecycleService::new(state.store.clone());
    Ok(Json(service.list_all().await?))
}

#[axum::debug_handler]
pub async fn list_upcoming_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = AppointmentLifecycleService::new(state.store.clone());
    Ok(Json(service.list_upcoming().await?))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<Appointment>, AppError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::NotFound(format!(
            "Appointment not found with id: {}",
            id
        )));
    };
    let service = AppointmentLifecycleService::new(state.store.clone());
    match service.update(id, patch).await? {
        Some(appointment) => Ok(Json(appointment)),
        None => Err(AppError::NotFound(format!(
            "Appointment not found with id: {}",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(state.store.clone());
    if service.delete(&id).await? {
        Ok(Json(json!({ "message": "Deleted" })))
    } else {
        Err(AppError::NotFound(format!(
            "Appointment not found with id: {}",
            id
        )))
    }
}

/// Provision (idempotently) and return the room and join URL.
#[axum::debug_handler]
pub async fn appointment_join_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JoinInfo>, AppError> {
    let service = AppointmentLifecycleService::new(state.store.clone());
    let Some(appointment) = service.get_by_id(&id).await? else {
        return Err(AppError::NotFound("Appointment not found".to_string()));
    };

    let video = VideoLinkService::new(&state.config, state.store.clone());
    let join_info = video.join_info_for_appointment(appointment.id).await?;
    Ok(Json(join_info))
}
