// libs/consultation-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::entities::ConsultationSession;
use shared_models::error::AppError;
use shared_store::AppState;
use video_link_cell::models::JoinInfo;
use video_link_cell::services::VideoLinkService;

use crate::models::{parse_timestamp, ConsultationError, ConsultationPatch, ConsultationRequest};
use crate::services::lifecycle::ConsultationDraft;
use crate::services::ConsultationLifecycleService;

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ConsultationRequest>,
) -> Result<(StatusCode, Json<ConsultationSession>), AppError> {
    debug!("User {} creating consultation session", user.id);

    // Both participants are required and must resolve.
    if state
        .store
        .find_user(request.doctor_id)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .is_none()
    {
        return Err(ConsultationError::DoctorNotFound.into());
    }
    if state
        .store
        .find_user(request.patient_id)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?
        .is_none()
    {
        return Err(ConsultationError::PatientNotFound.into());
    }
    if let Some(appointment_id) = request.appointment_id {
        if state
            .store
            .find_appointment(appointment_id)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?
            .is_none()
        {
            return Err(ConsultationError::AppointmentNotFound.into());
        }
    }

    let session_start = match request.session_start.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(parse_timestamp(raw)?),
        _ => None,
    };
    let session_end = match request.session_end.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(parse_timestamp(raw)?),
        _ => None,
    };

    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    let saved = service
        .create(ConsultationDraft {
            topic: request.topic,
            mode: request.mode,
            session_start,
            session_end,
            notes: request.notes,
            prescription: request.prescription,
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            appointment_id: request.appointment_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

#[axum::debug_handler]
pub async fn get_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConsultationSession>, AppError> {
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    match service.get_by_id(&id).await? {
        Some(session) => Ok(Json(session)),
        None => Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn list_consultations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConsultationSession>>, AppError> {
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    Ok(Json(service.list_all().await?))
}

#[axum::debug_handler]
pub async fn list_upcoming_consultations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConsultationSession>>, AppError> {
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    Ok(Json(service.list_upcoming().await?))
}

#[axum::debug_handler]
pub async fn start_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConsultationSession>, AppError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        )));
    };
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    match service.start(id).await? {
        Some(session) => Ok(Json(session)),
        None => Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn end_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConsultationSession>, AppError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        )));
    };
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    match service.end(id).await? {
        Some(session) => Ok(Json(session)),
        None => Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn update_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ConsultationPatch>,
) -> Result<Json<ConsultationSession>, AppError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        )));
    };
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    match service.update(id, patch).await? {
        Some(session) => Ok(Json(session)),
        None => Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        ))),
    }
}

#[axum::debug_handler]
pub async fn delete_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    if service.delete(&id).await? {
        Ok(Json(json!({ "message": "Deleted" })))
    } else {
        Err(AppError::NotFound(format!(
            "Consultation not found with id: {}",
            id
        )))
    }
}

/// Provision (idempotently) and return the room and join URL.
#[axum::debug_handler]
pub async fn consultation_join_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JoinInfo>, AppError> {
    let service = ConsultationLifecycleService::new(&state.config, state.store.clone());
    let Some(session) = service.get_by_id(&id).await? else {
        return Err(AppError::NotFound("Consultation not found".to_string()));
    };

    let video = VideoLinkService::new(&state.config, state.store.clone());
    let join_info = video.join_info_for_consultation(session.id).await?;
    Ok(Json(join_info))
}
