// libs/consultation-cell/src/models.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_store::StoreError;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Creation request: ids plus ISO-8601 timestamps. The room identifier is
/// never client-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub topic: Option<String>,
    pub mode: Option<String>,
    pub session_start: Option<String>,
    pub session_end: Option<String>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
}

/// Partial update: only present fields overwrite the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationPatch {
    pub topic: Option<String>,
    pub mode: Option<String>,
    pub session_start: Option<String>,
    pub session_end: Option<String>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub appointment_id: Option<i64>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConsultationError {
    #[error("Consultation session not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Invalid timestamp format. Use '2025-11-24T21:55:20'.")]
    InvalidTimestamp,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<ConsultationError> for AppError {
    fn from(err: ConsultationError) -> Self {
        match err {
            ConsultationError::NotFound
            | ConsultationError::DoctorNotFound
            | ConsultationError::PatientNotFound
            | ConsultationError::AppointmentNotFound => AppError::NotFound(err.to_string()),
            ConsultationError::InvalidTimestamp => AppError::BadRequest(err.to_string()),
            ConsultationError::Store(e) => AppError::Storage(e.to_string()),
        }
    }
}

// ==============================================================================
// TIMESTAMP PARSING
// ==============================================================================

/// Session timestamps are ISO-8601, with or without an offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ConsultationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(parsed.and_utc());
    }
    Err(ConsultationError::InvalidTimestamp)
}
