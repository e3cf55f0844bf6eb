// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::entities::AppointmentStatus;
use shared_models::error::AppError;
use shared_store::StoreError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Booking request. `scheduled_at` accepts ISO-8601 or `dd-MM-yy`; the room
/// identifier is never client-supplied, it is provisioned via join-info.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub title: Option<String>,
    pub scheduled_at: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
}

/// Booking input with references already resolved and the timestamp parsed.
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    pub title: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
}

/// Partial update: only present fields overwrite the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub scheduled_at: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Invalid scheduledAt format. Use '2025-12-23T10:00:00' or '23-12-25'.")]
    InvalidSchedule,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::InvalidSchedule => AppError::BadRequest(err.to_string()),
            AppointmentError::Store(e) => AppError::Storage(e.to_string()),
        }
    }
}

// ==============================================================================
// SCHEDULE PARSING
// ==============================================================================

/// Accepts `2025-12-23T10:00:00` (with or without an offset) or `23-12-25`
/// (`dd-MM-yy`, start of day). Anything else is an invalid-input error.
pub fn parse_schedule(raw: &str) -> Result<DateTime<Utc>, AppointmentError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(parsed.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d-%m-%y") {
        if let Some(start_of_day) = date.and_hms_opt(0, 0, 0) {
            return Ok(start_of_day.and_utc());
        }
    }
    Err(AppointmentError::InvalidSchedule)
}
