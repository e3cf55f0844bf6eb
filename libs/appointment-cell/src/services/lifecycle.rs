// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use notification_cell::services::NotificationDispatchService;
use shared_models::entities::{Appointment, AppointmentStatus};
use shared_store::EntityStore;

use crate::models::{parse_schedule, AppointmentDraft, AppointmentError, AppointmentPatch};

/// Owns appointment creation, retrieval, update and deletion. The booking
/// notification is a best-effort side effect and can never fail a creation.
pub struct AppointmentLifecycleService {
    store: Arc<dyn EntityStore>,
    notifications: NotificationDispatchService,
}

impl AppointmentLifecycleService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let notifications = NotificationDispatchService::new(store.clone());
        Self {
            store,
            notifications,
        }
    }

    /// Persist a new appointment. Status defaults to SCHEDULED and the
    /// scheduled time to tomorrow when omitted.
    pub async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, AppointmentError> {
        let status = draft.status.unwrap_or(AppointmentStatus::Scheduled);
        let scheduled_at = draft
            .scheduled_at
            .unwrap_or_else(|| Utc::now() + Duration::days(1));

        let saved = self
            .store
            .save_appointment(Appointment {
                id: 0,
                title: draft.title,
                scheduled_at: Some(scheduled_at),
                notes: draft.notes,
                status,
                patient_id: draft.patient_id,
                doctor_id: draft.doctor_id,
                video_room: None,
            })
            .await?;
        info!("Appointment saved, id={}", saved.id);

        let message = format!(
            "Your appointment '{}' is scheduled at {}",
            saved.title.as_deref().unwrap_or("Appointment"),
            scheduled_at
        );
        self.notifications
            .dispatch(saved.patient_id, "Appointment booked", &message)
            .await;

        Ok(saved)
    }

    /// Ids arrive as text; anything that does not parse to an integer is a
    /// soft miss, never an error.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Option<Appointment>, AppointmentError> {
        let Ok(id) = raw_id.parse::<i64>() else {
            return Ok(None);
        };
        Ok(self.store.find_appointment(id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.list_appointments().await?)
    }

    /// Strictly future scheduled times; unscheduled appointments are excluded.
    pub async fn list_upcoming(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let now = Utc::now();
        let upcoming = self
            .store
            .list_appointments()
            .await?
            .into_iter()
            .filter(|a| a.scheduled_at.map(|at| at > now).unwrap_or(false))
            .collect();
        Ok(upcoming)
    }

    /// Patch merge rule: only present fields overwrite. An incoming patient
    /// reference must resolve; a missing appointment id is a soft miss.
    pub async fn update(
        &self,
        id: i64,
        patch: AppointmentPatch,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let Some(mut existing) = self.store.find_appointment(id).await? else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            existing.title = Some(title);
        }
        if let Some(raw) = patch.scheduled_at.as_deref() {
            existing.scheduled_at = Some(parse_schedule(raw)?);
        }
        if let Some(notes) = patch.notes {
            existing.notes = Some(notes);
        }
        if let Some(status) = patch.status {
            existing.status = AppointmentStatus::from(status);
        }
        if let Some(patient_id) = patch.patient_id {
            if self.store.find_user(patient_id).await?.is_none() {
                return Err(AppointmentError::PatientNotFound);
            }
            existing.patient_id = patient_id;
        }
        if let Some(doctor_id) = patch.doctor_id {
            existing.doctor_id = Some(doctor_id);
        }

        let updated = self.store.save_appointment(existing).await?;
        Ok(Some(updated))
    }

    /// Same id-parsing rule as `get_by_id`: a non-numeric id deletes nothing.
    pub async fn delete(&self, raw_id: &str) -> Result<bool, AppointmentError> {
        let Ok(id) = raw_id.parse::<i64>() else {
            return Ok(false);
        };
        Ok(self.store.delete_appointment(id).await?)
    }
}
