// libs/consultation-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use notification_cell::services::NotificationDispatchService;
use shared_config::AppConfig;
use shared_models::entities::{AppointmentStatus, ConsultationSession, MODE_ONLINE};
use shared_store::EntityStore;
use video_link_cell::generate_room;

use crate::models::{parse_timestamp, ConsultationError, ConsultationPatch};

/// Everything a session needs at creation, references already resolved.
#[derive(Debug, Clone)]
pub struct ConsultationDraft {
    pub topic: Option<String>,
    pub mode: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    pub session_end: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
}

/// Drives a session through created → started → ended. Transitions are
/// idempotent-by-overwrite: re-invoking start or end simply refreshes the
/// corresponding timestamp.
pub struct ConsultationLifecycleService {
    store: Arc<dyn EntityStore>,
    notifications: NotificationDispatchService,
    room_prefix: String,
}

impl ConsultationLifecycleService {
    pub fn new(config: &AppConfig, store: Arc<dyn EntityStore>) -> Self {
        let notifications = NotificationDispatchService::new(store.clone());
        Self {
            store,
            notifications,
            room_prefix: config.video_room_prefix.clone(),
        }
    }

    /// Mode defaults to ONLINE, and ONLINE sessions get a room identifier
    /// pre-assigned at creation so the invariant "online sessions carry a
    /// non-blank room" holds from the first persisted state.
    pub async fn create(
        &self,
        draft: ConsultationDraft,
    ) -> Result<ConsultationSession, ConsultationError> {
        let mode = draft.mode.unwrap_or_else(|| MODE_ONLINE.to_string());
        let video_room = if mode.eq_ignore_ascii_case(MODE_ONLINE) {
            Some(generate_room(&self.room_prefix))
        } else {
            None
        };

        let saved = self
            .store
            .save_session(ConsultationSession {
                id: 0,
                topic: draft.topic,
                mode,
                session_start: draft.session_start,
                session_end: draft.session_end,
                notes: draft.notes,
                prescription: draft.prescription,
                doctor_id: draft.doctor_id,
                patient_id: draft.patient_id,
                appointment_id: draft.appointment_id,
                video_room,
            })
            .await?;
        info!("Created consultation session id={}", saved.id);
        Ok(saved)
    }

    pub async fn get_by_id(
        &self,
        raw_id: &str,
    ) -> Result<Option<ConsultationSession>, ConsultationError> {
        let Ok(id) = raw_id.parse::<i64>() else {
            return Ok(None);
        };
        Ok(self.store.find_session(id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<ConsultationSession>, ConsultationError> {
        Ok(self.store.list_sessions().await?)
    }

    /// Sessions whose start time lies strictly in the future.
    pub async fn list_upcoming(&self) -> Result<Vec<ConsultationSession>, ConsultationError> {
        let now = Utc::now();
        let upcoming = self
            .store
            .list_sessions()
            .await?
            .into_iter()
            .filter(|s| s.session_start.map(|at| at > now).unwrap_or(false))
            .collect();
        Ok(upcoming)
    }

    /// Sets `session_start` to now and notifies both participants. Each
    /// notification is best-effort and isolated; the state change stands
    /// regardless.
    pub async fn start(&self, id: i64) -> Result<Option<ConsultationSession>, ConsultationError> {
        let Some(mut session) = self.store.find_session(id).await? else {
            return Ok(None);
        };

        session.session_start = Some(Utc::now());
        let saved = self.store.save_session(session).await?;

        self.notifications
            .dispatch(
                saved.patient_id,
                "Consultation started",
                &format!("Your consultation (id={}) has started.", saved.id),
            )
            .await;
        self.notifications
            .dispatch(
                saved.doctor_id,
                "Consultation started",
                &format!(
                    "Consultation with patient id={} has started.",
                    saved.patient_id
                ),
            )
            .await;

        Ok(Some(saved))
    }

    /// Sets `session_end` to now, notifies both participants, and propagates
    /// COMPLETED to a linked appointment. The propagation tolerates the
    /// appointment having been deleted and never rolls back the end.
    pub async fn end(&self, id: i64) -> Result<Option<ConsultationSession>, ConsultationError> {
        let Some(mut session) = self.store.find_session(id).await? else {
            return Ok(None);
        };

        session.session_end = Some(Utc::now());
        let saved = self.store.save_session(session).await?;

        self.notifications
            .dispatch(
                saved.patient_id,
                "Consultation ended",
                &format!("Your consultation (id={}) has ended.", saved.id),
            )
            .await;
        self.notifications
            .dispatch(
                saved.doctor_id,
                "Consultation ended",
                &format!(
                    "Consultation with patient id={} has ended.",
                    saved.patient_id
                ),
            )
            .await;

        if let Some(appointment_id) = saved.appointment_id {
            self.complete_linked_appointment(saved.id, appointment_id).await;
        }

        Ok(Some(saved))
    }

    /// The one cross-entity propagation in the system; best-effort by design.
    async fn complete_linked_appointment(&self, session_id: i64, appointment_id: i64) {
        match self.store.find_appointment(appointment_id).await {
            Ok(Some(mut appointment)) => {
                appointment.status = AppointmentStatus::Completed;
                if let Err(err) = self.store.save_appointment(appointment).await {
                    warn!(
                        "Unable to auto-update linked appointment {} for consultation id={}: {}",
                        appointment_id, session_id, err
                    );
                }
            }
            Ok(None) => {
                debug!(
                    "Linked appointment {} for consultation id={} no longer exists, skipping",
                    appointment_id, session_id
                );
            }
            Err(err) => {
                warn!(
                    "Unable to auto-update linked appointment for consultation id={}: {}",
                    session_id, err
                );
            }
        }
    }

    /// Patch merge rule: only present fields overwrite. Incoming references
    /// must resolve; a missing session id is a soft miss.
    pub async fn update(
        &self,
        id: i64,
        patch: ConsultationPatch,
    ) -> Result<Option<ConsultationSession>, ConsultationError> {
        let Some(mut existing) = self.store.find_session(id).await? else {
            return Ok(None);
        };

        if let Some(topic) = patch.topic {
            existing.topic = Some(topic);
        }
        if let Some(mode) = patch.mode {
            existing.mode = mode;
        }
        if let Some(raw) = patch.session_start.as_deref() {
            existing.session_start = Some(parse_timestamp(raw)?);
        }
        if let Some(raw) = patch.session_end.as_deref() {
            existing.session_end = Some(parse_timestamp(raw)?);
        }
        if let Some(notes) = patch.notes {
            existing.notes = Some(notes);
        }
        if let Some(prescription) = patch.prescription {
            existing.prescription = Some(prescription);
        }
        if let Some(doctor_id) = patch.doctor_id {
            if self.store.find_user(doctor_id).await?.is_none() {
                return Err(ConsultationError::DoctorNotFound);
            }
            existing.doctor_id = doctor_id;
        }
        if let Some(patient_id) = patch.patient_id {
            if self.store.find_user(patient_id).await?.is_none() {
                return Err(ConsultationError::PatientNotFound);
            }
            existing.patient_id = patient_id;
        }
        if let Some(appointment_id) = patch.appointment_id {
            if self.store.find_appointment(appointment_id).await?.is_none() {
                return Err(ConsultationError::AppointmentNotFound);
            }
            existing.appointment_id = Some(appointment_id);
        }

        let updated = self.store.save_session(existing).await?;
        info!("Updated consultation session id={}", updated.id);
        Ok(Some(updated))
    }

    pub async fn delete(&self, raw_id: &str) -> Result<bool, ConsultationError> {
        let Ok(id) = raw_id.parse::<i64>() else {
            return Ok(false);
        };
        let deleted = self.store.delete_session(id).await?;
        if deleted {
            info!("Deleted consultation session id={}", id);
        }
        Ok(deleted)
    }
}
