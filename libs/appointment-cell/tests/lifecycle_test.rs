use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};

use appointment_cell::models::{AppointmentDraft, AppointmentError, AppointmentPatch};
use appointment_cell::services::AppointmentLifecycleService;
use shared_models::entities::{
    Appointment, AppointmentStatus, ConsultationSession, Notification, Role, User,
};
use shared_store::{EntityStore, MemoryStore, RoomAttachment, StoreError};
use shared_utils::test_utils::TestUsers;

fn draft_for(patient_id: i64) -> AppointmentDraft {
    AppointmentDraft {
        title: Some("Checkup".to_string()),
        scheduled_at: None,
        notes: None,
        status: None,
        patient_id,
        doctor_id: None,
    }
}

#[tokio::test]
async fn create_defaults_status_and_schedule() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();

    let before = Utc::now();
    let service = AppointmentLifecycleService::new(store.clone());
    let saved = service.create(draft_for(patient.id)).await.unwrap();
    let after = Utc::now();

    assert_eq!(saved.status, AppointmentStatus::Scheduled);
    let scheduled = saved.scheduled_at.expect("default schedule must be set");
    assert!(scheduled >= before + Duration::days(1));
    assert!(scheduled <= after + Duration::days(1));
    assert!(saved.video_room.is_none());
}

#[tokio::test]
async fn create_notifies_the_patient() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();

    let service = AppointmentLifecycleService::new(store.clone());
    service.create(draft_for(patient.id)).await.unwrap();

    let inbox = store.notifications_for_user(patient.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Appointment booked");
    assert!(inbox[0].message.contains("'Checkup'"));
    assert!(!inbox[0].read);
}

#[tokio::test]
async fn explicit_status_and_schedule_are_kept() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();
    let at = Utc::now() + Duration::days(14);

    let service = AppointmentLifecycleService::new(store.clone());
    let saved = service
        .create(AppointmentDraft {
            title: None,
            scheduled_at: Some(at),
            notes: None,
            status: Some(AppointmentStatus::from("CANCELLED")),
            patient_id: patient.id,
            doctor_id: None,
        })
        .await
        .unwrap();

    assert_eq!(saved.status, AppointmentStatus::Other("CANCELLED".to_string()));
    assert_eq!(saved.scheduled_at, Some(at));
}

#[tokio::test]
async fn notification_failure_does_not_fail_booking() {
    let inner: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = inner
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();
    let store: Arc<dyn EntityStore> = Arc::new(FailingNotificationStore { inner });

    let service = AppointmentLifecycleService::new(store.clone());
    let saved = service.create(draft_for(patient.id)).await.unwrap();

    assert!(saved.id > 0);
    assert!(store
        .find_appointment(saved.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn update_overwrites_only_present_fields() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();

    let service = AppointmentLifecycleService::new(store.clone());
    let saved = service
        .create(AppointmentDraft {
            title: Some("Original title".to_string()),
            scheduled_at: None,
            notes: Some("bring referral letter".to_string()),
            status: None,
            patient_id: patient.id,
            doctor_id: None,
        })
        .await
        .unwrap();

    let updated = service
        .update(
            saved.id,
            AppointmentPatch {
                title: Some("Renamed".to_string()),
                status: Some("COMPLETED".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("appointment exists");

    assert_eq!(updated.title.as_deref(), Some("Renamed"));
    assert_eq!(updated.status, AppointmentStatus::Completed);
    // Untouched fields survive the patch.
    assert_eq!(updated.notes.as_deref(), Some("bring referral letter"));
    assert_eq!(updated.scheduled_at, saved.scheduled_at);
}

#[tokio::test]
async fn update_with_unknown_patient_is_rejected() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();

    let service = AppointmentLifecycleService::new(store.clone());
    let saved = service.create(draft_for(patient.id)).await.unwrap();

    let result = service
        .update(
            saved.id,
            AppointmentPatch {
                patient_id: Some(9999),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(AppointmentError::PatientNotFound));
}

#[tokio::test]
async fn non_numeric_ids_are_soft_misses() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let service = AppointmentLifecycleService::new(store);

    assert!(service.get_by_id("not-a-number").await.unwrap().is_none());
    assert!(!service.delete("not-a-number").await.unwrap());
}

#[tokio::test]
async fn upcoming_excludes_past_and_unscheduled() {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let patient = store
        .save_user(TestUsers::patient("priya@example.com"))
        .await
        .unwrap();

    let base = Appointment {
        id: 0,
        title: None,
        scheduled_at: None,
        notes: None,
        status: AppointmentStatus::Scheduled,
        patient_id: patient.id,
        doctor_id: None,
        video_room: None,
    };
    store
        .save_appointment(Appointment {
            scheduled_at: Some(Utc::now() - Duration::hours(1)),
            ..base.clone()
        })
        .await
        .unwrap();
    store.save_appointment(base.clone()).await.unwrap();
    let future = store
        .save_appointment(Appointment {
            scheduled_at: Some(Utc::now() + Duration::hours(1)),
            ..base
        })
        .await
        .unwrap();

    let service = AppointmentLifecycleService::new(store);
    let upcoming = service.list_upcoming().await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, future.id);
}

/// Delegates everything but refuses notification writes, to prove the
/// booking path never depends on the side effect.
struct FailingNotificationStore {
    inner: Arc<dyn EntityStore>,
}

#[async_trait::async_trait]
impl EntityStore for FailingNotificationStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.inner.find_user(id).await
    }

    async fn find_users_by_role(&self, role: Role) -> Result<Vec<User>, StoreError> {
        self.inner.find_users_by_role(role).await
    }

    async fn save_user(&self, user: User) -> Result<User, StoreError> {
        self.inner.save_user(user).await
    }

    async fn count_users(&self) -> Result<usize, StoreError> {
        self.inner.count_users().await
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        self.inner.find_appointment(id).await
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        self.inner.list_appointments().await
    }

    async fn save_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        self.inner.save_appointment(appointment).await
    }

    async fn delete_appointment(&self, id: i64) -> Result<bool, StoreError> {
        self.inner.delete_appointment(id).await
    }

    async fn attach_appointment_room(
        &self,
        id: i64,
        candidate: String,
    ) -> Result<RoomAttachment, StoreError> {
        self.inner.attach_appointment_room(id, candidate).await
    }

    async fn find_session(&self, id: i64) -> Result<Option<ConsultationSession>, StoreError> {
        self.inner.find_session(id).await
    }

    async fn list_sessions(&self) -> Result<Vec<ConsultationSession>, StoreError> {
        self.inner.list_sessions().await
    }

    async fn save_session(
        &self,
        session: ConsultationSession,
    ) -> Result<ConsultationSession, StoreError> {
        self.inner.save_session(session).await
    }

    async fn delete_session(&self, id: i64) -> Result<bool, StoreError> {
        self.inner.delete_session(id).await
    }

    async fn attach_session_room(
        &self,
        id: i64,
        candidate: String,
    ) -> Result<RoomAttachment, StoreError> {
        self.inner.attach_session_room(id, candidate).await
    }

    async fn busy_doctor_ids(&self) -> Result<Vec<i64>, StoreError> {
        self.inner.busy_doctor_ids().await
    }

    async fn find_notification(&self, id: i64) -> Result<Option<Notification>, StoreError> {
        self.inner.find_notification(id).await
    }

    async fn save_notification(
        &self,
        _notification: Notification,
    ) -> Result<Notification, StoreError> {
        Err(StoreError::Unavailable("notification store down".to_string()))
    }

    async fn notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError> {
        self.inner.notifications_for_user(user_id).await
    }
}
