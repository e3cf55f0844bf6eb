// libs/shared/store/src/lib.rs
//
// The Entity Store seam. Everything the lifecycle engine persists goes
// through `EntityStore`; the store is the only shared mutable resource and
// is responsible for serializing writes to the same row.

pub mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shared_config::AppConfig;
use shared_models::entities::{Appointment, ConsultationSession, Notification, Role, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    RowNotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of an atomic room check-and-set. `room` is the identifier that
/// won; `newly_assigned` is false when a previous value was already attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomAttachment {
    pub room: String,
    pub newly_assigned: bool,
}

/// Durable key-by-identifier storage for the engine's entities.
///
/// `save_*` is insert-or-update: an id of 0 allocates a fresh identifier,
/// anything else overwrites that row. Room attachment is a single
/// checked-and-set per entity id, performed under the store's write lock,
/// so concurrent callers observe exactly one winning identifier.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // Users
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_users_by_role(&self, role: Role) -> Result<Vec<User>, StoreError>;
    async fn save_user(&self, user: User) -> Result<User, StoreError>;
    async fn count_users(&self) -> Result<usize, StoreError>;

    // Appointments
    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError>;
    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError>;
    async fn save_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;
    async fn delete_appointment(&self, id: i64) -> Result<bool, StoreError>;
    async fn attach_appointment_room(
        &self,
        id: i64,
        candidate: String,
    ) -> Result<RoomAttachment, StoreError>;

    // Consultation sessions
    async fn find_session(&self, id: i64) -> Result<Option<ConsultationSession>, StoreError>;
    async fn list_sessions(&self) -> Result<Vec<ConsultationSession>, StoreError>;
    async fn save_session(
        &self,
        session: ConsultationSession,
    ) -> Result<ConsultationSession, StoreError>;
    async fn delete_session(&self, id: i64) -> Result<bool, StoreError>;
    async fn attach_session_room(
        &self,
        id: i64,
        candidate: String,
    ) -> Result<RoomAttachment, StoreError>;
    /// Doctors with at least one session where `session_end` is unset.
    async fn busy_doctor_ids(&self) -> Result<Vec<i64>, StoreError>;

    // Notifications
    async fn find_notification(&self, id: i64) -> Result<Option<Notification>, StoreError>;
    async fn save_notification(&self, notification: Notification)
        -> Result<Notification, StoreError>;
    /// Ordered by creation time, most recent first.
    async fn notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError>;
}

/// Shared router state: configuration plus the entity store handle.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn EntityStore>,
}
