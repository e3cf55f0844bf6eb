// libs/shared/store/src/memory.rs
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_models::entities::{Appointment, ConsultationSession, Notification, Role, User};

use crate::{EntityStore, RoomAttachment, StoreError};

/// In-process `EntityStore`. Each entity family lives behind its own
/// `RwLock`ed map; a write lock spans every read-modify-write, which is what
/// makes room attachment a true per-entity check-and-set.
pub struct MemoryStore {
    users: RwLock<HashMap<i64, User>>,
    appointments: RwLock<HashMap<i64, Appointment>>,
    sessions: RwLock<HashMap<i64, ConsultationSession>>,
    notifications: RwLock<HashMap<i64, Notification>>,
    next_user_id: AtomicI64,
    next_appointment_id: AtomicI64,
    next_session_id: AtomicI64,
    next_notification_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            appointments: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            notifications: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
            next_appointment_id: AtomicI64::new(1),
            next_session_id: AtomicI64::new(1),
            next_notification_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn alloc(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst)
}

fn is_blank(room: &Option<String>) -> bool {
    room.as_deref().map(|r| r.trim().is_empty()).unwrap_or(true)
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_users_by_role(&self, role: Role) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut matched: Vec<User> = users
            .values()
            .filter(|u| u.has_role(role))
            .cloned()
            .collect();
        matched.sort_by_key(|u| u.id);
        Ok(matched)
    }

    async fn save_user(&self, mut user: User) -> Result<User, StoreError> {
        if user.id == 0 {
            user.id = alloc(&self.next_user_id);
        }
        // Invariant: at least one role, USER by default.
        if user.roles.is_empty() {
            user.roles.insert(Role::User);
        }
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().await.len())
    }

    async fn find_appointment(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let appointments = self.appointments.read().await;
        let mut all: Vec<Appointment> = appointments.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }

    async fn save_appointment(
        &self,
        mut appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        if appointment.id == 0 {
            appointment.id = alloc(&self.next_appointment_id);
        }
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn delete_appointment(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.appointments.write().await.remove(&id).is_some())
    }

    async fn attach_appointment_room(
        &self,
        id: i64,
        candidate: String,
    ) -> Result<RoomAttachment, StoreError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        if is_blank(&appointment.video_room) {
            appointment.video_room = Some(candidate.clone());
            Ok(RoomAttachment {
                room: candidate,
                newly_assigned: true,
            })
        } else {
            Ok(RoomAttachment {
                room: appointment.video_room.clone().unwrap_or_default(),
                newly_assigned: false,
            })
        }
    }

    async fn find_session(&self, id: i64) -> Result<Option<ConsultationSession>, StoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<ConsultationSession>, StoreError> {
        let sessions = self.sessions.read().await;
        let mut all: Vec<ConsultationSession> = sessions.values().cloned().collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    async fn save_session(
        &self,
        mut session: ConsultationSession,
    ) -> Result<ConsultationSession, StoreError> {
        if session.id == 0 {
            session.id = alloc(&self.next_session_id);
        }
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }

    async fn attach_session_room(
        &self,
        id: i64,
        candidate: String,
    ) -> Result<RoomAttachment, StoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        if is_blank(&session.video_room) {
            session.video_room = Some(candidate.clone());
            Ok(RoomAttachment {
                room: candidate,
                newly_assigned: true,
            })
        } else {
            Ok(RoomAttachment {
                room: session.video_room.clone().unwrap_or_default(),
                newly_assigned: false,
            })
        }
    }

    async fn busy_doctor_ids(&self) -> Result<Vec<i64>, StoreError> {
        let sessions = self.sessions.read().await;
        let mut busy: Vec<i64> = sessions
            .values()
            .filter(|s| s.is_open())
            .map(|s| s.doctor_id)
            .collect();
        busy.sort_unstable();
        busy.dedup();
        Ok(busy)
    }

    async fn find_notification(&self, id: i64) -> Result<Option<Notification>, StoreError> {
        Ok(self.notifications.read().await.get(&id).cloned())
    }

    async fn save_notification(
        &self,
        mut notification: Notification,
    ) -> Result<Notification, StoreError> {
        if notification.id == 0 {
            notification.id = alloc(&self.next_notification_id);
        }
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>, StoreError> {
        let notifications = self.notifications.read().await;
        let mut matched: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matched)
    }
}
