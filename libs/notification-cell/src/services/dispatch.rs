// libs/notification-cell/src/services/dispatch.rs
use std::sync::Arc;

use tracing::{debug, warn};

use shared_models::entities::Notification;
use shared_store::EntityStore;

use crate::models::NotificationError;

/// Persists notification records and serves read/mark-read queries.
/// Delivery is push-to-store only; there is no outbound channel.
pub struct NotificationDispatchService {
    store: Arc<dyn EntityStore>,
}

impl NotificationDispatchService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        message: &str,
    ) -> Result<Notification, NotificationError> {
        let saved = self
            .store
            .save_notification(Notification::new(user_id, title, message))
            .await?;
        debug!("Notification {} created for userId={}", saved.id, user_id);
        Ok(saved)
    }

    /// Fire-and-forget dispatch for lifecycle side effects: a failure is
    /// logged and discarded so it can never fail the triggering operation.
    pub async fn dispatch(&self, user_id: i64, title: &str, message: &str) {
        if let Err(err) = self.create(user_id, title, message).await {
            warn!(
                "Failed to create notification for userId={}, error={}",
                user_id, err
            );
        }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>, NotificationError> {
        Ok(self.store.notifications_for_user(user_id).await?)
    }

    /// Flips the read flag; a missing id is a no-op.
    pub async fn mark_read(&self, id: i64) -> Result<(), NotificationError> {
        if let Some(mut notification) = self.store.find_notification(id).await? {
            notification.read = true;
            self.store.save_notification(notification).await?;
        }
        Ok(())
    }
}
