// libs/notification-cell/src/models.rs
use serde::Deserialize;

use shared_models::error::AppError;
use shared_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Store(e) => AppError::Storage(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadQuery {
    pub id: i64,
}
