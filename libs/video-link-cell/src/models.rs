// libs/video-link-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_store::StoreError;

/// Response body for the join-info endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinInfo {
    pub room: String,
    pub url: String,
}

/// Provisioning assumes a pre-validated entity, so a missing row is a hard
/// error here, unlike the soft empty results used at the lifecycle boundary.
#[derive(Debug, thiserror::Error)]
pub enum VideoLinkError {
    #[error("appointment {0} does not exist")]
    AppointmentMissing(i64),

    #[error("consultation session {0} does not exist")]
    ConsultationMissing(i64),

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<VideoLinkError> for AppError {
    fn from(err: VideoLinkError) -> Self {
        match err {
            VideoLinkError::AppointmentMissing(_) | VideoLinkError::ConsultationMissing(_) => {
                AppError::Internal(err.to_string())
            }
            VideoLinkError::Store(e) => AppError::Storage(e.to_string()),
        }
    }
}
