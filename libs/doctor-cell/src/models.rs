// libs/doctor-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::entities::User;
use shared_models::error::AppError;
use shared_store::StoreError;

/// Directory view of a doctor. `available` is always true in the listing;
/// doctors in an open consultation are filtered out before projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub available: bool,
}

impl DoctorSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user
                .name
                .clone()
                .unwrap_or_else(|| "Unknown Doctor".to_string()),
            role: user.primary_role().as_str().to_string(),
            available: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::Store(e) => AppError::Storage(e.to_string()),
        }
    }
}
