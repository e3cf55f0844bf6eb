// libs/doctor-cell/src/services/lookup.rs
use std::sync::Arc;

use tracing::debug;

use shared_models::entities::Role;
use shared_store::EntityStore;

use crate::models::{DoctorError, DoctorSummary};

/// Public directory of doctors who are not currently in an open consultation.
pub struct DoctorLookupService {
    store: Arc<dyn EntityStore>,
}

impl DoctorLookupService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// A doctor is busy while they hold any session with no end timestamp.
    /// The result is a point-in-time snapshot, not a reservation.
    pub async fn available_doctors(&self) -> Result<Vec<DoctorSummary>, DoctorError> {
        let doctors = self.store.find_users_by_role(Role::Doctor).await?;
        let busy = self.store.busy_doctor_ids().await?;
        debug!("{} doctors on record, {} busy", doctors.len(), busy.len());

        let available = doctors
            .iter()
            .filter(|d| !busy.contains(&d.id))
            .map(DoctorSummary::from_user)
            .collect();
        Ok(available)
    }
}
