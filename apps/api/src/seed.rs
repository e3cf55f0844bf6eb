use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use tracing::info;

use shared_models::entities::{Appointment, AppointmentStatus, Role, User};
use shared_store::{EntityStore, StoreError};

/// Seeds a handful of records on an empty store so the API is usable out of
/// the box. Skipped entirely once any user exists.
pub async fn load_sample_data(store: &dyn EntityStore) -> Result<(), StoreError> {
    if store.count_users().await? > 0 {
        return Ok(());
    }

    let admin = store
        .save_user(sample_user("Alice Admin", "admin@example.com", Role::Admin))
        .await?;
    let doctor = store
        .save_user(sample_user("Dr. Daniel Okafor", "doctor@example.com", Role::Doctor))
        .await?;
    let patient = store
        .save_user(sample_user("Priya Patel", "patient@example.com", Role::User))
        .await?;
    info!(
        "Seeded users: admin={}, doctor={}, patient={}",
        admin.id, doctor.id, patient.id
    );

    if store.list_appointments().await?.is_empty() {
        let appointment = store
            .save_appointment(Appointment {
                id: 0,
                title: Some("Sample Community Health Check".to_string()),
                scheduled_at: Some(Utc::now() + Duration::days(3)),
                notes: Some("Auto-created sample appointment".to_string()),
                status: AppointmentStatus::Scheduled,
                patient_id: patient.id,
                doctor_id: Some(doctor.id),
                video_room: None,
            })
            .await?;
        info!("Seeded sample appointment id={}", appointment.id);
    }

    Ok(())
}

fn sample_user(name: &str, email: &str, role: Role) -> User {
    User {
        id: 0,
        name: Some(name.to_string()),
        email: email.to_string(),
        password_hash: None,
        phone: None,
        address: None,
        preferred_language: None,
        roles: BTreeSet::from([role]),
    }
}
