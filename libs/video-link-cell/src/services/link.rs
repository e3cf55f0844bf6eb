// libs/video-link-cell/src/services/link.rs
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_store::{EntityStore, StoreError};

use crate::models::{JoinInfo, VideoLinkError};

/// Generation rule shared by the provisioner and the consultation create
/// path: fixed lowercase prefix plus 16 hex characters of a v4 UUID.
pub fn generate_room(prefix: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &token[..16])
}

/// Guarantees at-most-one room identifier per bookable entity and builds
/// joinable URLs. Media streams are the external provider's problem; only
/// identifiers are managed here.
pub struct VideoLinkService {
    store: Arc<dyn EntityStore>,
    scheme: String,
    domain: String,
    prefix: String,
    skip_prejoin: bool,
}

impl VideoLinkService {
    pub fn new(config: &AppConfig, store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            scheme: config.video_scheme.clone(),
            domain: config.video_domain.clone(),
            prefix: config.video_room_prefix.clone(),
            skip_prejoin: config.video_skip_prejoin,
        }
    }

    /// Idempotent: the first call attaches a generated identifier through the
    /// store's atomic check-and-set; every later call returns the same value
    /// without writing.
    pub async fn ensure_room_for_appointment(&self, id: i64) -> Result<String, VideoLinkError> {
        let attachment = self
            .store
            .attach_appointment_room(id, generate_room(&self.prefix))
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => VideoLinkError::AppointmentMissing(id),
                other => VideoLinkError::Store(other),
            })?;

        if attachment.newly_assigned {
            info!("Provisioned room {} for appointment {}", attachment.room, id);
        }
        Ok(attachment.room)
    }

    pub async fn ensure_room_for_consultation(&self, id: i64) -> Result<String, VideoLinkError> {
        let attachment = self
            .store
            .attach_session_room(id, generate_room(&self.prefix))
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => VideoLinkError::ConsultationMissing(id),
                other => VideoLinkError::Store(other),
            })?;

        if attachment.newly_assigned {
            info!("Provisioned room {} for consultation {}", attachment.room, id);
        }
        Ok(attachment.room)
    }

    /// Pure composition of scheme, domain and room. The fragment tells the
    /// client to skip its prejoin screen when configured.
    pub fn build_join_url(&self, room: &str) -> String {
        let base = format!("{}://{}/{}", self.scheme, self.domain, room);
        if self.skip_prejoin {
            return format!("{}#config.prejoinPageEnabled=false", base);
        }
        base
    }

    pub async fn join_info_for_appointment(&self, id: i64) -> Result<JoinInfo, VideoLinkError> {
        let room = self.ensure_room_for_appointment(id).await?;
        let url = self.build_join_url(&room);
        Ok(JoinInfo { room, url })
    }

    pub async fn join_info_for_consultation(&self, id: i64) -> Result<JoinInfo, VideoLinkError> {
        let room = self.ensure_room_for_consultation(id).await?;
        let url = self.build_join_url(&room);
        Ok(JoinInfo { room, url })
    }
}
