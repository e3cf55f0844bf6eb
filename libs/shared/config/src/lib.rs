use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub video_scheme: String,
    pub video_domain: String,
    pub video_room_prefix: String,
    pub video_skip_prejoin: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("APP_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("APP_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            video_scheme: env::var("VIDEO_SCHEME")
                .unwrap_or_else(|_| "https".to_string()),
            video_domain: env::var("VIDEO_DOMAIN")
                .unwrap_or_else(|_| {
                    warn!("VIDEO_DOMAIN not set, using default");
                    "meet.jit.si".to_string()
                }),
            video_room_prefix: env::var("VIDEO_ROOM_PREFIX")
                .unwrap_or_else(|_| "chc-".to_string()),
            video_skip_prejoin: env::var("VIDEO_SKIP_PREJOIN")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_video_configured(&self) -> bool {
        !self.video_domain.is_empty() && !self.video_room_prefix.is_empty()
    }
}
