use std::collections::BTreeSet;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use shared_config::AppConfig;
use shared_models::entities::{Role, User};
use shared_store::{AppState, MemoryStore};

pub struct TestConfig {
    pub jwt_secret: String,
    pub video_scheme: String,
    pub video_domain: String,
    pub video_room_prefix: String,
    pub video_skip_prejoin: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            video_scheme: "https".to_string(),
            video_domain: "meet.jit.si".to_string(),
            video_room_prefix: "chc-".to_string(),
            video_skip_prejoin: false,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            video_scheme: self.video_scheme.clone(),
            video_domain: self.video_domain.clone(),
            video_room_prefix: self.video_room_prefix.clone(),
            video_skip_prejoin: self.video_skip_prejoin,
        }
    }

    /// Router state backed by a fresh in-memory store.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState {
            config: self.to_app_config(),
            store: Arc::new(MemoryStore::new()),
        })
    }
}

/// Bare user entities for seeding test stores.
pub struct TestUsers;

impl TestUsers {
    pub fn with_roles(email: &str, roles: &[Role]) -> User {
        User {
            id: 0,
            name: Some(email.split('@').next().unwrap_or("test").to_string()),
            email: email.to_string(),
            password_hash: None,
            phone: None,
            address: None,
            preferred_language: None,
            roles: roles.iter().copied().collect::<BTreeSet<Role>>(),
        }
    }

    pub fn doctor(email: &str) -> User {
        Self::with_roles(email, &[Role::Doctor])
    }

    pub fn patient(email: &str) -> User {
        Self::with_roles(email, &[Role::User])
    }

    pub fn admin(email: &str) -> User {
        Self::with_roles(email, &[Role::Admin])
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Mints an HS256 token the same way the access guard validates them.
    pub fn create_test_token(
        user_id: i64,
        roles: &[Role],
        secret: &str,
        exp_hours: Option<i64>,
    ) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let claims = json!({
            "sub": user_id.to_string(),
            "iat": now.timestamp(),
            "exp": exp.timestamp(),
            "email": "test@example.com",
            "roles": roles,
        });

        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }
}
