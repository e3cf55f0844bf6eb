use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Decimal user id.
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// The resolved principal handed to handlers by the access guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: Option<String>,
    pub roles: BTreeSet<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
