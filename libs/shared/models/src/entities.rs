// libs/shared/models/src/entities.rs
use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==============================================================================
// USERS AND ROLES
// ==============================================================================

/// Role tags carried by a user. Every user holds at least one role;
/// `USER` is the default when none is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Doctor,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Doctor => "DOCTOR",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn default_roles() -> BTreeSet<Role> {
    BTreeSet::from([Role::User])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    /// Write-only credential material; never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default = "default_roles")]
    pub roles: BTreeSet<Role>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// The role shown in public listings when a user carries several.
    pub fn primary_role(&self) -> Role {
        self.roles.iter().next().copied().unwrap_or(Role::User)
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

/// Appointment status. The engine itself only ever produces `Scheduled`
/// (creation default) and `Completed` (linked-session end); `Other` preserves
/// arbitrary client-supplied values for wire compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Other(value) => value,
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SCHEDULED" => AppointmentStatus::Scheduled,
            "COMPLETED" => AppointmentStatus::Completed,
            _ => AppointmentStatus::Other(value),
        }
    }
}

impl From<&str> for AppointmentStatus {
    fn from(value: &str) -> Self {
        AppointmentStatus::from(value.to_string())
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled encounter between a patient and (optionally) a doctor.
/// Participants are referenced by id; user lifetimes are independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub title: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    /// Room identifier on the external conferencing provider, once provisioned.
    pub video_room: Option<String>,
}

// ==============================================================================
// CONSULTATION SESSIONS
// ==============================================================================

pub const MODE_ONLINE: &str = "ONLINE";

/// A (possibly video) encounter instance.
///
/// Lifecycle is driven by timestamp presence: no start and no end means
/// created, start without end means in progress, and a set `session_end`
/// means ended. `session_end == None` is the authoritative "open" signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationSession {
    pub id: i64,
    pub topic: Option<String>,
    pub mode: String,
    pub session_start: Option<DateTime<Utc>>,
    pub session_end: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
    pub doctor_id: i64,
    pub patient_id: i64,
    /// Weak link to the appointment this session fulfills, if any.
    pub appointment_id: Option<i64>,
    pub video_room: Option<String>,
}

impl ConsultationSession {
    pub fn is_open(&self) -> bool {
        self.session_end.is_none()
    }

    pub fn is_online(&self) -> bool {
        self.mode.eq_ignore_ascii_case(MODE_ONLINE)
    }
}

// ==============================================================================
// NOTIFICATIONS
// ==============================================================================

/// A persisted directed message. Created only as a lifecycle side effect;
/// mutated only by mark-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: i64, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id,
            title: title.into(),
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        }
    }
}
