use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use velora_core::UserId;

/// A row from the profile table, mirrored locally while signed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fallback profile built from auth credentials alone, used when the
    /// profile row cannot be fetched after a successful sign-in.
    pub fn minimal(id: UserId, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        let email = email.into();
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            id,
            email,
            name,
            phone: None,
            address: None,
            created_at: now,
        }
    }
}

/// An authenticated session issued by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// What gets written to the auth slot: the session plus the profile it
/// belongs to, restored together on startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AuthSlot {
    pub session: Session,
    pub profile: UserProfile,
}
