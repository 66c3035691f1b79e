//! Gateway trait over the hosted auth service and the profile table.

use async_trait::async_trait;

use velora_core::{BackendError, UserId};

use crate::user::{Session, UserProfile};

/// Fields for a freshly inserted profile row.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

/// Partial update of a profile row. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

/// Remote operations the auth store depends on.
///
/// `insert_profile` must surface [`BackendError::UniqueViolation`] when the
/// profile row already exists so the store can treat it as idempotent.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create auth credentials. Returns a session for the new user.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Invalidate the given session remotely.
    async fn sign_out(&self, session: &Session) -> Result<(), BackendError>;

    /// Look up a profile row by email. `Ok(None)` means no such row.
    async fn profile_by_email(&self, email: &str) -> Result<Option<UserProfile>, BackendError>;

    /// Look up a profile row by user id. `Ok(None)` means no such row.
    async fn profile_by_id(&self, id: UserId) -> Result<Option<UserProfile>, BackendError>;

    /// Insert a profile row for a freshly signed-up user.
    async fn insert_profile(&self, profile: NewProfile) -> Result<(), BackendError>;

    /// Apply a partial update to the signed-in user's profile row.
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, BackendError>;
}
