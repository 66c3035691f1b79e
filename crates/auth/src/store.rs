//! The auth store: session lifecycle plus local persistence.

use std::sync::Arc;

use velora_core::{Clock, StoreError, StoreResult, UserId};
use velora_localstore::SlotStore;

use crate::gateway::{AuthBackend, NewProfile, ProfileUpdate};
use crate::user::{AuthSlot, Session, UserProfile};
use crate::validate::{validate_sign_in, validate_sign_up};

/// Slot key for the persisted session and profile.
pub const AUTH_SLOT: &str = "auth-storage";

pub struct AuthStore {
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    session: Option<Session>,
    profile: Option<UserProfile>,
    last_error: Option<String>,
}

impl AuthStore {
    /// Build the store, resuming a persisted session when one exists.
    /// A missing or unreadable slot starts signed out.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        storage: Arc<dyn SlotStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let restored = match storage.get(AUTH_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthSlot>(&raw) {
                Ok(slot) => Some(slot),
                Err(err) => {
                    tracing::warn!("discarding unreadable auth slot: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!("failed to read auth slot: {err}");
                None
            }
        };
        let (session, profile) = match restored {
            Some(slot) => (Some(slot.session), Some(slot.profile)),
            None => (None, None),
        };
        Self {
            backend,
            storage,
            clock,
            session,
            profile,
            last_error: None,
        }
    }

    /// Create an account: credentials first, then the profile row.
    ///
    /// A profile already registered under `email` fails fast before any
    /// remote mutation. If the profile insert fails after credentials were
    /// created, the half-made session is signed out again so the account is
    /// not left usable without a profile.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> StoreResult<()> {
        validate_sign_up(name, email, password, confirm_password)?;
        self.last_error = None;

        match self.backend.profile_by_email(email).await {
            Ok(Some(_)) => {
                let msg = "An account with this email already exists";
                self.last_error = Some(msg.to_string());
                return Err(StoreError::validation(msg));
            }
            Ok(None) => {}
            Err(err) => {
                // The duplicate check is advisory; the unique constraint on
                // the profile table is the real guard.
                tracing::warn!("duplicate-email pre-check failed: {err}");
            }
        }

        let session = match self.backend.sign_up(email, password).await {
            Ok(session) => session,
            Err(err) => {
                self.last_error = Some(err.to_string());
                return Err(err.into());
            }
        };

        let new_profile = NewProfile {
            id: session.user_id,
            email: email.to_string(),
            name: name.to_string(),
        };
        match self.backend.insert_profile(new_profile).await {
            Ok(()) => {}
            Err(err) if err.is_unique_violation() => {
                tracing::debug!(user = %session.user_id, "profile row already existed");
            }
            Err(err) => {
                tracing::error!("profile insert failed, signing the new account out: {err}");
                if let Err(cleanup_err) = self.backend.sign_out(&session).await {
                    tracing::warn!("cleanup sign-out failed: {cleanup_err}");
                }
                self.last_error = Some(err.to_string());
                return Err(err.into());
            }
        }

        let profile = UserProfile {
            id: session.user_id,
            email: email.to_string(),
            name: name.to_string(),
            phone: None,
            address: None,
            created_at: self.clock.now(),
        };
        self.enter_session(session, profile);
        Ok(())
    }

    /// Exchange credentials for a session.
    ///
    /// A failed profile fetch does not fail the sign-in; a minimal profile
    /// derived from the email stands in until the row can be read.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> StoreResult<()> {
        validate_sign_in(email, password)?;
        self.last_error = None;

        let session = match self.backend.sign_in(email, password).await {
            Ok(session) => session,
            Err(err) => {
                self.last_error = Some(err.to_string());
                return Err(err.into());
            }
        };

        let profile = match self.backend.profile_by_id(session.user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(user = %session.user_id, "no profile row, using minimal profile");
                UserProfile::minimal(session.user_id, email, self.clock.now())
            }
            Err(err) => {
                tracing::warn!("profile fetch failed, using minimal profile: {err}");
                UserProfile::minimal(session.user_id, email, self.clock.now())
            }
        };

        self.enter_session(session, profile);
        Ok(())
    }

    /// End the session. Local state is cleared even when the remote
    /// invalidation fails.
    pub async fn sign_out(&mut self) -> StoreResult<()> {
        if let Some(session) = self.session.take() {
            if let Err(err) = self.backend.sign_out(&session).await {
                tracing::warn!("remote sign-out failed: {err}");
            }
        }
        self.profile = None;
        self.last_error = None;
        if let Err(err) = self.storage.remove(AUTH_SLOT) {
            tracing::warn!("failed to clear auth slot: {err}");
        }
        Ok(())
    }

    /// Apply a partial profile update remotely and mirror the result.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> StoreResult<()> {
        let user_id = self.user_id().ok_or(StoreError::NotAuthenticated)?;
        if update.is_empty() {
            return Ok(());
        }
        match self.backend.update_profile(user_id, update).await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.persist();
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.session.as_ref().map(|s| s.user_id)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn enter_session(&mut self, session: Session, profile: UserProfile) {
        self.session = Some(session);
        self.profile = Some(profile);
        self.persist();
    }

    /// Write-through of the current session and profile. Persistence
    /// failures are logged and tolerated; the in-memory session stands.
    fn persist(&self) {
        let (Some(session), Some(profile)) = (&self.session, &self.profile) else {
            return;
        };
        let slot = AuthSlot {
            session: session.clone(),
            profile: profile.clone(),
        };
        match serde_json::to_string(&slot) {
            Ok(raw) => {
                if let Err(err) = self.storage.put(AUTH_SLOT, &raw) {
                    tracing::warn!("failed to persist auth slot: {err}");
                }
            }
            Err(err) => tracing::warn!("failed to serialize auth slot: {err}"),
        }
    }
}
