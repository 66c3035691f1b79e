//! Account sessions and profiles.
//!
//! Sign-up and sign-in run against the hosted auth service through the
//! [`AuthBackend`] gateway; the resulting session and profile are mirrored
//! locally and persisted so a restart resumes signed in.

pub mod gateway;
pub mod store;
pub mod user;
pub mod validate;

pub use gateway::{AuthBackend, NewProfile, ProfileUpdate};
pub use store::{AUTH_SLOT, AuthStore};
pub use user::{Session, UserProfile};
pub use validate::{validate_sign_in, validate_sign_up};
