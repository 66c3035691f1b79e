//! `velora-core`: shared building blocks for the storefront client.
//!
//! This crate contains the pieces every store crate leans on: strongly-typed
//! identifiers, the error taxonomy for the store and backend boundaries, the
//! injectable clock, and the optimistic-transaction helper.

pub mod clock;
pub mod error;
pub mod id;
pub mod optimistic;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BackendError, StoreError, StoreResult};
pub use id::{ProductId, UserId, WishlistEntryId};
pub use optimistic::OptimisticTxn;
