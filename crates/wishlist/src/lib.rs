//! `velora-wishlist`: optimistic mirror of the per-user remote wishlist.
//!
//! The remote `wishlist` table is the source of truth; the local list is a
//! lagging, optimistically-updated mirror. Adds and removes patch the local
//! list before the remote call resolves, with a defined rollback path on
//! failure. Freshness is a fixed five-minute TTL against an injected clock.

pub mod entry;
pub mod gateway;
pub mod store;

pub use entry::WishlistEntry;
pub use gateway::WishlistBackend;
pub use store::WishlistStore;
