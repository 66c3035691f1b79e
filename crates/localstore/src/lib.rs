//! `velora-localstore`: durable local key-value slots.
//!
//! The client persists a handful of serialized blobs across restarts (the
//! cart list, the authenticated-user pair, the order outcome log), each
//! under a fixed string key. The [`SlotStore`] trait is the seam; the
//! SQLite-backed [`LocalStore`] is the durable implementation and
//! [`MemoryStore`] backs tests.

pub mod slot;
pub mod sqlite;

pub use slot::{MemoryStore, SlotStore};
pub use sqlite::LocalStore;
