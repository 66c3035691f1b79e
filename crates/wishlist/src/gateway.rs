//! Gateway to the hosted `wishlist` table.

use async_trait::async_trait;

use velora_core::{BackendError, ProductId, UserId};

use crate::entry::WishlistEntry;

/// Remote wishlist operations.
///
/// `insert_entry` must surface a duplicate (user, product) pair as
/// [`BackendError::UniqueViolation`]; the server-side unique constraint is
/// the real duplicate guard, not the client's cache pre-check.
#[async_trait]
pub trait WishlistBackend: Send + Sync {
    async fn list_entries(&self, user: UserId) -> Result<Vec<WishlistEntry>, BackendError>;

    async fn insert_entry(&self, user: UserId, product: ProductId) -> Result<(), BackendError>;

    async fn delete_entry(&self, user: UserId, product: ProductId) -> Result<(), BackendError>;
}
