use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use velora_catalog::ProductSnapshot;
use velora_core::{ProductId, UserId, WishlistEntryId};

/// One wishlist row as held locally.
///
/// `pending` marks an optimistically inserted entry whose remote commit has
/// not resolved yet; on success the entry is re-tagged with a fresh
/// committed id. At most one entry per (user, product); locally a racy
/// pre-check, remotely a unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: WishlistEntryId,
    pub pending: bool,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub product: ProductSnapshot,
}

impl WishlistEntry {
    /// Build the locally-tagged temporary entry for an optimistic add.
    pub fn pending(user_id: UserId, product: ProductSnapshot, created_at: DateTime<Utc>) -> Self {
        Self {
            id: WishlistEntryId::new(),
            pending: true,
            user_id,
            product_id: product.id,
            created_at,
            product,
        }
    }
}
