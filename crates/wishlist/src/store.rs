//! The optimistic wishlist store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use velora_catalog::{Product, ProductSnapshot};
use velora_core::{Clock, OptimisticTxn, ProductId, StoreResult, UserId, WishlistEntryId};

use crate::entry::WishlistEntry;
use crate::gateway::WishlistBackend;

/// How long a successful fetch stays fresh. Within this window a non-forced
/// fetch performs no remote call; writes from other sessions stay invisible
/// for at most this long.
fn cache_ttl() -> Duration {
    Duration::minutes(5)
}

/// Client-side mirror of the per-user wishlist with optimistic mutations.
pub struct WishlistStore {
    backend: Arc<dyn WishlistBackend>,
    clock: Arc<dyn Clock>,
    entries: Vec<WishlistEntry>,
    loading: bool,
    initialized: bool,
    last_fetch: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl WishlistStore {
    pub fn new(backend: Arc<dyn WishlistBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            entries: Vec::new(),
            loading: false,
            initialized: false,
            last_fetch: None,
            last_error: None,
        }
    }

    /// Refresh the mirror from the remote table.
    ///
    /// Skipped while a fetch is in flight, and skipped when initialized and
    /// the last success is younger than the TTL, unless `force` is set.
    pub async fn fetch(&mut self, user: UserId, force: bool) -> StoreResult<()> {
        if self.loading && !force {
            return Ok(());
        }

        let now = self.clock.now();
        let fresh = self.initialized
            && self
                .last_fetch
                .is_some_and(|at| now - at <= cache_ttl());
        if !force && fresh {
            tracing::debug!("wishlist cache fresh, skipping fetch");
            return Ok(());
        }

        self.loading = true;
        self.last_error = None;

        match self.backend.list_entries(user).await {
            Ok(entries) => {
                self.entries = entries;
                self.last_fetch = Some(self.clock.now());
                self.initialized = true;
                self.loading = false;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("wishlist fetch failed: {err}");
                self.last_error = Some(err.to_string());
                self.loading = false;
                Err(err.into())
            }
        }
    }

    /// Add `product` to the user's wishlist, optimistically.
    ///
    /// Returns `Ok(true)` when the product is on the wishlist afterwards.
    /// A local duplicate short-circuits without a remote call (only as
    /// reliable as the cache is fresh); a remote unique-violation is treated
    /// as success. Any other remote failure reverts the local patch exactly.
    pub async fn add(&mut self, user: UserId, product: &Product) -> StoreResult<bool> {
        if self.entries.iter().any(|e| e.product_id == product.id) {
            return Ok(true);
        }

        let entry = WishlistEntry::pending(user, ProductSnapshot::from(product), self.clock.now());
        let temp_id = entry.id;
        let txn = OptimisticTxn::apply(
            &mut self.entries,
            |entries| entries.push(entry),
            move |entries| entries.retain(|e| e.id != temp_id),
        );

        match self.backend.insert_entry(user, product.id).await {
            Ok(()) => {
                txn.commit();
                self.mark_committed(temp_id);
                Ok(true)
            }
            Err(err) if err.is_unique_violation() => {
                // The row already exists remotely; keep the optimistic entry.
                tracing::debug!(product = %product.id, "wishlist insert was a duplicate");
                txn.commit();
                self.mark_committed(temp_id);
                Ok(true)
            }
            Err(err) => {
                tracing::error!("wishlist add failed, reverting: {err}");
                txn.revert(&mut self.entries);
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Remove `product_id` from the user's wishlist, optimistically.
    ///
    /// On remote failure the compensation is a forced refetch: the mirror
    /// is restored to the remote state, discarding any other unreflected
    /// local optimism accrued since the last fetch.
    pub async fn remove(&mut self, user: UserId, product_id: ProductId) -> StoreResult<bool> {
        self.entries.retain(|e| e.product_id != product_id);

        match self.backend.delete_entry(user, product_id).await {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::error!("wishlist remove failed, refetching: {err}");
                if let Err(refetch_err) = self.fetch(user, true).await {
                    tracing::warn!("revert refetch failed: {refetch_err}");
                }
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Drop all local state. Called on sign-out.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.loading = false;
        self.initialized = false;
        self.last_fetch = None;
        self.last_error = None;
    }

    /// Swap a pending entry's temporary id for a committed one.
    fn mark_committed(&mut self, temp_id: WishlistEntryId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == temp_id) {
            entry.id = WishlistEntryId::new();
            entry.pending = false;
        }
    }
}
