//! Gateway to the hosted catalog tables.

use async_trait::async_trait;

use velora_core::{BackendError, ProductId};

use crate::product::{Collection, Product};

/// Read access to the remote `products` and `collections` tables.
///
/// Implementations return products ordered by creation time descending;
/// `list_collections` returns only collections that are not hidden.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, BackendError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError>;

    async fn list_collections(&self) -> Result<Vec<Collection>, BackendError>;
}
