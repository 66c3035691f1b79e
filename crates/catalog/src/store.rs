//! Session cache of the remote catalog.

use std::sync::Arc;

use velora_core::{ProductId, StoreResult};

use crate::filter::{FilterSpec, filter_products, search_products};
use crate::gateway::CatalogBackend;
use crate::product::{Collection, CollectionId, Product};

/// How many leading products count as "featured" (no ranking involved).
const FEATURED_COUNT: usize = 8;

/// In-memory mirror of the product catalog with client-side filter views.
///
/// `fetch_products` replaces the whole list; everything else is a
/// synchronous scan over the cached copy.
pub struct ProductStore {
    backend: Arc<dyn CatalogBackend>,
    products: Vec<Product>,
    filtered: Vec<Product>,
    categories: Vec<String>,
    collections: Vec<Collection>,
    filters: FilterSpec,
    loading: bool,
    last_error: Option<String>,
}

impl ProductStore {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            products: Vec::new(),
            filtered: Vec::new(),
            categories: Vec::new(),
            collections: Vec::new(),
            filters: FilterSpec::default(),
            loading: false,
            last_error: None,
        }
    }

    /// Replace the cached list with the remote table's current contents
    /// (remote-ordered by creation time descending) and re-derive the
    /// distinct category set.
    pub async fn fetch_products(&mut self) -> StoreResult<()> {
        if self.loading {
            return Ok(());
        }
        self.loading = true;
        self.last_error = None;

        match self.backend.list_products().await {
            Ok(products) => {
                self.categories = derive_categories(&products);
                self.filtered = products.clone();
                self.products = products;
                self.filters = FilterSpec::default();
                self.loading = false;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("failed to fetch products: {err}");
                self.last_error = Some(err.to_string());
                self.loading = false;
                Err(err.into())
            }
        }
    }

    /// Fetch a single product directly from the remote table.
    pub async fn fetch_product(&mut self, id: ProductId) -> StoreResult<Option<Product>> {
        self.last_error = None;
        match self.backend.get_product(id).await {
            Ok(product) => Ok(product),
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Refresh the visible collection list.
    pub async fn fetch_collections(&mut self) -> StoreResult<()> {
        self.last_error = None;
        match self.backend.list_collections().await {
            Ok(collections) => {
                self.collections = collections;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Recompute the filtered view for `spec`. Pure over the cached list.
    pub fn apply_filters(&mut self, spec: FilterSpec) {
        self.filtered = filter_products(&self.products, &spec);
        self.filters = spec;
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterSpec::default();
        self.filtered = self.products.clone();
    }

    /// First products of the cached list, in remote order. Not a ranking.
    pub fn featured_products(&self) -> &[Product] {
        let end = self.products.len().min(FEATURED_COUNT);
        &self.products[..end]
    }

    pub fn products_by_collection(&self, collection_id: &CollectionId) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| &p.collection_id == collection_id)
            .cloned()
            .collect()
    }

    pub fn search(&self, term: &str) -> Vec<Product> {
        search_products(&self.products, term)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
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
}

/// Distinct categories in first-seen (remote) order, empty names dropped.
fn derive_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if product.category.is_empty() {
            continue;
        }
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}
