//! `velora-catalog`: the remote product catalog and its client-side views.
//!
//! The catalog is a read-only mirror of the hosted `products` and
//! `collections` tables, refreshed wholesale. All filtering, sorting and
//! searching happens synchronously over the cached list.

pub mod filter;
pub mod gateway;
pub mod product;
pub mod store;

pub use filter::{FilterSpec, SortKey, SortOrder, filter_products};
pub use gateway::CatalogBackend;
pub use product::{Collection, CollectionId, Product, ProductSnapshot};
pub use store::ProductStore;
