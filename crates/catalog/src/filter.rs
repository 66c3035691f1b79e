//! Pure client-side filtering and sorting over the cached product list.

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Field to sort the filtered list by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A filter/sort request over the cached catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    pub min_price_cents: Option<u64>,
    pub max_price_cents: Option<u64>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

/// Apply `spec` to `products` without mutating the source list.
///
/// Price bounds are inclusive. The sort is stable, so products comparing
/// equal on the sort key keep their input order.
pub fn filter_products(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    let mut filtered: Vec<Product> = products.to_vec();

    if let Some(search) = spec.search.as_deref().filter(|s| !s.is_empty()) {
        let term = search.to_lowercase();
        filtered.retain(|p| {
            p.name.to_lowercase().contains(&term) || p.description.to_lowercase().contains(&term)
        });
    }

    if let Some(category) = spec.category.as_deref().filter(|c| !c.is_empty()) {
        filtered.retain(|p| p.category == category);
    }

    if let Some(min) = spec.min_price_cents {
        filtered.retain(|p| p.price_cents >= min);
    }

    if let Some(max) = spec.max_price_cents {
        filtered.retain(|p| p.price_cents <= max);
    }

    filtered.sort_by(|a, b| {
        let ord = match spec.sort_by {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Price => a.price_cents.cmp(&b.price_cents),
            SortKey::Rating => a.rating.total_cmp(&b.rating),
        };
        match spec.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    filtered
}

/// Case-insensitive substring search over name and description.
pub fn search_products(products: &[Product], term: &str) -> Vec<Product> {
    if term.is_empty() {
        return products.to_vec();
    }
    let term = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term) || p.description.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}
