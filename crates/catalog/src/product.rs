use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use velora_core::ProductId;

/// Identifier of a collection. Collections are keyed by slug
/// (e.g. `bed-collection`), not by UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for CollectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A catalog product as mirrored from the remote `products` table.
///
/// Prices are in the smallest currency unit (cents); display formatting is
/// a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price_cents: u64,
    pub discount_percent: u8,
    pub images: Vec<String>,
    pub category: String,
    pub collection_id: CollectionId,
    pub stock: u32,
    pub rating: f32,
    pub review_count: u32,
    pub featured: bool,
    pub trending: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price after applying the discount percentage, rounded down.
    pub fn discounted_price_cents(&self) -> u64 {
        let discount = self.price_cents * u64::from(self.discount_percent) / 100;
        self.price_cents - discount
    }

    /// First image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// The slice of a product embedded in wishlist entries and order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price_cents: u64,
    pub discount_percent: u8,
    pub images: Vec<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price_cents: product.price_cents,
            discount_percent: product.discount_percent,
            images: product.images.clone(),
        }
    }
}

/// A storefront collection as mirrored from the remote `collections` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_price(price_cents: u64, discount_percent: u8) -> Product {
        Product {
            id: ProductId::new(),
            name: "Platform Bed".to_string(),
            description: "Modern platform bed".to_string(),
            price_cents,
            discount_percent,
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            category: "Bedroom".to_string(),
            collection_id: CollectionId::new("bed-collection"),
            stock: 4,
            rating: 4.8,
            review_count: 12,
            featured: false,
            trending: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn discount_rounds_down_in_cents() {
        let product = product_with_price(89_999, 10);
        assert_eq!(product.discounted_price_cents(), 81_000);

        let no_discount = product_with_price(89_999, 0);
        assert_eq!(no_discount.discounted_price_cents(), 89_999);
    }

    #[test]
    fn primary_image_is_the_first() {
        let product = product_with_price(100, 0);
        assert_eq!(product.primary_image(), Some("a.jpg"));
    }
}
