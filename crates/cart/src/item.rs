use serde::{Deserialize, Serialize};

use velora_catalog::Product;
use velora_core::ProductId;

/// One line of the local cart.
///
/// Carries a snapshot of the product fields the cart needs; `quantity` is
/// at least 1 for as long as the item exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price_cents: u64,
    pub image: Option<String>,
    pub quantity: u32,
    pub stock_limit: Option<u32>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            image: product.primary_image().map(str::to_string),
            quantity,
            stock_limit: Some(product.stock),
        }
    }

    pub fn line_total_cents(&self) -> u64 {
        self.unit_price_cents * u64::from(self.quantity)
    }
}
