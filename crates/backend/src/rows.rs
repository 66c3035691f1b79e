//! Wire row shapes for the data API.
//!
//! The remote schema stores prices as decimal dollars and uses nullable
//! columns freely; conversion into the domain types normalizes both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use velora_auth::{Session, UserProfile};
use velora_catalog::{Collection, CollectionId, Product, ProductSnapshot};
use velora_core::{ProductId, UserId, WishlistEntryId};
use velora_orders::{OrderId, OrderLine, OrderStatus};
use velora_wishlist::WishlistEntry;

/// Decimal dollars to integer cents, rounding to the nearest cent.
/// Negative values clamp to zero.
pub(crate) fn dollars_to_cents(dollars: f64) -> u64 {
    (dollars.max(0.0) * 100.0).round() as u64
}

pub(crate) fn cents_to_dollars(cents: u64) -> f64 {
    cents as f64 / 100.0
}

fn percent_to_u8(discount: Option<f64>) -> u8 {
    discount.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductRow {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub trending: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            price_cents: dollars_to_cents(row.price),
            discount_percent: percent_to_u8(row.discount),
            images: row.images.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            collection_id: CollectionId::new(row.collection_id.unwrap_or_default()),
            stock: row.stock.unwrap_or(0),
            rating: row.rating.unwrap_or(0.0),
            review_count: row.review_count.unwrap_or(0),
            featured: row.featured.unwrap_or(false),
            trending: row.trending.unwrap_or(false),
            created_at: row.created_at,
        }
    }
}

/// The embedded `products(...)` slice on wishlist and order rows.
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotRow {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl From<SnapshotRow> for ProductSnapshot {
    fn from(row: SnapshotRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price_cents: dollars_to_cents(row.price),
            discount_percent: percent_to_u8(row.discount),
            images: row.images.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub hide: Option<bool>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: CollectionId::new(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            image: row.image,
            hidden: row.hide.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WishlistRow {
    pub id: WishlistEntryId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub products: SnapshotRow,
}

impl From<WishlistRow> for WishlistEntry {
    fn from(row: WishlistRow) -> Self {
        Self {
            id: row.id,
            pending: false,
            user_id: row.user_id,
            product_id: row.product_id,
            created_at: row.created_at,
            product: row.products.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WishlistInsert {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// A row of the `users` profile table. The phone column is named `mobile`
/// remotely.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            phone: row.mobile,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileInsert {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Success payload of the auth endpoints (`signup`, `token`).
#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionUser {
    pub id: UserId,
    pub email: String,
}

impl From<SessionResponse> for Session {
    fn from(resp: SessionResponse) -> Self {
        Self {
            user_id: resp.user.id,
            email: resp.user.email,
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderRow {
    pub order_id: String,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub products: Option<SnapshotRow>,
}

impl From<OrderRow> for OrderLine {
    fn from(row: OrderRow) -> Self {
        Self {
            order_id: OrderId::from(row.order_id),
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price_cents: dollars_to_cents(row.price),
            status: row.order_status,
            created_at: row.created_at,
            product: row.products.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderInsert {
    pub order_id: String,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
    pub order_status: OrderStatus,
}

impl From<&OrderLine> for OrderInsert {
    fn from(line: &OrderLine) -> Self {
        Self {
            order_id: line.order_id.as_str().to_string(),
            user_id: line.user_id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: cents_to_dollars(line.unit_price_cents),
            order_status: line.status,
        }
    }
}
