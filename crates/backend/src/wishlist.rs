use async_trait::async_trait;

use velora_core::{BackendError, ProductId, UserId};
use velora_wishlist::{WishlistBackend, WishlistEntry};

use crate::rest::RestBackend;
use crate::rows::{WishlistInsert, WishlistRow};

const WISHLIST_SELECT: &str = "*,products(id,name,price,discount,images)";

#[async_trait]
impl WishlistBackend for RestBackend {
    async fn list_entries(&self, user: UserId) -> Result<Vec<WishlistEntry>, BackendError> {
        let url = self.rest_url(&format!(
            "wishlist?select={WISHLIST_SELECT}&user_id=eq.{user}"
        ));
        let rows: Vec<WishlistRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_entry(&self, user: UserId, product: ProductId) -> Result<(), BackendError> {
        let url = self.rest_url("wishlist");
        let body = WishlistInsert {
            user_id: user,
            product_id: product,
        };
        self.send_ok(self.post(url).json(&body)).await
    }

    async fn delete_entry(&self, user: UserId, product: ProductId) -> Result<(), BackendError> {
        let url = self.rest_url(&format!(
            "wishlist?user_id=eq.{user}&product_id=eq.{product}"
        ));
        self.send_ok(self.delete(url)).await
    }
}
