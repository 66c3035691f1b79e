use async_trait::async_trait;

use velora_catalog::{CatalogBackend, Collection, Product};
use velora_core::{BackendError, ProductId};

use crate::rest::RestBackend;
use crate::rows::{CollectionRow, ProductRow};

#[async_trait]
impl CatalogBackend for RestBackend {
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let url = self.rest_url("products?select=*&order=created_at.desc");
        let rows: Vec<ProductRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        let url = self.rest_url(&format!("products?select=*&id=eq.{id}&limit=1"));
        let rows: Vec<ProductRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, BackendError> {
        let url = self.rest_url("collections?select=*&hide=eq.false&order=name.asc");
        let rows: Vec<CollectionRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
