use async_trait::async_trait;

use velora_catalog::SortOrder;
use velora_core::{BackendError, UserId};
use velora_orders::{OrderFilter, OrderLine, OrderSortKey, OrdersBackend};

use crate::rest::RestBackend;
use crate::rows::{OrderInsert, OrderRow};

const ORDER_SELECT: &str = "*,products(id,name,price,discount,images)";

fn history_query(
    user: UserId,
    filter: OrderFilter,
    sort_by: OrderSortKey,
    sort_order: SortOrder,
) -> String {
    let direction = match sort_order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    };
    let order = match sort_by {
        OrderSortKey::CreatedAt => format!("created_at.{direction}"),
        OrderSortKey::Status => format!("order_status.{direction}"),
        OrderSortKey::ProductName => format!("products(name).{direction}"),
    };
    let mut query = format!("orders?select={ORDER_SELECT}&user_id=eq.{user}");
    if let Some(status) = filter.status {
        query.push_str("&order_status=eq.");
        query.push_str(status.as_str());
    }
    query.push_str("&order=");
    query.push_str(&order);
    query
}

#[async_trait]
impl OrdersBackend for RestBackend {
    async fn insert_order_lines(&self, lines: &[OrderLine]) -> Result<(), BackendError> {
        let url = self.rest_url("orders");
        let body: Vec<OrderInsert> = lines.iter().map(Into::into).collect();
        // Upsert keyed on (order_id, product_id) keeps retries idempotent.
        let req = self
            .post(url)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&body);
        self.send_ok(req).await
    }

    async fn list_orders(
        &self,
        user: UserId,
        filter: OrderFilter,
        sort_by: OrderSortKey,
        sort_order: SortOrder,
    ) -> Result<Vec<OrderLine>, BackendError> {
        let url = self.rest_url(&history_query(user, filter, sort_by, sort_order));
        let rows: Vec<OrderRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
