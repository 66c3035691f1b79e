//! Gateway trait over the remote order table.

use async_trait::async_trait;

use velora_catalog::SortOrder;
use velora_core::{BackendError, UserId};

use crate::order::{OrderFilter, OrderLine, OrderSortKey};

/// Remote operations the checkout flow and order history depend on.
#[async_trait]
pub trait OrdersBackend: Send + Sync {
    /// Insert the given lines. Must be idempotent for retries: re-inserting
    /// lines that already exist is a no-op, not an error.
    async fn insert_order_lines(&self, lines: &[OrderLine]) -> Result<(), BackendError>;

    /// Fetch the user's order lines, filtered and sorted remotely.
    async fn list_orders(
        &self,
        user: UserId,
        filter: OrderFilter,
        sort_by: OrderSortKey,
        sort_order: SortOrder,
    ) -> Result<Vec<OrderLine>, BackendError>;
}
