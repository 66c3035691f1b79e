//! The checkout flow: dual write with per-step retry.

use std::sync::Arc;

use velora_cart::CartItem;
use velora_catalog::SortOrder;
use velora_core::{Clock, StoreError, StoreResult, UserId};

use crate::gateway::OrdersBackend;
use crate::order::{OrderFilter, OrderId, OrderLine, OrderSortKey, OrderStatus};
use crate::outcome::{OrderOutcome, OutcomeLog, StepStatus};
use crate::whatsapp::{Customer, MessageRelay, format_order_message, wa_link};

pub struct CheckoutFlow {
    backend: Arc<dyn OrdersBackend>,
    relay: Arc<dyn MessageRelay>,
    outcomes: OutcomeLog,
    clock: Arc<dyn Clock>,
    wa_number: String,
}

impl CheckoutFlow {
    pub fn new(
        backend: Arc<dyn OrdersBackend>,
        relay: Arc<dyn MessageRelay>,
        outcomes: OutcomeLog,
        clock: Arc<dyn Clock>,
        wa_number: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            relay,
            outcomes,
            clock,
            wa_number: wa_number.into(),
        }
    }

    /// Place an order for the cart contents.
    ///
    /// The outcome record is persisted before either step runs, then after
    /// each step. Step failures do not fail the call: the returned outcome
    /// carries both step statuses and the caller decides what to surface.
    /// Only an empty cart or an unwritable outcome log is an error.
    pub async fn place_order(
        &self,
        user: UserId,
        customer: &Customer,
        items: &[CartItem],
    ) -> StoreResult<OrderOutcome> {
        if items.is_empty() {
            return Err(StoreError::validation("Your cart is empty"));
        }

        let now = self.clock.now();
        let order_id = OrderId::generate(now);
        let lines: Vec<OrderLine> = items
            .iter()
            .map(|item| OrderLine {
                order_id: order_id.clone(),
                user_id: user,
                product_id: item.id,
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                status: OrderStatus::Pending,
                created_at: now,
                product: None,
            })
            .collect();

        let message = format_order_message(items, customer, order_id.as_str());
        let wa_url = wa_link(&self.wa_number, &message);

        let mut outcome = OrderOutcome::new(order_id, lines, wa_url, now);
        self.outcomes.upsert(&outcome)?;

        self.run_db_step(&mut outcome).await;
        self.outcomes.upsert(&outcome)?;

        self.run_relay_step(&mut outcome);
        self.outcomes.upsert(&outcome)?;

        Ok(outcome)
    }

    /// Re-run the order-table write for a recorded checkout. A step that
    /// already succeeded is not repeated.
    pub async fn retry_db(&self, order_id: &OrderId) -> StoreResult<OrderOutcome> {
        let mut outcome = self
            .outcomes
            .find(order_id)
            .ok_or(StoreError::NotFound)?;
        if outcome.db_status.is_succeeded() {
            return Ok(outcome);
        }
        self.run_db_step(&mut outcome).await;
        self.outcomes.upsert(&outcome)?;
        Ok(outcome)
    }

    /// Re-run the message hand-off for a recorded checkout. A step that
    /// already succeeded is not repeated.
    pub fn retry_relay(&self, order_id: &OrderId) -> StoreResult<OrderOutcome> {
        let mut outcome = self
            .outcomes
            .find(order_id)
            .ok_or(StoreError::NotFound)?;
        if outcome.relay_status.is_succeeded() {
            return Ok(outcome);
        }
        self.run_relay_step(&mut outcome);
        self.outcomes.upsert(&outcome)?;
        Ok(outcome)
    }

    /// The user's order history, filtered and sorted remotely.
    pub async fn order_history(
        &self,
        user: UserId,
        filter: OrderFilter,
        sort_by: OrderSortKey,
        sort_order: SortOrder,
    ) -> StoreResult<Vec<OrderLine>> {
        self.backend
            .list_orders(user, filter, sort_by, sort_order)
            .await
            .map_err(Into::into)
    }

    /// Recorded checkouts with at least one step still outstanding.
    pub fn incomplete_checkouts(&self) -> Vec<OrderOutcome> {
        self.outcomes.incomplete()
    }

    pub fn checkout_record(&self, order_id: &OrderId) -> Option<OrderOutcome> {
        self.outcomes.find(order_id)
    }

    async fn run_db_step(&self, outcome: &mut OrderOutcome) {
        match self.backend.insert_order_lines(&outcome.lines).await {
            Ok(()) => {
                outcome.db_status = StepStatus::Succeeded;
                outcome.db_error = None;
            }
            Err(err) => {
                tracing::error!(order = %outcome.order_id, "order insert failed: {err}");
                outcome.db_status = StepStatus::Failed;
                outcome.db_error = Some(err.to_string());
            }
        }
    }

    fn run_relay_step(&self, outcome: &mut OrderOutcome) {
        match self.relay.deliver(&outcome.wa_url) {
            Ok(()) => {
                outcome.relay_status = StepStatus::Succeeded;
                outcome.relay_error = None;
            }
            Err(err) => {
                tracing::error!(order = %outcome.order_id, "order hand-off failed: {err}");
                outcome.relay_status = StepStatus::Failed;
                outcome.relay_error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use velora_core::{BackendError, ManualClock, ProductId};
    use velora_localstore::MemoryStore;

    #[derive(Default)]
    struct FakeOrders {
        rows: Mutex<Vec<OrderLine>>,
        fail_insert: AtomicBool,
        insert_calls: AtomicUsize,
    }

    #[async_trait]
    impl OrdersBackend for FakeOrders {
        async fn insert_order_lines(&self, lines: &[OrderLine]) -> Result<(), BackendError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert.load(Ordering::SeqCst) {
                return Err(BackendError::network("connection reset"));
            }
            let mut rows = self.rows.lock().unwrap();
            for line in lines {
                let exists = rows
                    .iter()
                    .any(|r| r.order_id == line.order_id && r.product_id == line.product_id);
                if !exists {
                    rows.push(line.clone());
                }
            }
            Ok(())
        }

        async fn list_orders(
            &self,
            user: UserId,
            filter: OrderFilter,
            _sort_by: OrderSortKey,
            _sort_order: SortOrder,
        ) -> Result<Vec<OrderLine>, BackendError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user)
                .filter(|r| filter.status.is_none_or(|s| r.status == s))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeRelay {
        fail: AtomicBool,
        delivered: Mutex<Vec<String>>,
    }

    impl MessageRelay for FakeRelay {
        fn deliver(&self, url: &str) -> Result<(), BackendError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(BackendError::network("no channel"));
            }
            self.delivered.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn cart_items() -> Vec<CartItem> {
        vec![
            CartItem {
                id: ProductId::new(),
                name: "Oak Table".to_string(),
                unit_price_cents: 129_900,
                image: None,
                quantity: 1,
                stock_limit: None,
            },
            CartItem {
                id: ProductId::new(),
                name: "Side Chair".to_string(),
                unit_price_cents: 4_950,
                image: None,
                quantity: 2,
                stock_limit: None,
            },
        ]
    }

    fn flow(
        backend: Arc<FakeOrders>,
        relay: Arc<FakeRelay>,
        storage: Arc<MemoryStore>,
    ) -> CheckoutFlow {
        CheckoutFlow::new(
            backend,
            relay,
            OutcomeLog::new(storage),
            Arc::new(ManualClock::new(Utc::now())),
            "917094296432",
        )
    }

    #[tokio::test]
    async fn an_empty_cart_is_rejected_before_any_side_effect() {
        let backend = Arc::new(FakeOrders::default());
        let relay = Arc::new(FakeRelay::default());
        let flow = flow(backend.clone(), relay, Arc::new(MemoryStore::new()));

        let err = flow
            .place_order(UserId::new(), &Customer::default(), &[])
            .await
            .unwrap_err();
        match err {
            StoreError::Validation(msg) => assert_eq!(msg, "Your cart is empty"),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(backend.insert_calls.load(Ordering::SeqCst), 0);
        assert!(flow.incomplete_checkouts().is_empty());
    }

    #[tokio::test]
    async fn a_clean_checkout_completes_both_steps_and_records_it() {
        let backend = Arc::new(FakeOrders::default());
        let relay = Arc::new(FakeRelay::default());
        let flow = flow(backend.clone(), relay.clone(), Arc::new(MemoryStore::new()));
        let user = UserId::new();

        let outcome = flow
            .place_order(user, &Customer::default(), &cart_items())
            .await
            .unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.lines.len(), 2);
        assert_eq!(backend.rows.lock().unwrap().len(), 2);
        assert_eq!(relay.delivered.lock().unwrap().len(), 1);
        assert!(flow.incomplete_checkouts().is_empty());
        assert_eq!(
            flow.checkout_record(&outcome.order_id).unwrap(),
            outcome
        );
    }

    #[tokio::test]
    async fn a_failed_db_step_still_hands_the_order_off() {
        let backend = Arc::new(FakeOrders::default());
        let relay = Arc::new(FakeRelay::default());
        let flow = flow(backend.clone(), relay.clone(), Arc::new(MemoryStore::new()));

        backend.fail_insert.store(true, Ordering::SeqCst);
        let outcome = flow
            .place_order(UserId::new(), &Customer::default(), &cart_items())
            .await
            .unwrap();

        assert_eq!(outcome.db_status, StepStatus::Failed);
        assert!(outcome.db_error.as_deref().unwrap().contains("connection reset"));
        assert_eq!(outcome.relay_status, StepStatus::Succeeded);
        assert_eq!(relay.delivered.lock().unwrap().len(), 1);
        assert_eq!(flow.incomplete_checkouts().len(), 1);
    }

    #[tokio::test]
    async fn retry_db_reruns_only_the_failed_step() {
        let backend = Arc::new(FakeOrders::default());
        let relay = Arc::new(FakeRelay::default());
        let flow = flow(backend.clone(), relay.clone(), Arc::new(MemoryStore::new()));

        backend.fail_insert.store(true, Ordering::SeqCst);
        let outcome = flow
            .place_order(UserId::new(), &Customer::default(), &cart_items())
            .await
            .unwrap();

        backend.fail_insert.store(false, Ordering::SeqCst);
        let retried = flow.retry_db(&outcome.order_id).await.unwrap();

        assert!(retried.is_complete());
        assert_eq!(backend.rows.lock().unwrap().len(), 2);
        // The relay was not run a second time.
        assert_eq!(relay.delivered.lock().unwrap().len(), 1);
        assert!(flow.incomplete_checkouts().is_empty());
    }

    #[tokio::test]
    async fn retry_relay_does_not_touch_the_order_table() {
        let backend = Arc::new(FakeOrders::default());
        let relay = Arc::new(FakeRelay::default());
        let flow = flow(backend.clone(), relay.clone(), Arc::new(MemoryStore::new()));

        relay.fail.store(true, Ordering::SeqCst);
        let outcome = flow
            .place_order(UserId::new(), &Customer::default(), &cart_items())
            .await
            .unwrap();
        assert_eq!(outcome.relay_status, StepStatus::Failed);

        relay.fail.store(false, Ordering::SeqCst);
        let retried = flow.retry_relay(&outcome.order_id).unwrap();

        assert!(retried.is_complete());
        assert_eq!(backend.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_of_a_succeeded_step_is_a_no_op() {
        let backend = Arc::new(FakeOrders::default());
        let relay = Arc::new(FakeRelay::default());
        let flow = flow(backend.clone(), relay.clone(), Arc::new(MemoryStore::new()));

        let outcome = flow
            .place_order(UserId::new(), &Customer::default(), &cart_items())
            .await
            .unwrap();

        flow.retry_db(&outcome.order_id).await.unwrap();
        flow.retry_relay(&outcome.order_id).unwrap();

        assert_eq!(backend.insert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(relay.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retry_of_an_unknown_order_is_not_found() {
        let flow = flow(
            Arc::new(FakeOrders::default()),
            Arc::new(FakeRelay::default()),
            Arc::new(MemoryStore::new()),
        );
        let missing = OrderId::generate(Utc::now());
        assert!(matches!(
            flow.retry_db(&missing).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn order_history_filters_by_status() {
        let backend = Arc::new(FakeOrders::default());
        let flow = flow(
            backend.clone(),
            Arc::new(FakeRelay::default()),
            Arc::new(MemoryStore::new()),
        );
        let user = UserId::new();

        flow.place_order(user, &Customer::default(), &cart_items())
            .await
            .unwrap();
        backend.rows.lock().unwrap()[0].status = OrderStatus::Completed;

        let completed = flow
            .order_history(
                user,
                OrderFilter::with_status(OrderStatus::Completed),
                OrderSortKey::CreatedAt,
                SortOrder::Desc,
            )
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);

        let all = flow
            .order_history(user, OrderFilter::all(), OrderSortKey::CreatedAt, SortOrder::Desc)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
