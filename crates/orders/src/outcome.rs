//! Durable per-checkout outcome records.
//!
//! Every checkout writes an outcome before attempting either step, then
//! updates it after each step. The record survives restarts, so a checkout
//! interrupted mid-way still shows which step needs a retry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use velora_core::{StoreError, StoreResult};
use velora_localstore::SlotStore;

use crate::order::{OrderId, OrderLine};

/// Slot key for the persisted outcome list.
pub const ORDER_OUTCOMES_SLOT: &str = "order-outcomes";

/// Result of one checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Succeeded,
    Failed,
}

impl StepStatus {
    pub fn is_succeeded(self) -> bool {
        self == Self::Succeeded
    }
}

/// Everything needed to display and retry one checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub order_id: OrderId,
    pub lines: Vec<OrderLine>,
    pub wa_url: String,
    pub db_status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_error: Option<String>,
    pub relay_status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderOutcome {
    pub fn new(
        order_id: OrderId,
        lines: Vec<OrderLine>,
        wa_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            lines,
            wa_url,
            db_status: StepStatus::Pending,
            db_error: None,
            relay_status: StepStatus::Pending,
            relay_error: None,
            created_at,
        }
    }

    /// Both steps landed.
    pub fn is_complete(&self) -> bool {
        self.db_status.is_succeeded() && self.relay_status.is_succeeded()
    }
}

/// Append-mostly log of checkout outcomes over a single storage slot.
pub struct OutcomeLog {
    storage: Arc<dyn SlotStore>,
}

impl OutcomeLog {
    pub fn new(storage: Arc<dyn SlotStore>) -> Self {
        Self { storage }
    }

    /// All recorded outcomes, newest first. An unreadable slot is treated
    /// as empty and logged.
    pub fn load(&self) -> Vec<OrderOutcome> {
        match self.storage.get(ORDER_OUTCOMES_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(outcomes) => outcomes,
                Err(err) => {
                    tracing::warn!("discarding unreadable outcome log: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("failed to read outcome log: {err}");
                Vec::new()
            }
        }
    }

    pub fn find(&self, order_id: &OrderId) -> Option<OrderOutcome> {
        self.load().into_iter().find(|o| &o.order_id == order_id)
    }

    /// Outcomes with at least one step still not succeeded.
    pub fn incomplete(&self) -> Vec<OrderOutcome> {
        self.load().into_iter().filter(|o| !o.is_complete()).collect()
    }

    /// Insert or replace the outcome for its order id, then persist.
    /// Unlike cart persistence, a failed write here is an error: the
    /// outcome record is the checkout's source of truth.
    pub fn upsert(&self, outcome: &OrderOutcome) -> StoreResult<()> {
        let mut outcomes = self.load();
        match outcomes.iter_mut().find(|o| o.order_id == outcome.order_id) {
            Some(existing) => *existing = outcome.clone(),
            None => outcomes.insert(0, outcome.clone()),
        }
        let raw = serde_json::to_string(&outcomes)
            .map_err(|err| StoreError::backend(format!("serialize outcome log: {err}")))?;
        self.storage
            .put(ORDER_OUTCOMES_SLOT, &raw)
            .map_err(|err| StoreError::backend(format!("persist outcome log: {err}")))
    }
}
