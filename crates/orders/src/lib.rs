//! Checkout and order history.
//!
//! Placing an order is a dual write: one order line per cart item goes to
//! the remote order table, and the order summary goes to the merchant over
//! a WhatsApp deep link. The two steps are independent; each step's result
//! is recorded durably so a failed step can be retried without repeating
//! the one that succeeded.

pub mod checkout;
pub mod gateway;
pub mod order;
pub mod outcome;
pub mod whatsapp;

pub use checkout::CheckoutFlow;
pub use gateway::OrdersBackend;
pub use order::{OrderFilter, OrderId, OrderLine, OrderSortKey, OrderStatus};
pub use outcome::{ORDER_OUTCOMES_SLOT, OrderOutcome, OutcomeLog, StepStatus};
pub use whatsapp::{Customer, LoggedRelay, MessageRelay, format_order_message, wa_link};
