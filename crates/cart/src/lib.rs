//! `velora-cart`: the local shopping cart.
//!
//! The cart is owned entirely by the client session: synchronous, no remote
//! calls, persisted to a durable local slot on every mutation so it survives
//! reloads.

pub mod item;
pub mod store;

pub use item::CartItem;
pub use store::{CART_SLOT, CartStore};
