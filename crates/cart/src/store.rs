//! The synchronous, locally persisted cart store.

use std::sync::Arc;

use velora_catalog::Product;
use velora_core::ProductId;
use velora_localstore::SlotStore;

use crate::item::CartItem;

/// Fixed slot key for the serialized cart list.
pub const CART_SLOT: &str = "cart-storage";

/// The authoritative local list of {product, quantity} pairs.
///
/// Single-threaded and synchronous; this store never talks to the remote
/// backend. Every mutation writes through to the slot store, so another
/// handle opened later sees the last writer's cart (no cross-handle lock,
/// last write wins).
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Arc<dyn SlotStore>,
}

impl CartStore {
    /// Open the cart, restoring whatever the slot holds. A missing or
    /// corrupt slot yields an empty cart, never an error.
    pub fn new(storage: Arc<dyn SlotStore>) -> Self {
        let items = match storage.get(CART_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(err) => {
                    tracing::warn!("discarding corrupt cart slot: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("failed to read cart slot: {err}");
                Vec::new()
            }
        };
        Self { items, storage }
    }

    /// Add `quantity` of `product`. If the product is already in the cart
    /// its quantity is incremented; no stock check happens at this layer.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity += quantity,
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        self.persist();
    }

    /// Remove the entry for `id`. Removing an absent id is a no-op.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
        self.persist();
    }

    /// Overwrite the quantity for `id`; a quantity of zero (or less, at the
    /// API boundary u32 makes that unrepresentable) removes the entry.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_from_cart(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
        self.persist();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of `unit_price × quantity` over all entries. No tax or shipping.
    pub fn cart_total_cents(&self) -> u64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    /// Total number of units across all entries.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn item_quantity(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write-through to the durable slot. Persistence failures are logged
    /// and tolerated; the in-memory cart stays authoritative for the
    /// session.
    fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("failed to serialize cart: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.put(CART_SLOT, &raw) {
            tracing::warn!("failed to persist cart slot: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use velora_catalog::CollectionId;
    use velora_localstore::MemoryStore;

    fn product(price_cents: u64) -> Product {
        Product {
            id: ProductId::new(),
            name: "Platform Bed".to_string(),
            description: String::new(),
            price_cents,
            discount_percent: 0,
            images: vec!["bed.jpg".to_string()],
            category: "Bedroom".to_string(),
            collection_id: CollectionId::new("bed-collection"),
            stock: 15,
            rating: 4.8,
            review_count: 0,
            featured: false,
            trending: false,
            created_at: Utc::now(),
        }
    }

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn adding_same_product_merges_quantities() {
        let mut cart = store();
        let p = product(1000);

        cart.add_to_cart(&p, 2);
        cart.add_to_cart(&p, 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_quantity(p.id), 5);
        assert_eq!(cart.cart_total_cents(), 5000);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = store();
        let p = product(1000);
        cart.add_to_cart(&p, 1);

        cart.remove_from_cart(p.id);
        let after_first = cart.items().to_vec();
        cart.remove_from_cart(p.id);

        assert_eq!(cart.items(), after_first.as_slice());
        assert!(cart.is_empty());
    }

    #[test]
    fn zero_quantity_update_removes_the_entry() {
        let mut cart = store();
        let p = product(1000);
        cart.add_to_cart(&p, 2);

        cart.update_quantity(p.id, 0);
        assert!(!cart.is_in_cart(p.id));
    }

    #[test]
    fn update_overwrites_quantity_unconditionally() {
        let mut cart = store();
        let p = product(1000);
        cart.add_to_cart(&p, 2);

        // Beyond stock_limit on purpose: this layer does not re-validate.
        cart.update_quantity(p.id, 99);
        assert_eq!(cart.item_quantity(p.id), 99);
    }

    #[test]
    fn total_is_order_independent() {
        let a = product(500);
        let b = product(1200);

        let mut first = store();
        first.add_to_cart(&a, 2);
        first.add_to_cart(&b, 1);

        let mut second = store();
        second.add_to_cart(&b, 1);
        second.add_to_cart(&a, 2);

        assert_eq!(first.cart_total_cents(), second.cart_total_cents());
        assert_eq!(first.cart_total_cents(), 2200);
    }

    #[test]
    fn cart_survives_a_reload_via_the_slot() {
        let storage: Arc<dyn SlotStore> = Arc::new(MemoryStore::new());
        let p = product(750);

        {
            let mut cart = CartStore::new(storage.clone());
            cart.add_to_cart(&p, 3);
        }

        let reloaded = CartStore::new(storage);
        assert_eq!(reloaded.item_quantity(p.id), 3);
        assert_eq!(reloaded.cart_total_cents(), 2250);
    }

    #[test]
    fn corrupt_slot_yields_an_empty_cart() {
        let storage: Arc<dyn SlotStore> = Arc::new(MemoryStore::new());
        storage.put(CART_SLOT, "not json").unwrap();

        let cart = CartStore::new(storage);
        assert!(cart.is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize, u32),
            Remove(usize),
            Update(usize, u32),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..4usize, 1..5u32).prop_map(|(i, q)| Op::Add(i, q)),
                (0..4usize).prop_map(Op::Remove),
                (0..4usize, 0..5u32).prop_map(|(i, q)| Op::Update(i, q)),
            ]
        }

        proptest! {
            /// For all op sequences: no entry with quantity 0, no duplicate
            /// ids, and the total always equals the recomputed sum.
            #[test]
            fn invariants_hold_for_all_op_sequences(ops in prop::collection::vec(op_strategy(), 0..40)) {
                let catalog: Vec<Product> =
                    (0..4).map(|i| product(100 * (i + 1) as u64)).collect();
                let mut cart = store();

                for op in ops {
                    match op {
                        Op::Add(i, q) => cart.add_to_cart(&catalog[i], q),
                        Op::Remove(i) => cart.remove_from_cart(catalog[i].id),
                        Op::Update(i, q) => cart.update_quantity(catalog[i].id, q),
                    }
                }

                for item in cart.items() {
                    prop_assert!(item.quantity >= 1);
                }

                let mut ids: Vec<ProductId> = cart.items().iter().map(|i| i.id).collect();
                let before = ids.len();
                ids.sort_by_key(|id| *id.as_uuid());
                ids.dedup();
                prop_assert_eq!(before, ids.len());

                let expected: u64 = cart
                    .items()
                    .iter()
                    .map(|i| i.unit_price_cents * u64::from(i.quantity))
                    .sum();
                prop_assert_eq!(cart.cart_total_cents(), expected);
            }
        }
    }
}
