//! The assembled storefront: every store wired to shared infrastructure.

use std::sync::Arc;

use velora_auth::{AuthBackend, AuthStore};
use velora_backend::RestBackend;
use velora_cart::CartStore;
use velora_catalog::{CatalogBackend, Product, ProductStore, SortOrder};
use velora_core::{Clock, ProductId, StoreError, StoreResult, SystemClock, UserId};
use velora_localstore::{LocalStore, SlotStore};
use velora_orders::{
    CheckoutFlow, Customer, LoggedRelay, MessageRelay, OrderFilter, OrderId, OrderLine,
    OrderOutcome, OrderSortKey, OrdersBackend, OutcomeLog,
};
use velora_wishlist::{WishlistBackend, WishlistStore};

use crate::config::AppConfig;

/// Everything [`App`] is built from. Split out so tests can inject fakes.
pub struct AppParts {
    pub catalog_backend: Arc<dyn CatalogBackend>,
    pub wishlist_backend: Arc<dyn WishlistBackend>,
    pub auth_backend: Arc<dyn AuthBackend>,
    pub orders_backend: Arc<dyn OrdersBackend>,
    pub relay: Arc<dyn MessageRelay>,
    pub storage: Arc<dyn SlotStore>,
    pub clock: Arc<dyn Clock>,
    pub whatsapp_number: String,
}

/// The storefront state: one instance per running app.
pub struct App {
    pub catalog: ProductStore,
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub auth: AuthStore,
    pub checkout: CheckoutFlow,
    rest: Option<Arc<RestBackend>>,
}

impl App {
    /// Wire the real backend and local database from configuration.
    /// A session persisted by a previous run is resumed, including its
    /// access token.
    pub fn new(config: &AppConfig) -> Self {
        let rest = Arc::new(RestBackend::new(&config.backend_url, &config.api_key));
        let storage: Arc<dyn SlotStore> = match &config.data_dir {
            Some(dir) => Arc::new(LocalStore::at_path(dir.join("local.db"))),
            None => Arc::new(LocalStore::new()),
        };
        let mut app = Self::from_parts(AppParts {
            catalog_backend: rest.clone(),
            wishlist_backend: rest.clone(),
            auth_backend: rest.clone(),
            orders_backend: rest.clone(),
            relay: Arc::new(LoggedRelay),
            storage,
            clock: Arc::new(SystemClock),
            whatsapp_number: config.whatsapp_number.clone(),
        });
        if let Some(session) = app.auth.session() {
            rest.set_access_token(session.access_token.clone());
        }
        app.rest = Some(rest);
        app
    }

    pub fn from_parts(parts: AppParts) -> Self {
        Self {
            catalog: ProductStore::new(parts.catalog_backend),
            cart: CartStore::new(parts.storage.clone()),
            wishlist: WishlistStore::new(parts.wishlist_backend, parts.clock.clone()),
            auth: AuthStore::new(parts.auth_backend, parts.storage.clone(), parts.clock.clone()),
            checkout: CheckoutFlow::new(
                parts.orders_backend,
                parts.relay,
                OutcomeLog::new(parts.storage),
                parts.clock,
                parts.whatsapp_number,
            ),
            rest: None,
        }
    }

    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> StoreResult<()> {
        self.auth
            .sign_up(name, email, password, confirm_password)
            .await?;
        self.after_sign_in().await;
        Ok(())
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> StoreResult<()> {
        self.auth.sign_in(email, password).await?;
        self.after_sign_in().await;
        Ok(())
    }

    /// Sign out and drop all per-user state.
    pub async fn sign_out(&mut self) -> StoreResult<()> {
        self.auth.sign_out().await?;
        self.wishlist.reset();
        if let Some(rest) = &self.rest {
            rest.clear_access_token();
        }
        Ok(())
    }

    pub async fn add_to_wishlist(&mut self, product: &Product) -> StoreResult<bool> {
        let user = self.require_user()?;
        self.wishlist.add(user, product).await
    }

    pub async fn remove_from_wishlist(&mut self, product_id: ProductId) -> StoreResult<bool> {
        let user = self.require_user()?;
        self.wishlist.remove(user, product_id).await
    }

    pub async fn refresh_wishlist(&mut self, force: bool) -> StoreResult<()> {
        let user = self.require_user()?;
        self.wishlist.fetch(user, force).await
    }

    /// Place an order for the current cart.
    ///
    /// The cart is cleared only once the order message has been handed off;
    /// a failed hand-off keeps the cart so the user can retry.
    pub async fn place_order(&mut self) -> StoreResult<OrderOutcome> {
        let user = self.require_user()?;
        let customer = self
            .auth
            .profile()
            .map(customer_from_profile)
            .unwrap_or_default();
        let items = self.cart.items().to_vec();
        let outcome = self.checkout.place_order(user, &customer, &items).await?;
        if outcome.relay_status.is_succeeded() {
            self.cart.clear();
        }
        Ok(outcome)
    }

    pub async fn retry_order_db(&self, order_id: &OrderId) -> StoreResult<OrderOutcome> {
        self.checkout.retry_db(order_id).await
    }

    pub fn retry_order_relay(&self, order_id: &OrderId) -> StoreResult<OrderOutcome> {
        self.checkout.retry_relay(order_id)
    }

    pub async fn order_history(
        &self,
        filter: OrderFilter,
        sort_by: OrderSortKey,
        sort_order: SortOrder,
    ) -> StoreResult<Vec<OrderLine>> {
        let user = self.require_user()?;
        self.checkout
            .order_history(user, filter, sort_by, sort_order)
            .await
    }

    fn require_user(&self) -> StoreResult<UserId> {
        self.auth.user_id().ok_or(StoreError::NotAuthenticated)
    }

    async fn after_sign_in(&mut self) {
        if let (Some(rest), Some(session)) = (&self.rest, self.auth.session()) {
            rest.set_access_token(session.access_token.clone());
        }
        if let Some(user) = self.auth.user_id() {
            if let Err(err) = self.wishlist.fetch(user, true).await {
                tracing::warn!("initial wishlist fetch failed: {err}");
            }
        }
    }
}

fn customer_from_profile(profile: &velora_auth::UserProfile) -> Customer {
    Customer {
        name: Some(profile.name.clone()),
        email: Some(profile.email.clone()),
        phone: profile.phone.clone(),
    }
}
