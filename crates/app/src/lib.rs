//! Top-level wiring: configuration plus the assembled storefront state.

pub mod config;
pub mod state;

pub use config::AppConfig;
pub use state::{App, AppParts};

/// Initialize process-wide logging. Call once at startup.
pub fn init_logging() {
    velora_observability::init();
}
