use std::path::PathBuf;

/// Runtime configuration, read from the environment with development
/// defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend project.
    pub backend_url: String,
    /// Anonymous api key for the project.
    pub api_key: String,
    /// Merchant WhatsApp number for order hand-off, digits only.
    pub whatsapp_number: String,
    /// Override for the local database directory. `None` uses the
    /// platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend_url: std::env::var("VELORA_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:54321".to_string()),
            api_key: std::env::var("VELORA_API_KEY").unwrap_or_default(),
            whatsapp_number: std::env::var("VELORA_WHATSAPP_NUMBER")
                .unwrap_or_else(|_| "917094296432".to_string()),
            data_dir: std::env::var("VELORA_DATA_DIR").ok().map(PathBuf::from),
        }
    }
}
