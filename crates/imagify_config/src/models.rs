// --- File: crates/imagify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level for the `imagify*` targets ("trace", "debug", "info", ...).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// --- Auth Config ---
// jwt_secret is usually supplied via IMAGIFY__AUTH__JWT_SECRET or the legacy JWT_SECRET.
#[derive(Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., sqlite://data/imagify.db, loaded via IMAGIFY__DATABASE__URL or DATABASE_URL
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

// --- Razorpay Config ---
// key_secret signs both the API basic auth and the checkout callback HMAC.
#[derive(Deserialize, Serialize, Clone)]
pub struct RazorpayConfig {
    #[serde(default)]
    pub key_id: String,     // RAZORPAY_KEY_ID
    #[serde(default)]
    pub key_secret: String, // RAZORPAY_KEY_SECRET
    #[serde(default = "default_currency")]
    pub currency: String,   // CURRENCY
    #[serde(default = "default_razorpay_api_base_url")]
    pub api_base_url: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("currency", &self.currency)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_razorpay: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub razorpay: Option<RazorpayConfig>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_ttl_secs() -> u64 {
    30 * 24 * 60 * 60
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_max_connections() -> u32 {
    5
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_razorpay_api_base_url() -> String {
    "https://api.razorpay.com/v1".to_string()
}
