// --- File: crates/connectify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Welcome text shown once the token is validated. `{first_name}` is replaced
/// with the first word of the validated name.
pub const DEFAULT_WELCOME_TEMPLATE: &str =
    "Hi {first_name}! Select a convenient time for your consultation with our pharmacist.";

// --- Validation Service Config ---
// The remote service that validates tokens and marks them used.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String, // Loaded via CONNECTIFY__SERVICE__BASE_URL
    #[serde(default)]
    pub request_timeout_secs: Option<u64>, // None: requests are never timed out
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

// --- Scheduling Widget Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WidgetConfig {
    /// Base data URL of the widget mount element.
    #[serde(default = "default_scheduling_url")]
    pub scheduling_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Readiness polls before giving up; `0` keeps polling until the widget library shows up.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            scheduling_url: default_scheduling_url(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

// --- Page Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PageConfig {
    #[serde(default = "default_welcome_template")]
    pub welcome_template: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            welcome_template: default_welcome_template(),
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
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

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "http://localhost:8787".to_string()
}

fn default_scheduling_url() -> String {
    "https://calendly.com/connectify/consultation".to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_poll_attempts() -> u32 {
    600
}

fn default_welcome_template() -> String {
    DEFAULT_WELCOME_TEMPLATE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
