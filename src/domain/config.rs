//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for services, the status API, tracker timing and alert mappings.

use crate::domain::types::Shop;
use serde::Deserialize;
use std::collections::HashMap;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    /// Matrix user ids allowed to drive trackers. Everyone else is rejected.
    #[serde(default)]
    pub operators: Vec<String>,
    #[serde(default = "default_health_port")]
    pub health_port: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            operators: Vec::new(),
            health_port: default_health_port(),
        }
    }
}

fn default_health_port() -> u16 {
    8000
}

/// Endpoints and timeout for the game-status API.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_stock_url")]
    pub stock_url: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            stock_url: default_stock_url(),
            weather_url: default_weather_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

fn default_stock_url() -> String {
    "https://api.joshlei.com/v2/growagarden/stock".to_string()
}

fn default_weather_url() -> String {
    "https://api.joshlei.com/v2/growagarden/weather".to_string()
}

fn default_api_timeout() -> u64 {
    10
}

/// Tracker timing. The period doubles as the retry interval after a failed
/// tick.
#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    #[serde(default = "default_period")]
    pub period_secs: u64,
    #[serde(default = "default_alert_ttl")]
    pub alert_ttl_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            period_secs: default_period(),
            alert_ttl_secs: default_alert_ttl(),
        }
    }
}

fn default_period() -> u64 {
    60
}

fn default_alert_ttl() -> u64 {
    120
}

/// Who gets mentioned when something comes back. Items and events without
/// an entry alert nobody.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AlertsConfig {
    /// shop key → item name → mention target (a Matrix user id)
    #[serde(default)]
    pub stock: HashMap<String, HashMap<String, String>>,
    /// weather event name → mention target
    #[serde(default)]
    pub weather: HashMap<String, String>,
}

impl AlertsConfig {
    pub fn stock_mention(&self, shop: Shop, item: &str) -> Option<&str> {
        self.stock
            .get(shop.key())
            .and_then(|items| items.get(item))
            .map(String::as_str)
    }

    pub fn weather_mention(&self, event: &str) -> Option<&str> {
        self.weather.get(event).map(String::as_str)
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    /// Fallback only; the `MATRIX_PASSWORD` environment variable wins.
    #[serde(default)]
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
