//! Configuration management for the flight info API
//!
//! This module defines the layered configuration loaded at startup via
//! figment: in-code defaults, an optional `Config.toml`, then `FLIGHT_API_*`
//! environment variables.

use std::path::PathBuf;

use flight_core::proxy::ProvisioningConfig;
use flight_core::LookupConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub lookup: LookupSettings,
    pub proxy: ProxySettings,
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Lookup pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSettings {
    /// Base URL of the flight-tracking site
    pub tracker_base_url: String,
    /// Per-fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Attempts per flight-number spelling
    pub max_attempts: u32,
    /// Directory for raw-HTML diagnostic dumps (disabled when unset)
    pub html_dump_dir: Option<String>,
}

impl Default for LookupSettings {
    fn default() -> Self {
        let defaults = LookupConfig::default();
        Self {
            tracker_base_url: defaults.tracker_base_url,
            fetch_timeout_secs: defaults.fetch_timeout_secs,
            max_attempts: defaults.max_attempts,
            html_dump_dir: None,
        }
    }
}

impl LookupSettings {
    /// Core-crate configuration value for the pipeline
    pub fn to_lookup_config(&self) -> LookupConfig {
        LookupConfig {
            tracker_base_url: self.tracker_base_url.clone(),
            fetch_timeout_secs: self.fetch_timeout_secs,
            max_attempts: self.max_attempts,
            html_dump_dir: self.html_dump_dir.as_ref().map(PathBuf::from),
        }
    }
}

/// Proxy provisioning configuration
///
/// Provisioning runs once at startup and only when both credentials are
/// present; otherwise the pool stays empty and lookups go out directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxySettings {
    /// Provisioning API endpoint
    pub provision_url: String,
    /// Order identifier for the proxy service
    pub order_token: Option<String>,
    /// Caller credential for the proxy service
    pub auth_key: Option<String>,
    /// Desired proxy country
    pub country: String,
    /// Number of proxies to request
    pub count: u32,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            provision_url: String::new(),
            order_token: None,
            auth_key: None,
            country: "US".to_string(),
            count: 10,
        }
    }
}

impl ProxySettings {
    /// Provisioning settings for the core crate, when fully configured
    pub fn provisioning_config(&self) -> Option<ProvisioningConfig> {
        let order_token = self.order_token.clone()?;
        let auth_key = self.auth_key.clone()?;
        if self.provision_url.is_empty() {
            return None;
        }
        Some(ProvisioningConfig {
            api_url: self.provision_url.clone(),
            order_token,
            auth_key,
            country: self.country.clone(),
            count: self.count,
        })
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable JSON structured logging
    pub json_logs: bool,
    /// Log level filter
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_level: "info".to_string(),
        }
    }
}
