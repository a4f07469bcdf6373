//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::headers::REMOVE_DUPLICATE_FLAG;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin server definitions.
    pub backends: Vec<BackendConfig>,

    /// Remap entries, each with its header injection rules.
    pub remap: Vec<RemapConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Look up a backend by name.
    pub fn backend(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.iter().find(|b| b.name == name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Origin server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend identifier.
    pub name: String,

    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,
}

/// A remap entry: which requests it matches, where they go, which headers they get.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemapConfig {
    /// Remap identifier for logging.
    pub name: String,

    /// Host header to match (exact match, case-insensitive).
    pub host: Option<String>,

    /// Path prefix to match.
    pub path_prefix: Option<String>,

    /// Backend name to forward to.
    pub backend: String,

    /// Remap priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,

    /// Header injection rules, applied in order.
    #[serde(default)]
    pub add_header: Vec<AddHeaderConfig>,
}

impl RemapConfig {
    /// Rule label for the `index`-th injection rule of this entry.
    pub fn rule_id(&self, index: usize) -> String {
        match &self.add_header[index].id {
            Some(id) => id.clone(),
            None => format!("{}#{}", self.name, index),
        }
    }

    /// Parameter tuple for the `index`-th rule: `[id, target, header, policy?]`.
    pub fn rule_params(&self, index: usize, target: &str) -> Vec<String> {
        let entry = &self.add_header[index];
        let mut params = vec![self.rule_id(index), target.to_string(), entry.header.clone()];
        if let Some(policy) = &entry.policy {
            params.push(policy.clone());
        }
        params
    }
}

/// One header injection rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddHeaderConfig {
    /// "KEY:VALUE" to inject.
    pub header: String,

    /// Duplicate policy; "remove_duplicate" replaces an existing header.
    pub policy: Option<String>,

    /// Rule label; defaults to "<remap name>#<index>".
    pub id: Option<String>,
}

impl AddHeaderConfig {
    /// Whether this entry asks for replacement of an existing header.
    pub fn replaces(&self) -> bool {
        self.policy.as_deref() == Some(REMOVE_DUPLICATE_FLAG)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
