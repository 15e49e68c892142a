//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, mount point).
    pub listener: ListenerConfig,

    /// Upstream candidates, one per network path to the backend.
    pub upstreams: Vec<UpstreamConfig>,

    /// Rate-limit retry configuration.
    pub retries: RetryConfig,

    /// Which outcomes advance the fallback chain.
    pub fallback: FallbackConfig,

    /// Markers that make a 2xx payload trustworthy.
    pub classifier: ClassifierConfig,

    /// Per-call deadline.
    pub timeouts: TimeoutConfig,

    /// Outbound HTTP client settings.
    pub transport: TransportConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Look up an upstream slot by name.
    pub fn upstream_mut(&mut self, name: &str) -> Option<&mut UpstreamConfig> {
        self.upstreams.iter_mut().find(|u| u.name == name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path prefix the gateway is mounted under (e.g., "/api/gs").
    pub route_prefix: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            route_prefix: "/api/gs".to_string(),
        }
    }
}

/// One upstream slot in the fallback chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Label used in logs and metrics.
    pub name: String,

    /// Absolute URL prefix. Empty means "not configured".
    #[serde(default)]
    pub base_address: String,

    /// Position in the chain (lower = tried first).
    #[serde(default)]
    pub priority: u32,
}

impl UpstreamConfig {
    pub fn new(name: impl Into<String>, base_address: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            base_address: base_address.into(),
            priority,
        }
    }
}

/// Name of the end-user deployment slot.
pub const PUBLIC_UPSTREAM: &str = "public";
/// Name of the server-side deployment slot.
pub const SERVER_UPSTREAM: &str = "server";

fn default_upstreams() -> Vec<UpstreamConfig> {
    vec![
        UpstreamConfig::new(PUBLIC_UPSTREAM, "", 0),
        UpstreamConfig::new(SERVER_UPSTREAM, "", 1),
    ]
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable the one-shot retry.
    pub enabled: bool,

    /// Status that triggers the retry.
    pub retry_status: u16,

    /// Fixed delay before the retry in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retry_status: 429,
            delay_ms: 150,
        }
    }
}

/// Fallback chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Error statuses that advance to the next candidate.
    pub try_next_statuses: Vec<u16>,

    /// Also advance on error statuses outside `try_next_statuses`.
    pub fallback_on_other_errors: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            try_next_statuses: vec![401, 405, 429],
            fallback_on_other_errors: false,
        }
    }
}

/// Success marker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Boolean field that signals success when truthy.
    pub ok_field: String,

    /// Field carrying a status message.
    pub message_field: String,

    /// Message literals that signal success.
    pub success_messages: Vec<String>,

    /// Fields whose mere presence signals a real answer.
    pub presence_fields: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ok_field: "ok".to_string(),
            message_field: "message".to_string(),
            success_messages: vec!["OK".to_string(), "saved".to_string()],
            presence_fields: ["received", "trips", "trip", "items", "user", "result"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one upstream call (send + body read) in seconds.
    /// `None` waits as long as the transport does.
    pub upstream_secs: Option<u64>,
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Maximum redirects followed per call.
    pub max_redirects: usize,

    /// Route upstream calls through the proxy named by the environment.
    pub use_system_proxy: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_redirects: 10,
            use_system_proxy: true,
        }
    }
}

/// Inbound limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound POST body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstreams: default_upstreams(),
            retries: RetryConfig::default(),
            fallback: FallbackConfig::default(),
            classifier: ClassifierConfig::default(),
            timeouts: TimeoutConfig::default(),
            transport: TransportConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}
