//! Configuration schema definitions.
//!
//! All types derive serde traits for deserialization from the TOML config
//! file. The top-level keys (`backends`, `bind`, `mode`, `certFile`,
//! `keyFile`) keep their historical names so existing config files continue
//! to parse.

use serde::{Deserialize, Serialize};

/// The only balancing policy the dispatcher implements.
pub const MODE_ROUND_ROBIN: &str = "round-robin";

/// Root configuration for the load balancer.
///
/// Constructed once at startup and passed explicitly into pool and server
/// construction; there is no global configuration state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Backend services to balance across, in rotation order.
    pub backends: Vec<String>,

    /// Address the load balancer listens on (e.g. "0.0.0.0:8080").
    pub bind: String,

    /// Balancing policy identifier. Only "round-robin" is supported.
    pub mode: String,

    /// Path to the TLS certificate file (PEM).
    #[serde(rename = "certFile")]
    pub cert_file: Option<String>,

    /// Path to the TLS private key file (PEM).
    #[serde(rename = "keyFile")]
    pub key_file: Option<String>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            bind: "0.0.0.0:8080".to_string(),
            mode: MODE_ROUND_ROBIN.to_string(),
            cert_file: None,
            key_file: None,
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl BalancerConfig {
    /// Fold command-line flags over file values.
    ///
    /// The backends flag is a comma-separated list; whitespace is stripped,
    /// so "a:1, b:2" and "a:1,b:2" are equivalent.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(raw) = &overrides.backends {
            self.backends = raw
                .replace(' ', "")
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(bind) = &overrides.bind {
            self.bind = bind.clone();
        }
        if let Some(mode) = &overrides.mode {
            self.mode = mode.clone();
        }
        if let Some(cert_file) = &overrides.cert_file {
            self.cert_file = Some(cert_file.clone());
        }
        if let Some(key_file) = &overrides.key_file {
            self.key_file = Some(key_file.clone());
        }
    }

    /// True when both TLS paths are configured.
    pub fn tls_enabled(&self) -> bool {
        self.cert_file.is_some() && self.key_file.is_some()
    }
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub backends: Option<String>,
    pub bind: Option<String>,
    pub mode: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout towards a backend, in seconds.
    pub connect_secs: u64,

    /// Bound on one forwarded backend exchange, in seconds.
    pub upstream_secs: u64,

    /// Server-side bound on the whole request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}
