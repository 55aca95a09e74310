//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate backend entries and the bind address
//! - Reject balancing modes the dispatcher does not implement
//! - Require TLS material to come as a complete pair
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BalancerConfig → Result<(), Vec<...>>
//! - Runs before the config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{BalancerConfig, MODE_ROUND_ROBIN};
use crate::load_balancer::{Backend, ConfigurationError};

/// A single semantic problem in the configuration.
#[derive(Debug)]
pub enum ValidationError {
    NoBackends,
    InvalidBackend { addr: String, reason: String },
    InvalidBind { addr: String, reason: String },
    UnsupportedMode { mode: String },
    IncompleteTls,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoBackends => write!(f, "no backends configured"),
            ValidationError::InvalidBackend { addr, reason } => {
                write!(f, "invalid backend {:?}: {}", addr, reason)
            }
            ValidationError::InvalidBind { addr, reason } => {
                write!(f, "invalid bind address {:?}: {}", addr, reason)
            }
            ValidationError::UnsupportedMode { mode } => {
                write!(
                    f,
                    "unsupported balancing mode {:?}, only \"{}\" is available",
                    mode, MODE_ROUND_ROBIN
                )
            }
            ValidationError::IncompleteTls => {
                write!(f, "certFile and keyFile must be provided together")
            }
        }
    }
}

/// Validate a loaded configuration, collecting every error found.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }
    for addr in &config.backends {
        if let Err(err) = Backend::parse(addr) {
            let reason = match err {
                ConfigurationError::InvalidBackend { reason, .. } => reason,
                other => other.to_string(),
            };
            errors.push(ValidationError::InvalidBackend {
                addr: addr.clone(),
                reason,
            });
        }
    }

    if let Err(e) = config.bind.parse::<SocketAddr>() {
        errors.push(ValidationError::InvalidBind {
            addr: config.bind.clone(),
            reason: e.to_string(),
        });
    }

    if config.mode != MODE_ROUND_ROBIN {
        errors.push(ValidationError::UnsupportedMode {
            mode: config.mode.clone(),
        });
    }

    if config.cert_file.is_some() != config.key_file.is_some() {
        errors.push(ValidationError::IncompleteTls);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> BalancerConfig {
        let mut config = BalancerConfig::default();
        config.backends = vec!["127.0.0.1:8081".to_string(), "127.0.0.1:8082".to_string()];
        config.bind = "0.0.0.0:8080".to_string();
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut config = BalancerConfig::default();
        config.backends = vec!["not a host".to_string()];
        config.bind = "nowhere".to_string();
        config.mode = "least-connections".to_string();
        config.cert_file = Some("/tmp/cert.pem".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn rejects_empty_backend_list() {
        let mut config = valid_config();
        config.backends.clear();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::NoBackends));
    }

    #[test]
    fn rejects_unsupported_mode() {
        let mut config = valid_config();
        config.mode = "weighted".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::UnsupportedMode { .. }));
    }

    #[test]
    fn rejects_half_configured_tls() {
        let mut config = valid_config();
        config.key_file = Some("/tmp/key.pem".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::IncompleteTls));
    }
}
