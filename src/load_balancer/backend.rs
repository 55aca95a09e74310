//! Backend target representation.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;
use url::Url;

/// Error raised while building the backend pool from configuration.
///
/// Only ever produced at startup; the pool is immutable afterwards, so this
/// never occurs mid-run.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("backend list is empty")]
    NoBackends,

    #[error("invalid backend address {addr:?}: {reason}")]
    InvalidBackend { addr: String, reason: String },
}

/// A single backend target.
///
/// Holds the canonical `host[:port]` authority the forwarding layer rewrites
/// requests towards. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Backend {
    addr: String,
    authority: Authority,
}

impl Backend {
    /// Parse a configured backend entry.
    ///
    /// Accepts `host`, `host:port`, or an `http://` URL; URL entries are
    /// reduced to their authority. Requests are always forwarded over plain
    /// HTTP, so `https://` entries are rejected rather than silently
    /// downgraded.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidBackend {
            addr: raw.to_string(),
            reason,
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty address".into()));
        }

        let authority_str = if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
            if url.scheme() != "http" {
                return Err(invalid(format!(
                    "unsupported scheme {:?}, only http backends are supported",
                    url.scheme()
                )));
            }
            if url.path() != "/" && !url.path().is_empty() {
                return Err(invalid("backend URL must not carry a path".into()));
            }
            if url.query().is_some() {
                return Err(invalid("backend URL must not carry a query".into()));
            }
            let authority = url.authority();
            if authority.is_empty() {
                return Err(invalid("missing host".into()));
            }
            authority.to_string()
        } else {
            trimmed.to_string()
        };

        if authority_str.contains('@') {
            return Err(invalid("backend address must not carry userinfo".into()));
        }

        let authority =
            Authority::from_str(&authority_str).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            addr: authority.to_string(),
            authority,
        })
    }

    /// Canonical `host[:port]` form of this backend.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The parsed authority used for request rewriting.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let backend = Backend::parse("127.0.0.1:8081").unwrap();
        assert_eq!(backend.addr(), "127.0.0.1:8081");
    }

    #[test]
    fn parses_bare_hostname() {
        let backend = Backend::parse("internal-api").unwrap();
        assert_eq!(backend.addr(), "internal-api");
    }

    #[test]
    fn parses_http_url_down_to_authority() {
        let backend = Backend::parse("http://10.0.0.7:9000").unwrap();
        assert_eq!(backend.addr(), "10.0.0.7:9000");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let backend = Backend::parse("  10.0.0.7:9000 ").unwrap();
        assert_eq!(backend.addr(), "10.0.0.7:9000");
    }

    #[test]
    fn rejects_empty_entry() {
        assert!(matches!(
            Backend::parse("   "),
            Err(ConfigurationError::InvalidBackend { .. })
        ));
    }

    #[test]
    fn rejects_https_scheme() {
        assert!(Backend::parse("https://10.0.0.7:9000").is_err());
    }

    #[test]
    fn rejects_url_with_path() {
        assert!(Backend::parse("http://10.0.0.7:9000/api").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Backend::parse("not a host").is_err());
    }
}
