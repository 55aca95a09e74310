//! Per-backend request forwarding.
//!
//! Every backend gets one `ForwardingBinding` at startup, closed over that
//! backend's authority. Bindings are read-only and shared across all
//! in-flight requests; `BindingTable` is the explicit map from backend
//! address to binding, so the dispatch handler never rebuilds routing state
//! per request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, InvalidUriParts, PathAndQuery, Scheme};
use axum::http::{Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use thiserror::Error;

use crate::load_balancer::BackendPool;

/// Error raised while relaying one request to a backend.
///
/// Contained entirely within the dispatch of that request; never touches the
/// pool and never affects other in-flight requests.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream request timed out after {0:?}")]
    TimedOut(Duration),

    #[error("failed to rewrite request uri: {0}")]
    Rewrite(#[from] InvalidUriParts),
}

impl ForwardError {
    /// HTTP status reported to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ForwardError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Rewrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Relays requests to one fixed backend.
#[derive(Clone)]
pub struct ForwardingBinding {
    authority: Authority,
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl ForwardingBinding {
    pub fn new(
        authority: Authority,
        client: Client<HttpConnector, Body>,
        timeout: Duration,
    ) -> Self {
        Self {
            authority,
            client,
            timeout,
        }
    }

    /// Forward a request to this binding's backend.
    ///
    /// Only the scheme and authority are rewritten; method, path, query,
    /// headers and body pass through untouched. The exchange is bounded by
    /// the configured upstream timeout.
    pub async fn forward(
        &self,
        mut request: Request<Body>,
    ) -> Result<Response<Incoming>, ForwardError> {
        *request.uri_mut() = rewrite_uri(request.uri(), &self.authority)?;

        match tokio::time::timeout(self.timeout, self.client.request(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ForwardError::TimedOut(self.timeout)),
        }
    }
}

/// Retarget a request uri at the given backend, preserving path and query.
fn rewrite_uri(uri: &Uri, authority: &Authority) -> Result<Uri, InvalidUriParts> {
    let mut parts = uri.clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(authority.clone());
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Uri::from_parts(parts)
}

/// Startup-built map from backend address to its forwarding binding.
pub struct BindingTable {
    bindings: HashMap<String, Arc<ForwardingBinding>>,
}

impl BindingTable {
    /// Build one binding per pool target.
    ///
    /// The client handle is shared; each binding closes over exactly one
    /// authority, so the table is complete by construction.
    pub fn new(pool: &BackendPool, client: Client<HttpConnector, Body>, timeout: Duration) -> Self {
        let bindings = pool
            .targets()
            .iter()
            .map(|backend| {
                let binding =
                    ForwardingBinding::new(backend.authority().clone(), client.clone(), timeout);
                (backend.addr().to_string(), Arc::new(binding))
            })
            .collect();

        Self { bindings }
    }

    pub fn get(&self, addr: &str) -> Option<Arc<ForwardingBinding>> {
        self.bindings.get(addr).cloned()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper_util::rt::TokioExecutor;
    use std::str::FromStr;

    #[test]
    fn rewrite_replaces_scheme_and_authority_only() {
        let uri = Uri::from_static("/widgets?page=2");
        let authority = Authority::from_str("10.0.0.7:9000").unwrap();

        let rewritten = rewrite_uri(&uri, &authority).unwrap();

        assert_eq!(rewritten.scheme_str(), Some("http"));
        assert_eq!(
            rewritten.authority().map(|a| a.as_str()),
            Some("10.0.0.7:9000")
        );
        assert_eq!(rewritten.path(), "/widgets");
        assert_eq!(rewritten.query(), Some("page=2"));
    }

    #[test]
    fn rewrite_defaults_missing_path_to_root() {
        let uri = Uri::from_static("http://example.com");
        let authority = Authority::from_str("10.0.0.7:9000").unwrap();

        let rewritten = rewrite_uri(&uri, &authority).unwrap();

        assert_eq!(rewritten.path(), "/");
        assert_eq!(
            rewritten.authority().map(|a| a.as_str()),
            Some("10.0.0.7:9000")
        );
    }

    #[tokio::test]
    async fn binding_table_covers_every_backend() {
        let addrs = vec!["127.0.0.1:8081".to_string(), "127.0.0.1:8082".to_string()];
        let pool = BackendPool::new(&addrs).unwrap();
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let table = BindingTable::new(&pool, client, Duration::from_secs(5));

        assert_eq!(table.len(), pool.len());
        for backend in pool.targets() {
            assert!(table.get(backend.addr()).is_some());
        }
    }
}
