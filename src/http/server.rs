//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the axum router: every method and path goes to the dispatch handler
//! - Wire up middleware (timeout, request id, tracing)
//! - Serve plain HTTP or TLS with graceful shutdown
//! - Dispatch each request to the next backend in rotation and relay the
//!   exchange

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::BalancerConfig;
use crate::http::forward::{BindingTable, ForwardError};
use crate::load_balancer::BackendPool;
use crate::observability::metrics;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub bindings: Arc<BindingTable>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server over an already-constructed pool.
    ///
    /// The upstream client and the per-backend binding table are built here,
    /// once, so the dispatch path itself touches no construction logic.
    pub fn new(config: &BalancerConfig, pool: Arc<BackendPool>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let bindings = Arc::new(BindingTable::new(
            &pool,
            client,
            Duration::from_secs(config.timeouts.upstream_secs),
        ));

        let state = AppState { pool, bindings };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &BalancerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve plain HTTP until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS with the supplied TLS material until shutdown.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(Duration::from_secs(30)));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Dispatch handler: pick the next backend and relay one exchange.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    // Exactly one rotation step per inbound request.
    let backend = state.pool.next();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        backend = %backend,
        "Dispatching request"
    );

    let binding = match state.bindings.get(backend.addr()) {
        Some(binding) => binding,
        None => {
            // The table is built from the same pool, so a miss means
            // construction was bypassed.
            tracing::error!(backend = %backend, "No forwarding binding for backend");
            metrics::record_request(&method, 500, backend.addr(), start);
            return (StatusCode::INTERNAL_SERVER_ERROR, "No forwarding binding").into_response();
        }
    };

    match binding.forward(request).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method, status.as_u16(), backend.addr(), start);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(err) => {
            let status = err.status();
            let message = match &err {
                ForwardError::TimedOut(_) => "Upstream request timed out",
                _ => "Upstream request failed",
            };
            tracing::error!(
                request_id = %request_id,
                backend = %backend,
                error = %err,
                "Upstream request failed"
            );
            metrics::record_request(&method, status.as_u16(), backend.addr(), start);
            (status, message).into_response()
        }
    }
}
