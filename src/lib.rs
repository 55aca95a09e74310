//! Round-robin HTTP load balancer library.
//!
//! Accepts requests on a configured bind address and forwards each one to
//! the next backend in a fixed rotation, relaying the response back to the
//! caller.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod net;
pub mod observability;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::BackendPool;
