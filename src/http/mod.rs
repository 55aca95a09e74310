//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (axum setup, middleware, dispatch handler)
//!     → load_balancer (round-robin pick)
//!     → forward.rs (the per-backend binding rewrites and relays)
//!     → response streamed back to the client
//! ```

pub mod forward;
pub mod server;

pub use forward::{BindingTable, ForwardError, ForwardingBinding};
pub use server::HttpServer;
