//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives at the dispatch handler
//!     → pool.rs (BackendPool::next, atomic round-robin rotation)
//!     → backend.rs (validated target address)
//!     → http::forward (the binding bound to that target relays the request)
//! ```
//!
//! # Design Decisions
//! - Pool composition is fixed at startup; no membership changes at runtime
//! - Rotation is strict round-robin; unreachable backends stay in rotation
//! - The cursor is the only shared mutable state and advances atomically

pub mod backend;
pub mod pool;

pub use backend::{Backend, ConfigurationError};
pub use pool::BackendPool;
