//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Build pool & server → Bind listener
//!
//! Shutdown:
//!     SIGINT → signals.rs → shutdown.rs broadcast → server drains and exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, before traffic is accepted
//! - Shutdown is cooperative; the server drains in-flight requests

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
