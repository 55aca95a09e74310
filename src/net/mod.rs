//! Network layer.
//!
//! TLS is optional: when certificate and key paths are configured, the
//! listener terminates TLS before handing the stream to the HTTP layer.

pub mod tls;
