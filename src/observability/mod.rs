//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing; request ids flow through all layers
//! - Metric updates are cheap atomic operations, exposed for Prometheus
//! - The exporter is optional and off by default

pub mod logging;
pub mod metrics;
