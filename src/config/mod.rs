//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs apply_overrides (command-line flags win)
//!     → validation.rs (semantic checks, all errors reported)
//!     → BalancerConfig (validated, immutable)
//!     → passed explicitly into pool/server construction
//! ```
//!
//! # Design Decisions
//! - Config is an explicit value, not a global; constructed once in main
//! - All fields have defaults so a minimal config parses
//! - Validation separates syntactic (serde) from semantic checks
//! - Any problem is fatal: the process exits before the listener opens

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BalancerConfig, CliOverrides, ObservabilityConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
