//! Per-pool dynamic fee registry.
//!
//! This crate wires the pure fee curve to live volatility data:
//! - Per-pool registration of short and long term volatility feeds
//! - Fee computation with a configurable default for unregistered pools
//! - The activation precondition for pools using dynamic fees
//! - TOML configuration of the curve and the default fee

/// Prelude module for convenient imports.
pub mod prelude;

/// Registry configuration.
pub mod config;
/// Error types.
pub mod error;
/// Host-facing hook interface.
pub mod hook;
/// The registry itself.
pub mod registry;

pub use config::{CurveConfig, RegistryConfig};
pub use error::{ConfigError, RegistryError};
pub use hook::DynamicFeeHook;
pub use registry::PoolFeeRegistry;
