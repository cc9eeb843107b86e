//! Prelude module for convenient imports.
//!
//! ```rust
//! use dynfee_registry::prelude::*;
//! ```

pub use crate::config::{CurveConfig, RegistryConfig};
pub use crate::error::{ConfigError, RegistryError};
pub use crate::hook::DynamicFeeHook;
pub use crate::registry::PoolFeeRegistry;

pub use dynfee_data::VolatilityOracle;
pub use dynfee_domain::prelude::*;
