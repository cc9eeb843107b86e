//! Prelude module for convenient imports.
//!
//! ```rust
//! use dynfee_domain::prelude::*;
//! ```

pub use crate::entities::{MarketDataSource, PoolKey};
pub use crate::enums::FeeMode;
pub use crate::error::{CurveError, MathError};
pub use crate::fee_curve::{CurvePoint, FeeCurve, SATURATION_VOLATILITY, evaluate};
pub use crate::math::Q64x64;
pub use crate::value_objects::{CurveParameters, Fee, FeedRef, MAX_FEE, PoolId, VolatilityReading};
