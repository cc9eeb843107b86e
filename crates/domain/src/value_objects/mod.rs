pub mod curve_parameters;
pub mod fee;
pub mod identifiers;
pub mod volatility;

pub use curve_parameters::CurveParameters;
pub use fee::{Fee, MAX_FEE};
pub use identifiers::{FeedRef, PoolId};
pub use volatility::VolatilityReading;
