//! Error types for the domain crate.

use thiserror::Error;

/// Failures of the fixed-point arithmetic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// The result does not fit in the 64.64 representation.
    #[error("fixed-point overflow")]
    Overflow,
    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Invalid fee curve configuration, rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// The lower fee bound is not strictly below the upper one.
    #[error("lower fee {lower} must be strictly below upper fee {upper}")]
    InvalidFeeBounds { lower: u32, upper: u32 },
    /// The upper fee bound is above 100%.
    #[error("upper fee {0} exceeds the maximum of {max}", max = crate::value_objects::fee::MAX_FEE)]
    FeeAboveMaximum(u32),
    /// A negative steepness would invert the curve.
    #[error("steepness must be positive")]
    NonPositiveSteepness,
    /// The feed decimal scale cannot be represented.
    #[error("unsupported feed decimals: {0}")]
    UnsupportedDecimals(u8),
}
