use crate::error::CurveError;
use crate::math::fixed_point::Q64x64;
use crate::value_objects::fee::{Fee, MAX_FEE};
use serde::Serialize;

/// Steepness used when none (or zero) is supplied.
pub const DEFAULT_STEEPNESS: Q64x64 = Q64x64::from_int(2);
/// Midpoint, in whole volatility units, used when none (or zero) is supplied.
pub const DEFAULT_MIDPOINT: Q64x64 = Q64x64::from_int(5);

/// Immutable parameters of the sigmoid fee curve.
///
/// Construction guarantees `lower_fee < upper_fee <= MAX_FEE` and a positive
/// steepness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveParameters {
    lower_fee: Fee,
    upper_fee: Fee,
    steepness: Q64x64,
    midpoint: Q64x64,
}

impl CurveParameters {
    /// Validates and builds a parameter set. A zero `steepness` or `midpoint`
    /// selects the default value.
    ///
    /// # Errors
    /// Returns a [`CurveError`] if the fee bounds are inverted or equal, the
    /// upper bound exceeds [`MAX_FEE`], or the steepness is negative.
    pub fn new(
        lower_fee: Fee,
        upper_fee: Fee,
        steepness: Q64x64,
        midpoint: Q64x64,
    ) -> Result<Self, CurveError> {
        if lower_fee >= upper_fee {
            return Err(CurveError::InvalidFeeBounds {
                lower: lower_fee.value(),
                upper: upper_fee.value(),
            });
        }
        if upper_fee.value() > MAX_FEE {
            return Err(CurveError::FeeAboveMaximum(upper_fee.value()));
        }
        if steepness.is_negative() {
            return Err(CurveError::NonPositiveSteepness);
        }

        Ok(Self {
            lower_fee,
            upper_fee,
            steepness: if steepness.is_zero() {
                DEFAULT_STEEPNESS
            } else {
                steepness
            },
            midpoint: if midpoint.is_zero() {
                DEFAULT_MIDPOINT
            } else {
                midpoint
            },
        })
    }

    /// Curve with the default steepness and midpoint.
    pub fn with_defaults(lower_fee: Fee, upper_fee: Fee) -> Result<Self, CurveError> {
        Self::new(lower_fee, upper_fee, Q64x64::ZERO, Q64x64::ZERO)
    }

    /// Convenience constructor taking whole-number steepness and midpoint.
    pub fn from_integers(
        lower_fee: u32,
        upper_fee: u32,
        steepness: i64,
        midpoint: i64,
    ) -> Result<Self, CurveError> {
        Self::new(
            Fee::new(lower_fee),
            Fee::new(upper_fee),
            Q64x64::from_int(steepness),
            Q64x64::from_int(midpoint),
        )
    }

    pub fn lower_fee(&self) -> Fee {
        self.lower_fee
    }

    pub fn upper_fee(&self) -> Fee {
        self.upper_fee
    }

    pub fn steepness(&self) -> Q64x64 {
        self.steepness
    }

    pub fn midpoint(&self) -> Q64x64 {
        self.midpoint
    }
}
