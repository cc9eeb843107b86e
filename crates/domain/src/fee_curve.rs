//! Sigmoid fee curve.
//!
//! Maps a volatility reading to a fee inside `[lower_fee, upper_fee]`:
//!
//! ```text
//! fee = lower + (upper - lower) / (1 + e^(-steepness * (volatility - midpoint)))
//! ```
//!
//! Volatility is expressed in whole units (percent) once normalized by the
//! feed's decimal precision. Zero volatility returns `lower_fee` and anything
//! at or above [`SATURATION_VOLATILITY`] returns `upper_fee`, both exactly.

use crate::error::CurveError;
use crate::math::fixed_point::Q64x64;
use crate::math::sigmoid::logistic;
use crate::value_objects::curve_parameters::CurveParameters;
use crate::value_objects::fee::Fee;
use serde::Serialize;

/// Normalized volatility (100%) at which the curve returns `upper_fee`.
pub const SATURATION_VOLATILITY: Q64x64 = Q64x64::from_int(100);

/// Highest feed precision accepted by [`FeeCurve::new`].
pub const MAX_FEED_DECIMALS: u8 = 18;

const SATURATION_UNITS: i128 = 100;

/// Evaluates the curve for an already normalized volatility.
///
/// Negative volatility is treated like zero. The result is truncated toward
/// zero and always lies in `[lower_fee, upper_fee]`.
pub fn evaluate(volatility: Q64x64, params: &CurveParameters) -> Fee {
    let lower = params.lower_fee();
    let upper = params.upper_fee();

    if volatility >= SATURATION_VOLATILITY {
        return upper;
    }
    if volatility.is_zero() || volatility.is_negative() {
        return lower;
    }

    let z = match volatility
        .checked_sub(params.midpoint())
        .and_then(|centered| centered.checked_mul(params.steepness()))
    {
        Some(z) => z,
        // Only reachable with extreme parameters; the sign decides the bound.
        None if volatility > params.midpoint() => return upper,
        None => return lower,
    };

    let range = Q64x64::from_int(i64::from(upper.value() - lower.value()));
    let offset = range
        .checked_mul(logistic(z))
        .map_or(0, |scaled| u32::try_from(scaled.to_int()).unwrap_or(0));

    Fee::new(lower.value().saturating_add(offset).min(upper.value()))
}

/// One sample of the curve, in raw feed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurvePoint {
    pub reading: i128,
    pub fee: Fee,
}

/// A [`CurveParameters`] set bound to the decimal precision of its feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCurve {
    params: CurveParameters,
    decimals: u8,
    scale: i128,
    saturation_reading: i128,
}

impl FeeCurve {
    /// # Errors
    /// Returns [`CurveError::UnsupportedDecimals`] above
    /// [`MAX_FEED_DECIMALS`].
    pub fn new(params: CurveParameters, decimals: u8) -> Result<Self, CurveError> {
        if decimals > MAX_FEED_DECIMALS {
            return Err(CurveError::UnsupportedDecimals(decimals));
        }
        let scale = 10i128.pow(u32::from(decimals));
        Ok(Self {
            params,
            decimals,
            scale,
            saturation_reading: scale * SATURATION_UNITS,
        })
    }

    pub fn params(&self) -> &CurveParameters {
        &self.params
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Raw reading at and above which the fee is `upper_fee`.
    pub fn saturation_reading(&self) -> i128 {
        self.saturation_reading
    }

    /// Fee for a raw feed value scaled by `10^decimals`.
    pub fn fee_for_reading(&self, reading: i128) -> Fee {
        if reading <= 0 {
            return self.params.lower_fee();
        }
        if reading >= self.saturation_reading {
            return self.params.upper_fee();
        }
        // reading < 100 * scale, so the quotient always fits.
        match Q64x64::from_ratio(reading, self.scale) {
            Ok(volatility) => evaluate(volatility, &self.params),
            Err(_) => self.params.upper_fee(),
        }
    }

    /// Samples the curve from `start` to `end` (inclusive) every `step` raw
    /// units. A non-positive step yields no points.
    pub fn sweep(&self, start: i128, end: i128, step: i128) -> Vec<CurvePoint> {
        if step <= 0 {
            return Vec::new();
        }
        let mut points = Vec::new();
        let mut reading = start;
        while reading <= end {
            points.push(CurvePoint {
                reading,
                fee: self.fee_for_reading(reading),
            });
            reading = match reading.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        points
    }
}
