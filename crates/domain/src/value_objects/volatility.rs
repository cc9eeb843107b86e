use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A volatility reading as published by a feed.
///
/// `value` is a signed integer scaled by the feed's decimal precision;
/// `updated_at` is the publication time in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityReading {
    pub value: i128,
    pub updated_at: u64,
}

impl VolatilityReading {
    pub fn new(value: i128, updated_at: u64) -> Self {
        Self { value, updated_at }
    }

    /// Scales a human readable reading (e.g. `12.5` for 12.5%) into feed
    /// units, truncating extra precision.
    pub fn from_decimal(d: Decimal, decimals: u8, updated_at: u64) -> Option<Self> {
        let multiplier =
            Decimal::try_from_i128_with_scale(10i128.checked_pow(u32::from(decimals))?, 0).ok()?;
        let value = d.checked_mul(multiplier)?.trunc().to_i128()?;
        Some(Self { value, updated_at })
    }

    /// The reading in human readable units, `None` if it does not fit a
    /// `Decimal`.
    pub fn to_decimal(&self, decimals: u8) -> Option<Decimal> {
        Decimal::try_from_i128_with_scale(self.value, u32::from(decimals)).ok()
    }

    /// Seconds elapsed between publication and `now`, zero for readings
    /// stamped in the future.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.updated_at)
    }
}
