use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee units per 100%: one unit is a hundredth of a basis point.
pub const MAX_FEE: u32 = 1_000_000;

/// Trading fee in hundredths of a basis point (3000 = 0.30%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fee(u32);

impl Fee {
    pub const ZERO: Self = Self(0);

    pub const fn new(hundredths_bps: u32) -> Self {
        Self(hundredths_bps)
    }

    pub fn from_bps(bps: u32) -> Self {
        Self(bps.saturating_mul(100))
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The fee as a percentage, e.g. `0.3` for 3000.
    pub fn to_percentage(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }
}

impl From<u32> for Fee {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fee_percentage() {
        let fee = Fee::new(3000);
        assert_eq!(fee.to_percentage(), Decimal::from_str("0.3").unwrap());
        assert_eq!(fee.to_string(), "0.3%");
        assert_eq!(Fee::new(MAX_FEE).to_percentage(), Decimal::from(100));
    }

    #[test]
    fn test_fee_from_bps() {
        assert_eq!(Fee::from_bps(30), Fee::new(3000));
        assert_eq!(Fee::from_bps(u32::MAX).value(), u32::MAX);
    }

    #[test]
    fn test_fee_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Fee::new(6500)).unwrap(), "6500");
        let fee: Fee = serde_json::from_str("10000").unwrap();
        assert_eq!(fee, Fee::new(10000));
    }
}
