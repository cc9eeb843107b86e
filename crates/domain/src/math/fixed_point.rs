//! Signed 64.64 fixed-point numbers.
//!
//! A [`Q64x64`] stores a rational number as an `i128` mantissa with 64
//! fractional bits, so `1.0` is `1 << 64`. Every operation is integer-only and
//! therefore bit-for-bit reproducible.
//!
//! # Rounding
//!
//! - `checked_mul`, `checked_div`, `from_ratio` and `to_int` truncate toward
//!   zero.
//! - `exp2` and `exp` truncate every intermediate product, so results are never
//!   above the true value by more than one unit in the last place.
//!
//! Wide intermediates are computed in `U256` so that no precision is lost
//! before the final shift.

use crate::error::MathError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const FRACTIONAL_BITS: u32 = 64;
const FRACTION_MASK: u128 = (1u128 << FRACTIONAL_BITS) - 1;

/// `log2(e)` in 64.64 representation.
const LOG2_E: i128 = 0x1_7154_7652_B82F_E177;

/// Smallest argument of `exp2` with a non-zero result.
const EXP2_MIN_ARG: i128 = -64 << FRACTIONAL_BITS;
/// Arguments of `exp2` from this value up overflow the representation.
const EXP2_MAX_ARG: i128 = 63 << FRACTIONAL_BITS;
/// Below `-45`, `e^x` is smaller than one unit in the last place.
const EXP_MIN_ARG: i128 = -45 << FRACTIONAL_BITS;
/// `e^43.6` is the largest power of `e` that still fits; stop short of it.
const EXP_MAX_ARG: i128 = 0x2B_9000_0000_0000_0000;

/// `2^(2^-i)` for `i` in `1..=64`, scaled by `2^127`.
const EXP2_FACTORS: [u128; 64] = [
    0xB504F333F9DE6484597D89B3754ABE9F,
    0x9837F0518DB8A96F46AD23182E42F6F6,
    0x8B95C1E3EA8BD6E6FBE4628758A53C90,
    0x85AAC367CC487B14C5C95B8C2154C1B2,
    0x82CD8698AC2BA1D73E2A475B46520BFF,
    0x8164D1F3BC0307737BE56527BD14DEF5,
    0x80B1ED4FD999AB6C25335719B6E6FD20,
    0x8058D7D2D5E5F6B094D589F608EE4AA2,
    0x802C6436D0E04F50FF8CE94A6797B3CE,
    0x8016302F174676283690DFE44D11D008,
    0x800B179C82028FD0945E54E2AE18F2F0,
    0x80058BAF7FEE3B5D1C718B38E549CB93,
    0x8002C5D00FDCFCB6B6566A58C048BE1F,
    0x800162E61BED4A48E84C2E1A463473DA,
    0x8000B17292F702A3AA22BEACCA949013,
    0x800058B92ABBAE02030C5FA5256F41FE,
    0x80002C5C8DADE4D71776C0F4DBEA67D6,
    0x8000162E44EAF636526BE456600BDBE5,
    0x80000B1721FA7C188307016C1CD4E8B7,
    0x8000058B90DE7E4CECFC487503488BB2,
    0x800002C5C8678F36CBFCE50A6DE60B14,
    0x80000162E431DB9F80B2347B5D62E516,
    0x800000B1721872D0C7B08CF1E0114153,
    0x80000058B90C1AA8A5C3736CB77E8E00,
    0x8000002C5C8605A4635F2EFC2362D978,
    0x800000162E4300E635CF4A109E3939BD,
    0x8000000B17217FF81BEF9C551590CF83,
    0x800000058B90BFDD4E39CD52C0CFA27D,
    0x80000002C5C85FE6F72D669E0E76E412,
    0x8000000162E42FF18F9AD35186D0DF28,
    0x80000000B17217F84CCE71AA0DCFFFE8,
    0x8000000058B90BFC07A77AD56ED22AAA,
    0x800000002C5C85FDFC23CDEAD40DA8D7,
    0x80000000162E42FEFC25EB1571853A66,
    0x800000000B17217F7D97F692BAACDED5,
    0x80000000058B90BFBEAD3B8B5DD254D8,
    0x8000000002C5C85FDF4EEDD62F084E68,
    0x800000000162E42FEFA58AEF378BF587,
    0x8000000000B17217F7D24A78A3C7EF03,
    0x800000000058B90BFBE9067C93E474A6,
    0x80000000002C5C85FDF47B8E5A72599F,
    0x8000000000162E42FEFA3BDB315934A3,
    0x80000000000B17217F7D1D7299B49C46,
    0x8000000000058B90BFBE8E9A8D1C4EA0,
    0x800000000002C5C85FDF4745969EA76F,
    0x80000000000162E42FEFA3A0DF5373C0,
    0x800000000000B17217F7D1CFF4AAC1E2,
    0x80000000000058B90BFBE8E7DB95A2F1,
    0x8000000000002C5C85FDF473E61AE1F9,
    0x800000000000162E42FEFA39F121751C,
    0x8000000000000B17217F7D1CF815BB96,
    0x800000000000058B90BFBE8E7BEC1E0D,
    0x80000000000002C5C85FDF473DEE5F17,
    0x8000000000000162E42FEFA39EF54390,
    0x80000000000000B17217F7D1CF7A26C9,
    0x8000000000000058B90BFBE8E7BCF4A5,
    0x800000000000002C5C85FDF473DE72A2,
    0x80000000000000162E42FEFA39EF3765,
    0x800000000000000B17217F7D1CF79B38,
    0x80000000000000058B90BFBE8E7BCD7D,
    0x8000000000000002C5C85FDF473DE6B7,
    0x800000000000000162E42FEFA39EF359,
    0x8000000000000000B17217F7D1CF79AC,
    0x800000000000000058B90BFBE8E7BCD6,
];

/// Signed 64.64 fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Q64x64(i128);

impl Q64x64 {
    /// `0.0`.
    pub const ZERO: Self = Self(0);
    /// `1.0`.
    pub const ONE: Self = Self(1 << FRACTIONAL_BITS);
    /// Largest representable value, just under `2^63`.
    pub const MAX: Self = Self(i128::MAX);

    /// Wraps a raw mantissa.
    #[must_use]
    pub const fn from_bits(bits: i128) -> Self {
        Self(bits)
    }

    /// Returns the raw mantissa.
    #[must_use]
    pub const fn to_bits(self) -> i128 {
        self.0
    }

    /// Converts a whole number.
    #[must_use]
    pub const fn from_int(value: i64) -> Self {
        Self((value as i128) << FRACTIONAL_BITS)
    }

    /// Computes `numerator / denominator`, truncated toward zero.
    ///
    /// # Errors
    /// Returns [`MathError::DivisionByZero`] for a zero denominator and
    /// [`MathError::Overflow`] if the quotient does not fit.
    pub fn from_ratio(numerator: i128, denominator: i128) -> Result<Self, MathError> {
        if denominator == 0 {
            return Err(MathError::DivisionByZero);
        }
        let magnitude = (U256::from(numerator.unsigned_abs()) << FRACTIONAL_BITS)
            / U256::from(denominator.unsigned_abs());
        Self::from_magnitude(magnitude, (numerator < 0) != (denominator < 0))
            .ok_or(MathError::Overflow)
    }

    /// Integer part, truncated toward zero.
    #[must_use]
    pub const fn to_int(self) -> i64 {
        if self.0 < 0 {
            -((self.0.unsigned_abs() >> FRACTIONAL_BITS) as i64)
        } else {
            (self.0 >> FRACTIONAL_BITS) as i64
        }
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    /// Multiplies, truncating toward zero.
    #[must_use]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let product = U256::from(self.0.unsigned_abs()) * U256::from(rhs.0.unsigned_abs());
        Self::from_magnitude(product >> FRACTIONAL_BITS, (self.0 < 0) != (rhs.0 < 0))
    }

    /// Divides, truncating toward zero. Returns `None` on a zero divisor or
    /// overflow.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        let quotient =
            (U256::from(self.0.unsigned_abs()) << FRACTIONAL_BITS) / U256::from(rhs.0.unsigned_abs());
        Self::from_magnitude(quotient, (self.0 < 0) != (rhs.0 < 0))
    }

    /// Binary exponent `2^self`.
    ///
    /// Results below the smallest representable step flush to zero.
    ///
    /// # Errors
    /// Returns [`MathError::Overflow`] when `self >= 63`.
    pub fn exp2(self) -> Result<Self, MathError> {
        if self.0 >= EXP2_MAX_ARG {
            return Err(MathError::Overflow);
        }
        if self.0 < EXP2_MIN_ARG {
            return Ok(Self::ZERO);
        }

        let whole = self.0 >> FRACTIONAL_BITS;
        let fraction = (self.0 as u128) & FRACTION_MASK;

        // 1.0 with 127 fractional bits; every factor is in [1, 2) so the
        // running product stays below 2^128.
        let mut result = U256::one() << 127;
        for (i, factor) in EXP2_FACTORS.iter().enumerate() {
            if fraction & (1u128 << (63 - i)) != 0 {
                result = (result * U256::from(*factor)) >> 127;
            }
        }

        // whole is in [-64, 62], so the shift is in [1, 127].
        let shift = (63 - whole) as u32;
        Ok(Self((result >> shift).low_u128() as i128))
    }

    /// Natural exponent `e^self`.
    ///
    /// # Errors
    /// Returns [`MathError::Overflow`] when the result would exceed
    /// [`Q64x64::MAX`].
    pub fn exp(self) -> Result<Self, MathError> {
        if self.0 < EXP_MIN_ARG {
            return Ok(Self::ZERO);
        }
        if self.0 > EXP_MAX_ARG {
            return Err(MathError::Overflow);
        }
        self.checked_mul(Self(LOG2_E))
            .ok_or(MathError::Overflow)?
            .exp2()
    }

    fn from_magnitude(magnitude: U256, negative: bool) -> Option<Self> {
        if magnitude > U256::from(i128::MAX as u128) {
            return None;
        }
        let value = magnitude.low_u128() as i128;
        Some(Self(if negative { -value } else { value }))
    }
}

impl From<i64> for Q64x64 {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl TryFrom<Decimal> for Q64x64 {
    type Error = MathError;

    /// Exact for decimals with at most 64 fractional bits of information,
    /// truncated toward zero otherwise.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_ratio(value.mantissa(), 10i128.pow(value.scale()))
    }
}

impl fmt::Display for Q64x64 {
    /// Prints the value with nine decimal places, truncated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude >> FRACTIONAL_BITS;
        let fraction = ((magnitude & FRACTION_MASK) * 1_000_000_000) >> FRACTIONAL_BITS;
        write!(f, "{sign}{whole}.{fraction:09}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Q64x64, expected_bits: i128, tolerance: i128) {
        let diff = (actual.to_bits() - expected_bits).abs();
        assert!(
            diff <= tolerance,
            "expected {expected_bits}, got {} (diff {diff})",
            actual.to_bits()
        );
    }

    #[test]
    fn test_from_int_and_back() {
        assert_eq!(Q64x64::from_int(7).to_int(), 7);
        assert_eq!(Q64x64::from_int(-7).to_int(), -7);
        assert_eq!(Q64x64::ONE, Q64x64::from_int(1));
    }

    #[test]
    fn test_to_int_truncates_toward_zero() {
        let minus_two_and_a_half = Q64x64::from_ratio(-5, 2).unwrap();
        assert_eq!(minus_two_and_a_half.to_int(), -2);

        let two_and_a_half = Q64x64::from_ratio(5, 2).unwrap();
        assert_eq!(two_and_a_half.to_int(), 2);
    }

    #[test]
    fn test_from_ratio() {
        let half = Q64x64::from_ratio(1, 2).unwrap();
        assert_eq!(half.to_bits(), 1 << 63);

        let third = Q64x64::from_ratio(-1, 3).unwrap();
        assert_eq!(third.to_bits(), -(((1u128 << 64) / 3) as i128));

        assert_eq!(Q64x64::from_ratio(1, 0), Err(MathError::DivisionByZero));
        assert_eq!(
            Q64x64::from_ratio(i128::MAX, 1),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_mul() {
        let a = Q64x64::from_int(3);
        let b = Q64x64::from_ratio(1, 2).unwrap();
        assert_eq!(a.checked_mul(b).unwrap(), Q64x64::from_ratio(3, 2).unwrap());

        let neg = Q64x64::from_int(-4);
        assert_eq!(neg.checked_mul(b).unwrap(), Q64x64::from_int(-2));

        assert!(Q64x64::MAX.checked_mul(Q64x64::from_int(2)).is_none());
    }

    #[test]
    fn test_mul_truncates_toward_zero() {
        let tiny = Q64x64::from_bits(1);
        let half = Q64x64::from_ratio(1, 2).unwrap();
        assert_eq!(tiny.checked_mul(half).unwrap(), Q64x64::ZERO);
        assert_eq!(tiny.checked_neg().unwrap().checked_mul(half).unwrap(), Q64x64::ZERO);
    }

    #[test]
    fn test_div() {
        let one = Q64x64::ONE;
        let two = Q64x64::from_int(2);
        assert_eq!(one.checked_div(two).unwrap().to_bits(), 1 << 63);
        assert_eq!(
            Q64x64::from_int(-9).checked_div(Q64x64::from_int(3)).unwrap(),
            Q64x64::from_int(-3)
        );
        assert!(one.checked_div(Q64x64::ZERO).is_none());
    }

    #[test]
    fn test_add_sub_overflow() {
        assert!(Q64x64::MAX.checked_add(Q64x64::ONE).is_none());
        assert_eq!(
            Q64x64::from_int(5).checked_sub(Q64x64::from_int(8)).unwrap(),
            Q64x64::from_int(-3)
        );
    }

    #[test]
    fn test_exp2_exact_powers() {
        assert_eq!(Q64x64::ZERO.exp2().unwrap(), Q64x64::ONE);
        assert_eq!(Q64x64::from_int(10).exp2().unwrap(), Q64x64::from_int(1024));
        assert_eq!(
            Q64x64::from_int(-1).exp2().unwrap(),
            Q64x64::from_ratio(1, 2).unwrap()
        );
    }

    #[test]
    fn test_exp2_half() {
        // sqrt(2) * 2^64
        let sqrt_two = Q64x64::from_ratio(1, 2).unwrap().exp2().unwrap();
        assert_close(sqrt_two, 26_087_635_650_665_564_424, 2);
    }

    #[test]
    fn test_exp2_bounds() {
        assert_eq!(Q64x64::from_int(63).exp2(), Err(MathError::Overflow));
        assert_eq!(Q64x64::from_int(-65).exp2().unwrap(), Q64x64::ZERO);
        assert!(Q64x64::from_int(62).exp2().is_ok());
    }

    #[test]
    fn test_exp() {
        assert_eq!(Q64x64::ZERO.exp().unwrap(), Q64x64::ONE);
        assert_close(Q64x64::ONE.exp().unwrap(), 50_143_449_209_799_256_682, 16);
        assert_close(
            Q64x64::from_int(-1).exp().unwrap(),
            6_786_177_901_268_885_274,
            16,
        );
        // e^8 carries ~13 bits of integer part, so the absolute error scales.
        assert_close(
            Q64x64::from_int(8).exp().unwrap(),
            54_988_969_081_439_155_412_736,
            1 << 16,
        );
    }

    #[test]
    fn test_exp_bounds() {
        assert_eq!(Q64x64::from_int(-46).exp().unwrap(), Q64x64::ZERO);
        assert_eq!(Q64x64::from_int(44).exp(), Err(MathError::Overflow));
        assert!(Q64x64::from_int(43).exp().is_ok());
    }

    #[test]
    fn test_exp_is_monotonic_around_zero() {
        let mut previous = Q64x64::from_int(-2).exp().unwrap();
        for step in -199..=200 {
            let x = Q64x64::from_ratio(step, 100).unwrap();
            let current = x.exp().unwrap();
            assert!(current >= previous, "exp decreased at {x}");
            previous = current;
        }
    }

    #[test]
    fn test_from_decimal() {
        use std::str::FromStr;

        let value = Q64x64::try_from(Decimal::from_str("2.5").unwrap()).unwrap();
        assert_eq!(value, Q64x64::from_ratio(5, 2).unwrap());

        let negative = Q64x64::try_from(Decimal::from_str("-0.75").unwrap()).unwrap();
        assert_eq!(negative, Q64x64::from_ratio(-3, 4).unwrap());

        assert_eq!(Q64x64::try_from(Decimal::MAX), Err(MathError::Overflow));
    }

    #[test]
    fn test_display() {
        assert_eq!(Q64x64::from_ratio(5, 2).unwrap().to_string(), "2.500000000");
        assert_eq!(Q64x64::from_ratio(-1, 4).unwrap().to_string(), "-0.250000000");
    }
}
