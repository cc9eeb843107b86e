use crate::math::fixed_point::Q64x64;

/// At or below this input the logistic value is below one part in 10^18.
const LOGISTIC_FLOOR: Q64x64 = Q64x64::from_int(-43);
/// At or above this input `e^-z` is below the smallest 64.64 step.
const LOGISTIC_CEILING: Q64x64 = Q64x64::from_int(45);

/// Logistic function `1 / (1 + e^-z)`, saturating to exactly `0` and `1`
/// outside `(-43, 45)`.
///
/// The result is always in `[0, 1]` and non-decreasing in `z`.
pub fn logistic(z: Q64x64) -> Q64x64 {
    if z <= LOGISTIC_FLOOR {
        return Q64x64::ZERO;
    }
    if z >= LOGISTIC_CEILING {
        return Q64x64::ONE;
    }

    // -z < 43, so e^-z + 1 stays below 2^63.
    z.checked_neg()
        .and_then(|neg| neg.exp().ok())
        .and_then(|e| e.checked_add(Q64x64::ONE))
        .and_then(|denominator| Q64x64::ONE.checked_div(denominator))
        .unwrap_or(Q64x64::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_midpoint() {
        assert_eq!(logistic(Q64x64::ZERO), Q64x64::from_ratio(1, 2).unwrap());
    }

    #[test]
    fn test_logistic_saturation() {
        assert_eq!(logistic(Q64x64::from_int(-43)), Q64x64::ZERO);
        assert_eq!(logistic(Q64x64::from_int(-1_000)), Q64x64::ZERO);
        assert_eq!(logistic(Q64x64::from_int(45)), Q64x64::ONE);
        assert_eq!(logistic(Q64x64::MAX), Q64x64::ONE);
    }

    #[test]
    fn test_logistic_near_edges() {
        let low = logistic(Q64x64::from_int(-42));
        assert!(low > Q64x64::ZERO);
        assert!(low < Q64x64::from_ratio(1, 1_000_000_000_000_000_000).unwrap());

        let high = logistic(Q64x64::from_int(44));
        assert!(high <= Q64x64::ONE);
        assert!(high > Q64x64::from_ratio(999_999, 1_000_000).unwrap());
    }

    #[test]
    fn test_logistic_symmetry() {
        // sigmoid(z) + sigmoid(-z) == 1, up to truncation
        let z = Q64x64::from_ratio(37, 10).unwrap();
        let sum = logistic(z)
            .checked_add(logistic(z.checked_neg().unwrap()))
            .unwrap();
        let diff = (Q64x64::ONE.to_bits() - sum.to_bits()).abs();
        assert!(diff < 1 << 8, "diff {diff}");
    }
}
