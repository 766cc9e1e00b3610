use clmm_types::PoolError;
use primitive_types::{U256, U512};

/// Narrow a 256-bit value to u128, failing on overflow
pub fn u128_from_u256(value: U256) -> Result<u128, PoolError> {
    if value.bits() > 128 {
        return Err(PoolError::Overflow);
    }
    Ok(value.low_u128())
}

/// Narrow a 512-bit value to 256 bits, failing on overflow
pub fn u256_from_u512(value: U512) -> Result<U256, PoolError> {
    if value.bits() > 256 {
        return Err(PoolError::Overflow);
    }
    Ok(U256([value.0[0], value.0[1], value.0[2], value.0[3]]))
}

/// floor(a * b / denominator) with a 512-bit intermediate product
pub fn mul_div_u256(a: U256, b: U256, denominator: U256) -> Result<U256, PoolError> {
    if denominator.is_zero() {
        return Err(PoolError::Overflow);
    }
    let product = a.full_mul(b);
    u256_from_u512(product / U512::from(denominator))
}

/// ceil(a * b / denominator) with a 512-bit intermediate product
pub fn mul_div_rounding_up_u256(a: U256, b: U256, denominator: U256) -> Result<U256, PoolError> {
    if denominator.is_zero() {
        return Err(PoolError::Overflow);
    }
    let product = a.full_mul(b);
    let denominator = U512::from(denominator);
    let (quotient, remainder) = product.div_mod(denominator);
    let quotient = u256_from_u512(quotient)?;
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient.checked_add(U256::one()).ok_or(PoolError::Overflow)
    }
}

/// ceil(a / b) for 256-bit operands
pub fn div_rounding_up_u256(a: U256, b: U256) -> Result<U256, PoolError> {
    if b.is_zero() {
        return Err(PoolError::Overflow);
    }
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        // quotient < a whenever b > 1, and b == 1 leaves no remainder
        Ok(quotient + U256::one())
    }
}

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, PoolError> {
    let result = mul_div_u256(U256::from(a), U256::from(b), U256::from(denominator))?;
    u128_from_u256(result)
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(a: u128, b: u128, denominator: u128) -> Result<u128, PoolError> {
    let result =
        mul_div_rounding_up_u256(U256::from(a), U256::from(b), U256::from(denominator))?;
    u128_from_u256(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === mul_div tests ===

    #[test]
    fn test_mul_div_basic() {
        assert_eq!(mul_div(10, 20, 5), Ok(40));
    }

    #[test]
    fn test_mul_div_max_values() {
        // (MAX * MAX) / MAX = MAX needs the wide intermediate
        let max = u128::MAX;
        assert_eq!(mul_div(max, max, max), Ok(max));
    }

    #[test]
    fn test_mul_div_rounds_down() {
        assert_eq!(mul_div(1, 1, 2), Ok(0));
        assert_eq!(mul_div(3, 1, 2), Ok(1));
        assert_eq!(mul_div(5, 1, 3), Ok(1));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(mul_div(10, 20, 0), Err(PoolError::Overflow));
        assert_eq!(mul_div_rounding_up(10, 20, 0), Err(PoolError::Overflow));
    }

    #[test]
    fn test_mul_div_result_overflow() {
        // 2^127 * 4 / 1 does not fit in u128
        assert_eq!(mul_div(1u128 << 127, 4, 1), Err(PoolError::Overflow));
    }

    #[test]
    fn test_phantom_overflow_scenario() {
        // a * b overflows u128 but the result fits
        let q64 = 1u128 << 64;
        assert_eq!(mul_div(q64 * 3, q64 * 2, q64), Ok(q64 * 6));
    }

    // === mul_div_rounding_up tests ===

    #[test]
    fn test_mul_div_rounding_up_vs_down_difference() {
        // 77 / 13 = 5.92
        assert_eq!(mul_div(7, 11, 13), Ok(5));
        assert_eq!(mul_div_rounding_up(7, 11, 13), Ok(6));
        assert_eq!(mul_div_rounding_up(10, 20, 5), Ok(40));
    }

    #[test]
    fn test_mul_div_rounding_up_at_u128_ceiling() {
        // Exact MAX result does not round past the ceiling
        assert_eq!(mul_div_rounding_up(u128::MAX, 3, 3), Ok(u128::MAX));
        // MAX * 2 / 3 is fine, MAX * 2 / 1 is not
        assert!(mul_div_rounding_up(u128::MAX, 2, 3).is_ok());
        assert_eq!(mul_div_rounding_up(u128::MAX, 2, 1), Err(PoolError::Overflow));
    }

    // === 256-bit variants ===

    #[test]
    fn test_mul_div_u256_wide_operands() {
        // (2^224 * 2^100) / 2^200 = 2^124
        let a = U256::one() << 224;
        let b = U256::one() << 100;
        let d = U256::one() << 200;
        assert_eq!(mul_div_u256(a, b, d), Ok(U256::one() << 124));
    }

    #[test]
    fn test_mul_div_u256_rejects_wide_result() {
        let a = U256::MAX;
        assert_eq!(mul_div_u256(a, a, U256::one()), Err(PoolError::Overflow));
    }

    #[test]
    fn test_div_rounding_up_u256() {
        assert_eq!(div_rounding_up_u256(U256::from(10), U256::from(3)), Ok(U256::from(4)));
        assert_eq!(div_rounding_up_u256(U256::from(9), U256::from(3)), Ok(U256::from(3)));
        assert_eq!(div_rounding_up_u256(U256::MAX, U256::one()), Ok(U256::MAX));
        assert_eq!(
            div_rounding_up_u256(U256::one(), U256::zero()),
            Err(PoolError::Overflow)
        );
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(u128_from_u256(U256::from(u128::MAX)), Ok(u128::MAX));
        assert_eq!(
            u128_from_u256(U256::from(u128::MAX) + U256::one()),
            Err(PoolError::Overflow)
        );
        assert_eq!(u256_from_u512(U512::from(U256::MAX)), Ok(U256::MAX));
        assert_eq!(
            u256_from_u512(U512::from(U256::MAX) + U512::one()),
            Err(PoolError::Overflow)
        );
    }
}
