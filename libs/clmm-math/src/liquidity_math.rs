use clmm_types::PoolError;

use crate::sqrt_price_math::{get_amount0_delta, get_amount1_delta};

/// Add signed liquidity delta to unsigned liquidity
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, PoolError> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(PoolError::InsufficientLiquidity)
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(PoolError::Overflow)
    }
}

/// Token amounts represented by `liquidity` over [sqrt_ratio_a, sqrt_ratio_b)
/// at the current price.
///
/// Below the range the position is all token0, above it all token1, and
/// inside it splits at the current price. `round_up` is used when the pool
/// is receiving tokens.
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u128, u128), PoolError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    };

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        let amount0 =
            get_amount0_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Ok((amount0, 0))
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let amount0 = get_amount0_delta(sqrt_ratio_x96, sqrt_ratio_upper, liquidity, round_up)?;
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_x96, liquidity, round_up)?;
        Ok((amount0, amount1))
    } else {
        let amount1 =
            get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, round_up)?;
        Ok((0, amount1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::get_sqrt_ratio_at_tick;

    #[test]
    fn test_add_delta() {
        assert_eq!(add_delta(100, 50), Ok(150));
        assert_eq!(add_delta(100, -50), Ok(50));
        assert_eq!(add_delta(100, -100), Ok(0));
        assert_eq!(add_delta(0, 0), Ok(0));
    }

    #[test]
    fn test_add_delta_underflow() {
        assert_eq!(add_delta(100, -101), Err(PoolError::InsufficientLiquidity));
        assert_eq!(add_delta(0, i128::MIN), Err(PoolError::InsufficientLiquidity));
    }

    #[test]
    fn test_add_delta_overflow() {
        assert_eq!(add_delta(u128::MAX, 1), Err(PoolError::Overflow));
        assert_eq!(add_delta(u128::MAX - 1, 1), Ok(u128::MAX));
    }

    #[test]
    fn test_amounts_in_range() {
        let current = get_sqrt_ratio_at_tick(0).unwrap();
        let lower = get_sqrt_ratio_at_tick(-600).unwrap();
        let upper = get_sqrt_ratio_at_tick(600).unwrap();

        assert_eq!(
            get_amounts_for_liquidity(current, lower, upper, 1000, true),
            Ok((30, 30))
        );
        assert_eq!(
            get_amounts_for_liquidity(current, lower, upper, 1000, false),
            Ok((29, 29))
        );
    }

    #[test]
    fn test_amounts_below_range_all_token0() {
        let current = get_sqrt_ratio_at_tick(-1200).unwrap();
        let lower = get_sqrt_ratio_at_tick(-600).unwrap();
        let upper = get_sqrt_ratio_at_tick(600).unwrap();

        let (amount0, amount1) =
            get_amounts_for_liquidity(current, lower, upper, 1_000_000, true).unwrap();
        assert!(amount0 > 0);
        assert_eq!(amount1, 0);
    }

    #[test]
    fn test_amounts_above_range_all_token1() {
        let current = get_sqrt_ratio_at_tick(600).unwrap();
        let lower = get_sqrt_ratio_at_tick(-600).unwrap();
        let upper = get_sqrt_ratio_at_tick(600).unwrap();

        // Price exactly at the upper bound is out of range
        let (amount0, amount1) =
            get_amounts_for_liquidity(current, lower, upper, 1_000_000, true).unwrap();
        assert_eq!(amount0, 0);
        assert!(amount1 > 0);
    }
}
