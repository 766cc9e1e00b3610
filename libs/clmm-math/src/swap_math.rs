use clmm_types::{FeeBps, PoolError, FEE_DENOMINATOR};

use crate::full_math::{mul_div, mul_div_rounding_up};
use crate::sqrt_price_math::{
    get_amount0_delta, get_amount1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};

/// Result of a single swap step computation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapStep {
    /// The sqrt price after this step
    pub sqrt_ratio_next_x96: u128,
    /// Amount of input token consumed, excluding the fee
    pub amount_in: u128,
    /// Amount of output token produced
    pub amount_out: u128,
    /// Fee amount taken from input
    pub fee_amount: u128,
}

/// Compute the result of swapping within a single tick range
///
/// # Arguments
/// * `sqrt_ratio_current_x96` - Current sqrt price
/// * `sqrt_ratio_target_x96` - Target sqrt price (next tick boundary or price limit)
/// * `liquidity` - Available liquidity in this range
/// * `amount_remaining` - Remaining amount to swap (positive = exact input, negative = exact output)
/// * `fee` - Fee in basis points of the input amount
pub fn compute_swap_step(
    sqrt_ratio_current_x96: u128,
    sqrt_ratio_target_x96: u128,
    liquidity: u128,
    amount_remaining: i128,
    fee: FeeBps,
) -> Result<SwapStep, PoolError> {
    if fee >= FEE_DENOMINATOR {
        return Err(PoolError::InvalidFee);
    }

    let zero_for_one = sqrt_ratio_current_x96 >= sqrt_ratio_target_x96;
    let exact_in = amount_remaining >= 0;
    let amount_remaining_abs = amount_remaining.unsigned_abs();
    let fee = fee as u128;
    let denominator = FEE_DENOMINATOR as u128;

    let sqrt_ratio_next_x96: u128;
    let mut amount_in: u128 = 0;
    let mut amount_out: u128 = 0;

    if exact_in {
        let amount_remaining_less_fee =
            mul_div(amount_remaining_abs, denominator - fee, denominator)?;

        amount_in = if zero_for_one {
            get_amount0_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, true)?
        } else {
            get_amount1_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, true)?
        };

        sqrt_ratio_next_x96 = if amount_remaining_less_fee >= amount_in {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?
        };
    } else {
        amount_out = if zero_for_one {
            get_amount1_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, false)?
        } else {
            get_amount0_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, false)?
        };

        sqrt_ratio_next_x96 = if amount_remaining_abs >= amount_out {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_output(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_abs,
                zero_for_one,
            )?
        };
    }

    let max = sqrt_ratio_target_x96 == sqrt_ratio_next_x96;

    // Recompute whichever side was not pinned by reaching the target
    if zero_for_one {
        if !max || !exact_in {
            amount_in =
                get_amount0_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, true)?;
        }
        if !max || exact_in {
            amount_out =
                get_amount1_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, false)?;
        }
    } else {
        if !max || !exact_in {
            amount_in =
                get_amount1_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, true)?;
        }
        if !max || exact_in {
            amount_out =
                get_amount0_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, false)?;
        }
    }

    // Cap output at remaining for exact output swaps
    if !exact_in && amount_out > amount_remaining_abs {
        amount_out = amount_remaining_abs;
    }

    let fee_amount = if exact_in && sqrt_ratio_next_x96 != sqrt_ratio_target_x96 {
        // Didn't reach target, so the remainder is the fee
        amount_remaining_abs - amount_in
    } else {
        mul_div_rounding_up(amount_in, fee, denominator - fee)?
    };

    Ok(SwapStep {
        sqrt_ratio_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::get_sqrt_ratio_at_tick;
    use clmm_types::Q96;

    // === Exact input ===

    #[test]
    fn test_exact_in_one_for_zero_stays_below_target() {
        let current = Q96;
        let target = Q96 * 101 / 100;
        let liquidity = 1_000_000_000_000_000_000u128;

        let step = compute_swap_step(current, target, liquidity, 1_000_000_000, 30).unwrap();

        assert!(step.amount_in > 0);
        assert!(step.amount_out > 0);
        assert!(step.fee_amount > 0);
        assert!(step.sqrt_ratio_next_x96 > current);
        assert!(step.sqrt_ratio_next_x96 < target);
        // Whole input is used: amount in + fee
        assert_eq!(step.amount_in + step.fee_amount, 1_000_000_000);
    }

    #[test]
    fn test_exact_in_zero_for_one_reaches_target() {
        let current = Q96;
        let target = Q96 * 99 / 100;
        let liquidity = 1_000u128;

        let step = compute_swap_step(current, target, liquidity, 1_000_000, 30).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert!(step.amount_in + step.fee_amount < 1_000_000);
        assert!(step.amount_out > 0);
    }

    #[test]
    fn test_exact_in_scenario_step() {
        // 100 token0 into L = 1000 at tick 0 with 30 bps
        let current = get_sqrt_ratio_at_tick(0).unwrap();
        let target = get_sqrt_ratio_at_tick(-600).unwrap();

        let step = compute_swap_step(current, target, 1000, 100, 30).unwrap();

        // 100 * 0.997 = 99 usable, range holds only 31 token0
        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert_eq!(step.amount_in, 31);
        assert_eq!(step.fee_amount, 1);
        assert_eq!(step.amount_out, 29);
    }

    #[test]
    fn test_zero_fee_no_fee_amount() {
        let current = Q96;
        let target = Q96 * 99 / 100;
        let step =
            compute_swap_step(current, target, 1_000_000_000_000_000_000, 1_000_000, 0).unwrap();
        assert_eq!(step.fee_amount, 0);
        assert_eq!(step.amount_in, 1_000_000);
    }

    // === Exact output ===

    #[test]
    fn test_exact_out_partial() {
        let current = Q96;
        let target = Q96 * 99 / 100;
        let liquidity = 1_000_000_000_000_000_000u128;

        let step = compute_swap_step(current, target, liquidity, -1_000_000, 30).unwrap();

        assert_eq!(step.amount_out, 1_000_000);
        assert!(step.sqrt_ratio_next_x96 < current);
        assert!(step.sqrt_ratio_next_x96 > target);
        assert!(step.amount_in >= 1_000_000);
        assert!(step.fee_amount > 0);
    }

    #[test]
    fn test_exact_out_capped_at_range() {
        let current = Q96;
        let target = Q96 * 101 / 100;
        let liquidity = 1_000u128;

        let step = compute_swap_step(current, target, liquidity, -1_000_000, 30).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert!(step.amount_out < 1_000_000);
    }

    // === Edge cases ===

    #[test]
    fn test_zero_liquidity_moves_to_target() {
        let current = Q96;
        let target = Q96 * 99 / 100;
        let step = compute_swap_step(current, target, 0, 1_000, 30).unwrap();
        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert_eq!(step.amount_in, 0);
        assert_eq!(step.amount_out, 0);
        assert_eq!(step.fee_amount, 0);
    }

    #[test]
    fn test_target_equals_current() {
        let step = compute_swap_step(Q96, Q96, 1_000_000, 1_000, 30).unwrap();
        assert_eq!(step.sqrt_ratio_next_x96, Q96);
        assert_eq!(step.amount_in, 0);
        assert_eq!(step.amount_out, 0);
    }

    #[test]
    fn test_invalid_fee() {
        assert_eq!(
            compute_swap_step(Q96, Q96 / 2, 1_000, 1_000, FEE_DENOMINATOR),
            Err(PoolError::InvalidFee)
        );
    }
}
