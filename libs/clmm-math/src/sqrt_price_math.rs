use clmm_types::{PoolError, Q96};
use primitive_types::U256;

use crate::full_math::{
    div_rounding_up_u256, mul_div, mul_div_rounding_up, mul_div_rounding_up_u256, mul_div_u256,
    u128_from_u256,
};

fn sorted(sqrt_ratio_a_x96: u128, sqrt_ratio_b_x96: u128) -> (u128, u128) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// Calculate amount0 delta for a price move from sqrt_ratio_a to sqrt_ratio_b
/// delta_x = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, PoolError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if sqrt_ratio_lower == 0 {
        return Err(PoolError::Overflow);
    }

    // L << 96 needs up to 224 bits
    let numerator1 = U256::from(liquidity) << 96;
    let numerator2 = U256::from(sqrt_ratio_upper - sqrt_ratio_lower);
    let upper = U256::from(sqrt_ratio_upper);
    let lower = U256::from(sqrt_ratio_lower);

    let amount = if round_up {
        div_rounding_up_u256(mul_div_rounding_up_u256(numerator1, numerator2, upper)?, lower)?
    } else {
        mul_div_u256(numerator1, numerator2, upper)? / lower
    };
    u128_from_u256(amount)
}

/// Calculate amount1 delta for a price move from sqrt_ratio_a to sqrt_ratio_b
/// delta_y = L * (sqrt_pb - sqrt_pa)
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128, PoolError> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if round_up {
        mul_div_rounding_up(liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
    } else {
        mul_div(liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
    }
}

/// Get next sqrt price after adding `amount_in` of the input token
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: u128,
    liquidity: u128,
    amount_in: u128,
    zero_for_one: bool,
) -> Result<u128, PoolError> {
    if sqrt_price_x96 == 0 || liquidity == 0 {
        return Err(PoolError::InsufficientLiquidity);
    }

    // Round so the price never passes the target for the given input
    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Get next sqrt price after removing `amount_out` of the output token
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: u128,
    liquidity: u128,
    amount_out: u128,
    zero_for_one: bool,
) -> Result<u128, PoolError> {
    if sqrt_price_x96 == 0 || liquidity == 0 {
        return Err(PoolError::InsufficientLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// sqrt_price_next = L * sqrt_price / (L +- amount * sqrt_price), rounded up
fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128, PoolError> {
    if amount == 0 {
        return Ok(sqrt_price_x96);
    }

    let numerator1 = U256::from(liquidity) << 96;
    let price = U256::from(sqrt_price_x96);
    let product = U256::from(amount).full_mul(price);

    if add {
        // amount * price < 2^256 always, only the sum can overflow
        let product = crate::full_math::u256_from_u512(product)?;
        match numerator1.checked_add(product) {
            Some(denominator) => {
                u128_from_u256(mul_div_rounding_up_u256(numerator1, price, denominator)?)
            }
            None => {
                // ceil(L / (L / sqrt_price + amount)) keeps precision loss on the safe side
                let denominator = (numerator1 / price)
                    .checked_add(U256::from(amount))
                    .ok_or(PoolError::Overflow)?;
                u128_from_u256(div_rounding_up_u256(numerator1, denominator)?)
            }
        }
    } else {
        let product = crate::full_math::u256_from_u512(product)?;
        if product >= numerator1 {
            return Err(PoolError::InsufficientLiquidity);
        }
        let denominator = numerator1 - product;
        u128_from_u256(mul_div_rounding_up_u256(numerator1, price, denominator)?)
    }
}

/// sqrt_price_next = sqrt_price +- amount / L, rounded down
fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128, PoolError> {
    let shifted = U256::from(amount) << 96;
    let liquidity = U256::from(liquidity);
    let price = U256::from(sqrt_price_x96);

    if add {
        let quotient = shifted / liquidity;
        let next = price.checked_add(quotient).ok_or(PoolError::Overflow)?;
        u128_from_u256(next)
    } else {
        let quotient = div_rounding_up_u256(shifted, liquidity)?;
        if price <= quotient {
            return Err(PoolError::InsufficientLiquidity);
        }
        u128_from_u256(price - quotient)
    }
}
