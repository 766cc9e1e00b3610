use clmm_types::{PoolError, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use primitive_types::U256;

use crate::full_math::u128_from_u256;

/// sqrt(1.0001^-(2^i)) in Q128.128, for i in 0..19
const SQRT_RATIO_MULTIPLIERS: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

/// Calculate sqrt(1.0001^tick) * 2^96
///
/// Bit-decomposes |tick|, multiplies the matching Q128 constants, inverts
/// for positive ticks and rounds the Q128 -> Q96 conversion up.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<u128, PoolError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(PoolError::TickOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(SQRT_RATIO_MULTIPLIERS[0])
    } else {
        U256::one() << 128
    };

    for (bit, multiplier) in SQRT_RATIO_MULTIPLIERS.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            // ratio <= 2^128 and multiplier < 2^128, so the product fits
            ratio = (ratio * U256::from(*multiplier)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let round_up = if (ratio & U256::from(u32::MAX)).is_zero() {
        U256::zero()
    } else {
        U256::one()
    };
    u128_from_u256((ratio >> 32) + round_up)
}

/// Get the greatest tick whose sqrt price is <= `sqrt_price_x96`
///
/// Accepts prices in [MIN_SQRT_RATIO, MAX_SQRT_RATIO).
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: u128) -> Result<i32, PoolError> {
    if !(MIN_SQRT_RATIO..MAX_SQRT_RATIO).contains(&sqrt_price_x96) {
        return Err(PoolError::TickOutOfBounds);
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK - 1;

    while low < high {
        // Upper midpoint so the loop always makes progress
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}
