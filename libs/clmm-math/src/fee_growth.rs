//! Q128.128 fee-growth arithmetic.
//!
//! Accumulators are stored on the host as `soroban_sdk::U256` and computed
//! with `primitive_types::U256`. Global accumulators only grow and add with
//! overflow checks; inside/outside differences wrap modulo 2^256 so that
//! snapshots taken on either side of a tick cancel out.

use clmm_types::PoolError;
use primitive_types::U256;
use soroban_sdk::{Bytes, Env};

use crate::full_math::{u128_from_u256, u256_from_u512};

/// Convert a host U256 into the arithmetic type
pub fn from_host(value: &soroban_sdk::U256) -> U256 {
    let mut buf = [0u8; 32];
    value.to_be_bytes().copy_into_slice(&mut buf);
    U256::from_big_endian(&buf)
}

/// Convert an arithmetic U256 back into a host value for storage
pub fn to_host(env: &Env, value: U256) -> soroban_sdk::U256 {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    soroban_sdk::U256::from_be_bytes(env, &Bytes::from_array(env, &buf))
}

/// Fee growth per unit of liquidity for `fee_amount`: floor(fee * 2^128 / L)
///
/// Returns zero when no liquidity is active, since there is nobody to credit.
pub fn growth_delta_x128(fee_amount: u128, liquidity: u128) -> U256 {
    if liquidity == 0 {
        return U256::zero();
    }
    (U256::from(fee_amount) << 128) / U256::from(liquidity)
}

/// Add to a global accumulator, failing on overflow
pub fn checked_add_growth(global: U256, delta: U256) -> Result<U256, PoolError> {
    global.checked_add(delta).ok_or(PoolError::Overflow)
}

/// Modular subtraction used for every inside/outside difference
pub fn wrapping_sub_growth(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

/// Fee growth inside [tick_lower, tick_upper) given the boundary ticks'
/// outside accumulators and the current tick
pub fn growth_inside(
    tick_current: i32,
    tick_lower: i32,
    tick_upper: i32,
    global: U256,
    lower_outside: U256,
    upper_outside: U256,
) -> U256 {
    let below = if tick_current >= tick_lower {
        lower_outside
    } else {
        wrapping_sub_growth(global, lower_outside)
    };
    let above = if tick_current < tick_upper {
        upper_outside
    } else {
        wrapping_sub_growth(global, upper_outside)
    };
    wrapping_sub_growth(wrapping_sub_growth(global, below), above)
}

/// Tokens earned by `liquidity` over a growth delta: floor(delta * L / 2^128)
pub fn fees_owed(growth_inside_delta: U256, liquidity: u128) -> Result<u128, PoolError> {
    let product = growth_inside_delta.full_mul(U256::from(liquidity)) >> 128;
    u128_from_u256(u256_from_u512(product)?)
}
