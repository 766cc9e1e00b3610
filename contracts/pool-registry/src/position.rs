use crate::storage::{get_position, remove_position, set_position};
use clmm_math::add_delta;
use clmm_math::fee_growth::{fees_owed, from_host, to_host, wrapping_sub_growth};
use clmm_types::{PoolError, PositionInfo, PositionKey};
use primitive_types::U256;
use soroban_sdk::Env;

pub fn get(env: &Env, pool_id: u32, key: &PositionKey) -> Option<PositionInfo> {
    get_position(env, pool_id, key)
}

pub fn get_or_create(env: &Env, pool_id: u32, key: &PositionKey) -> PositionInfo {
    get_position(env, pool_id, key).unwrap_or_else(|| PositionInfo::new(env))
}

pub fn store(env: &Env, pool_id: u32, key: &PositionKey, info: &PositionInfo) {
    set_position(env, pool_id, key, info);
}

pub fn remove(env: &Env, pool_id: u32, key: &PositionKey) {
    remove_position(env, pool_id, key);
}

/// Credit fees accrued since the last snapshot, apply the liquidity delta
/// and move the snapshot to the current fee growth inside.
pub fn update_liquidity(
    env: &Env,
    position: &mut PositionInfo,
    liquidity_delta: i128,
    fee_growth_inside_0_x128: U256,
    fee_growth_inside_1_x128: U256,
) -> Result<(), PoolError> {
    let liquidity_next = add_delta(position.liquidity, liquidity_delta)?;

    // Fees are earned by the liquidity held before this update
    let owed_0 = fees_owed(
        wrapping_sub_growth(
            fee_growth_inside_0_x128,
            from_host(&position.fee_growth_inside_0_last_x128),
        ),
        position.liquidity,
    )?;
    let owed_1 = fees_owed(
        wrapping_sub_growth(
            fee_growth_inside_1_x128,
            from_host(&position.fee_growth_inside_1_last_x128),
        ),
        position.liquidity,
    )?;

    position.tokens_owed_0 = position
        .tokens_owed_0
        .checked_add(owed_0)
        .ok_or(PoolError::Overflow)?;
    position.tokens_owed_1 = position
        .tokens_owed_1
        .checked_add(owed_1)
        .ok_or(PoolError::Overflow)?;
    position.liquidity = liquidity_next;
    position.fee_growth_inside_0_last_x128 = to_host(env, fee_growth_inside_0_x128);
    position.fee_growth_inside_1_last_x128 = to_host(env, fee_growth_inside_1_x128);

    Ok(())
}

/// Take up to the requested amounts out of the owed balances
pub fn collect(
    position: &mut PositionInfo,
    amount0_requested: u128,
    amount1_requested: u128,
) -> (u128, u128) {
    let amount0 = amount0_requested.min(position.tokens_owed_0);
    let amount1 = amount1_requested.min(position.tokens_owed_1);

    position.tokens_owed_0 -= amount0;
    position.tokens_owed_1 -= amount1;

    (amount0, amount1)
}
