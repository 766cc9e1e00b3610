use crate::storage::{get_pool_config, get_pool_state, set_pool_state};
use crate::{events, invariants, position, tick, transfer_token};
use clmm_math::{add_delta, get_amounts_for_liquidity, get_sqrt_ratio_at_tick};
use clmm_types::{
    PoolConfig, PoolError, PoolState, PositionInfo, PositionKey, TickInfo, MAX_TICK, MIN_TICK,
};
use soroban_sdk::{log, Address, Env};

/// Everything a liquidity change writes, computed before any write happens
struct PositionChange {
    key: PositionKey,
    position: PositionInfo,
    lower: TickInfo,
    upper: TickInfo,
    flipped_lower: bool,
    flipped_upper: bool,
    touches_ticks: bool,
    pool_liquidity: u128,
    amount0: u128,
    amount1: u128,
}

/// Mint (add) liquidity to a position
///
/// Amounts owed by the owner are rounded up.
#[allow(clippy::too_many_arguments)]
pub fn mint(
    env: &Env,
    pool_id: u32,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount0_min: u128,
    amount1_min: u128,
) -> Result<(u128, u128), PoolError> {
    let config = get_pool_config(env, pool_id)?;
    let mut state = get_pool_state(env, pool_id)?;

    validate_ticks(tick_lower, tick_upper, config.tick_spacing)?;

    if liquidity == 0 {
        return Err(PoolError::ZeroAmount);
    }
    let liquidity_delta = i128::try_from(liquidity).map_err(|_| PoolError::Overflow)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let existing = position::get_or_create(env, pool_id, &key);

    let change = modify_position(env, pool_id, &config, &state, key, existing, liquidity_delta)?;

    if change.amount0 < amount0_min || change.amount1 < amount1_min {
        return Err(PoolError::SlippageExceeded);
    }
    let amount0 = i128::try_from(change.amount0).map_err(|_| PoolError::Overflow)?;
    let amount1 = i128::try_from(change.amount1).map_err(|_| PoolError::Overflow)?;
    let amounts = (change.amount0, change.amount1);

    commit(env, pool_id, &config, &mut state, change)?;

    let contract_address = env.current_contract_address();
    transfer_token(env, &config.token0, &owner, &contract_address, amount0);
    transfer_token(env, &config.token1, &owner, &contract_address, amount1);

    events::mint(env, pool_id, &owner, tick_lower, tick_upper, liquidity, amounts);

    Ok(amounts)
}

/// Burn (remove) liquidity from a position
///
/// Released amounts are rounded down and credited to the position's owed
/// balances; `collect` pays them out. Burning zero liquidity credits
/// accrued fees only.
#[allow(clippy::too_many_arguments)]
pub fn burn(
    env: &Env,
    pool_id: u32,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount0_min: u128,
    amount1_min: u128,
) -> Result<(u128, u128), PoolError> {
    let config = get_pool_config(env, pool_id)?;
    let mut state = get_pool_state(env, pool_id)?;

    validate_ticks(tick_lower, tick_upper, config.tick_spacing)?;

    let liquidity_delta = i128::try_from(liquidity)
        .map(|delta| -delta)
        .map_err(|_| PoolError::Overflow)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let existing = position::get(env, pool_id, &key).ok_or(PoolError::PositionNotFound)?;

    let mut change =
        modify_position(env, pool_id, &config, &state, key, existing, liquidity_delta)?;

    if change.amount0 < amount0_min || change.amount1 < amount1_min {
        return Err(PoolError::SlippageExceeded);
    }

    change.position.tokens_owed_0 = change
        .position
        .tokens_owed_0
        .checked_add(change.amount0)
        .ok_or(PoolError::Overflow)?;
    change.position.tokens_owed_1 = change
        .position
        .tokens_owed_1
        .checked_add(change.amount1)
        .ok_or(PoolError::Overflow)?;
    let amounts = (change.amount0, change.amount1);

    commit(env, pool_id, &config, &mut state, change)?;

    events::burn(env, pool_id, &owner, tick_lower, tick_upper, liquidity, amounts);

    Ok(amounts)
}

/// Collect owed tokens from a position
///
/// Pays out min(requested, owed) per token. A position that was never
/// minted has nothing owed.
pub fn collect(
    env: &Env,
    pool_id: u32,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u128,
    amount1_requested: u128,
) -> Result<(u128, u128), PoolError> {
    let config = get_pool_config(env, pool_id)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let Some(mut info) = position::get(env, pool_id, &key) else {
        return Ok((0, 0));
    };

    let (amount0, amount1) = position::collect(&mut info, amount0_requested, amount1_requested);
    let transfer0 = i128::try_from(amount0).map_err(|_| PoolError::Overflow)?;
    let transfer1 = i128::try_from(amount1).map_err(|_| PoolError::Overflow)?;

    position::store(env, pool_id, &key, &info);

    let contract_address = env.current_contract_address();
    transfer_token(env, &config.token0, &contract_address, &owner, transfer0);
    transfer_token(env, &config.token1, &contract_address, &owner, transfer1);

    events::collect(env, pool_id, &owner, tick_lower, tick_upper, (amount0, amount1));

    Ok((amount0, amount1))
}

/// Remove a position that holds no liquidity and no owed tokens
pub fn prune(
    env: &Env,
    pool_id: u32,
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<(), PoolError> {
    get_pool_config(env, pool_id)?;

    let key = PositionKey {
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let info = position::get(env, pool_id, &key).ok_or(PoolError::PositionNotFound)?;
    if !info.is_empty() {
        return Err(PoolError::PositionNotEmpty);
    }

    position::remove(env, pool_id, &key);

    log!(env, "position pruned", pool_id, tick_lower, tick_upper);
    events::position_pruned(env, pool_id, &owner, tick_lower, tick_upper);

    Ok(())
}

/// Compute the tick, position and pool updates for a liquidity delta
fn modify_position(
    env: &Env,
    pool_id: u32,
    config: &PoolConfig,
    state: &PoolState,
    key: PositionKey,
    mut info: PositionInfo,
    liquidity_delta: i128,
) -> Result<PositionChange, PoolError> {
    let tick_lower = key.tick_lower;
    let tick_upper = key.tick_upper;

    let mut lower = tick::get_or_create(env, pool_id, tick_lower);
    let mut upper = tick::get_or_create(env, pool_id, tick_upper);

    let touches_ticks = liquidity_delta != 0;
    let (flipped_lower, flipped_upper) = if touches_ticks {
        let flipped_lower = tick::update(
            &mut lower,
            tick_lower,
            state.tick,
            liquidity_delta,
            &state.fee_growth_global_0_x128,
            &state.fee_growth_global_1_x128,
            false,
            config.max_liquidity_per_tick,
        )?;
        let flipped_upper = tick::update(
            &mut upper,
            tick_upper,
            state.tick,
            liquidity_delta,
            &state.fee_growth_global_0_x128,
            &state.fee_growth_global_1_x128,
            true,
            config.max_liquidity_per_tick,
        )?;
        (flipped_lower, flipped_upper)
    } else {
        (false, false)
    };

    let (fee_growth_inside_0, fee_growth_inside_1) = tick::get_fee_growth_inside(
        &lower,
        &upper,
        tick_lower,
        tick_upper,
        state.tick,
        &state.fee_growth_global_0_x128,
        &state.fee_growth_global_1_x128,
    );

    position::update_liquidity(
        env,
        &mut info,
        liquidity_delta,
        fee_growth_inside_0,
        fee_growth_inside_1,
    )?;

    // Only ranges covering the current tick are active
    let pool_liquidity = if state.tick >= tick_lower && state.tick < tick_upper {
        add_delta(state.liquidity, liquidity_delta)?
    } else {
        state.liquidity
    };

    let (amount0, amount1) = get_amounts_for_liquidity(
        state.sqrt_price_x96,
        get_sqrt_ratio_at_tick(tick_lower)?,
        get_sqrt_ratio_at_tick(tick_upper)?,
        liquidity_delta.unsigned_abs(),
        liquidity_delta > 0,
    )?;

    Ok(PositionChange {
        key,
        position: info,
        lower,
        upper,
        flipped_lower,
        flipped_upper,
        touches_ticks,
        pool_liquidity,
        amount0,
        amount1,
    })
}

/// Write a computed change to storage
fn commit(
    env: &Env,
    pool_id: u32,
    config: &PoolConfig,
    state: &mut PoolState,
    change: PositionChange,
) -> Result<(), PoolError> {
    let tick_lower = change.key.tick_lower;
    let tick_upper = change.key.tick_upper;

    if change.flipped_lower {
        tick::flip_tick(env, pool_id, tick_lower, config.tick_spacing)?;
    }
    if change.flipped_upper {
        tick::flip_tick(env, pool_id, tick_upper, config.tick_spacing)?;
    }
    if change.touches_ticks {
        tick::store(env, pool_id, tick_lower, &change.lower);
        tick::store(env, pool_id, tick_upper, &change.upper);
    }

    position::store(env, pool_id, &change.key, &change.position);

    if state.liquidity != change.pool_liquidity {
        state.liquidity = change.pool_liquidity;
        set_pool_state(env, pool_id, state);
    }

    debug_assert!(invariants::tick_liquidity_bounded(
        change.lower.liquidity_gross,
        config.max_liquidity_per_tick
    ));
    debug_assert!(invariants::tick_liquidity_bounded(
        change.upper.liquidity_gross,
        config.max_liquidity_per_tick
    ));

    Ok(())
}

/// Validate tick parameters
pub fn validate_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<(), PoolError> {
    if !invariants::tick_range_valid(tick_lower, tick_upper) {
        return Err(PoolError::InvalidRange);
    }
    if tick_lower < MIN_TICK || tick_upper > MAX_TICK {
        return Err(PoolError::TickOutOfBounds);
    }
    if !invariants::tick_on_spacing(tick_lower, tick_spacing)
        || !invariants::tick_on_spacing(tick_upper, tick_spacing)
    {
        return Err(PoolError::TickSpacingViolation);
    }
    Ok(())
}
