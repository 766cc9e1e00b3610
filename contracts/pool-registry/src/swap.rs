use crate::storage::{
    get_pool_config, get_pool_state, set_pool_state, MAX_SWAP_STEPS, MAX_TICK_CROSSINGS_PER_SWAP,
};
use crate::tick::{cross, liquidity_net, next_initialized_tick_within_one_word};
use crate::{events, invariants, transfer_token};
use clmm_math::fee_growth::{checked_add_growth, from_host, growth_delta_x128, to_host};
use clmm_math::{add_delta, compute_swap_step, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use clmm_types::{PoolConfig, PoolError, PoolState, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use soroban_sdk::{contracttype, log, Address, Env, Vec, U256};

/// An initialized tick passed during a swap, with the global fee growth
/// at the moment the price reached it
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickCrossing {
    pub tick: i32,
    pub fee_growth_global_0_x128: U256,
    pub fee_growth_global_1_x128: U256,
}

/// Result of walking the price curve, before anything is written
#[derive(Clone, Debug)]
pub struct SwapOutcome {
    pub amount0: i128,
    pub amount1: i128,
    pub state: PoolState,
    pub crossings: Vec<TickCrossing>,
}

/// Resolve the caller's price limit and check it against the current price
///
/// Returns `None` when the limit equals the current price, which fills nothing.
fn resolve_price_limit(
    state: &PoolState,
    zero_for_one: bool,
    sqrt_price_limit_x96: u128,
) -> Result<Option<u128>, PoolError> {
    let limit = if sqrt_price_limit_x96 == 0 {
        if zero_for_one {
            MIN_SQRT_RATIO + 1
        } else {
            MAX_SQRT_RATIO - 1
        }
    } else {
        sqrt_price_limit_x96
    };

    if limit <= MIN_SQRT_RATIO || limit >= MAX_SQRT_RATIO {
        return Err(PoolError::InvalidPriceLimit);
    }
    if limit == state.sqrt_price_x96 {
        return Ok(None);
    }
    let wrong_side = if zero_for_one {
        limit > state.sqrt_price_x96
    } else {
        limit < state.sqrt_price_x96
    };
    if wrong_side {
        return Err(PoolError::InvalidPriceLimit);
    }

    Ok(Some(limit))
}

/// Walk the price curve for a swap without touching storage
///
/// Stops when the amount is used up, the price limit is reached,
/// MAX_TICK_CROSSINGS_PER_SWAP initialized ticks have been crossed or
/// MAX_SWAP_STEPS steps have been taken. All but the first are partial
/// fills, not errors.
pub fn compute_swap(
    env: &Env,
    pool_id: u32,
    config: &PoolConfig,
    state: &PoolState,
    zero_for_one: bool,
    amount_specified: i128,
    sqrt_price_limit_x96: u128,
) -> Result<SwapOutcome, PoolError> {
    if amount_specified == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let mut crossings = Vec::new(env);

    let Some(sqrt_price_limit) = resolve_price_limit(state, zero_for_one, sqrt_price_limit_x96)?
    else {
        return Ok(SwapOutcome {
            amount0: 0,
            amount1: 0,
            state: state.clone(),
            crossings,
        });
    };

    let exact_input = amount_specified > 0;

    // Swap state
    let mut amount_remaining = amount_specified;
    let mut amount_calculated: i128 = 0;
    let mut sqrt_price_x96 = state.sqrt_price_x96;
    let mut tick = state.tick;
    let mut liquidity = state.liquidity;
    let mut fee_growth_global_0 = from_host(&state.fee_growth_global_0_x128);
    let mut fee_growth_global_1 = from_host(&state.fee_growth_global_1_x128);

    let mut tick_crossings: u32 = 0;
    let mut steps: u32 = 0;

    while amount_remaining != 0
        && sqrt_price_x96 != sqrt_price_limit
        && tick_crossings < MAX_TICK_CROSSINGS_PER_SWAP
        && steps < MAX_SWAP_STEPS
    {
        steps += 1;
        let sqrt_price_start_x96 = sqrt_price_x96;

        let (tick_next, initialized) = next_initialized_tick_within_one_word(
            env,
            pool_id,
            tick,
            config.tick_spacing,
            zero_for_one,
        );
        let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
        let sqrt_price_next_x96 = get_sqrt_ratio_at_tick(tick_next)?;

        // Target the next tick unless the limit comes first
        let sqrt_ratio_target_x96 = if zero_for_one {
            sqrt_price_next_x96.max(sqrt_price_limit)
        } else {
            sqrt_price_next_x96.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            sqrt_price_x96,
            sqrt_ratio_target_x96,
            liquidity,
            amount_remaining,
            config.fee,
        )?;

        let amount_in_with_fee = step
            .amount_in
            .checked_add(step.fee_amount)
            .and_then(|amount| i128::try_from(amount).ok())
            .ok_or(PoolError::Overflow)?;
        let amount_out = i128::try_from(step.amount_out).map_err(|_| PoolError::Overflow)?;

        if exact_input {
            amount_remaining -= amount_in_with_fee;
            amount_calculated = amount_calculated
                .checked_sub(amount_out)
                .ok_or(PoolError::Overflow)?;
        } else {
            amount_remaining += amount_out;
            amount_calculated = amount_calculated
                .checked_add(amount_in_with_fee)
                .ok_or(PoolError::Overflow)?;
        }

        // Fees accrue to the input token
        if liquidity > 0 {
            let delta = growth_delta_x128(step.fee_amount, liquidity);
            if zero_for_one {
                fee_growth_global_0 = checked_add_growth(fee_growth_global_0, delta)?;
            } else {
                fee_growth_global_1 = checked_add_growth(fee_growth_global_1, delta)?;
            }
        }

        sqrt_price_x96 = step.sqrt_ratio_next_x96;

        if sqrt_price_x96 == sqrt_price_next_x96 {
            if initialized {
                crossings.push_back(TickCrossing {
                    tick: tick_next,
                    fee_growth_global_0_x128: to_host(env, fee_growth_global_0),
                    fee_growth_global_1_x128: to_host(env, fee_growth_global_1),
                });

                // Moving left crosses the tick right to left
                let net = liquidity_net(env, pool_id, tick_next);
                let net = if zero_for_one {
                    net.checked_neg().ok_or(PoolError::Overflow)?
                } else {
                    net
                };
                liquidity = add_delta(liquidity, net)?;

                tick_crossings += 1;
            }

            tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if sqrt_price_x96 != sqrt_price_start_x96 {
            tick = get_tick_at_sqrt_ratio(sqrt_price_x96)?;
        }
    }

    let filled = amount_specified - amount_remaining;
    let (amount0, amount1) = if zero_for_one == exact_input {
        (filled, amount_calculated)
    } else {
        (amount_calculated, filled)
    };

    let mut next_state = state.clone();
    next_state.sqrt_price_x96 = sqrt_price_x96;
    next_state.tick = tick;
    next_state.liquidity = liquidity;
    next_state.fee_growth_global_0_x128 = to_host(env, fee_growth_global_0);
    next_state.fee_growth_global_1_x128 = to_host(env, fee_growth_global_1);

    debug_assert!(invariants::swap_direction_consistent(
        zero_for_one,
        state.sqrt_price_x96,
        next_state.sqrt_price_x96
    ));
    debug_assert!(invariants::swap_respects_limit(
        zero_for_one,
        next_state.sqrt_price_x96,
        sqrt_price_limit
    ));
    debug_assert!(invariants::swap_amounts_opposite_signs(amount0, amount1));

    Ok(SwapOutcome {
        amount0,
        amount1,
        state: next_state,
        crossings,
    })
}

/// Write a computed swap: cross the recorded ticks, then store the state
fn apply(env: &Env, pool_id: u32, outcome: &SwapOutcome) {
    for crossing in outcome.crossings.iter() {
        cross(
            env,
            pool_id,
            crossing.tick,
            &crossing.fee_growth_global_0_x128,
            &crossing.fee_growth_global_1_x128,
        );
        log!(env, "tick crossed", pool_id, crossing.tick);
    }

    set_pool_state(env, pool_id, &outcome.state);
}

/// Execute a swap and settle both legs with the recipient
///
/// # Returns
/// (amount0, amount1) - positive amounts are paid in by the recipient,
/// negative amounts are paid out to it
pub fn execute_swap(
    env: &Env,
    pool_id: u32,
    recipient: Address,
    zero_for_one: bool,
    amount_specified: i128,
    sqrt_price_limit_x96: u128,
) -> Result<(i128, i128), PoolError> {
    let config = get_pool_config(env, pool_id)?;
    let state = get_pool_state(env, pool_id)?;

    let outcome = compute_swap(
        env,
        pool_id,
        &config,
        &state,
        zero_for_one,
        amount_specified,
        sqrt_price_limit_x96,
    )?;

    if outcome.state == state && outcome.amount0 == 0 && outcome.amount1 == 0 {
        return Ok((outcome.amount0, outcome.amount1));
    }

    apply(env, pool_id, &outcome);

    debug_assert!(invariants::price_in_bounds(&outcome.state));
    debug_assert!(invariants::tick_matches_price(&outcome.state));
    debug_assert!(invariants::fee_growth_monotonic(
        from_host(&state.fee_growth_global_0_x128),
        from_host(&outcome.state.fee_growth_global_0_x128)
    ));
    debug_assert!(invariants::fee_growth_monotonic(
        from_host(&state.fee_growth_global_1_x128),
        from_host(&outcome.state.fee_growth_global_1_x128)
    ));

    // Recipient pays the positive leg and receives the negative one
    let contract_address = env.current_contract_address();
    let (amount0, amount1) = (outcome.amount0, outcome.amount1);
    if amount0 > 0 {
        transfer_token(env, &config.token0, &recipient, &contract_address, amount0);
    }
    if amount1 > 0 {
        transfer_token(env, &config.token1, &recipient, &contract_address, amount1);
    }
    if amount0 < 0 {
        transfer_token(env, &config.token0, &contract_address, &recipient, -amount0);
    }
    if amount1 < 0 {
        transfer_token(env, &config.token1, &contract_address, &recipient, -amount1);
    }

    log!(
        env,
        "swap",
        pool_id,
        amount0,
        amount1,
        outcome.state.tick,
        outcome.crossings.len()
    );
    events::swap(env, pool_id, &recipient, (amount0, amount1), &outcome.state);

    Ok((amount0, amount1))
}
