use clmm_types::{PoolConfig, PoolState};
use soroban_sdk::{Address, Env, Symbol};

pub fn fee_tier_enabled(env: &Env, fee: u32, tick_spacing: i32) {
    env.events().publish(
        (Symbol::new(env, "fee_tier_enabled"),),
        (fee, tick_spacing),
    );
}

pub fn pool_created(env: &Env, pool_id: u32, config: &PoolConfig, state: &PoolState) {
    env.events().publish(
        (Symbol::new(env, "pool_created"), pool_id),
        (
            config.token0.clone(),
            config.token1.clone(),
            config.fee,
            config.tick_spacing,
            state.sqrt_price_x96,
            state.tick,
        ),
    );
}

pub fn mint(
    env: &Env,
    pool_id: u32,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amounts: (u128, u128),
) {
    env.events().publish(
        (Symbol::new(env, "mint"), pool_id, owner.clone()),
        (tick_lower, tick_upper, liquidity, amounts.0, amounts.1),
    );
}

pub fn burn(
    env: &Env,
    pool_id: u32,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amounts: (u128, u128),
) {
    env.events().publish(
        (Symbol::new(env, "burn"), pool_id, owner.clone()),
        (tick_lower, tick_upper, liquidity, amounts.0, amounts.1),
    );
}

pub fn collect(
    env: &Env,
    pool_id: u32,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    amounts: (u128, u128),
) {
    env.events().publish(
        (Symbol::new(env, "collect"), pool_id, owner.clone()),
        (tick_lower, tick_upper, amounts.0, amounts.1),
    );
}

pub fn swap(env: &Env, pool_id: u32, recipient: &Address, amounts: (i128, i128), state: &PoolState) {
    env.events().publish(
        (Symbol::new(env, "swap"), pool_id, recipient.clone()),
        (
            amounts.0,
            amounts.1,
            state.sqrt_price_x96,
            state.liquidity,
            state.tick,
        ),
    );
}

pub fn position_pruned(env: &Env, pool_id: u32, owner: &Address, tick_lower: i32, tick_upper: i32) {
    env.events().publish(
        (Symbol::new(env, "position_pruned"), pool_id, owner.clone()),
        (tick_lower, tick_upper),
    );
}
