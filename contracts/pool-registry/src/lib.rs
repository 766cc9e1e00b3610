#![no_std]

mod events;
mod invariants;
mod liquidity;
mod position;
mod storage;
mod swap;
mod tick;


use clmm_math::get_tick_at_sqrt_ratio;
use clmm_types::{
    max_liquidity_per_tick, tick_spacing_valid, FeeBps, PoolConfig, PoolError, PoolKey, PoolState,
    PositionInfo, PositionKey, TickInfo, DEFAULT_FEE_TIERS, FEE_DENOMINATOR,
};
use soroban_sdk::{contract, contractimpl, log, token, Address, Env};
use storage::{
    extend_instance_ttl, get_admin, get_fee_tier, get_pool_config, get_pool_count, get_pool_id,
    get_pool_state, get_position, get_tick, has_admin, set_admin, set_fee_tier, set_pool_config,
    set_pool_count, set_pool_id, set_pool_state,
};

#[contract]
pub struct PoolRegistry;

#[contractimpl]
impl PoolRegistry {
    /// Initialize the registry with an admin and the default fee tiers
    pub fn initialize(env: Env, admin: Address) -> Result<(), PoolError> {
        if has_admin(&env) {
            return Err(PoolError::AlreadyInitialized);
        }

        admin.require_auth();

        set_admin(&env, &admin);
        for (fee, tick_spacing) in DEFAULT_FEE_TIERS {
            set_fee_tier(&env, fee, tick_spacing);
        }
        set_pool_count(&env, 0);

        Ok(())
    }

    /// Enable a new fee tier with its recommended tick spacing
    pub fn enable_fee_tier(env: Env, fee: FeeBps, tick_spacing: i32) -> Result<(), PoolError> {
        let admin = get_admin(&env)?;
        admin.require_auth();

        if fee >= FEE_DENOMINATOR || get_fee_tier(&env, fee).is_some() {
            return Err(PoolError::InvalidFee);
        }
        if !tick_spacing_valid(tick_spacing) {
            return Err(PoolError::InvalidTickSpacing);
        }

        set_fee_tier(&env, fee, tick_spacing);
        events::fee_tier_enabled(&env, fee, tick_spacing);

        Ok(())
    }

    /// Get the recommended tick spacing of an enabled fee tier
    pub fn fee_tier_tick_spacing(env: Env, fee: FeeBps) -> Option<i32> {
        get_fee_tier(&env, fee)
    }

    /// Create a pool for a token pair and fee tier
    ///
    /// # Arguments
    /// * `token_a`, `token_b` - Pool tokens in any order
    /// * `fee` - An enabled fee tier in basis points
    /// * `initial_sqrt_price_x96` - Starting sqrt price of token1 in token0 (Q64.96)
    /// * `tick_spacing` - Spacing that position bounds must be multiples of
    ///
    /// # Returns
    /// The new pool id
    pub fn create_pool(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: FeeBps,
        initial_sqrt_price_x96: u128,
        tick_spacing: i32,
    ) -> Result<u32, PoolError> {
        get_admin(&env)?;

        if token_a == token_b {
            return Err(PoolError::IdenticalTokens);
        }
        if get_fee_tier(&env, fee).is_none() {
            return Err(PoolError::FeeTierNotEnabled);
        }
        if !tick_spacing_valid(tick_spacing) {
            return Err(PoolError::InvalidTickSpacing);
        }

        let tick = get_tick_at_sqrt_ratio(initial_sqrt_price_x96)?;

        let key = PoolKey::sorted(token_a, token_b, fee);
        if get_pool_id(&env, &key.token0, &key.token1, key.fee).is_some() {
            return Err(PoolError::PoolExists);
        }

        let pool_id = get_pool_count(&env);
        let config = PoolConfig {
            token0: key.token0,
            token1: key.token1,
            fee,
            tick_spacing,
            max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
        };
        let state = PoolState::new(&env, initial_sqrt_price_x96, tick);

        set_pool_config(&env, pool_id, &config);
        set_pool_state(&env, pool_id, &state);
        set_pool_id(&env, &config.token0, &config.token1, fee, pool_id);
        set_pool_count(&env, pool_id + 1);

        debug_assert!(pool_invariants_hold(&state));

        log!(&env, "pool created", pool_id, fee, tick_spacing, tick);
        events::pool_created(&env, pool_id, &config, &state);

        Ok(pool_id)
    }

    /// Add liquidity to a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts paid in by the owner
    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        env: Env,
        pool_id: u32,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        amount0_min: u128,
        amount1_min: u128,
    ) -> Result<(u128, u128), PoolError> {
        owner.require_auth();
        let amounts = liquidity::mint(
            &env,
            pool_id,
            owner,
            tick_lower,
            tick_upper,
            liquidity,
            amount0_min,
            amount1_min,
        )?;
        debug_assert!(pool_invariants_hold(&get_pool_state(&env, pool_id)?));
        Ok(amounts)
    }

    /// Remove liquidity from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts credited to the position's owed balances
    #[allow(clippy::too_many_arguments)]
    pub fn burn(
        env: Env,
        pool_id: u32,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        amount0_min: u128,
        amount1_min: u128,
    ) -> Result<(u128, u128), PoolError> {
        owner.require_auth();
        let amounts = liquidity::burn(
            &env,
            pool_id,
            owner,
            tick_lower,
            tick_upper,
            liquidity,
            amount0_min,
            amount1_min,
        )?;
        debug_assert!(pool_invariants_hold(&get_pool_state(&env, pool_id)?));
        Ok(amounts)
    }

    /// Collect owed tokens from a position
    ///
    /// # Returns
    /// (amount0, amount1) - Token amounts paid out to the owner
    pub fn collect(
        env: Env,
        pool_id: u32,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError> {
        owner.require_auth();
        liquidity::collect(
            &env,
            pool_id,
            owner,
            tick_lower,
            tick_upper,
            amount0_requested,
            amount1_requested,
        )
    }

    /// Execute a swap
    ///
    /// # Arguments
    /// * `recipient` - Address that pays the input and receives the output
    /// * `zero_for_one` - True if swapping token0 for token1
    /// * `amount_specified` - Positive for exact input, negative for exact output
    /// * `sqrt_price_limit_x96` - Price limit for the swap, 0 for none
    ///
    /// # Returns
    /// (amount0, amount1) - Negative values are amounts paid out
    pub fn swap(
        env: Env,
        pool_id: u32,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: u128,
    ) -> Result<(i128, i128), PoolError> {
        recipient.require_auth();
        let amounts = swap::execute_swap(
            &env,
            pool_id,
            recipient,
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
        )?;
        debug_assert!(pool_invariants_hold(&get_pool_state(&env, pool_id)?));
        Ok(amounts)
    }

    /// Remove an empty position (admin only)
    pub fn prune_position(
        env: Env,
        pool_id: u32,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(), PoolError> {
        let admin = get_admin(&env)?;
        admin.require_auth();
        liquidity::prune(&env, pool_id, owner, tick_lower, tick_upper)
    }

    // === View Functions ===

    /// Get current pool state
    pub fn get_pool_state(env: Env, pool_id: u32) -> Result<PoolState, PoolError> {
        get_pool_state(&env, pool_id)
    }

    /// Get pool configuration
    pub fn get_pool_config(env: Env, pool_id: u32) -> Result<PoolConfig, PoolError> {
        get_pool_config(&env, pool_id)
    }

    /// Get position info
    pub fn get_position(
        env: Env,
        pool_id: u32,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Option<PositionInfo> {
        let key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        get_position(&env, pool_id, &key)
    }

    /// Get tick info, if the tick is referenced by any position
    pub fn get_tick(env: Env, pool_id: u32, tick: i32) -> Option<TickInfo> {
        get_tick(&env, pool_id, tick)
    }

    /// Get the pool id for a token pair and fee tier
    pub fn get_pool_id(env: Env, token_a: Address, token_b: Address, fee: FeeBps) -> Option<u32> {
        let key = PoolKey::sorted(token_a, token_b, fee);
        get_pool_id(&env, &key.token0, &key.token1, key.fee)
    }

    /// Get total number of pools created
    pub fn pool_count(env: Env) -> u32 {
        get_pool_count(&env)
    }

    /// Get admin address
    pub fn get_admin(env: Env) -> Result<Address, PoolError> {
        extend_instance_ttl(&env);
        get_admin(&env)
    }
}

/// Move `amount` of `token` between two addresses; zero is a no-op
pub(crate) fn transfer_token(env: &Env, token: &Address, from: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        token::Client::new(env, token).transfer(from, to, &amount);
    }
}

/// Price and tick invariants every pool state must satisfy
fn pool_invariants_hold(state: &PoolState) -> bool {
    invariants::price_in_bounds(state)
        && invariants::tick_in_bounds(state)
        && invariants::tick_matches_price(state)
        && invariants::tick_consistent_with_price(state)
}
