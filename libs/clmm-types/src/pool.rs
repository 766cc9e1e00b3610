use soroban_sdk::{contracttype, Address, Env, U256};

use crate::FeeBps;

/// Identity of a pool: canonically ordered token pair plus fee tier
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolKey {
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Fee tier in basis points
    pub fee: FeeBps,
}

impl PoolKey {
    /// Build a key from an unordered token pair
    pub fn sorted(token_a: Address, token_b: Address, fee: FeeBps) -> Self {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Self {
            token0,
            token1,
            fee,
        }
    }
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Fee tier in basis points
    pub fee: FeeBps,
    /// Tick spacing for this pool
    pub tick_spacing: i32,
    /// Maximum gross liquidity referencing a single tick
    pub max_liquidity_per_tick: u128,
}

/// Current pool state
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: u128,
    /// Current tick index
    pub tick: i32,
    /// Total liquidity currently in range
    pub liquidity: u128,
    /// Fee growth per unit of liquidity for token0 (Q128.128)
    pub fee_growth_global_0_x128: U256,
    /// Fee growth per unit of liquidity for token1 (Q128.128)
    pub fee_growth_global_1_x128: U256,
}

impl PoolState {
    pub fn new(env: &Env, sqrt_price_x96: u128, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            liquidity: 0,
            fee_growth_global_0_x128: U256::from_u32(env, 0),
            fee_growth_global_1_x128: U256::from_u32(env, 0),
        }
    }
}
