use soroban_sdk::{contracttype, Env, U256};

/// Information stored for each initialized tick
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickInfo {
    /// Total liquidity referencing this tick
    pub liquidity_gross: u128,
    /// Net liquidity change when tick is crossed (+ when moving right)
    pub liquidity_net: i128,
    /// Fee growth per unit liquidity on the other side of this tick (token0)
    pub fee_growth_outside_0_x128: U256,
    /// Fee growth per unit liquidity on the other side of this tick (token1)
    pub fee_growth_outside_1_x128: U256,
    /// True if tick has been initialized
    pub initialized: bool,
}

impl TickInfo {
    pub fn new(env: &Env) -> Self {
        Self {
            liquidity_gross: 0,
            liquidity_net: 0,
            fee_growth_outside_0_x128: U256::from_u32(env, 0),
            fee_growth_outside_1_x128: U256::from_u32(env, 0),
            initialized: false,
        }
    }
}
