#![no_std]

mod error;
mod pool;
mod position;
mod tick;

pub use error::*;
pub use pool::*;
pub use position::*;
pub use tick::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited by u128 representation of the sqrt price
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
/// Limited by u128 representation of the sqrt price
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_RATIO: u128 = 18447090764788882728;

/// Maximum sqrt price (at MAX_TICK)
/// sqrt(1.0001^443636) * 2^96, bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Fee tiers are expressed in basis points of the input amount
pub const FEE_DENOMINATOR: u32 = 10_000;

/// Largest tick spacing a pool may be created with
pub const MAX_TICK_SPACING: i32 = 16384;

/// Fee tier in basis points (1e-4)
/// 5 = 0.05%, 30 = 0.3%, 100 = 1%
pub type FeeBps = u32;

/// Fee tiers enabled when the registry is initialized, with their
/// recommended tick spacing
pub const DEFAULT_FEE_TIERS: [(FeeBps, i32); 3] = [(5, 10), (30, 60), (100, 200)];

/// Calculate maximum liquidity per tick for a given tick spacing
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}

/// Validate a tick spacing against the protocol bounds
pub fn tick_spacing_valid(tick_spacing: i32) -> bool {
    tick_spacing > 0 && tick_spacing <= MAX_TICK_SPACING
}
