// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Pure predicates over pool, tick and swap values. The entry points assert
// them in debug builds after every mutating operation and the scenario
// tests check them directly.
//
// INVARIANT CATEGORIES:
//
// 1. PRICE INVARIANTS
//    - Price and tick stay within the supported domain
//    - Tick is the floor tick of the sqrt price
//
// 2. LIQUIDITY INVARIANTS
//    - Tick gross liquidity respects the per-tick ceiling
//    - liquidity_net sums to zero across a pool's ticks
//
// 3. FEE INVARIANTS
//    - Global fee growth never decreases
//
// 4. SWAP INVARIANTS
//    - Price moves in the trade direction and stops at the limit
//    - The two legs of a swap have opposite signs
//
// 5. TICK INVARIANTS
//    - Initialized ticks sit on the pool spacing
//    - Position ranges are ordered
//
// ============================================================================

use clmm_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use clmm_types::{PoolState, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use primitive_types::U256;

// ============================================================================
// PRICE INVARIANTS
// ============================================================================

/// Invariant: sqrt price is within the supported domain
///
/// Property:
///   MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO
pub fn price_in_bounds(state: &PoolState) -> bool {
    state.sqrt_price_x96 >= MIN_SQRT_RATIO && state.sqrt_price_x96 < MAX_SQRT_RATIO
}

/// Invariant: tick is within valid bounds
///
/// Property:
///   MIN_TICK <= tick <= MAX_TICK
pub fn tick_in_bounds(state: &PoolState) -> bool {
    state.tick >= MIN_TICK && state.tick <= MAX_TICK
}

/// Invariant: tick brackets the sqrt price
///
/// Property:
///   sqrt_price(tick) <= sqrt_price_x96 <= sqrt_price(tick + 1)
///
/// The upper edge is inclusive: a downward swap that stops exactly on an
/// initialized boundary leaves the tick one below it.
pub fn tick_matches_price(state: &PoolState) -> bool {
    let (Ok(lower), Ok(upper)) = (
        get_sqrt_ratio_at_tick(state.tick),
        get_sqrt_ratio_at_tick(state.tick + 1),
    ) else {
        return false;
    };
    lower <= state.sqrt_price_x96 && state.sqrt_price_x96 <= upper
}

/// Invariant: tick is the floor tick of the price, or one below it
///
/// Property:
///   tick == get_tick_at_sqrt_ratio(p) || tick == get_tick_at_sqrt_ratio(p) - 1
pub fn tick_consistent_with_price(state: &PoolState) -> bool {
    match get_tick_at_sqrt_ratio(state.sqrt_price_x96) {
        Ok(computed) => state.tick == computed || state.tick == computed - 1,
        Err(_) => false,
    }
}

// ============================================================================
// LIQUIDITY INVARIANTS
// ============================================================================

/// Invariant: max liquidity per tick is respected
///
/// Property:
///   tick.liquidity_gross <= config.max_liquidity_per_tick
pub fn tick_liquidity_bounded(tick_liquidity_gross: u128, max_liquidity_per_tick: u128) -> bool {
    tick_liquidity_gross <= max_liquidity_per_tick
}

/// Invariant: liquidity_net sums to zero across all ticks of a pool
///
/// Property:
///   sum(tick.liquidity_net) == 0
///
/// Every range adds at its lower tick exactly what it removes at its upper.
/// Needs every tick of a pool, so only the scenario tests evaluate it.
#[cfg_attr(not(test), allow(dead_code))]
pub fn liquidity_net_sums_to_zero<I>(liquidity_nets: I) -> bool
where
    I: IntoIterator<Item = i128>,
{
    let mut total: i128 = 0;
    for net in liquidity_nets {
        match total.checked_add(net) {
            Some(sum) => total = sum,
            None => return false,
        }
    }
    total == 0
}

// ============================================================================
// FEE INVARIANTS
// ============================================================================

/// Invariant: global fee growth is monotonically nondecreasing
///
/// Property:
///   fee_growth_global_new >= fee_growth_global_old
///
/// Global accumulators add with overflow checks and never wrap.
pub fn fee_growth_monotonic(old_fee_growth: U256, new_fee_growth: U256) -> bool {
    new_fee_growth >= old_fee_growth
}

// ============================================================================
// SWAP INVARIANTS
// ============================================================================

/// Invariant: swap direction consistency
///
/// Property:
///   - zero_for_one => price decreases (sqrt_price_after <= sqrt_price_before)
///   - !zero_for_one => price increases (sqrt_price_after >= sqrt_price_before)
pub fn swap_direction_consistent(
    zero_for_one: bool,
    sqrt_price_before: u128,
    sqrt_price_after: u128,
) -> bool {
    if zero_for_one {
        sqrt_price_after <= sqrt_price_before
    } else {
        sqrt_price_after >= sqrt_price_before
    }
}

/// Invariant: swap respects price limit
///
/// Property:
///   - zero_for_one => sqrt_price_after >= sqrt_price_limit
///   - !zero_for_one => sqrt_price_after <= sqrt_price_limit
pub fn swap_respects_limit(
    zero_for_one: bool,
    sqrt_price_after: u128,
    sqrt_price_limit: u128,
) -> bool {
    if zero_for_one {
        sqrt_price_after >= sqrt_price_limit
    } else {
        sqrt_price_after <= sqrt_price_limit
    }
}

/// Invariant: the amounts of a swap never flow the same way
///
/// Property:
///   - One of amount0/amount1 is paid in (positive), the other paid out
///   - Either may be zero on a partial or empty fill
pub fn swap_amounts_opposite_signs(amount0: i128, amount1: i128) -> bool {
    !(amount0 > 0 && amount1 > 0) && !(amount0 < 0 && amount1 < 0)
}

// ============================================================================
// TICK INVARIANTS
// ============================================================================

/// Invariant: tick is on spacing
///
/// Property:
///   tick % tick_spacing == 0
pub fn tick_on_spacing(tick: i32, tick_spacing: i32) -> bool {
    tick % tick_spacing == 0
}

/// Invariant: tick_lower < tick_upper for a position
pub fn tick_range_valid(tick_lower: i32, tick_upper: i32) -> bool {
    tick_lower < tick_upper
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    fn state_at(env: &Env, sqrt_price_x96: u128, tick: i32) -> PoolState {
        PoolState::new(env, sqrt_price_x96, tick)
    }

    #[test]
    fn test_price_in_bounds() {
        let env = Env::default();
        assert!(price_in_bounds(&state_at(&env, 1 << 96, 0)));
        assert!(price_in_bounds(&state_at(&env, MIN_SQRT_RATIO, MIN_TICK)));
        assert!(!price_in_bounds(&state_at(&env, MIN_SQRT_RATIO - 1, MIN_TICK)));
        assert!(!price_in_bounds(&state_at(&env, MAX_SQRT_RATIO, MAX_TICK)));
    }

    #[test]
    fn test_tick_in_bounds() {
        let env = Env::default();
        assert!(tick_in_bounds(&state_at(&env, 1 << 96, 0)));
        assert!(tick_in_bounds(&state_at(&env, 1 << 96, MAX_TICK)));
        assert!(!tick_in_bounds(&state_at(&env, 1 << 96, MIN_TICK - 1)));
    }

    #[test]
    fn test_tick_matches_price() {
        let env = Env::default();
        let at_zero = 1u128 << 96;
        let at_one = get_sqrt_ratio_at_tick(1).unwrap();

        assert!(tick_matches_price(&state_at(&env, at_zero, 0)));
        assert!(tick_matches_price(&state_at(&env, at_zero + 1, 0)));
        // Stopped exactly on a boundary while moving down
        assert!(tick_matches_price(&state_at(&env, at_zero, -1)));
        assert!(tick_matches_price(&state_at(&env, at_one, 0)));
        assert!(!tick_matches_price(&state_at(&env, at_zero, 1)));
        assert!(!tick_matches_price(&state_at(&env, at_zero, -2)));
    }

    #[test]
    fn test_tick_consistent_with_price() {
        let env = Env::default();
        let at_sixty = get_sqrt_ratio_at_tick(60).unwrap();
        assert!(tick_consistent_with_price(&state_at(&env, at_sixty, 60)));
        assert!(tick_consistent_with_price(&state_at(&env, at_sixty, 59)));
        assert!(!tick_consistent_with_price(&state_at(&env, at_sixty, 61)));
        assert!(!tick_consistent_with_price(&state_at(&env, at_sixty, 0)));
    }

    #[test]
    fn test_tick_liquidity_bounded() {
        assert!(tick_liquidity_bounded(100, 100));
        assert!(!tick_liquidity_bounded(101, 100));
    }

    #[test]
    fn test_liquidity_net_sums_to_zero() {
        assert!(liquidity_net_sums_to_zero([0i128; 0]));
        assert!(liquidity_net_sums_to_zero([1000, 500, -1000, -500]));
        assert!(!liquidity_net_sums_to_zero([1000, -999]));
        assert!(!liquidity_net_sums_to_zero([i128::MAX, 1, -1]));
    }

    #[test]
    fn test_fee_growth_monotonic() {
        let q128 = U256::one() << 128;
        assert!(fee_growth_monotonic(U256::zero(), q128));
        assert!(fee_growth_monotonic(q128, q128));
        assert!(!fee_growth_monotonic(q128, q128 - 1));
    }

    #[test]
    fn test_swap_direction_consistent() {
        // Zero for one - price should decrease
        assert!(swap_direction_consistent(true, 1000, 900));
        assert!(swap_direction_consistent(true, 1000, 1000)); // No change OK
        assert!(!swap_direction_consistent(true, 1000, 1100));

        // One for zero - price should increase
        assert!(swap_direction_consistent(false, 1000, 1100));
        assert!(swap_direction_consistent(false, 1000, 1000));
        assert!(!swap_direction_consistent(false, 1000, 900));
    }

    #[test]
    fn test_swap_respects_limit() {
        assert!(swap_respects_limit(true, 500, 400));
        assert!(swap_respects_limit(true, 400, 400)); // At limit
        assert!(!swap_respects_limit(true, 300, 400));

        assert!(swap_respects_limit(false, 500, 600));
        assert!(swap_respects_limit(false, 600, 600));
        assert!(!swap_respects_limit(false, 700, 600));
    }

    #[test]
    fn test_swap_amounts_opposite_signs() {
        assert!(swap_amounts_opposite_signs(100, -50));
        assert!(swap_amounts_opposite_signs(-100, 50));
        assert!(swap_amounts_opposite_signs(0, 0)); // No fill
        assert!(swap_amounts_opposite_signs(100, 0)); // Fee-only step
        assert!(!swap_amounts_opposite_signs(100, 100));
        assert!(!swap_amounts_opposite_signs(-100, -100));
    }

    #[test]
    fn test_tick_on_spacing() {
        assert!(tick_on_spacing(120, 60));
        assert!(tick_on_spacing(-60, 60));
        assert!(!tick_on_spacing(65, 60));
    }

    #[test]
    fn test_tick_range_valid() {
        assert!(tick_range_valid(-100, 100));
        assert!(!tick_range_valid(100, 100));
        assert!(!tick_range_valid(100, -100));
    }
}
