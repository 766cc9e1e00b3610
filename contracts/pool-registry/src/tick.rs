use crate::storage::{get_tick, get_tick_bitmap_word, remove_tick, set_tick, set_tick_bitmap_word};
use clmm_math::add_delta;
use clmm_math::fee_growth::{from_host, growth_inside, to_host, wrapping_sub_growth};
use clmm_types::{PoolError, TickInfo};
use primitive_types::U256;
use soroban_sdk::Env;

/// Load a tick, or a fresh uninitialized one if the book has no entry
pub fn get_or_create(env: &Env, pool_id: u32, tick: i32) -> TickInfo {
    get_tick(env, pool_id, tick).unwrap_or_else(|| TickInfo::new(env))
}

/// Apply a liquidity delta to a tick held in memory.
/// Returns true if the tick was flipped (initialized or uninitialized).
///
/// On first initialization the outside accumulators are seeded with the
/// global values when the tick is at or below the current tick, which
/// assumes all growth so far happened below it.
#[allow(clippy::too_many_arguments)]
pub fn update(
    info: &mut TickInfo,
    tick: i32,
    tick_current: i32,
    liquidity_delta: i128,
    fee_growth_global_0_x128: &soroban_sdk::U256,
    fee_growth_global_1_x128: &soroban_sdk::U256,
    upper: bool,
    max_liquidity: u128,
) -> Result<bool, PoolError> {
    let liquidity_gross_before = info.liquidity_gross;
    let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

    if liquidity_gross_after > max_liquidity {
        return Err(PoolError::Overflow);
    }

    let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

    if liquidity_gross_before == 0 && tick <= tick_current {
        info.fee_growth_outside_0_x128 = fee_growth_global_0_x128.clone();
        info.fee_growth_outside_1_x128 = fee_growth_global_1_x128.clone();
    }

    // Lower ticks add liquidity when crossed left to right, upper ticks remove it
    let liquidity_net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(PoolError::Overflow)?;

    // Emptied ticks keep their outside accumulators; `store` removes them
    info.liquidity_gross = liquidity_gross_after;
    info.liquidity_net = liquidity_net;
    info.initialized = liquidity_gross_after > 0;

    Ok(flipped)
}

/// Persist a tick, clearing it from the book once nothing references it
pub fn store(env: &Env, pool_id: u32, tick: i32, info: &TickInfo) {
    if info.liquidity_gross == 0 {
        clear(env, pool_id, tick);
    } else {
        set_tick(env, pool_id, tick, info);
    }
}

/// Remove a tick from the book
pub fn clear(env: &Env, pool_id: u32, tick: i32) {
    remove_tick(env, pool_id, tick);
}

/// Net liquidity applied when crossing `tick` left to right
pub fn liquidity_net(env: &Env, pool_id: u32, tick: i32) -> i128 {
    get_tick(env, pool_id, tick).map_or(0, |info| info.liquidity_net)
}

/// Cross a tick during a swap.
/// Flips the outside accumulators and returns the net liquidity delta.
pub fn cross(
    env: &Env,
    pool_id: u32,
    tick: i32,
    fee_growth_global_0_x128: &soroban_sdk::U256,
    fee_growth_global_1_x128: &soroban_sdk::U256,
) -> i128 {
    let mut info = get_or_create(env, pool_id, tick);

    info.fee_growth_outside_0_x128 = to_host(
        env,
        wrapping_sub_growth(
            from_host(fee_growth_global_0_x128),
            from_host(&info.fee_growth_outside_0_x128),
        ),
    );
    info.fee_growth_outside_1_x128 = to_host(
        env,
        wrapping_sub_growth(
            from_host(fee_growth_global_1_x128),
            from_host(&info.fee_growth_outside_1_x128),
        ),
    );

    store(env, pool_id, tick, &info);

    info.liquidity_net
}

/// Fee growth inside [tick_lower, tick_upper) for both tokens
pub fn get_fee_growth_inside(
    lower: &TickInfo,
    upper: &TickInfo,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x128: &soroban_sdk::U256,
    fee_growth_global_1_x128: &soroban_sdk::U256,
) -> (U256, U256) {
    let inside_0 = growth_inside(
        tick_current,
        tick_lower,
        tick_upper,
        from_host(fee_growth_global_0_x128),
        from_host(&lower.fee_growth_outside_0_x128),
        from_host(&upper.fee_growth_outside_0_x128),
    );
    let inside_1 = growth_inside(
        tick_current,
        tick_lower,
        tick_upper,
        from_host(fee_growth_global_1_x128),
        from_host(&lower.fee_growth_outside_1_x128),
        from_host(&upper.fee_growth_outside_1_x128),
    );
    (inside_0, inside_1)
}

// === Tick Bitmap Operations ===
// Using u128 per word (128 compressed ticks per word)

/// Tick index divided by spacing, rounded toward negative infinity
fn compress(tick: i32, tick_spacing: i32) -> i32 {
    let compressed = tick / tick_spacing;
    if tick < 0 && tick % tick_spacing != 0 {
        compressed - 1
    } else {
        compressed
    }
}

/// Word position and bit position of a compressed tick
fn position(compressed: i32) -> (i32, u32) {
    (compressed >> 7, compressed.rem_euclid(128) as u32)
}

/// Flip a tick in the bitmap
pub fn flip_tick(env: &Env, pool_id: u32, tick: i32, tick_spacing: i32) -> Result<(), PoolError> {
    if tick % tick_spacing != 0 {
        return Err(PoolError::TickSpacingViolation);
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let mask = 1u128 << bit_pos;
    let word = get_tick_bitmap_word(env, pool_id, word_pos);
    set_tick_bitmap_word(env, pool_id, word_pos, word ^ mask);
    Ok(())
}

/// Find the next initialized tick within one word
/// Returns (tick, initialized)
///
/// With `lte` the search covers `tick` itself and everything to its left in
/// the same word; otherwise it starts one compressed tick to the right.
pub fn next_initialized_tick_within_one_word(
    env: &Env,
    pool_id: u32,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> (i32, bool) {
    let compressed = compress(tick, tick_spacing);

    if lte {
        let (word_pos, bit_pos) = position(compressed);

        // Bits at or below current position
        let mask = ((1u128 << bit_pos) - 1) | (1u128 << bit_pos);
        let masked = get_tick_bitmap_word(env, pool_id, word_pos) & mask;

        let initialized = masked != 0;
        let next = if initialized {
            let msb = 127 - masked.leading_zeros() as i32;
            (compressed - (bit_pos as i32 - msb)) * tick_spacing
        } else {
            (compressed - bit_pos as i32) * tick_spacing
        };

        (next, initialized)
    } else {
        let (word_pos, bit_pos) = position(compressed + 1);

        // Bits at or above the next position
        let mask = !((1u128 << bit_pos) - 1);
        let masked = get_tick_bitmap_word(env, pool_id, word_pos) & mask;

        let initialized = masked != 0;
        let next = if initialized {
            let lsb = masked.trailing_zeros() as i32;
            (compressed + 1 + (lsb - bit_pos as i32)) * tick_spacing
        } else {
            (compressed + 1 + (127 - bit_pos as i32)) * tick_spacing
        };

        (next, initialized)
    }
}
