use clmm_types::{PoolConfig, PoolError, PoolState, PositionInfo, PositionKey, TickInfo};
use soroban_sdk::{contracttype, Address, Env};

// ============================================================================
// SOROBAN RESOURCE LIMITS - constraints the storage layout is built around:
// ============================================================================
// - Ledger entry size: 128 KiB max per entry
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Layout:
// - Registry-wide settings (admin, fee tiers, pool counter) live in instance
//   storage
// - Every pool-scoped record is its own persistent entry keyed by pool id,
//   so pools never share a ledger entry
// - Ticks and bitmap words are separate entries; a cleared tick or empty
//   bitmap word is removed
// - Positions persist at zero liquidity and are only removed by prune
//
// Swap operation limits:
// - Each tick crossing writes one tick entry
// - Each step reads one bitmap word, including steps that only reach the
//   edge of an empty word
// - State is written once at the end
// ============================================================================

/// Maximum number of initialized-tick crossings in one swap.
/// Reaching it ends the swap as a partial fill.
pub const MAX_TICK_CROSSINGS_PER_SWAP: u32 = 40;

/// Maximum number of steps in one swap, initialized or not.
/// Bounds the bitmap words read while the price moves through empty ticks.
pub const MAX_SWAP_STEPS: u32 = 64;

/// Storage keys for the registry contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address (Instance storage)
    Admin,
    /// Fee tier -> tick spacing (Instance storage)
    FeeTier(u32),
    /// Number of pools created; also the next pool id (Instance storage)
    PoolCount,
    /// (token0, token1, fee) -> pool id (Persistent storage)
    PoolId(Address, Address, u32),
    /// pool id -> PoolConfig (Persistent storage)
    PoolConfig(u32),
    /// pool id -> PoolState (Persistent storage)
    PoolState(u32),
    /// (pool id, tick index) -> TickInfo (Persistent storage)
    Tick(u32, i32),
    /// (pool id, word position) -> u128 bitmap (Persistent storage)
    TickBitmap(u32, i32),
    /// (pool id, position key) -> PositionInfo (Persistent storage)
    Position(u32, PositionKey),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn get_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        extend_persistent_ttl(env, key);
    }
    value
}

fn set_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    extend_persistent_ttl(env, key);
}

// === Registry settings ===

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Result<Address, PoolError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(PoolError::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn get_fee_tier(env: &Env, fee: u32) -> Option<i32> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::FeeTier(fee))
}

pub fn set_fee_tier(env: &Env, fee: u32, tick_spacing: i32) {
    env.storage()
        .instance()
        .set(&DataKey::FeeTier(fee), &tick_spacing);
    extend_instance_ttl(env);
}

pub fn get_pool_count(env: &Env) -> u32 {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::PoolCount)
        .unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PoolCount, &count);
    extend_instance_ttl(env);
}

// === Pool index ===

pub fn get_pool_id(env: &Env, token0: &Address, token1: &Address, fee: u32) -> Option<u32> {
    get_persistent(env, &DataKey::PoolId(token0.clone(), token1.clone(), fee))
}

pub fn set_pool_id(env: &Env, token0: &Address, token1: &Address, fee: u32, pool_id: u32) {
    set_persistent(
        env,
        &DataKey::PoolId(token0.clone(), token1.clone(), fee),
        &pool_id,
    );
}

// === Pool config and state ===

pub fn get_pool_config(env: &Env, pool_id: u32) -> Result<PoolConfig, PoolError> {
    get_persistent(env, &DataKey::PoolConfig(pool_id)).ok_or(PoolError::PoolNotFound)
}

pub fn set_pool_config(env: &Env, pool_id: u32, config: &PoolConfig) {
    set_persistent(env, &DataKey::PoolConfig(pool_id), config);
}

pub fn get_pool_state(env: &Env, pool_id: u32) -> Result<PoolState, PoolError> {
    get_persistent(env, &DataKey::PoolState(pool_id)).ok_or(PoolError::PoolNotFound)
}

pub fn set_pool_state(env: &Env, pool_id: u32, state: &PoolState) {
    set_persistent(env, &DataKey::PoolState(pool_id), state);
}

// === Tick ===

pub fn get_tick(env: &Env, pool_id: u32, tick: i32) -> Option<TickInfo> {
    get_persistent(env, &DataKey::Tick(pool_id, tick))
}

pub fn set_tick(env: &Env, pool_id: u32, tick: i32, info: &TickInfo) {
    set_persistent(env, &DataKey::Tick(pool_id, tick), info);
}

pub fn remove_tick(env: &Env, pool_id: u32, tick: i32) {
    env.storage()
        .persistent()
        .remove(&DataKey::Tick(pool_id, tick));
}

// === Tick Bitmap ===

pub fn get_tick_bitmap_word(env: &Env, pool_id: u32, word_pos: i32) -> u128 {
    get_persistent(env, &DataKey::TickBitmap(pool_id, word_pos)).unwrap_or(0u128)
}

pub fn set_tick_bitmap_word(env: &Env, pool_id: u32, word_pos: i32, bitmap: u128) {
    let key = DataKey::TickBitmap(pool_id, word_pos);
    if bitmap == 0 {
        env.storage().persistent().remove(&key);
    } else {
        set_persistent(env, &key, &bitmap);
    }
}

// === Position ===

pub fn get_position(env: &Env, pool_id: u32, key: &PositionKey) -> Option<PositionInfo> {
    get_persistent(env, &DataKey::Position(pool_id, key.clone()))
}

pub fn set_position(env: &Env, pool_id: u32, key: &PositionKey, info: &PositionInfo) {
    set_persistent(env, &DataKey::Position(pool_id, key.clone()), info);
}

pub fn remove_position(env: &Env, pool_id: u32, key: &PositionKey) {
    env.storage()
        .persistent()
        .remove(&DataKey::Position(pool_id, key.clone()));
}
