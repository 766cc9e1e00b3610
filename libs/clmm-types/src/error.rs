use soroban_sdk::contracterror;

/// Errors surfaced by the pool registry and the math it relies on.
///
/// Codes are part of the contract interface and must stay stable.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    /// tick_lower >= tick_upper
    InvalidRange = 1,
    /// Tick or sqrt price outside the supported domain
    TickOutOfBounds = 2,
    /// Tick is not a multiple of the pool tick spacing
    TickSpacingViolation = 3,
    /// Not enough liquidity in the position or tick
    InsufficientLiquidity = 4,
    /// Zero swap amount or zero liquidity mint
    ZeroAmount = 5,
    /// Computed amounts fell below the caller minimums
    SlippageExceeded = 6,
    /// Fixed-point or integer overflow
    Overflow = 7,
    /// Swap price limit on the wrong side of the current price
    InvalidPriceLimit = 8,
    AlreadyInitialized = 9,
    NotInitialized = 10,
    IdenticalTokens = 11,
    FeeTierNotEnabled = 12,
    InvalidTickSpacing = 13,
    PoolExists = 14,
    PoolNotFound = 15,
    PositionNotFound = 16,
    /// Position still holds liquidity or owed tokens
    PositionNotEmpty = 17,
    InvalidFee = 18,
}
