use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("BitMath error - zero input value")]
    ZeroValue,
}

/// Rejected caller input. Nothing was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Validation error - tick {0} out of bounds")]
    TickOutOfBounds(i32),
    #[error("Validation error - sqrtPrice out of bounds")]
    SqrtPriceOutOfBounds,
    #[error("Validation error - tick {tick} is not a multiple of spacing {spacing}")]
    TickNotOnSpacing { tick: i32, spacing: i32 },
    #[error("Validation error - tick spacing {0} must be positive")]
    InvalidTickSpacing(i32),
    #[error("Validation error - tick range [{lower}, {upper}) is empty")]
    InvalidTickRange { lower: i32, upper: i32 },
    #[error("Validation error - tick {0} appears more than once")]
    DuplicateTick(i32),
    #[error("Validation error - liquidityGross below |liquidityNet| at tick {tick}")]
    GrossBelowNet { tick: i32 },
    #[error("Validation error - tick {tick} does not match sqrtPrice tick {sqrt_price_tick}")]
    TickPriceMismatch { tick: i32, sqrt_price_tick: i32 },
    #[error("Validation error - bin width must be finite and positive")]
    InvalidBinWidth,
    #[error("Validation error - {bins} bins requested, limit is {max}")]
    TooManyBins { bins: u64, max: usize },
}

/// The snapshot contradicts itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("State error - liquidity goes negative crossing tick {tick}")]
    NegativeLiquidity { tick: i32 },
    #[error("State error - liquidity overflows u128 crossing tick {tick}")]
    LiquidityOverflow { tick: i32 },
    #[error("State error - liquidity deltas leave {residual} past the initialized range")]
    UnbalancedDeltas { residual: i128 },
    #[error("State error - walks disagree at tick {tick}: forward {forward}, backward {backward}")]
    WalkMismatch {
        tick: i32,
        forward: u128,
        backward: u128,
    },
    #[error("State error - fee accrual exceeds what a position can be owed")]
    ImpossibleFeeAccrual,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    ValidationError(#[from] ValidationError),

    #[error(transparent)]
    InconsistentState(#[from] StateError),

    #[error("Build cancelled before completion")]
    Cancelled,
}
