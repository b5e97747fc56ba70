//! Point-in-time pool state handed over by whoever reads the chain.
//!
//! All three records are plain values. They are validated where they are
//! consumed (`TickIndex::new`, `PositionAccountant`) and never mutated.

use crate::error::ValidationError;
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MIN_SQRT_RATIO, check_tick, check_tick_range, sqrt_price_to_tick,
};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Pool-wide state: `slot0`, in-range liquidity and the global fee counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    /// Fee tier in hundredths of a bip (`3000` = 0.3%).
    pub fee_pips: u32,
    pub tick_spacing: i32,
    /// Current sqrt price, Q64.96.
    pub sqrt_price_x96: U256,
    pub tick: i32,
    /// Liquidity active at `tick`.
    pub liquidity: u128,
    /// Q128.128, wraps on overflow.
    pub fee_growth_global_0_x128: U256,
    /// Q128.128, wraps on overflow.
    pub fee_growth_global_1_x128: U256,
}

impl PoolSnapshot {
    /// Checks the spacing, the price bounds, and that `tick` agrees with
    /// `sqrt_price_x96` to within one tick.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tick_spacing <= 0 {
            return Err(ValidationError::InvalidTickSpacing(self.tick_spacing));
        }
        if self.sqrt_price_x96 < MIN_SQRT_RATIO || self.sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(ValidationError::SqrtPriceOutOfBounds);
        }
        let sqrt_price_tick = sqrt_price_to_tick(self.sqrt_price_x96)?;
        if (i64::from(sqrt_price_tick) - i64::from(self.tick)).abs() > 1 {
            return Err(ValidationError::TickPriceMismatch {
                tick: self.tick,
                sqrt_price_tick,
            });
        }
        Ok(())
    }
}

/// One initialized tick as stored by the pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEntry {
    pub index: i32,
    /// Added to active liquidity when price crosses this tick upward.
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_0_x128: U256,
    pub fee_growth_outside_1_x128: U256,
    pub initialized: bool,
}

impl TickEntry {
    /// An initialized tick carrying only liquidity; outside counters at zero.
    pub fn new(index: i32, liquidity_net: i128, liquidity_gross: u128) -> Self {
        Self {
            index,
            liquidity_net,
            liquidity_gross,
            fee_growth_outside_0_x128: U256::ZERO,
            fee_growth_outside_1_x128: U256::ZERO,
            initialized: true,
        }
    }

    pub fn validate(&self, tick_spacing: i32) -> Result<(), ValidationError> {
        check_tick(self.index, tick_spacing)?;
        if self.liquidity_gross < self.liquidity_net.unsigned_abs() {
            return Err(ValidationError::GrossBelowNet { tick: self.index });
        }
        Ok(())
    }
}

/// A liquidity position over the half-open range `[tick_lower, tick_upper)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x128: U256,
    pub fee_growth_inside_1_last_x128: U256,
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

impl PositionSnapshot {
    /// A fresh position with nothing owed and zeroed inside counters.
    pub fn new(tick_lower: i32, tick_upper: i32, liquidity: u128) -> Self {
        Self {
            tick_lower,
            tick_upper,
            liquidity,
            fee_growth_inside_0_last_x128: U256::ZERO,
            fee_growth_inside_1_last_x128: U256::ZERO,
            tokens_owed_0: 0,
            tokens_owed_1: 0,
        }
    }

    pub fn validate(&self, tick_spacing: i32) -> Result<(), ValidationError> {
        check_tick_range(self.tick_lower, self.tick_upper, tick_spacing)
    }

    /// Half-open membership: the lower bound is inside, the upper is not.
    #[inline]
    pub fn contains(&self, tick: i32) -> bool {
        self.tick_lower <= tick && tick < self.tick_upper
    }
}
