//! Uniswap V3–style position accounting and liquidity profiling in pure Rust.
//!
//! This crate works on point-in-time snapshots of a concentrated-liquidity
//! pool and exposes:
//! - Low‑level math primitives (`math::*`) for ticks, prices, token amounts
//!   and fee growth counters.
//! - A [`TickIndex`] over a pool's initialized ticks.
//! - A [`PositionAccountant`] for uncollected fees and withdrawable amounts.
//! - A [`LiquidityProfiler`] that rebuilds the active-liquidity curve and
//!   bins it into a price histogram.
//!
//! Fetching the snapshots is left to the caller.
//!
//! # Examples
//!
//! ## Pure math
//! ```
//! use clmm_position_math::{math::tick_math, Q96, RESOLUTION};
//!
//! let sqrt_price = tick_math::tick_to_sqrt_price(0).unwrap();
//! assert_eq!(sqrt_price, Q96);
//! assert_eq!(RESOLUTION, 96);
//! ```
//!
//! ## Accounting for a position
//! ```
//! use clmm_position_math::{
//!     math::tick_math::tick_to_sqrt_price, PoolSnapshot, PositionAccountant, PositionSnapshot,
//!     TickEntry, TickIndex, U256,
//! };
//!
//! let pool = PoolSnapshot {
//!     token0_decimals: 18,
//!     token1_decimals: 18,
//!     fee_pips: 3000,
//!     tick_spacing: 60,
//!     sqrt_price_x96: tick_to_sqrt_price(0).unwrap(),
//!     tick: 0,
//!     liquidity: 1_000_000,
//!     fee_growth_global_0_x128: U256::ZERO,
//!     fee_growth_global_1_x128: U256::ZERO,
//! };
//! let ticks = [
//!     TickEntry::new(-600, 1_000_000, 1_000_000),
//!     TickEntry::new(600, -1_000_000, 1_000_000),
//! ];
//! let index = TickIndex::new(pool, ticks).unwrap();
//!
//! let position = PositionSnapshot::new(-600, 600, 1_000_000);
//! let summary = PositionAccountant::new(&index).summary(&position).unwrap();
//! assert!(summary.in_range);
//! assert!(summary.amounts.amount0 > U256::ZERO && summary.amounts.amount1 > U256::ZERO);
//! ```
//!
//! ## Liquidity histogram
//! ```no_run
//! use clmm_position_math::{Cancellation, LiquidityProfiler, ProfilerConfig, TickIndex};
//! use std::time::Duration;
//!
//! # fn run(index: &TickIndex) -> Result<(), clmm_position_math::error::Error> {
//! let profiler = LiquidityProfiler::new(index, ProfilerConfig::with_bin_width(0.001));
//! let cancel = Cancellation::with_timeout(Duration::from_secs(2));
//! for bin in profiler.build_histogram(&cancel)? {
//!     println!("{:.6}..{:.6}: {}", bin.price_start, bin.price_end, bin.liquidity);
//! }
//! # Ok(())
//! # }
//! ```

pub use alloy_primitives::{I256, U256};

pub mod error;
mod hash;
pub mod math;
pub mod position;
pub mod profiler;
pub mod snapshot;
pub mod tick_index;

pub use hash::FastMap;

pub use error::Error;
pub use position::{PositionAccountant, PositionSummary, TokenAmounts};
pub use profiler::{
    Cancellation, HistogramBin, LiquidityCurve, LiquidityProfiler, LiquiditySegment,
    ProfilerConfig,
};
pub use snapshot::{PoolSnapshot, PositionSnapshot, TickEntry};
pub use tick_index::{IndexedTick, TickIndex};

/// Fractional bits of a Q64.96 sqrt price.
pub const RESOLUTION: u8 = 96;

/// 2^96, the sqrt price at tick 0.
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// 2^128, one unit of a Q128.128 fee growth counter.
pub const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);
