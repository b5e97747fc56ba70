//! Sorted arena of a pool's initialized ticks.
//!
//! Ticks are stored once, ascending, and addressed by slot. Every walk
//! over them is a loop over that slice, so a pool with millions of
//! initialized ticks costs no stack.

use crate::error::{Error, MathError, StateError, ValidationError};
use crate::hash::{TickSlots, slots_for};
use crate::math::fee_math::fee_growth_delta;
use crate::math::liquidity_math::{add_delta, sub_delta};
use crate::math::tick_math::tick_to_sqrt_price;
use crate::snapshot::{PoolSnapshot, TickEntry};
use alloy_primitives::U256;
use tracing::{debug, warn};

/// A tick entry together with its precomputed sqrt price.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexedTick {
    pub entry: TickEntry,
    pub sqrt_price_x96: U256,
}

impl IndexedTick {
    #[inline]
    pub fn index(&self) -> i32 {
        self.entry.index
    }

    #[inline]
    pub fn liquidity_net(&self) -> i128 {
        self.entry.liquidity_net
    }
}

#[derive(Clone, Debug)]
pub struct TickIndex {
    pool: PoolSnapshot,
    ticks: Vec<IndexedTick>,
    slots: TickSlots,
}

impl TickIndex {
    /// Validates `pool` and `entries` and builds the index.
    ///
    /// Entries flagged uninitialized are dropped. Entries may arrive in any
    /// order but each tick index at most once.
    pub fn new(
        pool: PoolSnapshot,
        entries: impl IntoIterator<Item = TickEntry>,
    ) -> Result<Self, ValidationError> {
        pool.validate()?;

        let mut ticks = Vec::new();
        for entry in entries.into_iter().filter(|e| e.initialized) {
            entry.validate(pool.tick_spacing)?;
            ticks.push(IndexedTick {
                sqrt_price_x96: tick_to_sqrt_price(entry.index)?,
                entry,
            });
        }
        ticks.sort_unstable_by_key(IndexedTick::index);

        if let Some(pair) = ticks.windows(2).find(|w| w[0].index() == w[1].index()) {
            return Err(ValidationError::DuplicateTick(pair[0].index()));
        }

        let slots = slots_for(ticks.iter().map(IndexedTick::index));

        debug!(
            ticks = ticks.len(),
            tick_spacing = pool.tick_spacing,
            current_tick = pool.tick,
            "built tick index"
        );

        Ok(Self { pool, ticks, slots })
    }

    #[inline]
    pub fn pool(&self) -> &PoolSnapshot {
        &self.pool
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// All indexed ticks, ascending.
    #[inline]
    pub fn ticks(&self) -> &[IndexedTick] {
        &self.ticks
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &IndexedTick> + ExactSizeIterator {
        self.ticks.iter()
    }

    pub fn get(&self, tick: i32) -> Option<&IndexedTick> {
        self.slots.get(&tick).map(|&slot| &self.ticks[slot])
    }

    pub fn lowest(&self) -> Option<&IndexedTick> {
        self.ticks.first()
    }

    pub fn highest(&self) -> Option<&IndexedTick> {
        self.ticks.last()
    }

    /// Indexed ticks in the half-open range `[lower, upper)`.
    pub fn range(&self, lower: i32, upper: i32) -> &[IndexedTick] {
        let start = self.slots_below(lower);
        let end = self.slots_below(upper).max(start);
        &self.ticks[start..end]
    }

    /// Number of indexed ticks strictly below `tick`.
    #[inline]
    fn slots_below(&self, tick: i32) -> usize {
        self.ticks.partition_point(|t| t.index() < tick)
    }

    /// Number of indexed ticks at or below `tick`, i.e. the ticks whose
    /// `liquidity_net` is already counted in the liquidity active at `tick`.
    #[inline]
    pub(crate) fn slots_crossed(&self, tick: i32) -> usize {
        self.ticks.partition_point(|t| t.index() <= tick)
    }

    /// Sqrt price at `tick`, from the table when the tick is indexed.
    pub fn sqrt_price_at(&self, tick: i32) -> Result<U256, ValidationError> {
        match self.get(tick) {
            Some(indexed) => Ok(indexed.sqrt_price_x96),
            None => tick_to_sqrt_price(tick),
        }
    }

    /// Fee growth per unit of liquidity accrued inside `[tick_lower, tick_upper)`
    /// for both tokens.
    ///
    /// A boundary missing from the index reads as zero outside counters.
    /// Every subtraction wraps modulo 2^256.
    pub fn fee_growth_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        tick_current: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> (U256, U256) {
        let outside = |tick: i32| {
            self.get(tick).map_or((U256::ZERO, U256::ZERO), |t| {
                (
                    t.entry.fee_growth_outside_0_x128,
                    t.entry.fee_growth_outside_1_x128,
                )
            })
        };
        let (lower_0, lower_1) = outside(tick_lower);
        let (upper_0, upper_1) = outside(tick_upper);

        let (below_0, below_1) = if tick_current >= tick_lower {
            (lower_0, lower_1)
        } else {
            (
                fee_growth_delta(fee_growth_global_0_x128, lower_0),
                fee_growth_delta(fee_growth_global_1_x128, lower_1),
            )
        };

        let (above_0, above_1) = if tick_current < tick_upper {
            (upper_0, upper_1)
        } else {
            (
                fee_growth_delta(fee_growth_global_0_x128, upper_0),
                fee_growth_delta(fee_growth_global_1_x128, upper_1),
            )
        };

        (
            fee_growth_delta(fee_growth_delta(fee_growth_global_0_x128, below_0), above_0),
            fee_growth_delta(fee_growth_delta(fee_growth_global_1_x128, below_1), above_1),
        )
    }

    /// Liquidity active at `tick`, walked from the pool's current tick.
    ///
    /// Upward each crossed tick adds its `liquidity_net`, downward it is
    /// removed again.
    pub fn active_liquidity_at(&self, tick: i32) -> Result<u128, Error> {
        let anchor = self.slots_crossed(self.pool.tick);
        let target = self.slots_crossed(tick);
        let mut liquidity = self.pool.liquidity;

        if target >= anchor {
            for t in &self.ticks[anchor..target] {
                liquidity = add_delta(liquidity, t.liquidity_net())
                    .map_err(|e| crossing_error(t.index(), e))?;
            }
        } else {
            for t in self.ticks[target..anchor].iter().rev() {
                liquidity = sub_delta(liquidity, t.liquidity_net())
                    .map_err(|e| crossing_error(t.index(), e))?;
            }
        }
        Ok(liquidity)
    }
}

/// Maps a failed liquidity update at `tick` to the state it reveals.
pub(crate) fn crossing_error(tick: i32, err: MathError) -> Error {
    let state = match err {
        MathError::Overflow => StateError::LiquidityOverflow { tick },
        _ => StateError::NegativeLiquidity { tick },
    };
    warn!(tick, error = %state, "liquidity walk failed");
    state.into()
}
