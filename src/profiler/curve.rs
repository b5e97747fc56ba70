use crate::error::{Error, MathError, StateError};
use crate::math::liquidity_math::sub_delta;
use crate::profiler::cancel::Cancellation;
use crate::tick_index::{TickIndex, crossing_error};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::{trace, warn};

/// Liquidity in effect from `tick` up to the next initialized tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurvePoint {
    pub tick: i32,
    pub liquidity: u128,
}

/// Constant liquidity over `[tick_lower, tick_upper)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LiquiditySegment {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

/// Piecewise-constant active liquidity over a pool's initialized range.
///
/// Zero below the first point; the last point always carries zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LiquidityCurve {
    points: Vec<CurvePoint>,
}

impl LiquidityCurve {
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn lowest_tick(&self) -> Option<i32> {
        self.points.first().map(|p| p.tick)
    }

    pub fn highest_tick(&self) -> Option<i32> {
        self.points.last().map(|p| p.tick)
    }

    pub fn segments(&self) -> impl Iterator<Item = LiquiditySegment> + '_ {
        self.points.windows(2).map(|w| LiquiditySegment {
            tick_lower: w[0].tick,
            tick_upper: w[1].tick,
            liquidity: w[0].liquidity,
        })
    }

    /// Liquidity active at `tick`.
    pub fn liquidity_at(&self, tick: i32) -> u128 {
        match self.points.partition_point(|p| p.tick <= tick) {
            0 => 0,
            n => self.points[n - 1].liquidity,
        }
    }

    /// Initialized tick → liquidity in effect from it upward.
    pub fn distribution(&self) -> BTreeMap<i32, u128> {
        self.points.iter().map(|p| (p.tick, p.liquidity)).collect()
    }
}

/// Reconstructs the curve of `index`.
///
/// A serial pass over the signed deltas fixes the liquidity entering every
/// segment; segments are then walked upward from the pool's anchor and
/// checked by a second walk downward from zero above the highest tick.
pub(crate) fn build(
    index: &TickIndex,
    segment_len: usize,
    parallel: bool,
    cancel: &Cancellation,
) -> Result<LiquidityCurve, Error> {
    let ticks = index.ticks();
    let pool = index.pool();

    let mut prefix = Vec::with_capacity(ticks.len());
    let mut running = 0i128;
    for t in ticks {
        running = running
            .checked_add(t.liquidity_net())
            .ok_or_else(|| crossing_error(t.index(), MathError::Overflow))?;
        prefix.push(running);
    }
    let prefix_before = |slot: usize| if slot == 0 { 0 } else { prefix[slot - 1] };

    let anchor = i128::try_from(pool.liquidity)
        .map_err(|_| crossing_error(pool.tick, MathError::Overflow))?;
    // liquidity below the lowest initialized tick, as seen from the anchor
    let floor = anchor
        .checked_sub(prefix_before(index.slots_crossed(pool.tick)))
        .ok_or_else(|| crossing_error(pool.tick, MathError::Overflow))?;

    let segments = split_segments(ticks.len(), segment_len);

    let forward = for_each_segment(&segments, parallel, |range| {
        cancel.check()?;
        let mut liquidity = floor
            .checked_add(prefix_before(range.start))
            .ok_or_else(|| crossing_error(ticks[range.start].index(), MathError::Overflow))?;
        if liquidity < 0 {
            return Err(crossing_error(ticks[range.start].index(), MathError::Underflow));
        }
        let mut values = Vec::with_capacity(range.len());
        for t in &ticks[range.clone()] {
            liquidity = liquidity
                .checked_add(t.liquidity_net())
                .ok_or_else(|| crossing_error(t.index(), MathError::Overflow))?;
            if liquidity < 0 {
                return Err(crossing_error(t.index(), MathError::Underflow));
            }
            values.push(liquidity as u128);
        }
        trace!(start = range.start, end = range.end, "walked segment upward");
        Ok(values)
    })?;
    let forward: Vec<u128> = forward.into_iter().flatten().collect();

    if floor != 0 {
        warn!(residual = floor, "liquidity left below the lowest initialized tick");
        return Err(StateError::UnbalancedDeltas { residual: floor }.into());
    }
    if let Some(&top) = forward.last()
        && top != 0
    {
        let residual = i128::try_from(top).unwrap_or(i128::MAX);
        warn!(residual, "liquidity left above the highest initialized tick");
        return Err(StateError::UnbalancedDeltas { residual }.into());
    }

    // liquidity from each slot upward, summed down from zero above the top
    let mut above = vec![0i128; ticks.len()];
    for slot in (0..ticks.len().saturating_sub(1)).rev() {
        above[slot] = above[slot + 1]
            .checked_sub(ticks[slot + 1].liquidity_net())
            .ok_or_else(|| crossing_error(ticks[slot + 1].index(), MathError::Overflow))?;
    }

    for_each_segment(&segments, parallel, |range| {
        cancel.check()?;
        let last = range.end - 1;
        let mut liquidity = u128::try_from(above[last])
            .map_err(|_| crossing_error(ticks[last].index(), MathError::Underflow))?;
        for slot in range.clone().rev() {
            if slot < last {
                liquidity = sub_delta(liquidity, ticks[slot + 1].liquidity_net())
                    .map_err(|e| crossing_error(ticks[slot + 1].index(), e))?;
            }
            if liquidity != forward[slot] {
                let tick = ticks[slot].index();
                warn!(tick, forward = forward[slot], backward = liquidity, "walks disagree");
                return Err(StateError::WalkMismatch {
                    tick,
                    forward: forward[slot],
                    backward: liquidity,
                }
                .into());
            }
        }
        trace!(start = range.start, end = range.end, "verified segment downward");
        Ok(())
    })?;

    let points = ticks
        .iter()
        .zip(forward)
        .map(|(t, liquidity)| CurvePoint {
            tick: t.index(),
            liquidity,
        })
        .collect();

    Ok(LiquidityCurve { points })
}

/// Contiguous slot ranges of at most `segment_len` slots covering `0..len`.
pub(crate) fn split_segments(len: usize, segment_len: usize) -> Vec<Range<usize>> {
    let step = segment_len.max(1);
    (0..len)
        .step_by(step)
        .map(|start| start..start.saturating_add(step).min(len))
        .collect()
}

/// Runs `f` over every segment, in parallel when asked, and returns the
/// results in segment order or the error of the lowest failing segment.
pub(crate) fn for_each_segment<T, F>(
    segments: &[Range<usize>],
    parallel: bool,
    f: F,
) -> Result<Vec<T>, Error>
where
    T: Send,
    F: Fn(Range<usize>) -> Result<T, Error> + Sync + Send,
{
    let results: Vec<Result<T, Error>> = if parallel {
        segments.par_iter().map(|r| f(r.clone())).collect()
    } else {
        segments.iter().map(|r| f(r.clone())).collect()
    };
    results.into_iter().collect()
}
