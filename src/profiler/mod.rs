//! Active-liquidity curve and price histogram of a whole pool.

pub mod cancel;
pub mod curve;
pub mod histogram;

pub use cancel::Cancellation;
pub use curve::{CurvePoint, LiquidityCurve, LiquiditySegment};
pub use histogram::HistogramBin;

use crate::error::Error;
use crate::tick_index::TickIndex;
use serde::Deserialize;
use tracing::{debug, warn};

/// Tuning for [`LiquidityProfiler`].
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Histogram bin width relative to the bin's start price; `0.01` makes
    /// every bin 1% wide.
    pub bin_width: f64,
    /// Upper bound on the number of histogram bins.
    pub max_bins: usize,
    /// Tick or bin count from which work is split across threads.
    pub parallel_threshold: usize,
    /// Ticks or bins per unit of parallel work.
    pub segment_len: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            bin_width: 0.01,
            max_bins: 100_000,
            parallel_threshold: 4_096,
            segment_len: 1_024,
        }
    }
}

impl ProfilerConfig {
    pub fn with_bin_width(bin_width: f64) -> Self {
        Self {
            bin_width,
            ..Self::default()
        }
    }
}

pub struct LiquidityProfiler<'a> {
    index: &'a TickIndex,
    config: ProfilerConfig,
}

impl<'a> LiquidityProfiler<'a> {
    pub fn new(index: &'a TickIndex, config: ProfilerConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Reconstructs the piecewise-constant liquidity curve.
    ///
    /// Fails with `InconsistentState` when liquidity goes negative, does not
    /// return to zero at both ends of the initialized range, or when the
    /// upward and downward walks disagree.
    pub fn build_curve(&self, cancel: &Cancellation) -> Result<LiquidityCurve, Error> {
        let parallel = self.index.len() >= self.config.parallel_threshold;
        let curve = curve::build(self.index, self.config.segment_len, parallel, cancel)
            .inspect_err(log_abort)?;

        debug!(
            ticks = curve.len(),
            parallel,
            segment_len = self.config.segment_len,
            "built liquidity curve"
        );
        Ok(curve)
    }

    /// Bins the curve into price-proportional bins, ascending, from the
    /// lowest initialized tick's price to the highest's.
    pub fn build_histogram(&self, cancel: &Cancellation) -> Result<Vec<HistogramBin>, Error> {
        let curve = self.build_curve(cancel)?;
        self.histogram_of(&curve, cancel)
    }

    /// Bins an already built curve.
    pub fn histogram_of(
        &self,
        curve: &LiquidityCurve,
        cancel: &Cancellation,
    ) -> Result<Vec<HistogramBin>, Error> {
        let layout =
            histogram::BinLayout::new(curve, self.config.bin_width, self.config.max_bins)?;
        let parallel = layout.bins() >= self.config.parallel_threshold;
        let histogram = histogram::bin(curve, &layout, self.config.segment_len, parallel, cancel)
            .inspect_err(log_abort)?;

        debug!(
            bins = histogram.len(),
            bin_width = self.config.bin_width,
            parallel,
            "built liquidity histogram"
        );
        Ok(histogram)
    }

    /// Share of the active liquidity at `at_tick` that `liquidity` more
    /// would hold, `l / (active + l)`. Zero when both are zero.
    pub fn liquidity_share(&self, liquidity: u128, at_tick: i32) -> Result<f64, Error> {
        let active = self.index.active_liquidity_at(at_tick)?;
        let total = active as f64 + liquidity as f64;
        if total == 0.0 {
            return Ok(0.0);
        }
        Ok(liquidity as f64 / total)
    }
}

fn log_abort(err: &Error) {
    if matches!(err, Error::Cancelled) {
        warn!("liquidity profile cancelled");
    }
}
