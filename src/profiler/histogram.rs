use crate::error::{Error, ValidationError};
use crate::math::tick_math::{TICK_BASE, price_to_tick, tick_to_price};
use crate::profiler::cancel::Cancellation;
use crate::profiler::curve::{LiquidityCurve, for_each_segment, split_segments};
use serde::Serialize;
use tracing::trace;

/// Active liquidity over the raw price interval `[price_start, price_end)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub price_start: f64,
    pub price_end: f64,
    pub liquidity: u128,
}

impl HistogramBin {
    /// Geometric midpoint, i.e. the price halfway between the edges in tick space.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.price_start * self.price_end).sqrt()
    }
}

/// Price-proportional bin layout over the initialized tick range.
///
/// Edge `i` sits at tick `lowest + i * ticks_per_bin` (fractional), so each
/// bin's `price_end / price_start` is `1 + bin_width`. The last bin is cut
/// at the highest initialized tick.
#[derive(Copy, Clone, Debug)]
pub(crate) struct BinLayout {
    lowest: i32,
    highest: i32,
    ticks_per_bin: f64,
    bins: usize,
}

impl BinLayout {
    pub(crate) fn new(
        curve: &LiquidityCurve,
        bin_width: f64,
        max_bins: usize,
    ) -> Result<Self, ValidationError> {
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(ValidationError::InvalidBinWidth);
        }
        let ticks_per_bin = bin_width.ln_1p() / TICK_BASE.ln();
        if !ticks_per_bin.is_finite() || ticks_per_bin <= 0.0 {
            return Err(ValidationError::InvalidBinWidth);
        }
        let (Some(lowest), Some(highest)) = (curve.lowest_tick(), curve.highest_tick()) else {
            return Ok(Self {
                lowest: 0,
                highest: 0,
                ticks_per_bin,
                bins: 0,
            });
        };

        // a quotient that lands a hair above a whole number is float noise
        let exact = f64::from(highest - lowest) / ticks_per_bin;
        let bins = (exact * (1.0 - 1e-9)).ceil();
        if bins > max_bins as f64 {
            return Err(ValidationError::TooManyBins {
                bins: bins as u64,
                max: max_bins,
            });
        }

        let mut layout = Self {
            lowest,
            highest,
            ticks_per_bin,
            bins: bins as usize,
        };
        let price_high = tick_to_price(highest);
        while layout.bins > 1 && layout.edge(layout.bins - 1) >= price_high {
            layout.bins -= 1;
        }
        Ok(layout)
    }

    #[inline]
    pub(crate) fn bins(&self) -> usize {
        self.bins
    }

    /// Price of edge `i`; the outer edges are the exact tick prices.
    fn edge(&self, i: usize) -> f64 {
        if i == 0 {
            tick_to_price(self.lowest)
        } else if i >= self.bins {
            tick_to_price(self.highest)
        } else {
            TICK_BASE.powf(f64::from(self.lowest) + i as f64 * self.ticks_per_bin)
        }
    }
}

/// Bins `curve` by price, `bin_width` being each bin's width relative to
/// its start price.
///
/// Each bin reports the liquidity at the tick of its midpoint, clamped to
/// the initialized range.
pub(crate) fn bin(
    curve: &LiquidityCurve,
    layout: &BinLayout,
    chunk_len: usize,
    parallel: bool,
    cancel: &Cancellation,
) -> Result<Vec<HistogramBin>, Error> {
    let chunks = split_segments(layout.bins, chunk_len);
    let binned = for_each_segment(&chunks, parallel, |range| {
        cancel.check()?;
        let mut out = Vec::with_capacity(range.len());
        for i in range.clone() {
            let mut bin = HistogramBin {
                price_start: layout.edge(i),
                price_end: layout.edge(i + 1),
                liquidity: 0,
            };
            let tick = price_to_tick(bin.midpoint())?.clamp(layout.lowest, layout.highest);
            bin.liquidity = curve.liquidity_at(tick);
            out.push(bin);
        }
        trace!(start = range.start, end = range.end, "filled bins");
        Ok(out)
    })?;

    Ok(binned.into_iter().flatten().collect())
}
