#![allow(dead_code)]

use clmm_position_math::math::tick_math::tick_to_sqrt_price;
use clmm_position_math::{PoolSnapshot, TickEntry, TickIndex, U256};
use std::collections::BTreeMap;

pub const SPACING: i32 = 60;

pub fn pool_at(tick: i32, liquidity: u128) -> PoolSnapshot {
    PoolSnapshot {
        token0_decimals: 18,
        token1_decimals: 18,
        fee_pips: 3000,
        tick_spacing: SPACING,
        sqrt_price_x96: tick_to_sqrt_price(tick).unwrap(),
        tick,
        liquidity,
        fee_growth_global_0_x128: U256::ZERO,
        fee_growth_global_1_x128: U256::ZERO,
    }
}

/// Liquidity `(lower, upper, amount)` deposits, the way a pool would store them.
pub fn ticks_for(positions: &[(i32, i32, u128)]) -> Vec<TickEntry> {
    let mut ticks: BTreeMap<i32, (i128, u128)> = BTreeMap::new();
    for &(lower, upper, liquidity) in positions {
        let lo = ticks.entry(lower).or_default();
        lo.0 += liquidity as i128;
        lo.1 += liquidity;
        let hi = ticks.entry(upper).or_default();
        hi.0 -= liquidity as i128;
        hi.1 += liquidity;
    }
    ticks
        .into_iter()
        .map(|(index, (net, gross))| TickEntry::new(index, net, gross))
        .collect()
}

/// Liquidity active at `tick`, summed over the deposits directly.
pub fn brute_force_liquidity(positions: &[(i32, i32, u128)], tick: i32) -> u128 {
    positions
        .iter()
        .filter(|(lower, upper, _)| *lower <= tick && tick < *upper)
        .map(|(_, _, liquidity)| liquidity)
        .sum()
}

pub fn index_for(positions: &[(i32, i32, u128)], current_tick: i32) -> TickIndex {
    let pool = pool_at(current_tick, brute_force_liquidity(positions, current_tick));
    TickIndex::new(pool, ticks_for(positions)).unwrap()
}
