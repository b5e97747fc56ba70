#![allow(dead_code)]

use clmm_position_math::math::{
    fee_math::accrued_fees,
    liquidity_math::amounts_for_liquidity,
    math_helpers::mul_div,
    tick_math::{TICK_BASE, sqrt_price_to_tick, tick_to_sqrt_price},
};
use clmm_position_math::{
    Cancellation, LiquidityProfiler, PoolSnapshot, ProfilerConfig, Q128, TickEntry, TickIndex, U256,
};
use criterion::{BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");
    let ticks = [-887_272, -200_000, -60, 0, 60, 205_377, 887_272];

    group.bench_function("tick_to_sqrt_price", |b| {
        b.iter(|| {
            for &tick in &ticks {
                black_box(tick_to_sqrt_price(black_box(tick)).unwrap());
            }
        })
    });

    let prices: Vec<U256> = ticks.iter().map(|&t| tick_to_sqrt_price(t).unwrap()).collect();
    group.bench_function("sqrt_price_to_tick", |b| {
        b.iter(|| {
            for &price in &prices[..prices.len() - 1] {
                black_box(sqrt_price_to_tick(black_box(price)).unwrap());
            }
        })
    });
    group.finish();
}

pub fn bench_position_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_math");
    let lower = tick_to_sqrt_price(204_290).unwrap();
    let upper = tick_to_sqrt_price(206_870).unwrap();
    let current = tick_to_sqrt_price(205_377).unwrap();

    group.bench_function("amounts_for_liquidity", |b| {
        b.iter(|| {
            amounts_for_liquidity(
                black_box(lower),
                black_box(upper),
                black_box(current),
                black_box(10_669_196_109_794_039),
            )
        })
    });

    let inside = U256::MAX - U256::from(5_013_266_204_387_805u64);
    group.bench_function("accrued_fees_wrapped", |b| {
        b.iter(|| {
            accrued_fees(
                black_box(34_437_203_644_513_122),
                black_box(U256::ZERO),
                black_box(inside),
            )
        })
    });

    group.bench_function("mul_div_512", |b| {
        b.iter(|| mul_div(black_box(U256::MAX - U256::ONE), black_box(Q128), black_box(U256::MAX)))
    });
    group.finish();
}

/// A pool of `positions` nested ranges around tick 0, spacing 10.
pub fn nested_pool(positions: i32) -> TickIndex {
    let pool = PoolSnapshot {
        token0_decimals: 18,
        token1_decimals: 18,
        fee_pips: 500,
        tick_spacing: 10,
        sqrt_price_x96: tick_to_sqrt_price(0).unwrap(),
        tick: 0,
        liquidity: positions as u128 * 1_000_000,
        fee_growth_global_0_x128: U256::ZERO,
        fee_growth_global_1_x128: U256::ZERO,
    };
    let ticks = (1..=positions).flat_map(|i| {
        [
            TickEntry::new(-10 * i, 1_000_000, 1_000_000),
            TickEntry::new(10 * i, -1_000_000, 1_000_000),
        ]
    });
    TickIndex::new(pool, ticks).unwrap()
}

pub fn bench_profiler(c: &mut Criterion) {
    let mut group = c.benchmark_group("profiler");
    for positions in [500, 5_000, 50_000] {
        let index = nested_pool(positions);
        group.throughput(Throughput::Elements(index.len() as u64));
        // about 5000 bins whatever the span
        let bin_width = TICK_BASE.powf(f64::from(20 * positions) / 5_000.0) - 1.0;

        for (label, threshold) in [("serial", usize::MAX), ("parallel", 0)] {
            let config = ProfilerConfig {
                parallel_threshold: threshold,
                ..ProfilerConfig::with_bin_width(bin_width)
            };
            let profiler = LiquidityProfiler::new(&index, config);
            group.bench_with_input(BenchmarkId::new(label, positions), &profiler, |b, p| {
                b.iter(|| p.build_histogram(&Cancellation::new()).unwrap())
            });
        }
    }
    group.finish();
}
