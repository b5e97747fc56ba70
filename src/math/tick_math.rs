use crate::error::ValidationError;
use crate::math::bit_math::most_significant_bit;
use alloy_primitives::{I256, U256};

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// `tick_to_sqrt_price(MIN_TICK)`.
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
/// `tick_to_sqrt_price(MAX_TICK)`.
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

/// Base of the tick → price exponent.
pub const TICK_BASE: f64 = 1.0001;

// log_sqrt(1.0001)(2) in Q128 and the error bounds of the log2 approximation
const LOG_SQRT_10001: I256 =
    I256::from_raw(U256::from_limbs([11745905768312294533, 13863, 0, 0]));
const TICK_LOW_ERROR: I256 = I256::from_raw(U256::from_limbs([
    6552757943157144234,
    184476617836266586,
    0,
    0,
]));
const TICK_HIGH_ERROR: I256 = I256::from_raw(U256::from_limbs([
    4998474450511881007,
    15793544031827761793,
    0,
    0,
]));

/// Returns the sqrt price (Q64.96) at `tick`, or
/// `ValidationError::TickOutOfBounds` outside `[MIN_TICK, MAX_TICK]`.
///
/// Bit-exact with the on-chain `TickMath.getSqrtRatioAtTick`: the ratio
/// is built as a product of precomputed `1/sqrt(1.0001)^(2^i)` factors in
/// Q128, inverted for positive ticks, and rounded up into Q96.
pub fn tick_to_sqrt_price(tick: i32) -> Result<U256, ValidationError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(ValidationError::TickOutOfBounds(tick));
    }

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0])
    } else {
        U256::from_limbs([0, 0, 1, 0])
    };

    macro_rules! apply_factor {
        ($bit:expr, $l0:expr, $l1:expr) => {
            if abs_tick & $bit != 0 {
                ratio = ratio.wrapping_mul(U256::from_limbs([$l0, $l1, 0, 0])) >> 128;
            }
        };
    }

    apply_factor!(0x2, 6459403834229662010, 18444899583751176498);
    apply_factor!(0x4, 17226890335427755468, 18443055278223354162);
    apply_factor!(0x8, 2032852871939366096, 18439367220385604838);
    apply_factor!(0x10, 14545316742740207172, 18431993317065449817);
    apply_factor!(0x20, 5129152022828963008, 18417254355718160513);
    apply_factor!(0x40, 4894419605888772193, 18387811781193591352);
    apply_factor!(0x80, 1280255884321894483, 18329067761203520168);
    apply_factor!(0x100, 15924666964335305636, 18212142134806087854);
    apply_factor!(0x200, 8010504389359918676, 17980523815641551639);
    apply_factor!(0x400, 10668036004952895731, 17526086738831147013);
    apply_factor!(0x800, 4878133418470705625, 16651378430235024244);
    apply_factor!(0x1000, 9537173718739605541, 15030750278693429944);
    apply_factor!(0x2000, 9972618978014552549, 12247334978882834399);
    apply_factor!(0x4000, 10428997489610666743, 8131365268884726200);
    apply_factor!(0x8000, 9305304367709015974, 3584323654723342297);
    apply_factor!(0x10000, 14301143598189091785, 696457651847595233);
    apply_factor!(0x20000, 7393154844743099908, 26294789957452057);
    apply_factor!(0x40000, 2209338891292245656, 37481735321082);
    apply_factor!(0x80000, 10518117631919034274, 76158723);

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up
    let round_up = ratio.as_limbs()[0] & 0xFFFF_FFFF != 0;
    Ok((ratio >> 32) + U256::from(round_up as u64))
}

/// Returns the greatest tick whose sqrt price is `<= sqrt_price_x96`.
///
/// Accepts prices in `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`. Composed with
/// [`tick_to_sqrt_price`] this is an exact round trip.
pub fn sqrt_price_to_tick(sqrt_price_x96: U256) -> Result<i32, ValidationError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(ValidationError::SqrtPriceOutOfBounds);
    }

    let ratio = sqrt_price_x96 << 32;
    let msb = most_significant_bit(ratio).map_err(|_| ValidationError::SqrtPriceOutOfBounds)?;

    let mut r = if msb >= 128 {
        ratio >> (msb - 127) as usize
    } else {
        ratio << (127 - msb) as usize
    };

    let mut log_2: I256 =
        (I256::from_raw(U256::from(msb)) - I256::from_raw(U256::from(128u8))) << 64usize;

    // 14 fractional bits of log2 by repeated squaring
    for shift in (50..=63usize).rev() {
        r = r.wrapping_mul(r) >> 127usize;
        let f = r >> 128usize;
        log_2 |= I256::from_raw(f << shift);
        if !f.is_zero() {
            r >>= 1usize;
        }
    }

    let log_sqrt10001 = log_2.wrapping_mul(LOG_SQRT_10001);
    let tick_low = (log_sqrt10001 - TICK_LOW_ERROR).asr(128).low_i32();
    let tick_high = (log_sqrt10001 + TICK_HIGH_ERROR).asr(128).low_i32();

    if tick_low == tick_high {
        return Ok(tick_low);
    }
    Ok(if tick_to_sqrt_price(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    })
}

/// Raw price (token1 per token0, no decimal adjustment) at `tick`.
pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powi(tick)
}

/// Floor tick of a raw price. Float precision makes the result exact
/// only away from tick boundaries; use [`sqrt_price_to_tick`] when exact
/// results matter.
pub fn price_to_tick(price: f64) -> Result<i32, ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::SqrtPriceOutOfBounds);
    }
    let tick = (price.ln() / TICK_BASE.ln()).floor();
    if tick < MIN_TICK as f64 || tick > MAX_TICK as f64 {
        return Err(ValidationError::SqrtPriceOutOfBounds);
    }
    Ok(tick as i32)
}

/// Smallest tick divisible by `tick_spacing` that is `>= MIN_TICK`.
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

/// Largest tick divisible by `tick_spacing` that is `<= MAX_TICK`.
pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

/// Rejects ticks outside the domain or off the spacing grid.
pub fn check_tick(tick: i32, tick_spacing: i32) -> Result<(), ValidationError> {
    if tick_spacing <= 0 {
        return Err(ValidationError::InvalidTickSpacing(tick_spacing));
    }
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(ValidationError::TickOutOfBounds(tick));
    }
    if tick % tick_spacing != 0 {
        return Err(ValidationError::TickNotOnSpacing {
            tick,
            spacing: tick_spacing,
        });
    }
    Ok(())
}

/// Rejects an empty or misaligned `[lower, upper)` range.
pub fn check_tick_range(lower: i32, upper: i32, tick_spacing: i32) -> Result<(), ValidationError> {
    check_tick(lower, tick_spacing)?;
    check_tick(upper, tick_spacing)?;
    if lower >= upper {
        return Err(ValidationError::InvalidTickRange { lower, upper });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Q96;
    use std::str::FromStr;

    #[test]
    fn tick_to_sqrt_price_rejects_out_of_bounds() {
        assert_eq!(
            tick_to_sqrt_price(MIN_TICK - 1),
            Err(ValidationError::TickOutOfBounds(MIN_TICK - 1))
        );
        assert_eq!(
            tick_to_sqrt_price(MAX_TICK + 1),
            Err(ValidationError::TickOutOfBounds(MAX_TICK + 1))
        );
    }

    #[test]
    fn tick_to_sqrt_price_bounds_match_constants() {
        assert_eq!(tick_to_sqrt_price(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(tick_to_sqrt_price(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(tick_to_sqrt_price(0).unwrap(), Q96);
    }

    #[test]
    fn tick_to_sqrt_price_values() {
        // values produced by the on-chain library
        let cases: [(i32, &str); 10] = [
            (MIN_TICK + 1, "4295343490"),
            (50, "79426470787362580746886972461"),
            (100, "79625275426524748796330556128"),
            (1000, "83290069058676223003182343270"),
            (5000, "101729702841318637793976746270"),
            (50000, "965075977353221155028623082916"),
            (250000, "21246587762933397357449903968194344"),
            (500000, "5697689776495288729098254600827762987878"),
            (738203, "847134979253254120489401328389043031315994541"),
            (
                MAX_TICK - 1,
                "1461373636630004318706518188784493106690254656249",
            ),
        ];
        for (tick, expected) in cases {
            assert_eq!(
                tick_to_sqrt_price(tick).unwrap(),
                U256::from_str(expected).unwrap(),
                "sqrt price at {tick} incorrect"
            );
        }
    }

    #[test]
    fn sqrt_price_to_tick_rejects_out_of_bounds() {
        assert_eq!(
            sqrt_price_to_tick(MIN_SQRT_RATIO - U256::ONE),
            Err(ValidationError::SqrtPriceOutOfBounds)
        );
        assert_eq!(
            sqrt_price_to_tick(MAX_SQRT_RATIO),
            Err(ValidationError::SqrtPriceOutOfBounds)
        );
    }

    #[test]
    fn sqrt_price_to_tick_at_bounds() {
        assert_eq!(sqrt_price_to_tick(MIN_SQRT_RATIO).unwrap(), MIN_TICK);
        assert_eq!(
            sqrt_price_to_tick(U256::from(4295343490u64)).unwrap(),
            MIN_TICK + 1
        );
        assert_eq!(
            sqrt_price_to_tick(MAX_SQRT_RATIO - U256::ONE).unwrap(),
            MAX_TICK - 1
        );
    }

    #[test]
    fn sqrt_price_to_tick_floors_between_ticks() {
        // one unit below tick 60's price still belongs to tick 59
        let at_60 = tick_to_sqrt_price(60).unwrap();
        assert_eq!(sqrt_price_to_tick(at_60).unwrap(), 60);
        assert_eq!(sqrt_price_to_tick(at_60 - U256::ONE).unwrap(), 59);
        let at_neg = tick_to_sqrt_price(-60).unwrap();
        assert_eq!(sqrt_price_to_tick(at_neg).unwrap(), -60);
        assert_eq!(sqrt_price_to_tick(at_neg - U256::ONE).unwrap(), -61);
    }

    #[test]
    fn sqrt_price_to_tick_real_pool_price() {
        // USDC/WETH 0.3% pool slot0 used in the position tests
        let sqrt_price = U256::from_str("2282306120221836809729201765714520").unwrap();
        assert_eq!(sqrt_price_to_tick(sqrt_price).unwrap(), 205377);
    }

    #[test]
    fn round_trip_across_domain() {
        let mut tick = MIN_TICK;
        while tick < MAX_TICK {
            let back = sqrt_price_to_tick(tick_to_sqrt_price(tick).unwrap()).unwrap();
            assert_eq!(back, tick);
            tick += 7919;
        }
    }

    #[test]
    fn float_price_helpers() {
        assert_eq!(tick_to_price(0), 1.0);
        assert!((tick_to_price(10_000) - 2.718_145_926_824_926).abs() < 1e-9);
        assert_eq!(price_to_tick(1.0).unwrap(), 0);
        assert_eq!(price_to_tick(tick_to_price(-1234) * 1.000_05).unwrap(), -1234);
        assert!(price_to_tick(0.0).is_err());
        assert!(price_to_tick(f64::NAN).is_err());
    }

    #[test]
    fn usable_ticks_for_common_spacings() {
        assert_eq!(min_usable_tick(1), MIN_TICK);
        assert_eq!(max_usable_tick(10), 887270);
        assert_eq!(min_usable_tick(60), -887220);
        assert_eq!(max_usable_tick(200), 887200);
    }

    #[test]
    fn check_tick_rejects_bad_input() {
        assert!(check_tick(120, 60).is_ok());
        assert!(check_tick(-120, 60).is_ok());
        assert_eq!(
            check_tick(61, 60),
            Err(ValidationError::TickNotOnSpacing {
                tick: 61,
                spacing: 60
            })
        );
        assert_eq!(check_tick(0, 0), Err(ValidationError::InvalidTickSpacing(0)));
        assert_eq!(
            check_tick(MAX_TICK + 1, 1),
            Err(ValidationError::TickOutOfBounds(MAX_TICK + 1))
        );
        assert_eq!(
            check_tick_range(60, 60, 60),
            Err(ValidationError::InvalidTickRange {
                lower: 60,
                upper: 60
            })
        );
    }
}
