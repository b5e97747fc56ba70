use crate::error::MathError;
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use alloy_primitives::U256;

/// Applies a signed liquidity delta, failing instead of wrapping.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs()).ok_or(MathError::Underflow)
    } else {
        x.checked_add(y as u128).ok_or(MathError::Overflow)
    }
}

/// Undoes a signed liquidity delta, as when price crosses a tick downward.
pub fn sub_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_add(y.unsigned_abs()).ok_or(MathError::Overflow)
    } else {
        x.checked_sub(y as u128).ok_or(MathError::Underflow)
    }
}

/// Token amounts held by `liquidity` over `[sqrt_lower, sqrt_upper)` when
/// the pool trades at `sqrt_current`, rounded down.
///
/// - `sqrt_current <= sqrt_lower`: the range is above the price, all token0.
/// - `sqrt_current >= sqrt_upper`: the range is below the price, all token1.
/// - otherwise token0 for `[current, upper)` and token1 for `[lower, current)`.
pub fn amounts_for_liquidity(
    sqrt_lower_x96: U256,
    sqrt_upper_x96: U256,
    sqrt_current_x96: U256,
    liquidity: u128,
) -> Result<(U256, U256), MathError> {
    let (lower, upper) = if sqrt_lower_x96 > sqrt_upper_x96 {
        (sqrt_upper_x96, sqrt_lower_x96)
    } else {
        (sqrt_lower_x96, sqrt_upper_x96)
    };

    if sqrt_current_x96 <= lower {
        Ok((get_amount_0_delta(lower, upper, liquidity, false)?, U256::ZERO))
    } else if sqrt_current_x96 < upper {
        Ok((
            get_amount_0_delta(sqrt_current_x96, upper, liquidity, false)?,
            get_amount_1_delta(lower, sqrt_current_x96, liquidity, false)?,
        ))
    } else {
        Ok((U256::ZERO, get_amount_1_delta(lower, upper, liquidity, false)?))
    }
}
