use crate::Q128;
use crate::error::{Error, StateError};
use crate::math::math_helpers::mul_div;
use alloy_primitives::U256;
use tracing::warn;

/// Difference of two Q128.128 fee growth counters modulo 2^256.
///
/// Counters are allowed to overflow, so `later < earlier` is a normal
/// reading and must not trap.
#[inline]
pub fn fee_growth_delta(later: U256, earlier: U256) -> U256 {
    later.wrapping_sub(earlier)
}

/// Fees earned by `liquidity` since the inside counter read `last_x128`.
///
/// Anything wider than `u128` cannot have been paid into the pool and is
/// reported as an inconsistent snapshot.
pub fn accrued_fees(liquidity: u128, inside_x128: U256, last_x128: U256) -> Result<u128, Error> {
    if liquidity == 0 {
        return Ok(0);
    }
    let delta = fee_growth_delta(inside_x128, last_x128);
    let fees = mul_div(U256::from(liquidity), delta, Q128)?;
    u128::try_from(fees).map_err(|_| {
        warn!(liquidity, %fees, "fee accrual exceeds u128");
        StateError::ImpossibleFeeAccrual.into()
    })
}
