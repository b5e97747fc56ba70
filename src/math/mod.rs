pub mod math_helpers;
pub mod sqrt_price_math;
pub mod tick_math;

pub mod bit_math;

pub mod fee_math;
pub mod liquidity_math;
