use crate::error::Error;
use crate::math::fee_math::accrued_fees;
use crate::math::liquidity_math::amounts_for_liquidity;
use crate::snapshot::PositionSnapshot;
use crate::tick_index::TickIndex;
use alloy_primitives::U256;
use serde::Serialize;

/// A pair of token amounts in each token's smallest unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TokenAmounts {
    pub amount0: U256,
    pub amount1: U256,
}

impl TokenAmounts {
    pub fn new(amount0: U256, amount1: U256) -> Self {
        Self { amount0, amount1 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionSummary {
    /// Owed fees, including amounts recorded before the snapshot.
    pub fees: TokenAmounts,
    /// What burning all of the position's liquidity would return.
    pub amounts: TokenAmounts,
    /// Whether the pool's current tick lies in `[tick_lower, tick_upper)`.
    pub in_range: bool,
}

/// Fee and principal accounting for positions in one pool snapshot.
pub struct PositionAccountant<'a> {
    index: &'a TickIndex,
}

impl<'a> PositionAccountant<'a> {
    pub fn new(index: &'a TickIndex) -> Self {
        Self { index }
    }

    /// Fees owed to `position`: what was already recorded plus
    /// `liquidity * (inside - inside_last) / 2^128` per token, with the
    /// counter difference taken modulo 2^256.
    pub fn uncollected_fees(&self, position: &PositionSnapshot) -> Result<TokenAmounts, Error> {
        let pool = self.index.pool();
        position.validate(pool.tick_spacing)?;

        let (inside_0, inside_1) = self.index.fee_growth_inside(
            position.tick_lower,
            position.tick_upper,
            pool.tick,
            pool.fee_growth_global_0_x128,
            pool.fee_growth_global_1_x128,
        );

        let fee0 = accrued_fees(
            position.liquidity,
            inside_0,
            position.fee_growth_inside_0_last_x128,
        )?;
        let fee1 = accrued_fees(
            position.liquidity,
            inside_1,
            position.fee_growth_inside_1_last_x128,
        )?;

        Ok(TokenAmounts::new(
            U256::from(position.tokens_owed_0) + U256::from(fee0),
            U256::from(position.tokens_owed_1) + U256::from(fee1),
        ))
    }

    /// Token amounts `position` would withdraw at the pool's current price,
    /// rounded down.
    pub fn withdrawable_amounts(&self, position: &PositionSnapshot) -> Result<TokenAmounts, Error> {
        let pool = self.index.pool();
        position.validate(pool.tick_spacing)?;

        let (amount0, amount1) = amounts_for_liquidity(
            self.index.sqrt_price_at(position.tick_lower)?,
            self.index.sqrt_price_at(position.tick_upper)?,
            pool.sqrt_price_x96,
            position.liquidity,
        )?;
        Ok(TokenAmounts::new(amount0, amount1))
    }

    pub fn summary(&self, position: &PositionSnapshot) -> Result<PositionSummary, Error> {
        Ok(PositionSummary {
            fees: self.uncollected_fees(position)?,
            amounts: self.withdrawable_amounts(position)?,
            in_range: position.contains(self.index.pool().tick),
        })
    }
}
