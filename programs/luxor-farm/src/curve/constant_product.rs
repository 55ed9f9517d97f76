//! Constant-product (x * y = k) pricing used to value locked tokens.

/// Pair of trading-token amounts backing an LP position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TradingTokenResult {
    pub token_0_amount: u128,
    pub token_1_amount: u128,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstantProductCurve;

impl ConstantProductCurve {
    /// Output of selling `input_amount` into the pool, ignoring fees.
    ///
    /// Returns `None` when either reserve is empty or the product overflows.
    pub fn swap_base_input_without_fees(
        input_amount: u128,
        input_vault_amount: u128,
        output_vault_amount: u128,
    ) -> Option<u128> {
        if input_vault_amount == 0 || output_vault_amount == 0 {
            return None;
        }
        // (x + delta_x) * (y - delta_y) = x * y
        // delta_y = (delta_x * y) / (x + delta_x)
        let numerator = input_amount.checked_mul(output_vault_amount)?;
        let denominator = input_vault_amount.checked_add(input_amount)?;
        numerator.checked_div(denominator)
    }

    /// Trading tokens redeemable for `lp_token_amount`, rounded down.
    pub fn lp_tokens_to_trading_tokens(
        lp_token_amount: u128,
        lp_token_supply: u128,
        token_0_vault_amount: u128,
        token_1_vault_amount: u128,
    ) -> Option<TradingTokenResult> {
        let token_0_amount = lp_token_amount
            .checked_mul(token_0_vault_amount)?
            .checked_div(lp_token_supply)?;
        let token_1_amount = lp_token_amount
            .checked_mul(token_1_vault_amount)?
            .checked_div(lp_token_supply)?;
        Some(TradingTokenResult {
            token_0_amount,
            token_1_amount,
        })
    }
}
