//! Pricing collaborator: admission checks and locked-value valuation.

use crate::curve::ConstantProductCurve;
use crate::error::ErrorCode;
use crate::math::{Coin, Coins, U256};
use crate::states::FarmPool;
use anchor_lang::prelude::*;

pub trait PricingOracle {
    /// True when an AMM pair between the two tokens exists.
    fn pool_exists(&self, token_a: &Pubkey, token_b: &Pubkey) -> bool;

    /// Constituents of `mint` when it is an LP token.
    fn lp_constituents(&self, mint: &Pubkey) -> Option<(Pubkey, Pubkey)>;

    /// Amounts of `token_a` and `token_b` that `lp_amount` LP tokens redeem for.
    fn redeemable_assets(
        &self,
        token_a: &Pubkey,
        token_b: &Pubkey,
        lp_amount: u64,
    ) -> Result<(Coin, Coin)>;

    /// Quote tokens `coin` would swap into, zero when there is no pair.
    fn price_in_quote(&self, coin: &Coin, quote_mint: &Pubkey) -> u128;
}

/// Fails with `NoPricePath` unless `lock_mint` can be valued in `quote_mint`.
pub fn check_price_path<O: PricingOracle + ?Sized>(
    oracle: &O,
    lock_mint: &Pubkey,
    quote_mint: &Pubkey,
) -> Result<()> {
    let priced = |mint: &Pubkey| mint == quote_mint || oracle.pool_exists(mint, quote_mint);
    let admitted = match oracle.lp_constituents(lock_mint) {
        Some((token_0, token_1)) => {
            token_0 == *quote_mint || token_1 == *quote_mint || (priced(&token_0) && priced(&token_1))
        }
        None => priced(lock_mint),
    };
    require!(admitted, ErrorCode::NoPricePath);
    Ok(())
}

/// Value of everything locked in `pool`, in quote-token base units.
pub fn locked_pool_value<O: PricingOracle + ?Sized>(
    oracle: &O,
    pool: &FarmPool,
    quote_mint: &Pubkey,
) -> Result<u128> {
    if pool.total_value_locked == 0 {
        return Ok(0);
    }
    let value = match oracle.lp_constituents(&pool.lock_mint) {
        Some((token_0, token_1)) => {
            let (amount_0, amount_1) =
                oracle.redeemable_assets(&token_0, &token_1, pool.total_value_locked)?;
            if token_0 == *quote_mint || token_1 == *quote_mint {
                let (base, quote) = if amount_0.mint == *quote_mint {
                    (amount_1, amount_0)
                } else {
                    (amount_0, amount_1)
                };
                oracle
                    .price_in_quote(&base, quote_mint)
                    .checked_add(quote.amount as u128)
            } else {
                oracle
                    .price_in_quote(&amount_0, quote_mint)
                    .checked_add(oracle.price_in_quote(&amount_1, quote_mint))
            }
            .ok_or(error!(ErrorCode::MathOverflow))?
        }
        None => oracle.price_in_quote(
            &Coin::new(pool.lock_mint, pool.total_value_locked),
            quote_mint,
        ),
    };
    Ok(value)
}

/// Splits `total` across pools in proportion to their locked value.
///
/// Every pool but the last gets its truncated share; the last one gets the
/// remainder so nothing is lost. Pools with zero value get nothing, and with
/// no value at all nothing is split.
pub fn split_rewards_by_value(
    total: &Coins,
    pool_values: &[(String, u128)],
) -> Result<Vec<(String, Coins)>> {
    let total_value = pool_values
        .iter()
        .try_fold(0u128, |acc, (_, value)| acc.checked_add(*value))
        .ok_or(error!(ErrorCode::MathOverflow))?;
    if total_value == 0 {
        return Ok(Vec::new());
    }
    let valued: Vec<&(String, u128)> = pool_values.iter().filter(|(_, v)| *v > 0).collect();

    let mut left = total.clone();
    let mut shares = Vec::with_capacity(valued.len());
    for (i, (pool_name, value)) in valued.iter().enumerate() {
        let share = if i + 1 == valued.len() {
            left.clone()
        } else {
            let mut share = Coins::empty();
            for coin in total.iter() {
                let amount = U256::from(coin.amount) * U256::from(*value)
                    / U256::from(total_value);
                share.add_coin(Coin::new(coin.mint, amount.low_u64()))?;
            }
            share
        };
        left = left
            .checked_sub(&share)
            .ok_or(error!(ErrorCode::MathOverflow))?;
        shares.push((pool_name.clone(), share));
    }
    Ok(shares)
}

/// Constant-product reserves of one AMM pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReservePair {
    pub mint_0: Pubkey,
    pub reserve_0: u64,
    pub mint_1: Pubkey,
    pub reserve_1: u64,
    /// LP mint and its supply when the pair's LP token is known.
    pub lp_mint: Option<(Pubkey, u64)>,
}

impl ReservePair {
    fn joins(&self, a: &Pubkey, b: &Pubkey) -> bool {
        (self.mint_0 == *a && self.mint_1 == *b) || (self.mint_0 == *b && self.mint_1 == *a)
    }
}

/// Oracle over a fixed set of pair reserves.
#[derive(Clone, Debug, Default)]
pub struct ReservePairsOracle {
    pairs: Vec<ReservePair>,
}

impl ReservePairsOracle {
    pub fn new(pairs: Vec<ReservePair>) -> Self {
        Self { pairs }
    }

    fn pair(&self, a: &Pubkey, b: &Pubkey) -> Option<&ReservePair> {
        self.pairs
            .iter()
            .find(|p| p.joins(a, b) && p.reserve_0 > 0 && p.reserve_1 > 0)
    }
}

impl PricingOracle for ReservePairsOracle {
    fn pool_exists(&self, token_a: &Pubkey, token_b: &Pubkey) -> bool {
        self.pair(token_a, token_b).is_some()
    }

    fn lp_constituents(&self, mint: &Pubkey) -> Option<(Pubkey, Pubkey)> {
        self.pairs
            .iter()
            .find(|p| matches!(p.lp_mint, Some((lp, _)) if lp == *mint))
            .map(|p| (p.mint_0, p.mint_1))
    }

    fn redeemable_assets(
        &self,
        token_a: &Pubkey,
        token_b: &Pubkey,
        lp_amount: u64,
    ) -> Result<(Coin, Coin)> {
        let pair = self
            .pairs
            .iter()
            .find(|p| p.joins(token_a, token_b))
            .ok_or(error!(ErrorCode::NoPricePath))?;
        let (_, supply) = pair.lp_mint.ok_or(error!(ErrorCode::NoPricePath))?;
        let result = ConstantProductCurve::lp_tokens_to_trading_tokens(
            lp_amount as u128,
            supply as u128,
            pair.reserve_0 as u128,
            pair.reserve_1 as u128,
        )
        .ok_or(error!(ErrorCode::MathOverflow))?;
        let amount_0 = u64::try_from(result.token_0_amount)
            .map_err(|_| error!(ErrorCode::MathOverflow))?;
        let amount_1 = u64::try_from(result.token_1_amount)
            .map_err(|_| error!(ErrorCode::MathOverflow))?;
        let coin_0 = Coin::new(pair.mint_0, amount_0);
        let coin_1 = Coin::new(pair.mint_1, amount_1);
        if pair.mint_0 == *token_a {
            Ok((coin_0, coin_1))
        } else {
            Ok((coin_1, coin_0))
        }
    }

    fn price_in_quote(&self, coin: &Coin, quote_mint: &Pubkey) -> u128 {
        if coin.mint == *quote_mint {
            return coin.amount as u128;
        }
        let Some(pair) = self.pair(&coin.mint, quote_mint) else {
            return 0;
        };
        let (reserve_in, reserve_out) = if pair.mint_0 == coin.mint {
            (pair.reserve_0, pair.reserve_1)
        } else {
            (pair.reserve_1, pair.reserve_0)
        };
        ConstantProductCurve::swap_base_input_without_fees(
            coin.amount as u128,
            reserve_in as u128,
            reserve_out as u128,
        )
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    fn quote() -> Pubkey {
        key(1)
    }

    fn oracle() -> ReservePairsOracle {
        ReservePairsOracle::new(vec![
            // base/quote with LP token 10
            ReservePair {
                mint_0: key(2),
                reserve_0: 1_000,
                mint_1: quote(),
                reserve_1: 4_000,
                lp_mint: Some((key(10), 2_000)),
            },
            // other/quote
            ReservePair {
                mint_0: key(3),
                reserve_0: 500,
                mint_1: quote(),
                reserve_1: 500,
                lp_mint: None,
            },
            // base/other with LP token 11, neither side is the quote
            ReservePair {
                mint_0: key(2),
                reserve_0: 100,
                mint_1: key(3),
                reserve_1: 100,
                lp_mint: Some((key(11), 100)),
            },
        ])
    }

    fn pool(lock_mint: Pubkey, tvl: u64) -> FarmPool {
        FarmPool {
            lock_mint,
            total_value_locked: tvl,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_price_path() {
        let oracle = oracle();
        assert!(check_price_path(&oracle, &quote(), &quote()).is_ok());
        assert!(check_price_path(&oracle, &key(2), &quote()).is_ok());
        assert!(check_price_path(&oracle, &key(10), &quote()).is_ok());
        assert!(check_price_path(&oracle, &key(11), &quote()).is_ok());
        assert!(check_price_path(&oracle, &key(4), &quote()).is_err());
    }

    #[test]
    fn lp_with_quote_side_values_both_halves() {
        // 200 of 2000 LP redeem 100 base + 400 quote; 100 base sells for 4000*100/1100
        let value = locked_pool_value(&oracle(), &pool(key(10), 200), &quote()).unwrap();
        assert_eq!(value, 400 + 363);
    }

    #[test]
    fn lp_without_quote_side_sells_both_halves() {
        // 10 of 100 LP redeem 10 + 10; each sells into its quote pair
        let value = locked_pool_value(&oracle(), &pool(key(11), 10), &quote()).unwrap();
        let base = 4_000u128 * 10 / 1_010;
        let other = 500u128 * 10 / 510;
        assert_eq!(value, base + other);
    }

    #[test]
    fn plain_token_value() {
        let oracle = oracle();
        assert_eq!(
            locked_pool_value(&oracle, &pool(key(3), 500), &quote()).unwrap(),
            250
        );
        assert_eq!(
            locked_pool_value(&oracle, &pool(quote(), 77), &quote()).unwrap(),
            77
        );
        assert_eq!(
            locked_pool_value(&oracle, &pool(key(4), 77), &quote()).unwrap(),
            0
        );
        assert_eq!(
            locked_pool_value(&oracle, &pool(key(3), 0), &quote()).unwrap(),
            0
        );
    }

    #[test]
    fn split_gives_remainder_to_last_pool() {
        let total = Coins::from_coin(Coin::new(quote(), 100));
        let shares = split_rewards_by_value(
            &total,
            &[
                ("a".to_string(), 1),
                ("idle".to_string(), 0),
                ("b".to_string(), 2),
            ],
        )
        .unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].1.amount_of(&quote()), 33);
        assert_eq!(shares[1].0, "b");
        assert_eq!(shares[1].1.amount_of(&quote()), 67);
    }

    #[test]
    fn split_without_value_is_empty() {
        let total = Coins::from_coin(Coin::new(quote(), 100));
        assert!(split_rewards_by_value(&total, &[("a".to_string(), 0)])
            .unwrap()
            .is_empty());
    }
}
