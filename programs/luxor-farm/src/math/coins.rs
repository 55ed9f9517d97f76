//! Multi-denomination amounts and fixed-point reward ratios.
//!
//! `Coins` holds whole token amounts, `DecCoins` holds per-unit ratios scaled
//! by [`RATIO_SCALE`]. Every conversion between the two truncates toward zero,
//! so a locker can never be paid more than the pool emitted.

use super::U256;
use crate::error::ErrorCode;
use crate::RATIO_SCALE;
use anchor_lang::prelude::*;

/// A single token amount.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coin {
    /// Token mint (the denomination).
    pub mint: Pubkey,
    /// Amount in base units.
    pub amount: u64,
}

impl Coin {
    /// Serialized size: mint + amount.
    pub const LEN: usize = 32 + 8;

    pub fn new(mint: Pubkey, amount: u64) -> Self {
        Self { mint, amount }
    }
}

/// A multi-denomination amount, kept sorted by mint with no zero entries.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_coin(coin: Coin) -> Self {
        let mut coins = Self::empty();
        if coin.amount > 0 {
            coins.0.push(coin);
        }
        coins
    }

    /// Builds a normalized set, summing duplicate mints.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Result<Self> {
        let mut out = Self::empty();
        for coin in coins {
            out.add_coin(coin)?;
        }
        Ok(out)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Coin> {
        self.0.clone()
    }

    pub fn amount_of(&self, mint: &Pubkey) -> u64 {
        self.0
            .binary_search_by(|c| c.mint.cmp(mint))
            .map(|i| self.0[i].amount)
            .unwrap_or(0)
    }

    pub fn add_coin(&mut self, coin: Coin) -> Result<()> {
        if coin.amount == 0 {
            return Ok(());
        }
        match self.0.binary_search_by(|c| c.mint.cmp(&coin.mint)) {
            Ok(i) => {
                self.0[i].amount = self.0[i]
                    .amount
                    .checked_add(coin.amount)
                    .ok_or(error!(ErrorCode::MathOverflow))?;
            }
            Err(i) => self.0.insert(i, coin),
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Coins) -> Result<Coins> {
        let mut out = self.clone();
        for coin in other.iter() {
            out.add_coin(*coin)?;
        }
        Ok(out)
    }

    /// Subtracts `other`, or returns `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut out = self.clone();
        for coin in other.iter() {
            let i = out.0.binary_search_by(|c| c.mint.cmp(&coin.mint)).ok()?;
            let left = out.0[i].amount.checked_sub(coin.amount)?;
            if left == 0 {
                out.0.remove(i);
            } else {
                out.0[i].amount = left;
            }
        }
        Some(out)
    }

    /// True when every denomination of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.iter().all(|c| self.amount_of(&c.mint) >= c.amount)
    }
}

/// Per-unit reward ratio of one denomination, scaled by [`RATIO_SCALE`].
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecCoin {
    pub mint: Pubkey,
    pub amount: u128,
}

impl DecCoin {
    /// Serialized size: mint + scaled amount.
    pub const LEN: usize = 32 + 16;
}

/// A multi-denomination ratio vector, sorted by mint with no zero entries.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecCoins(Vec<DecCoin>);

impl DecCoins {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecCoin> {
        self.0.iter()
    }

    pub fn amount_of(&self, mint: &Pubkey) -> u128 {
        self.0
            .binary_search_by(|c| c.mint.cmp(mint))
            .map(|i| self.0[i].amount)
            .unwrap_or(0)
    }

    /// `coins / divisor`, truncated at [`RATIO_SCALE`] precision.
    pub fn quo_truncate(coins: &Coins, divisor: u64) -> Result<DecCoins> {
        require_gt!(divisor, 0, ErrorCode::MathOverflow);
        let mut out = Vec::with_capacity(coins.len());
        for coin in coins.iter() {
            let amount = (coin.amount as u128)
                .checked_mul(RATIO_SCALE)
                .ok_or(error!(ErrorCode::MathOverflow))?
                / divisor as u128;
            if amount > 0 {
                out.push(DecCoin {
                    mint: coin.mint,
                    amount,
                });
            }
        }
        Ok(DecCoins(out))
    }

    pub fn checked_add(&self, other: &DecCoins) -> Result<DecCoins> {
        let mut out = self.0.clone();
        for dec in other.iter() {
            match out.binary_search_by(|c| c.mint.cmp(&dec.mint)) {
                Ok(i) => {
                    out[i].amount = out[i]
                        .amount
                        .checked_add(dec.amount)
                        .ok_or(error!(ErrorCode::MathOverflow))?;
                }
                Err(i) => out.insert(i, *dec),
            }
        }
        Ok(DecCoins(out))
    }

    /// Subtracts `other`, or returns `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &DecCoins) -> Option<DecCoins> {
        let mut out = self.0.clone();
        for dec in other.iter() {
            let i = out.binary_search_by(|c| c.mint.cmp(&dec.mint)).ok()?;
            out[i].amount = out[i].amount.checked_sub(dec.amount)?;
        }
        out.retain(|c| c.amount > 0);
        Some(DecCoins(out))
    }

    /// `self × amount`, truncated back to whole base units.
    pub fn mul_truncate(&self, amount: u64) -> Result<Coins> {
        let mut out = Coins::empty();
        for dec in self.iter() {
            let product = U256::from(dec.amount)
                .checked_mul(U256::from(amount))
                .ok_or(error!(ErrorCode::MathOverflow))?
                / U256::from(RATIO_SCALE);
            require!(
                product <= U256::from(u64::MAX),
                ErrorCode::MathOverflow
            );
            out.add_coin(Coin::new(dec.mint, product.low_u64()))?;
        }
        Ok(out)
    }
}
