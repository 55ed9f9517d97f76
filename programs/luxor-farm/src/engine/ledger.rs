use crate::error::ErrorCode;
use crate::math::{Coin, Coins};
use anchor_lang::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Which pool-owned escrow a transfer goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Escrow {
    /// Tokens locked by farmers.
    LockedTokens,
    /// Provided yield and credited rewards awaiting payout.
    Rewards,
    /// Pool creation deposits.
    Deposits,
}

/// Token movements between holders and pool escrows.
///
/// Every method either moves all of `coins` or fails without moving any.
pub trait TransferLedger {
    fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64>;

    fn move_to_escrow(
        &mut self,
        owner: &Pubkey,
        pool_name: &str,
        escrow: Escrow,
        coins: &Coins,
    ) -> Result<()>;

    fn move_from_escrow(
        &mut self,
        pool_name: &str,
        escrow: Escrow,
        owner: &Pubkey,
        coins: &Coins,
    ) -> Result<()>;

    fn burn(&mut self, owner: &Pubkey, coins: &Coins) -> Result<()>;
}

pub trait TokenRegistry {
    fn token_exists(&self, mint: &Pubkey) -> bool;
}

/// Fixed set of known mints.
#[derive(Clone, Debug, Default)]
pub struct KnownMints(BTreeSet<Pubkey>);

impl KnownMints {
    pub fn new(mints: impl IntoIterator<Item = Pubkey>) -> Self {
        Self(mints.into_iter().collect())
    }

    pub fn insert(&mut self, mint: Pubkey) {
        self.0.insert(mint);
    }
}

impl TokenRegistry for KnownMints {
    fn token_exists(&self, mint: &Pubkey) -> bool {
        self.0.contains(mint)
    }
}

/// In-memory balances for tests and simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryLedger {
    accounts: BTreeMap<(Pubkey, Pubkey), u64>,
    escrows: BTreeMap<(String, Escrow, Pubkey), u64>,
    burned: BTreeMap<Pubkey, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `owner` out of thin air.
    pub fn mint_to(&mut self, owner: &Pubkey, coin: Coin) {
        *self.accounts.entry((*owner, coin.mint)).or_default() += coin.amount;
    }

    pub fn escrow_balance(&self, pool_name: &str, escrow: Escrow, mint: &Pubkey) -> u64 {
        self.escrows
            .get(&(pool_name.to_string(), escrow, *mint))
            .copied()
            .unwrap_or(0)
    }

    pub fn burned(&self, mint: &Pubkey) -> u64 {
        self.burned.get(mint).copied().unwrap_or(0)
    }

    /// Supply of `mint` across holders, escrows and burns.
    pub fn total_supply(&self, mint: &Pubkey) -> u128 {
        let held: u128 = self
            .accounts
            .iter()
            .filter(|((_, m), _)| m == mint)
            .map(|(_, v)| *v as u128)
            .sum();
        let escrowed: u128 = self
            .escrows
            .iter()
            .filter(|((_, _, m), _)| m == mint)
            .map(|(_, v)| *v as u128)
            .sum();
        held + escrowed + self.burned(mint) as u128
    }

    fn require_balance(&self, owner: &Pubkey, coins: &Coins) -> Result<()> {
        for coin in coins.iter() {
            require!(
                self.balance(owner, &coin.mint)? >= coin.amount,
                ErrorCode::InsufficientFunds
            );
        }
        Ok(())
    }
}

impl TransferLedger for MemoryLedger {
    fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
        Ok(self.accounts.get(&(*owner, *mint)).copied().unwrap_or(0))
    }

    fn move_to_escrow(
        &mut self,
        owner: &Pubkey,
        pool_name: &str,
        escrow: Escrow,
        coins: &Coins,
    ) -> Result<()> {
        self.require_balance(owner, coins)?;
        for coin in coins.iter() {
            *self.accounts.entry((*owner, coin.mint)).or_default() -= coin.amount;
            *self
                .escrows
                .entry((pool_name.to_string(), escrow, coin.mint))
                .or_default() += coin.amount;
        }
        Ok(())
    }

    fn move_from_escrow(
        &mut self,
        pool_name: &str,
        escrow: Escrow,
        owner: &Pubkey,
        coins: &Coins,
    ) -> Result<()> {
        for coin in coins.iter() {
            require!(
                self.escrow_balance(pool_name, escrow, &coin.mint) >= coin.amount,
                ErrorCode::InsufficientFunds
            );
        }
        for coin in coins.iter() {
            *self
                .escrows
                .entry((pool_name.to_string(), escrow, coin.mint))
                .or_default() -= coin.amount;
            *self.accounts.entry((*owner, coin.mint)).or_default() += coin.amount;
        }
        Ok(())
    }

    fn burn(&mut self, owner: &Pubkey, coins: &Coins) -> Result<()> {
        self.require_balance(owner, coins)?;
        for coin in coins.iter() {
            *self.accounts.entry((*owner, coin.mint)).or_default() -= coin.amount;
            *self.burned.entry(coin.mint).or_default() += coin.amount;
        }
        Ok(())
    }
}
