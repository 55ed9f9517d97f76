use crate::error::ErrorCode;
use crate::math::{Coin, Coins};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// FarmPool Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive a pool account: `FARM_POOL_SEED + pool_name`.
pub const FARM_POOL_SEED: &str = "farm_pool";

/// Pool names double as PDA seeds, which cap them at 32 bytes.
pub const MAX_POOL_NAME_LEN: usize = 32;

/// Upper bound on emission schedules per pool.
pub const MAX_YIELDED_TOKENS: usize = 4;

/// Upper bound on reward denominations a pool can account for.
pub const MAX_REWARD_DENOMS: usize = 8;

/// Emission schedule for one reward token.
///
/// Tokens are released at `amount_yielded_per_block` from
/// `start_block_height_to_yield` until `remaining_amount` runs out.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YieldedTokenInfo {
    pub mint: Pubkey,
    pub start_block_height_to_yield: u64,
    pub amount_yielded_per_block: u64,
    pub remaining_amount: u64,
}

impl YieldedTokenInfo {
    pub const LEN: usize = 32 + 8 * 3;

    /// An exhausted schedule waiting for its first `provide`.
    pub fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            ..Default::default()
        }
    }
}

/// A named farm pool.
///
/// Tracks the lock token, the emission schedules and the reward totals. Per
/// locker state lives in `LockInfo`, checkpoint state in `PoolCurrentRewards`
/// and `PoolHistoricalRewards`.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct FarmPool {
    /// Unique pool name (also the seed of every per-pool PDA).
    pub name: String,

    /// Creator; the only account allowed to destroy the pool.
    pub owner: Pubkey,

    /// Token accepted for locking.
    pub lock_mint: Pubkey,

    /// Smallest non-zero amount a locker may hold.
    pub min_lock_amount: u64,

    /// Deposit taken at creation, refunded on destroy.
    pub deposit_amount: Coin,

    /// Sum of every locker's amount.
    pub total_value_locked: u64,

    /// Emission schedules, one per reward token.
    pub yielded_token_infos: Vec<YieldedTokenInfo>,

    /// Rewards released or credited to the pool and not yet paid out.
    pub total_accumulated_rewards: Coins,

    /// Number of live `LockInfo` records.
    pub locker_count: u64,
}

impl FarmPool {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 4 + 32: name
    /// - 32 * 2: owner, lock mint
    /// - 8: min lock amount
    /// - 40: deposit coin
    /// - 8: total value locked
    /// - 4 + 56 * MAX_YIELDED_TOKENS: schedules
    /// - 4 + 40 * MAX_REWARD_DENOMS: accumulated rewards
    /// - 8: locker count
    pub const LEN: usize = 8
        + 4
        + MAX_POOL_NAME_LEN
        + 32 * 2
        + 8
        + Coin::LEN
        + 8
        + 4
        + YieldedTokenInfo::LEN * MAX_YIELDED_TOKENS
        + 4
        + Coin::LEN * MAX_REWARD_DENOMS
        + 8;

    pub fn seeds(pool_name: &str) -> Vec<Vec<u8>> {
        vec![
            FARM_POOL_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
        ]
    }

    pub fn yielded_info_mut(&mut self, mint: &Pubkey) -> Option<&mut YieldedTokenInfo> {
        self.yielded_token_infos.iter_mut().find(|info| &info.mint == mint)
    }

    /// Every mint the pool can pay out: scheduled tokens plus credited ones.
    pub fn reward_mints(&self) -> Vec<Pubkey> {
        let mut mints: Vec<Pubkey> = self
            .yielded_token_infos
            .iter()
            .map(|info| info.mint)
            .chain(self.total_accumulated_rewards.iter().map(|c| c.mint))
            .collect();
        mints.sort();
        mints.dedup();
        mints
    }

    /// True once nothing is locked and no schedule has tokens left.
    pub fn is_finished(&self) -> bool {
        self.total_value_locked == 0
            && self
                .yielded_token_infos
                .iter()
                .all(|info| info.remaining_amount == 0)
    }
}

pub fn validate_pool_name(name: &str) -> Result<()> {
    require!(
        !name.is_empty()
            && name.len() <= MAX_POOL_NAME_LEN
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-'),
        ErrorCode::InvalidPoolName
    );
    Ok(())
}
