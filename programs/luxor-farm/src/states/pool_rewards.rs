use crate::math::{Coin, Coins, DecCoin, DecCoins};
use crate::states::MAX_REWARD_DENOMS;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Pool Reward Checkpoints
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string for the open period of a pool: `CURRENT_REWARDS_SEED + pool_name`.
pub const CURRENT_REWARDS_SEED: &str = "pool_current_rewards";

/// PDA seed string for a closed period: `HISTORICAL_REWARDS_SEED + pool_name + period (le)`.
pub const HISTORICAL_REWARDS_SEED: &str = "pool_historical_rewards";

/// The open accounting period of a pool.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct PoolCurrentRewards {
    /// Height the period opened at.
    pub start_block_height: u64,

    /// Index of the open period. The last closed one is `period - 1`.
    pub period: u64,

    /// Rewards credited from outside during this period, consumed at close.
    pub rewards: Coins,
}

impl PoolCurrentRewards {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 8 * 2: start height, period
    /// - 4 + 40 * MAX_REWARD_DENOMS: credited rewards
    pub const LEN: usize = 8 + 8 * 2 + 4 + Coin::LEN * MAX_REWARD_DENOMS;

    pub fn seeds(pool_name: &str) -> Vec<Vec<u8>> {
        vec![
            CURRENT_REWARDS_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
        ]
    }
}

/// Checkpoint written when a period closes.
///
/// `cumulative_reward_ratio` is the reward per locked unit accrued from pool
/// creation to the end of the period. The record lives while a lock or the
/// following open period references it.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct PoolHistoricalRewards {
    pub cumulative_reward_ratio: DecCoins,
    pub reference_count: u16,
}

impl PoolHistoricalRewards {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 4 + 48 * MAX_REWARD_DENOMS: cumulative ratio
    /// - 2: reference count
    pub const LEN: usize = 8 + 4 + DecCoin::LEN * MAX_REWARD_DENOMS + 2;

    pub fn seeds(pool_name: &str, period: u64) -> Vec<Vec<u8>> {
        vec![
            HISTORICAL_REWARDS_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
            period.to_le_bytes().to_vec(),
        ]
    }
}
