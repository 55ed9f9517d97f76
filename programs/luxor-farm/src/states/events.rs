use crate::math::Coin;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track farm state changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the farm configuration is initialized.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FarmConfigInitialized {
    pub admin: Pubkey,
    /// Quote token for admission and pricing.
    pub quote_mint: Pubkey,
    /// Token the creation fee and deposit are paid in.
    pub fee_mint: Pubkey,
    pub deposit_vault: Pubkey,
    pub pool_creation_fee: u64,
    pub pool_deposit: u64,
}

/// Emitted whenever configuration parameters are modified via `update_config`.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigUpdated {
    pub admin: Pubkey,
    pub quote_mint: Pubkey,
    pub pool_creation_fee: u64,
    pub pool_deposit: u64,
}

/// Emitted when a pool is opened.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolCreated {
    pub pool_name: String,
    pub owner: Pubkey,
    pub lock_mint: Pubkey,
    pub yield_mint: Pubkey,
    pub min_lock_amount: u64,
    /// Fee burned (base units of the fee mint).
    pub creation_fee: u64,
    /// Deposit escrowed until destroy.
    pub deposit: u64,
}

/// Emitted when a drained pool is removed.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolDestroyed {
    pub pool_name: String,
    pub owner: Pubkey,
    /// Deposit returned to the owner.
    pub deposit_refunded: u64,
    /// Unclaimable rewards returned to the owner, per mint.
    pub rewards_refunded: Vec<Coin>,
}

/// Emitted when a provider funds an emission schedule.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct YieldProvided {
    pub pool_name: String,
    pub provider: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub amount_yielded_per_block: u64,
    pub start_block_height: u64,
}

/// Emitted on every lock. `rewards` holds what was settled on the way.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct TokensLocked {
    pub pool_name: String,
    pub owner: Pubkey,
    pub amount: u64,
    pub total_locked: u64,
    pub rewards: Vec<Coin>,
}

/// Emitted on every unlock.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct TokensUnlocked {
    pub pool_name: String,
    pub owner: Pubkey,
    pub amount: u64,
    pub total_locked: u64,
    pub rewards: Vec<Coin>,
}

/// Emitted when a locker withdraws rewards.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsClaimed {
    pub pool_name: String,
    pub owner: Pubkey,
    pub rewards: Vec<Coin>,
}

/// Emitted when the external reward stream credits a pool.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsCredited {
    pub pool_name: String,
    pub mint: Pubkey,
    pub amount: u64,
}

/// Emitted when whitelist membership changes.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct WhitelistUpdated {
    pub pool_name: String,
    pub listed: bool,
}
