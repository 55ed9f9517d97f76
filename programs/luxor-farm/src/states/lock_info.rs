use crate::states::MAX_POOL_NAME_LEN;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// LockInfo Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive a lock: `LOCK_INFO_SEED + pool_name + owner`.
pub const LOCK_INFO_SEED: &str = "lock_info";

/// One owner's position in one pool.
///
/// Exists only while `amount > 0`. Pending rewards are
/// `(ratio[now] - ratio[reference_period]) * amount`.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct LockInfo {
    pub owner: Pubkey,

    pub pool_name: String,

    /// Locked amount of the pool's lock token.
    pub amount: u64,

    /// Height of the last settlement.
    pub start_block_height: u64,

    /// Closed period the position was last settled against.
    pub reference_period: u64,
}

impl LockInfo {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 32: owner
    /// - 4 + 32: pool name
    /// - 8 * 3: amount, start height, reference period
    pub const LEN: usize = 8 + 32 + 4 + MAX_POOL_NAME_LEN + 8 * 3;

    pub fn seeds(pool_name: &str, owner: &Pubkey) -> Vec<Vec<u8>> {
        vec![
            LOCK_INFO_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
            owner.to_bytes().to_vec(),
        ]
    }
}
