use crate::states::MAX_POOL_NAME_LEN;
use anchor_lang::prelude::*;

/// PDA seed string for whitelist membership: `WHITELIST_SEED + pool_name`.
pub const WHITELIST_SEED: &str = "farm_whitelist";

/// Marks a pool as eligible for the externally split reward stream.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct WhitelistEntry {
    pub pool_name: String,
}

impl WhitelistEntry {
    pub const LEN: usize = 8 + 4 + MAX_POOL_NAME_LEN;

    pub fn seeds(pool_name: &str) -> Vec<Vec<u8>> {
        vec![
            WHITELIST_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
        ]
    }
}
