use crate::engine::FarmParams;
use crate::math::Coin;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Farm Configuration Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the farm configuration account.
pub const FARM_CONFIG_SEED: &str = "farm_config";

/// Protocol-wide farm settings, created once by `initialise_config`.
///
/// Holds the quote token every whitelisted pool must be priceable in and the
/// economics of opening a pool: a creation fee that is burned and a deposit
/// that is escrowed until the pool is destroyed. Both are paid in `fee_mint`.
#[account]
#[derive(Default, Debug)]
pub struct FarmConfig {
    /// PDA bump for this account.
    pub bump: u8,

    /// Admin allowed to change settings, credit rewards and manage the whitelist.
    pub admin: Pubkey,

    /// Quote token used for admission checks and locked-value pricing.
    pub quote_mint: Pubkey,

    /// Token in which the creation fee and the deposit are paid.
    pub fee_mint: Pubkey,

    /// Program-owned vault escrowing pool deposits.
    pub deposit_vault: Pubkey,

    /// Fee burned on every pool creation (base units of `fee_mint`).
    pub pool_creation_fee: u64,

    /// Deposit escrowed on pool creation and refunded on destroy.
    pub pool_deposit: u64,
}

impl FarmConfig {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 4: four Pubkeys
    /// - 8 * 2: two u64 fields
    pub const LEN: usize = 8 + 1 + 32 * 4 + 8 * 2;

    pub fn params(&self) -> FarmParams {
        FarmParams {
            quote_mint: self.quote_mint,
            creation_fee: Coin::new(self.fee_mint, self.pool_creation_fee),
            deposit: Coin::new(self.fee_mint, self.pool_deposit),
        }
    }
}
