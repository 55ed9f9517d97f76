use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

declare_id!("9s2UcwUqYDuarKZc4C2GJ1m1Qq5jLijpAC2avDFk2eXu");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Luxor Farm",
    project_url: "https://luxor.foundation",
    contacts: "email:security@luxor.foundation",
    policy: "https://luxor.foundation/security",
    source_code: "https://github.com/Luxor-Foundation/luxor-farm"
}

pub mod admin {
    use anchor_lang::prelude::declare_id;
    declare_id!("BqfwDtWm3666HAhF3gn952LJSc6eZWVdbUqjvKK6e4w7");
}

pub const AUTH_SEED: &str = "farm_vault_auth";
pub const LOCK_VAULT_SEED: &str = "farm_lock_vault";
pub const REWARD_VAULT_SEED: &str = "farm_reward_vault";
pub const DEPOSIT_VAULT_SEED: &str = "farm_deposit_vault";

/// Fixed-point scale of cumulative reward ratios (reward per locked base unit).
pub const RATIO_SCALE: u128 = 1_000_000_000_000_000_000;

pub mod curve;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod math;
pub mod states;
pub mod utils;

use instructions::*;

#[program]
pub mod luxor_farm {

    use super::*;

    pub fn initialise_config(
        ctx: Context<InitialiseConfig>,
        admin: Pubkey,
        pool_creation_fee: u64,
        pool_deposit: u64,
    ) -> Result<()> {
        instructions::initialise_config(ctx, admin, pool_creation_fee, pool_deposit)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    pub fn create_pool<'info>(
        ctx: Context<'_, '_, '_, 'info, CreatePool<'info>>,
        pool_name: String,
        min_lock_amount: u64,
    ) -> Result<()> {
        instructions::create_pool(ctx, pool_name, min_lock_amount)
    }

    pub fn destroy_pool<'info>(
        ctx: Context<'_, '_, '_, 'info, DestroyPool<'info>>,
        pool_name: String,
    ) -> Result<()> {
        instructions::destroy_pool(ctx, pool_name)
    }

    pub fn provide<'info>(
        ctx: Context<'_, '_, '_, 'info, Provide<'info>>,
        pool_name: String,
        amount: u64,
        amount_yielded_per_block: u64,
        start_block_height: u64,
    ) -> Result<()> {
        instructions::provide(
            ctx,
            pool_name,
            amount,
            amount_yielded_per_block,
            start_block_height,
        )
    }

    pub fn lock<'info>(
        ctx: Context<'_, '_, '_, 'info, Lock<'info>>,
        pool_name: String,
        amount: u64,
    ) -> Result<()> {
        instructions::lock(ctx, pool_name, amount)
    }

    pub fn unlock<'info>(
        ctx: Context<'_, '_, '_, 'info, Unlock<'info>>,
        pool_name: String,
        amount: u64,
    ) -> Result<()> {
        instructions::unlock(ctx, pool_name, amount)
    }

    pub fn claim<'info>(
        ctx: Context<'_, '_, '_, 'info, Claim<'info>>,
        pool_name: String,
    ) -> Result<()> {
        instructions::claim(ctx, pool_name)
    }

    pub fn credit_rewards<'info>(
        ctx: Context<'_, '_, '_, 'info, CreditRewards<'info>>,
        pool_name: String,
        amount: u64,
    ) -> Result<()> {
        instructions::credit_rewards(ctx, pool_name, amount)
    }

    pub fn add_to_whitelist<'info>(
        ctx: Context<'_, '_, '_, 'info, AddToWhitelist<'info>>,
        pool_name: String,
    ) -> Result<()> {
        instructions::add_to_whitelist(ctx, pool_name)
    }

    pub fn remove_from_whitelist<'info>(
        ctx: Context<'_, '_, '_, 'info, RemoveFromWhitelist<'info>>,
        pool_name: String,
    ) -> Result<()> {
        instructions::remove_from_whitelist(ctx, pool_name)
    }
}
