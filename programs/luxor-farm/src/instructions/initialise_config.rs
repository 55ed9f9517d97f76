use crate::error::ErrorCode;
use crate::states::*;
use crate::DEPOSIT_VAULT_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `initialise_config`.
///
/// This handler:
/// - Initializes the farm configuration PDA.
/// - Creates the farm-wide deposit vault for `fee_mint`, owned by the authority PDA.
#[derive(Accounts)]
pub struct InitialiseConfig<'info> {
    /// Program admin signer; pays for the new accounts.
    #[account(
        mut,
        address = crate::admin::id() @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    /// Vault authority PDA.
    ///
    /// CHECK: PDA derivation enforced via seeds. Used only as the vault owner.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        init,
        seeds = [FARM_CONFIG_SEED.as_bytes()],
        bump,
        payer = owner,
        space = FarmConfig::LEN
    )]
    pub farm_config: Account<'info, FarmConfig>,

    /// Quote token used to price locked value.
    pub quote_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token the creation fee and deposit are paid in.
    pub fee_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Escrow for pool creation deposits.
    #[account(
        init,
        seeds = [DEPOSIT_VAULT_SEED.as_bytes()],
        bump,
        payer = owner,
        token::mint = fee_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub deposit_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Writes the farm configuration.
pub fn initialise_config(
    ctx: Context<InitialiseConfig>,
    admin: Pubkey,
    pool_creation_fee: u64,
    pool_deposit: u64,
) -> Result<()> {
    require_keys_neq!(admin, Pubkey::default());

    let farm_config = ctx.accounts.farm_config.deref_mut();
    farm_config.bump = ctx.bumps.farm_config;
    farm_config.admin = admin;
    farm_config.quote_mint = ctx.accounts.quote_mint.key();
    farm_config.fee_mint = ctx.accounts.fee_mint.key();
    farm_config.deposit_vault = ctx.accounts.deposit_vault.key();
    farm_config.pool_creation_fee = pool_creation_fee;
    farm_config.pool_deposit = pool_deposit;
    msg!("Farm Config initialized");

    emit!(FarmConfigInitialized {
        admin,
        quote_mint: farm_config.quote_mint,
        fee_mint: farm_config.fee_mint,
        deposit_vault: farm_config.deposit_vault,
        pool_creation_fee,
        pool_deposit,
    });
    Ok(())
}
