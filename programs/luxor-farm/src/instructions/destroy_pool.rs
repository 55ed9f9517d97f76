use crate::engine;
use crate::states::*;
use crate::utils::{collect_accounts, AccountStore, VaultLedger};
use crate::AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `destroy_pool`.
///
/// Remaining accounts:
/// - the checkpoint of the last closed period (`current.period - 1`);
/// - for each reward mint holding a refund: its reward vault, the mint and
///   the owner's token account.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct DestroyPool<'info> {
    /// Pool owner; receives the deposit, leftover rewards and record rent.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [FARM_CONFIG_SEED.as_bytes()],
        bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    /// CHECK: PDA derivation enforced by seeds; signs vault transfers.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = farm_config.fee_mint)]
    pub fee_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = fee_mint,
        token::authority = owner,
    )]
    pub owner_fee_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = farm_config.deposit_vault)]
    pub deposit_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: PDA derivation enforced by seeds; closed by the farm store.
    #[account(
        mut,
        seeds = [FARM_POOL_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; closed by the farm store.
    #[account(
        mut,
        seeds = [CURRENT_REWARDS_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub current_rewards: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; closed if present.
    #[account(
        mut,
        seeds = [WHITELIST_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub whitelist_entry: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Destroys a drained pool.
///
/// Steps:
/// 1. Check ownership and that nothing is locked or left to emit.
/// 2. Refund the deposit and every unclaimable reward to the owner.
/// 3. Close pool, checkpoint and whitelist records; emit `PoolDestroyed`.
pub fn destroy_pool<'info>(
    ctx: Context<'_, '_, '_, 'info, DestroyPool<'info>>,
    pool_name: String,
) -> Result<()> {
    let height = Clock::get()?.slot;
    let owner = ctx.accounts.owner.key();

    let mut store = AccountStore::new(
        ctx.program_id,
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        collect_accounts(
            vec![
                ctx.accounts.farm_pool.to_account_info(),
                ctx.accounts.current_rewards.to_account_info(),
                ctx.accounts.whitelist_entry.to_account_info(),
            ],
            ctx.remaining_accounts,
        ),
    );
    let mut ledger = VaultLedger::new(
        ctx.program_id,
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.authority.to_account_info(),
        ctx.bumps.authority,
        ctx.accounts.token_program.to_account_info(),
        collect_accounts(
            vec![
                ctx.accounts.fee_mint.to_account_info(),
                ctx.accounts.owner_fee_token.to_account_info(),
                ctx.accounts.deposit_vault.to_account_info(),
            ],
            ctx.remaining_accounts,
        ),
    );

    let refund = engine::destroy_pool(&mut store, &mut ledger, &owner, &pool_name, height)?;

    store.commit()?;
    emit!(PoolDestroyed {
        pool_name,
        owner,
        deposit_refunded: refund.deposit.amount,
        rewards_refunded: refund.rewards.to_vec(),
    });
    Ok(())
}
