use crate::engine;
use crate::math::Coin;
use crate::states::*;
use crate::utils::{collect_accounts, AccountStore, VaultLedger};
use crate::{AUTH_SEED, LOCK_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `lock`.
///
/// Remaining accounts:
/// - checkpoints the settlement touches: the last closed period
///   (`current.period - 1`), the open period (`current.period`) and, for an
///   existing lock, its reference period;
/// - for an existing lock, per reward mint: the reward vault, the mint and
///   the owner's token account.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct Lock<'info> {
    /// Locker; pays rent for new records.
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; signs reward payouts.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    pub lock_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = lock_mint,
        token::authority = owner,
    )]
    pub owner_lock_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [LOCK_VAULT_SEED.as_bytes(), pool_name.as_bytes(), lock_mint.key().as_ref()],
        bump,
    )]
    pub lock_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: PDA derivation enforced by seeds; written by the farm store.
    #[account(
        mut,
        seeds = [FARM_POOL_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; written by the farm store.
    #[account(
        mut,
        seeds = [CURRENT_REWARDS_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub current_rewards: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; written by the farm store.
    #[account(
        mut,
        seeds = [LOCK_INFO_SEED.as_bytes(), pool_name.as_bytes(), owner.key().as_ref()],
        bump,
    )]
    pub lock_info: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Locks `amount` of the pool's lock token.
///
/// Steps:
/// 1. Validate mint, amount and the pool minimum.
/// 2. Move tokens into the lock vault.
/// 3. Close the open period and settle the owner's pending rewards.
/// 4. Grow the lock and the pool's locked value; emit `TokensLocked`.
pub fn lock<'info>(
    ctx: Context<'_, '_, '_, 'info, Lock<'info>>,
    pool_name: String,
    amount: u64,
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
                ctx.accounts.lock_info.to_account_info(),
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
                ctx.accounts.lock_mint.to_account_info(),
                ctx.accounts.owner_lock_token.to_account_info(),
                ctx.accounts.lock_vault.to_account_info(),
            ],
            ctx.remaining_accounts,
        ),
    );

    let rewards = engine::lock(
        &mut store,
        &mut ledger,
        &owner,
        &pool_name,
        Coin::new(ctx.accounts.lock_mint.key(), amount),
        height,
    )?;
    let total_locked = engine::query_lock_info(&store, &pool_name, &owner)?.amount;

    store.commit()?;
    emit!(TokensLocked {
        pool_name,
        owner,
        amount,
        total_locked,
        rewards: rewards.to_vec(),
    });
    Ok(())
}
