use crate::engine;
use crate::math::Coin;
use crate::states::*;
use crate::utils::{collect_accounts, AccountStore, VaultLedger};
use crate::{AUTH_SEED, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `provide`.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct Provide<'info> {
    /// Yield provider; funds the schedule.
    #[account(mut)]
    pub provider: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    pub yield_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = yield_mint,
        token::authority = provider,
    )]
    pub provider_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED.as_bytes(), pool_name.as_bytes(), yield_mint.key().as_ref()],
        bump,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: PDA derivation enforced by seeds; written by the farm store.
    #[account(
        mut,
        seeds = [FARM_POOL_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub farm_pool: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Funds the pool's schedule for `yield_mint`.
///
/// The schedule must be exhausted; `amount` is escrowed in the reward vault
/// and released at `amount_yielded_per_block` from `start_block_height`.
pub fn provide<'info>(
    ctx: Context<'_, '_, '_, 'info, Provide<'info>>,
    pool_name: String,
    amount: u64,
    amount_yielded_per_block: u64,
    start_block_height: u64,
) -> Result<()> {
    let height = Clock::get()?.slot;
    let provider = ctx.accounts.provider.key();
    let mint = ctx.accounts.yield_mint.key();

    let mut store = AccountStore::new(
        ctx.program_id,
        ctx.accounts.provider.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        collect_accounts(
            vec![ctx.accounts.farm_pool.to_account_info()],
            ctx.remaining_accounts,
        ),
    );
    let mut ledger = VaultLedger::new(
        ctx.program_id,
        ctx.accounts.provider.to_account_info(),
        ctx.accounts.authority.to_account_info(),
        ctx.bumps.authority,
        ctx.accounts.token_program.to_account_info(),
        vec![
            ctx.accounts.yield_mint.to_account_info(),
            ctx.accounts.provider_token.to_account_info(),
            ctx.accounts.reward_vault.to_account_info(),
        ],
    );

    engine::provide(
        &mut store,
        &mut ledger,
        &provider,
        &pool_name,
        Coin::new(mint, amount),
        amount_yielded_per_block,
        start_block_height,
        height,
    )?;

    store.commit()?;
    emit!(YieldProvided {
        pool_name,
        provider,
        mint,
        amount,
        amount_yielded_per_block,
        start_block_height,
    });
    Ok(())
}
