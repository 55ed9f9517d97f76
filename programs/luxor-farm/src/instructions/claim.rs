use crate::engine;
use crate::states::*;
use crate::utils::{collect_accounts, AccountStore, VaultLedger};
use crate::AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenInterface;

/// Accounts context for `claim`.
///
/// Remaining accounts: the checkpoints of the last closed period, the open
/// period and the lock's reference period, then per reward mint the reward
/// vault, the mint and the owner's token account.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct Claim<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; signs reward payouts.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

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

/// Pays out everything the owner's lock has earned up to the current slot.
pub fn claim<'info>(ctx: Context<'_, '_, '_, 'info, Claim<'info>>, pool_name: String) -> Result<()> {
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
        ctx.remaining_accounts.to_vec(),
    );

    let rewards = engine::claim(&mut store, &mut ledger, &owner, &pool_name, height)?;
    msg!("claimed {} reward denominations", rewards.len());

    store.commit()?;
    emit!(RewardsClaimed {
        pool_name,
        owner,
        rewards: rewards.to_vec(),
    });
    Ok(())
}
