use crate::engine;
use crate::error::ErrorCode;
use crate::math::{Coin, Coins};
use crate::states::*;
use crate::utils::{collect_accounts, AccountStore, VaultLedger};
use crate::{AUTH_SEED, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `credit_rewards`.
///
/// Credits the pool's share of the external reward stream to its open
/// period. Only the farm admin distributes the stream.
///
/// Remaining accounts:
/// - the checkpoint of the last closed period (`current.period - 1`), read
///   to bound the reward denominations of the next checkpoint.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct CreditRewards<'info> {
    #[account(
        mut,
        address = farm_config.admin @ ErrorCode::InvalidOwner
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [FARM_CONFIG_SEED.as_bytes()],
        bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    /// CHECK: PDA derivation enforced by seeds; owns the vaults.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = admin,
    )]
    pub admin_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        seeds = [REWARD_VAULT_SEED.as_bytes(), pool_name.as_bytes(), reward_mint.key().as_ref()],
        bump,
        payer = admin,
        token::mint = reward_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

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

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn credit_rewards<'info>(
    ctx: Context<'_, '_, '_, 'info, CreditRewards<'info>>,
    pool_name: String,
    amount: u64,
) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let mint = ctx.accounts.reward_mint.key();

    let mut store = AccountStore::new(
        ctx.program_id,
        ctx.accounts.admin.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        collect_accounts(
            vec![
                ctx.accounts.farm_pool.to_account_info(),
                ctx.accounts.current_rewards.to_account_info(),
            ],
            ctx.remaining_accounts,
        ),
    );
    let mut ledger = VaultLedger::new(
        ctx.program_id,
        ctx.accounts.admin.to_account_info(),
        ctx.accounts.authority.to_account_info(),
        ctx.bumps.authority,
        ctx.accounts.token_program.to_account_info(),
        vec![
            ctx.accounts.reward_mint.to_account_info(),
            ctx.accounts.admin_token.to_account_info(),
            ctx.accounts.reward_vault.to_account_info(),
        ],
    );

    engine::credit_rewards(
        &mut store,
        &mut ledger,
        &admin,
        &pool_name,
        &Coins::from_coin(Coin::new(mint, amount)),
    )?;

    store.commit()?;
    emit!(RewardsCredited {
        pool_name,
        mint,
        amount,
    });
    Ok(())
}
