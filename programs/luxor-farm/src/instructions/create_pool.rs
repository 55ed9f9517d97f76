use crate::engine::{self, KnownMints};
use crate::states::*;
use crate::utils::{collect_accounts, AccountStore, VaultLedger};
use crate::{AUTH_SEED, LOCK_VAULT_SEED, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `create_pool`.
///
/// Opens a named pool: burns the creation fee, escrows the deposit, creates
/// the lock and reward vaults and writes the pool with its first checkpoint.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct CreatePool<'info> {
    /// Pool creator; pays the fee, the deposit and rent.
    #[account(mut)]
    pub owner: Signer<'info>,

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

    /// Token farmers lock into the pool. Must be an initialized mint of the
    /// token program, otherwise account validation fails.
    pub lock_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token the pool's first emission schedule pays out.
    pub yield_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = farm_config.fee_mint)]
    pub fee_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = fee_mint,
        token::authority = owner,
    )]
    pub owner_fee_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = farm_config.deposit_vault)]
    pub deposit_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        seeds = [LOCK_VAULT_SEED.as_bytes(), pool_name.as_bytes(), lock_mint.key().as_ref()],
        bump,
        payer = owner,
        token::mint = lock_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub lock_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        seeds = [REWARD_VAULT_SEED.as_bytes(), pool_name.as_bytes(), yield_mint.key().as_ref()],
        bump,
        payer = owner,
        token::mint = yield_mint,
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

    /// Checkpoint of period 0.
    ///
    /// CHECK: PDA derivation enforced by seeds; written by the farm store.
    #[account(
        mut,
        seeds = [HISTORICAL_REWARDS_SEED.as_bytes(), pool_name.as_bytes(), &0u64.to_le_bytes()],
        bump,
    )]
    pub initial_rewards: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Creates a farm pool.
///
/// Steps:
/// 1. Stage the farm records and the fee/deposit token accounts.
/// 2. Run pool creation (name, existence, fee and deposit checks, then writes).
/// 3. Commit the records and emit `PoolCreated`.
pub fn create_pool<'info>(
    ctx: Context<'_, '_, '_, 'info, CreatePool<'info>>,
    pool_name: String,
    min_lock_amount: u64,
) -> Result<()> {
    let height = Clock::get()?.slot;
    let params = ctx.accounts.farm_config.params();
    let owner = ctx.accounts.owner.key();

    // --- 1) Stage records and token accounts ---
    let mut store = AccountStore::new(
        ctx.program_id,
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        collect_accounts(
            vec![
                ctx.accounts.farm_pool.to_account_info(),
                ctx.accounts.current_rewards.to_account_info(),
                ctx.accounts.initial_rewards.to_account_info(),
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
        vec![
            ctx.accounts.fee_mint.to_account_info(),
            ctx.accounts.owner_fee_token.to_account_info(),
            ctx.accounts.deposit_vault.to_account_info(),
        ],
    );
    // a mint is registered once it passes the `InterfaceAccount<Mint>` check
    let registry = KnownMints::new([ctx.accounts.lock_mint.key(), ctx.accounts.yield_mint.key()]);

    // --- 2) Create ---
    let pool = engine::create_pool(
        &mut store,
        &mut ledger,
        &registry,
        &params,
        &owner,
        &pool_name,
        ctx.accounts.lock_mint.key(),
        min_lock_amount,
        ctx.accounts.yield_mint.key(),
        height,
    )?;

    // --- 3) Persist + event ---
    store.commit()?;
    emit!(PoolCreated {
        pool_name,
        owner,
        lock_mint: pool.lock_mint,
        yield_mint: ctx.accounts.yield_mint.key(),
        min_lock_amount,
        creation_fee: params.creation_fee.amount,
        deposit: params.deposit.amount,
    });
    Ok(())
}
