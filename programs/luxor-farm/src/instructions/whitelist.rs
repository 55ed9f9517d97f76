use crate::engine::{self, ReservePair, ReservePairsOracle};
use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::AccountStore;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};

/// Accounts context for `add_to_whitelist`.
///
/// Remaining accounts carry the price sources, three per AMM pair:
/// `[vault_0, vault_1, lp_mint]`. Vault balances are the reserves and the
/// LP mint supply prices LP lock tokens.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct AddToWhitelist<'info> {
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

    /// CHECK: PDA derivation enforced by seeds; read by the farm store.
    #[account(
        seeds = [FARM_POOL_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; written by the farm store.
    #[account(
        mut,
        seeds = [WHITELIST_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub whitelist_entry: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Accounts context for `remove_from_whitelist`.
#[derive(Accounts)]
#[instruction(pool_name: String)]
pub struct RemoveFromWhitelist<'info> {
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

    /// CHECK: PDA derivation enforced by seeds; closed if present.
    #[account(
        mut,
        seeds = [WHITELIST_SEED.as_bytes(), pool_name.as_bytes()],
        bump,
    )]
    pub whitelist_entry: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

fn price_source<T: AccountDeserialize>(info: &AccountInfo) -> Result<T> {
    require!(
        info.owner == &anchor_spl::token::ID || info.owner == &anchor_spl::token_2022::ID,
        ErrorCode::NoPricePath
    );
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

fn reserve_pairs(accounts: &[AccountInfo]) -> Result<Vec<ReservePair>> {
    require!(accounts.len() % 3 == 0, ErrorCode::MissingRemainingAccount);
    let mut pairs = Vec::with_capacity(accounts.len() / 3);
    for chunk in accounts.chunks(3) {
        let vault_0: TokenAccount = price_source(&chunk[0])?;
        let vault_1: TokenAccount = price_source(&chunk[1])?;
        let lp_mint: Mint = price_source(&chunk[2])?;
        pairs.push(ReservePair {
            mint_0: vault_0.mint,
            reserve_0: vault_0.amount,
            mint_1: vault_1.mint,
            reserve_1: vault_1.amount,
            lp_mint: Some((chunk[2].key(), lp_mint.supply)),
        });
    }
    Ok(pairs)
}

/// Admits a pool to the external reward stream once its lock token has a
/// price path to the quote token.
pub fn add_to_whitelist<'info>(
    ctx: Context<'_, '_, '_, 'info, AddToWhitelist<'info>>,
    pool_name: String,
) -> Result<()> {
    let params = ctx.accounts.farm_config.params();
    let oracle = ReservePairsOracle::new(reserve_pairs(ctx.remaining_accounts)?);

    let mut store = AccountStore::new(
        ctx.program_id,
        ctx.accounts.admin.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        vec![
            ctx.accounts.farm_pool.to_account_info(),
            ctx.accounts.whitelist_entry.to_account_info(),
        ],
    );
    engine::add_to_whitelist(&mut store, &oracle, &params, &pool_name)?;

    store.commit()?;
    emit!(WhitelistUpdated {
        pool_name,
        listed: true,
    });
    Ok(())
}

pub fn remove_from_whitelist<'info>(
    ctx: Context<'_, '_, '_, 'info, RemoveFromWhitelist<'info>>,
    pool_name: String,
) -> Result<()> {
    let mut store = AccountStore::new(
        ctx.program_id,
        ctx.accounts.admin.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        vec![ctx.accounts.whitelist_entry.to_account_info()],
    );
    engine::remove_from_whitelist(&mut store, &pool_name)?;

    store.commit()?;
    emit!(WhitelistUpdated {
        pool_name,
        listed: false,
    });
    Ok(())
}
