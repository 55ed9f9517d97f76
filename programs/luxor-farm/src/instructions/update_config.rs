use crate::error::ErrorCode;
use crate::states::{ConfigUpdated, FarmConfig, FARM_CONFIG_SEED};
use anchor_lang::prelude::*;

/// Accounts context for the `update_config` instruction.
///
/// Only the current `admin` in `farm_config` or the program-level admin may
/// update configuration parameters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        constraint = (owner.key() == farm_config.admin || owner.key() == crate::admin::id()) @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [FARM_CONFIG_SEED.as_bytes()],
        bump,
    )]
    pub farm_config: Account<'info, FarmConfig>,

    pub system_program: Program<'info, System>,
}

/// Updates selected fields of the farm configuration.
///
/// # Param Mapping
/// - `0`: **admin** → new admin Pubkey passed via `remaining_accounts[0]`.
/// - `1`: **pool_creation_fee** → fee burned per pool creation (u64).
/// - `2`: **pool_deposit** → deposit escrowed per new pool (u64).
/// - `3`: **quote_mint** → new quote mint passed via `remaining_accounts[0]`.
///
/// Existing pools keep the deposit they were created with.
///
/// # Errors
/// - `InvalidOwner`: caller is not an authorized admin.
/// - `MissingRemainingAccount`: a Pubkey parameter was not provided.
/// - `InvalidParam`: `param` is outside the valid range.
pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
    let farm_config = &mut ctx.accounts.farm_config;
    match param {
        0 | 3 => {
            let key = *ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(ErrorCode::MissingRemainingAccount))?
                .key;
            require_keys_neq!(key, Pubkey::default());
            if param == 0 {
                farm_config.admin = key;
            } else {
                farm_config.quote_mint = key;
            }
        }
        1 => {
            farm_config.pool_creation_fee = value;
        }
        2 => {
            farm_config.pool_deposit = value;
        }
        _ => return Err(error!(ErrorCode::InvalidParam)),
    }

    emit!(ConfigUpdated {
        admin: farm_config.admin,
        quote_mint: farm_config.quote_mint,
        pool_creation_fee: farm_config.pool_creation_fee,
        pool_deposit: farm_config.pool_deposit,
    });
    Ok(())
}
