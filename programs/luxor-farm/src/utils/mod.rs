pub mod account_store;
pub use account_store::*;

pub mod token;
pub use token::*;

pub mod vault_ledger;
pub use vault_ledger::*;

use anchor_lang::prelude::*;

/// Fixed context accounts followed by the instruction's remaining accounts.
pub fn collect_accounts<'info>(
    fixed: Vec<AccountInfo<'info>>,
    remaining: &[AccountInfo<'info>],
) -> Vec<AccountInfo<'info>> {
    fixed.into_iter().chain(remaining.iter().cloned()).collect()
}
