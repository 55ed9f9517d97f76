//! `TransferLedger` over program-owned token vaults.

use crate::engine::{Escrow, TransferLedger};
use crate::error::ErrorCode;
use crate::math::Coins;
use crate::utils::{burn_from_user, transfer_from_pool_vault_to_user, transfer_from_user_to_pool_vault};
use crate::{AUTH_SEED, DEPOSIT_VAULT_SEED, LOCK_VAULT_SEED, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};

/// Seeds of the vault backing `escrow` for `pool_name` and `mint`.
///
/// Locked and reward tokens get one vault per pool and mint, deposits share
/// a single farm-wide vault.
pub fn escrow_vault_seeds(pool_name: &str, escrow: Escrow, mint: &Pubkey) -> Vec<Vec<u8>> {
    match escrow {
        Escrow::LockedTokens => vec![
            LOCK_VAULT_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
            mint.to_bytes().to_vec(),
        ],
        Escrow::Rewards => vec![
            REWARD_VAULT_SEED.as_bytes().to_vec(),
            pool_name.as_bytes().to_vec(),
            mint.to_bytes().to_vec(),
        ],
        Escrow::Deposits => vec![DEPOSIT_VAULT_SEED.as_bytes().to_vec()],
    }
}

pub fn escrow_vault_address(
    program_id: &Pubkey,
    pool_name: &str,
    escrow: Escrow,
    mint: &Pubkey,
) -> Pubkey {
    let seeds = escrow_vault_seeds(pool_name, escrow, mint);
    let slices: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
    Pubkey::find_program_address(&slices, program_id).0
}

pub struct VaultLedger<'info> {
    program_id: Pubkey,
    /// The transaction signer; the only holder tokens can be pulled from.
    signer: AccountInfo<'info>,
    /// Vault authority PDA.
    authority: AccountInfo<'info>,
    authority_bump: u8,
    token_program: AccountInfo<'info>,
    accounts: Vec<AccountInfo<'info>>,
}

impl<'info> VaultLedger<'info> {
    pub fn new(
        program_id: &Pubkey,
        signer: AccountInfo<'info>,
        authority: AccountInfo<'info>,
        authority_bump: u8,
        token_program: AccountInfo<'info>,
        accounts: Vec<AccountInfo<'info>>,
    ) -> Self {
        Self {
            program_id: *program_id,
            signer,
            authority,
            authority_bump,
            token_program,
            accounts,
        }
    }

    fn token_account(info: &AccountInfo<'info>) -> Option<TokenAccount> {
        let data = info.try_borrow_data().ok()?;
        TokenAccount::try_deserialize(&mut &data[..]).ok()
    }

    /// The supplied token account of `owner` for `mint`.
    fn holder_account(&self, owner: &Pubkey, mint: &Pubkey) -> Result<(AccountInfo<'info>, u64)> {
        self.accounts
            .iter()
            .filter(|info| info.owner == self.token_program.key)
            .find_map(|info| {
                Self::token_account(info)
                    .filter(|account| account.owner == *owner && account.mint == *mint)
                    .map(|account| (info.clone(), account.amount))
            })
            .ok_or_else(|| {
                msg!("Token account of {} for mint {} was not supplied", owner, mint);
                error!(ErrorCode::MissingTokenAccount)
            })
    }

    fn vault_account(&self, pool_name: &str, escrow: Escrow, mint: &Pubkey) -> Result<AccountInfo<'info>> {
        let address = escrow_vault_address(&self.program_id, pool_name, escrow, mint);
        self.accounts
            .iter()
            .find(|info| info.key == &address)
            .cloned()
            .ok_or_else(|| {
                msg!("Vault {} was not supplied", address);
                error!(ErrorCode::MissingTokenAccount)
            })
    }

    fn mint_account(&self, mint: &Pubkey) -> Result<(AccountInfo<'info>, u8)> {
        let info = self
            .accounts
            .iter()
            .find(|info| info.key == mint)
            .ok_or(error!(ErrorCode::TokenNotFound))?;
        let decimals = {
            let data = info.try_borrow_data()?;
            Mint::try_deserialize(&mut &data[..])?.decimals
        };
        Ok((info.clone(), decimals))
    }
}

impl TransferLedger for VaultLedger<'_> {
    fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
        Ok(self.holder_account(owner, mint)?.1)
    }

    fn move_to_escrow(
        &mut self,
        owner: &Pubkey,
        pool_name: &str,
        escrow: Escrow,
        coins: &Coins,
    ) -> Result<()> {
        require_keys_eq!(*owner, self.signer.key(), ErrorCode::InvalidOwner);
        for coin in coins.iter() {
            let (from, balance) = self.holder_account(owner, &coin.mint)?;
            require!(balance >= coin.amount, ErrorCode::InsufficientFunds);
            let to_vault = self.vault_account(pool_name, escrow, &coin.mint)?;
            let (mint, decimals) = self.mint_account(&coin.mint)?;
            transfer_from_user_to_pool_vault(
                self.signer.clone(),
                from,
                to_vault,
                mint,
                self.token_program.clone(),
                coin.amount,
                decimals,
            )?;
        }
        Ok(())
    }

    fn move_from_escrow(
        &mut self,
        pool_name: &str,
        escrow: Escrow,
        owner: &Pubkey,
        coins: &Coins,
    ) -> Result<()> {
        for coin in coins.iter() {
            let from_vault = self.vault_account(pool_name, escrow, &coin.mint)?;
            let vault_balance = Self::token_account(&from_vault)
                .map(|account| account.amount)
                .unwrap_or(0);
            require!(vault_balance >= coin.amount, ErrorCode::InsufficientFunds);
            let (to, _) = self.holder_account(owner, &coin.mint)?;
            let (mint, decimals) = self.mint_account(&coin.mint)?;
            transfer_from_pool_vault_to_user(
                self.authority.clone(),
                from_vault,
                to,
                mint,
                self.token_program.clone(),
                coin.amount,
                decimals,
                &[&[AUTH_SEED.as_bytes(), &[self.authority_bump]]],
            )?;
        }
        Ok(())
    }

    fn burn(&mut self, owner: &Pubkey, coins: &Coins) -> Result<()> {
        require_keys_eq!(*owner, self.signer.key(), ErrorCode::InvalidOwner);
        for coin in coins.iter() {
            let (from, balance) = self.holder_account(owner, &coin.mint)?;
            require!(balance >= coin.amount, ErrorCode::InsufficientFunds);
            let (mint, _) = self.mint_account(&coin.mint)?;
            burn_from_user(
                self.signer.clone(),
                from,
                mint,
                self.token_program.clone(),
                coin.amount,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_vaults_are_keyed_by_pool_and_mint() {
        let program_id = crate::id();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();
        let vault = |mint: &Pubkey| {
            escrow_vault_address(&program_id, "pool", Escrow::LockedTokens, mint)
        };
        // a pool re-created under the same name with another lock token
        // must not land on the old vault
        assert_ne!(vault(&mint_a), vault(&mint_b));
        assert_eq!(
            vault(&mint_a),
            Pubkey::find_program_address(
                &[LOCK_VAULT_SEED.as_bytes(), b"pool", mint_a.as_ref()],
                &program_id
            )
            .0
        );
        assert_ne!(
            vault(&mint_a),
            escrow_vault_address(&program_id, "pool", Escrow::Rewards, &mint_a)
        );
        assert_eq!(
            escrow_vault_address(&program_id, "a", Escrow::Deposits, &mint_a),
            escrow_vault_address(&program_id, "b", Escrow::Deposits, &mint_b)
        );
    }
}
