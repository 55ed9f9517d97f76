//! `FarmStore` over program-owned PDA accounts.
//!
//! Records are addressed by their seeds and looked up among the accounts
//! the instruction received. Writes and deletes are buffered and applied by
//! [`AccountStore::commit`], which creates missing accounts (rent paid by
//! `payer`) and closes deleted ones (rent returned to `payer`).

use crate::engine::FarmStore;
use crate::error::ErrorCode;
use crate::states::{
    FarmPool, LockInfo, PoolCurrentRewards, PoolHistoricalRewards, WhitelistEntry,
};
use anchor_lang::prelude::*;
use anchor_lang::system_program;
use std::cell::RefCell;
use std::collections::BTreeMap;

struct PendingRecord {
    seeds: Vec<Vec<u8>>,
    bump: u8,
    space: usize,
    /// `None` marks the record for deletion.
    data: Option<Vec<u8>>,
}

pub struct AccountStore<'info> {
    program_id: Pubkey,
    payer: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    accounts: Vec<AccountInfo<'info>>,
    addresses: RefCell<BTreeMap<Vec<Vec<u8>>, (Pubkey, u8)>>,
    pending: BTreeMap<Pubkey, PendingRecord>,
}

impl<'info> AccountStore<'info> {
    pub fn new(
        program_id: &Pubkey,
        payer: AccountInfo<'info>,
        system_program: AccountInfo<'info>,
        accounts: Vec<AccountInfo<'info>>,
    ) -> Self {
        Self {
            program_id: *program_id,
            payer,
            system_program,
            accounts,
            addresses: RefCell::new(BTreeMap::new()),
            pending: BTreeMap::new(),
        }
    }

    fn address(&self, seeds: &[Vec<u8>]) -> (Pubkey, u8) {
        if let Some(found) = self.addresses.borrow().get(seeds) {
            return *found;
        }
        let slices: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
        let found = Pubkey::find_program_address(&slices, &self.program_id);
        self.addresses.borrow_mut().insert(seeds.to_vec(), found);
        found
    }

    fn account(&self, address: &Pubkey) -> Result<&AccountInfo<'info>> {
        self.accounts
            .iter()
            .find(|info| info.key == address)
            .ok_or_else(|| {
                msg!("Farm record {} was not supplied", address);
                error!(ErrorCode::MissingRecordAccount)
            })
    }

    fn read<T: AccountDeserialize>(&self, seeds: Vec<Vec<u8>>) -> Result<Option<T>> {
        let (address, _) = self.address(&seeds);
        if let Some(record) = self.pending.get(&address) {
            return match &record.data {
                Some(data) => Ok(Some(T::try_deserialize(&mut data.as_slice())?)),
                None => Ok(None),
            };
        }
        let info = self.account(&address)?;
        if info.owner != &self.program_id || info.data_is_empty() {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        Ok(Some(T::try_deserialize(&mut &data[..])?))
    }

    fn write<T: AccountSerialize>(
        &mut self,
        seeds: Vec<Vec<u8>>,
        space: usize,
        value: &T,
    ) -> Result<()> {
        let (address, bump) = self.address(&seeds);
        self.account(&address)?;
        let mut data = Vec::with_capacity(space);
        value.try_serialize(&mut data)?;
        require!(data.len() <= space, ErrorCode::RecordTooLarge);
        self.pending.insert(
            address,
            PendingRecord {
                seeds,
                bump,
                space,
                data: Some(data),
            },
        );
        Ok(())
    }

    fn remove(&mut self, seeds: Vec<Vec<u8>>) -> Result<()> {
        let (address, bump) = self.address(&seeds);
        self.account(&address)?;
        self.pending.insert(
            address,
            PendingRecord {
                seeds,
                bump,
                space: 0,
                data: None,
            },
        );
        Ok(())
    }

    /// Applies every buffered write and delete.
    pub fn commit(self) -> Result<()> {
        for (address, record) in self.pending.iter() {
            let info = self.account(address)?.clone();
            match &record.data {
                Some(bytes) => {
                    if info.owner != &self.program_id {
                        self.create_record(&info, record)?;
                    }
                    let mut data = info.try_borrow_mut_data()?;
                    require!(data.len() >= bytes.len(), ErrorCode::RecordTooLarge);
                    data[..bytes.len()].copy_from_slice(bytes);
                    data[bytes.len()..].fill(0);
                }
                None => {
                    if info.owner == &self.program_id {
                        close_record(&info, &self.payer)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn create_record(&self, info: &AccountInfo<'info>, record: &PendingRecord) -> Result<()> {
        let bump = [record.bump];
        let mut seeds: Vec<&[u8]> = record.seeds.iter().map(Vec::as_slice).collect();
        seeds.push(&bump);
        let signer_seeds: &[&[&[u8]]] = &[&seeds[..]];

        let rent = Rent::get()?.minimum_balance(record.space);
        let current_lamports = info.lamports();
        if current_lamports == 0 {
            system_program::create_account(
                CpiContext::new_with_signer(
                    self.system_program.clone(),
                    system_program::CreateAccount {
                        from: self.payer.clone(),
                        to: info.clone(),
                    },
                    signer_seeds,
                ),
                rent,
                record.space as u64,
                &self.program_id,
            )
        } else {
            // pre-funded address: top up, then allocate and assign in place
            let shortfall = rent.saturating_sub(current_lamports);
            if shortfall > 0 {
                system_program::transfer(
                    CpiContext::new(
                        self.system_program.clone(),
                        system_program::Transfer {
                            from: self.payer.clone(),
                            to: info.clone(),
                        },
                    ),
                    shortfall,
                )?;
            }
            system_program::allocate(
                CpiContext::new_with_signer(
                    self.system_program.clone(),
                    system_program::Allocate {
                        account_to_allocate: info.clone(),
                    },
                    signer_seeds,
                ),
                record.space as u64,
            )?;
            system_program::assign(
                CpiContext::new_with_signer(
                    self.system_program.clone(),
                    system_program::Assign {
                        account_to_assign: info.clone(),
                    },
                    signer_seeds,
                ),
                &self.program_id,
            )
        }
    }
}

/// Returns the rent of a record to `destination` and hands the emptied
/// account back to the system program.
pub fn close_record<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let lamports = destination
        .lamports()
        .checked_add(info.lamports())
        .ok_or(error!(ErrorCode::MathOverflow))?;
    **destination.try_borrow_mut_lamports()? = lamports;
    **info.try_borrow_mut_lamports()? = 0;
    info.assign(&system_program::ID);
    info.realloc(0, false)?;
    Ok(())
}

impl FarmStore for AccountStore<'_> {
    fn pool(&self, pool_name: &str) -> Result<Option<FarmPool>> {
        self.read(FarmPool::seeds(pool_name))
    }

    fn set_pool(&mut self, pool: &FarmPool) -> Result<()> {
        self.write(FarmPool::seeds(&pool.name), FarmPool::LEN, pool)
    }

    fn delete_pool(&mut self, pool_name: &str) -> Result<()> {
        self.remove(FarmPool::seeds(pool_name))
    }

    fn lock_info(&self, pool_name: &str, owner: &Pubkey) -> Result<Option<LockInfo>> {
        self.read(LockInfo::seeds(pool_name, owner))
    }

    fn set_lock_info(&mut self, lock: &LockInfo) -> Result<()> {
        self.write(
            LockInfo::seeds(&lock.pool_name, &lock.owner),
            LockInfo::LEN,
            lock,
        )
    }

    fn delete_lock_info(&mut self, pool_name: &str, owner: &Pubkey) -> Result<()> {
        self.remove(LockInfo::seeds(pool_name, owner))
    }

    fn current_rewards(&self, pool_name: &str) -> Result<Option<PoolCurrentRewards>> {
        self.read(PoolCurrentRewards::seeds(pool_name))
    }

    fn set_current_rewards(
        &mut self,
        pool_name: &str,
        current: &PoolCurrentRewards,
    ) -> Result<()> {
        self.write(
            PoolCurrentRewards::seeds(pool_name),
            PoolCurrentRewards::LEN,
            current,
        )
    }

    fn delete_current_rewards(&mut self, pool_name: &str) -> Result<()> {
        self.remove(PoolCurrentRewards::seeds(pool_name))
    }

    fn historical_rewards(
        &self,
        pool_name: &str,
        period: u64,
    ) -> Result<Option<PoolHistoricalRewards>> {
        self.read(PoolHistoricalRewards::seeds(pool_name, period))
    }

    fn set_historical_rewards(
        &mut self,
        pool_name: &str,
        period: u64,
        historical: &PoolHistoricalRewards,
    ) -> Result<()> {
        self.write(
            PoolHistoricalRewards::seeds(pool_name, period),
            PoolHistoricalRewards::LEN,
            historical,
        )
    }

    fn delete_historical_rewards(&mut self, pool_name: &str, period: u64) -> Result<()> {
        self.remove(PoolHistoricalRewards::seeds(pool_name, period))
    }

    fn is_whitelisted(&self, pool_name: &str) -> Result<bool> {
        Ok(self
            .read::<WhitelistEntry>(WhitelistEntry::seeds(pool_name))?
            .is_some())
    }

    fn set_whitelisted(&mut self, pool_name: &str, listed: bool) -> Result<()> {
        if listed {
            self.write(
                WhitelistEntry::seeds(pool_name),
                WhitelistEntry::LEN,
                &WhitelistEntry {
                    pool_name: pool_name.to_string(),
                },
            )
        } else {
            self.remove(WhitelistEntry::seeds(pool_name))
        }
    }
}
