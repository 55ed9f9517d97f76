use crate::error::ErrorCode;
use crate::states::{FarmPool, LockInfo, PoolCurrentRewards, PoolHistoricalRewards};
use anchor_lang::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Keyed persistence for every farm record.
///
/// Reads return `Ok(None)` for absent records. Writes may be buffered by the
/// implementation; callers see their own writes.
pub trait FarmStore {
    fn pool(&self, pool_name: &str) -> Result<Option<FarmPool>>;
    fn set_pool(&mut self, pool: &FarmPool) -> Result<()>;
    fn delete_pool(&mut self, pool_name: &str) -> Result<()>;

    fn lock_info(&self, pool_name: &str, owner: &Pubkey) -> Result<Option<LockInfo>>;
    fn set_lock_info(&mut self, lock: &LockInfo) -> Result<()>;
    fn delete_lock_info(&mut self, pool_name: &str, owner: &Pubkey) -> Result<()>;

    fn current_rewards(&self, pool_name: &str) -> Result<Option<PoolCurrentRewards>>;
    fn set_current_rewards(&mut self, pool_name: &str, current: &PoolCurrentRewards)
        -> Result<()>;
    fn delete_current_rewards(&mut self, pool_name: &str) -> Result<()>;

    fn historical_rewards(
        &self,
        pool_name: &str,
        period: u64,
    ) -> Result<Option<PoolHistoricalRewards>>;
    fn set_historical_rewards(
        &mut self,
        pool_name: &str,
        period: u64,
        historical: &PoolHistoricalRewards,
    ) -> Result<()>;
    fn delete_historical_rewards(&mut self, pool_name: &str, period: u64) -> Result<()>;

    fn is_whitelisted(&self, pool_name: &str) -> Result<bool>;
    fn set_whitelisted(&mut self, pool_name: &str, listed: bool) -> Result<()>;
}

pub fn load_pool<S: FarmStore + ?Sized>(store: &S, pool_name: &str) -> Result<FarmPool> {
    store
        .pool(pool_name)?
        .ok_or(error!(ErrorCode::PoolNotFound))
}

pub fn load_lock_info<S: FarmStore + ?Sized>(
    store: &S,
    pool_name: &str,
    owner: &Pubkey,
) -> Result<LockInfo> {
    store
        .lock_info(pool_name, owner)?
        .ok_or(error!(ErrorCode::LockNotFound))
}

/// In-memory store. Cloning it snapshots the whole farm state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    pools: BTreeMap<String, FarmPool>,
    locks: BTreeMap<(String, Pubkey), LockInfo>,
    current: BTreeMap<String, PoolCurrentRewards>,
    historical: BTreeMap<(String, u64), PoolHistoricalRewards>,
    whitelist: BTreeSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pools(&self) -> impl Iterator<Item = &FarmPool> {
        self.pools.values()
    }

    pub fn lock_infos<'a>(&'a self, pool_name: &'a str) -> impl Iterator<Item = &'a LockInfo> {
        self.locks
            .iter()
            .filter(move |((name, _), _)| name == pool_name)
            .map(|(_, lock)| lock)
    }

    pub fn historical_records<'a>(
        &'a self,
        pool_name: &'a str,
    ) -> impl Iterator<Item = (u64, &'a PoolHistoricalRewards)> {
        self.historical
            .iter()
            .filter(move |((name, _), _)| name == pool_name)
            .map(|((_, period), record)| (*period, record))
    }

    pub fn whitelist(&self) -> impl Iterator<Item = &String> {
        self.whitelist.iter()
    }
}

impl FarmStore for MemoryStore {
    fn pool(&self, pool_name: &str) -> Result<Option<FarmPool>> {
        Ok(self.pools.get(pool_name).cloned())
    }

    fn set_pool(&mut self, pool: &FarmPool) -> Result<()> {
        self.pools.insert(pool.name.clone(), pool.clone());
        Ok(())
    }

    fn delete_pool(&mut self, pool_name: &str) -> Result<()> {
        self.pools.remove(pool_name);
        Ok(())
    }

    fn lock_info(&self, pool_name: &str, owner: &Pubkey) -> Result<Option<LockInfo>> {
        Ok(self.locks.get(&(pool_name.to_string(), *owner)).cloned())
    }

    fn set_lock_info(&mut self, lock: &LockInfo) -> Result<()> {
        self.locks
            .insert((lock.pool_name.clone(), lock.owner), lock.clone());
        Ok(())
    }

    fn delete_lock_info(&mut self, pool_name: &str, owner: &Pubkey) -> Result<()> {
        self.locks.remove(&(pool_name.to_string(), *owner));
        Ok(())
    }

    fn current_rewards(&self, pool_name: &str) -> Result<Option<PoolCurrentRewards>> {
        Ok(self.current.get(pool_name).cloned())
    }

    fn set_current_rewards(
        &mut self,
        pool_name: &str,
        current: &PoolCurrentRewards,
    ) -> Result<()> {
        self.current.insert(pool_name.to_string(), current.clone());
        Ok(())
    }

    fn delete_current_rewards(&mut self, pool_name: &str) -> Result<()> {
        self.current.remove(pool_name);
        Ok(())
    }

    fn historical_rewards(
        &self,
        pool_name: &str,
        period: u64,
    ) -> Result<Option<PoolHistoricalRewards>> {
        Ok(self
            .historical
            .get(&(pool_name.to_string(), period))
            .cloned())
    }

    fn set_historical_rewards(
        &mut self,
        pool_name: &str,
        period: u64,
        historical: &PoolHistoricalRewards,
    ) -> Result<()> {
        self.historical
            .insert((pool_name.to_string(), period), historical.clone());
        Ok(())
    }

    fn delete_historical_rewards(&mut self, pool_name: &str, period: u64) -> Result<()> {
        self.historical.remove(&(pool_name.to_string(), period));
        Ok(())
    }

    fn is_whitelisted(&self, pool_name: &str) -> Result<bool> {
        Ok(self.whitelist.contains(pool_name))
    }

    fn set_whitelisted(&mut self, pool_name: &str, listed: bool) -> Result<()> {
        if listed {
            self.whitelist.insert(pool_name.to_string());
        } else {
            self.whitelist.remove(pool_name);
        }
        Ok(())
    }
}
