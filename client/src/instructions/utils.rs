use anchor_lang::AccountDeserialize;
use anyhow::{format_err, Result};
use luxor_farm::engine::{Escrow, FarmStore, MemoryStore, ReservePair};
use luxor_farm::math::Coins;
use luxor_farm::states::{
    FarmPool, LockInfo, PoolCurrentRewards, PoolHistoricalRewards, WhitelistEntry,
    FARM_CONFIG_SEED,
};
use luxor_farm::utils::escrow_vault_address;
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{account::Account, program_pack::Pack, pubkey::Pubkey};
use std::str::FromStr;

use super::rpc::fetch_account;

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

fn seeds_address(seeds: Vec<Vec<u8>>, program_id: &Pubkey) -> Pubkey {
    let slices: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
    Pubkey::find_program_address(&slices, program_id).0
}

pub fn get_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[luxor_farm::AUTH_SEED.as_bytes()], program_id);
    authority
}

pub fn get_farm_config_address(program_id: &Pubkey) -> Pubkey {
    let (farm_config, _bump) =
        Pubkey::find_program_address(&[FARM_CONFIG_SEED.as_bytes()], program_id);
    farm_config
}

pub fn get_farm_pool_address(program_id: &Pubkey, pool_name: &str) -> Pubkey {
    seeds_address(FarmPool::seeds(pool_name), program_id)
}

pub fn get_current_rewards_address(program_id: &Pubkey, pool_name: &str) -> Pubkey {
    seeds_address(PoolCurrentRewards::seeds(pool_name), program_id)
}

pub fn get_historical_rewards_address(program_id: &Pubkey, pool_name: &str, period: u64) -> Pubkey {
    seeds_address(PoolHistoricalRewards::seeds(pool_name, period), program_id)
}

pub fn get_lock_info_address(program_id: &Pubkey, pool_name: &str, owner: &Pubkey) -> Pubkey {
    seeds_address(LockInfo::seeds(pool_name, owner), program_id)
}

pub fn get_whitelist_address(program_id: &Pubkey, pool_name: &str) -> Pubkey {
    seeds_address(WhitelistEntry::seeds(pool_name), program_id)
}

pub fn get_lock_vault_address(program_id: &Pubkey, pool_name: &str, lock_mint: &Pubkey) -> Pubkey {
    escrow_vault_address(program_id, pool_name, Escrow::LockedTokens, lock_mint)
}

pub fn get_reward_vault_address(program_id: &Pubkey, pool_name: &str, mint: &Pubkey) -> Pubkey {
    escrow_vault_address(program_id, pool_name, Escrow::Rewards, mint)
}

pub fn get_deposit_vault_address(program_id: &Pubkey) -> Pubkey {
    escrow_vault_address(program_id, "", Escrow::Deposits, &Pubkey::default())
}

/// One AMM price source: its two reserve vaults and the LP mint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceSource {
    pub vault_0: Pubkey,
    pub vault_1: Pubkey,
    pub lp_mint: Pubkey,
}

/// Parses `vault_0,vault_1,lp_mint`.
pub fn parse_price_source(value: &str) -> Result<PriceSource> {
    let keys = value
        .split(',')
        .map(|key| Pubkey::from_str(key.trim()).map_err(|e| format_err!("{key}: {e}")))
        .collect::<Result<Vec<_>>>()?;
    match keys[..] {
        [vault_0, vault_1, lp_mint] => Ok(PriceSource {
            vault_0,
            vault_1,
            lp_mint,
        }),
        _ => Err(format_err!(
            "price source must be vault_0,vault_1,lp_mint, got {value}"
        )),
    }
}

/// Current reserves and LP supply of each price source.
pub fn load_reserve_pairs(rpc_client: &RpcClient, sources: &[PriceSource]) -> Result<Vec<ReservePair>> {
    let mut pairs = Vec::with_capacity(sources.len());
    for source in sources {
        let accounts =
            rpc_client.get_multiple_accounts(&[source.vault_0, source.vault_1, source.lp_mint])?;
        let data = |i: usize| {
            accounts[i]
                .as_ref()
                .map(|account| account.data.clone())
                .ok_or_else(|| format_err!("price source account {i} of {source:?} not found"))
        };
        let vault_0 = spl_token::state::Account::unpack(&data(0)?)?;
        let vault_1 = spl_token::state::Account::unpack(&data(1)?)?;
        let lp_mint = spl_token::state::Mint::unpack(&data(2)?)?;
        pairs.push(ReservePair {
            mint_0: vault_0.mint,
            reserve_0: vault_0.amount,
            mint_1: vault_1.mint,
            reserve_1: vault_1.amount,
            lp_mint: Some((source.lp_mint, lp_mint.supply)),
        });
    }
    Ok(pairs)
}

/// The records a settlement of `owner` in `pool_name` reads, loaded into a
/// local store.
pub fn load_settlement_snapshot(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    pool_name: &str,
    owner: &Pubkey,
) -> Result<MemoryStore> {
    let mut store = MemoryStore::new();
    let pool: FarmPool = fetch_account(rpc_client, &get_farm_pool_address(program_id, pool_name))?
        .ok_or_else(|| format_err!("pool {pool_name} not found"))?;
    let current: PoolCurrentRewards =
        fetch_account(rpc_client, &get_current_rewards_address(program_id, pool_name))?
            .ok_or_else(|| format_err!("current rewards of {pool_name} not found"))?;
    let lock: Option<LockInfo> =
        fetch_account(rpc_client, &get_lock_info_address(program_id, pool_name, owner))?;

    let mut periods = vec![current.period - 1];
    if let Some(lock) = &lock {
        periods.push(lock.reference_period);
        store.set_lock_info(lock)?;
    }
    for period in periods {
        let address = get_historical_rewards_address(program_id, pool_name, period);
        if let Some(record) = fetch_account::<PoolHistoricalRewards>(rpc_client, &address)? {
            store.set_historical_rewards(pool_name, period, &record)?;
        }
    }
    store.set_current_rewards(pool_name, &current)?;
    store.set_pool(&pool)?;
    Ok(store)
}

#[derive(Serialize)]
pub struct CoinView {
    pub mint: String,
    pub amount: u64,
}

pub fn coin_views(coins: &Coins) -> Vec<CoinView> {
    coins
        .iter()
        .map(|coin| CoinView {
            mint: coin.mint.to_string(),
            amount: coin.amount,
        })
        .collect()
}

#[derive(Serialize)]
pub struct ScheduleView {
    pub mint: String,
    pub start_block_height_to_yield: u64,
    pub amount_yielded_per_block: u64,
    pub remaining_amount: u64,
}

#[derive(Serialize)]
pub struct PoolView {
    pub name: String,
    pub owner: String,
    pub lock_mint: String,
    pub min_lock_amount: u64,
    pub deposit: CoinView,
    pub total_value_locked: u64,
    pub locker_count: u64,
    pub schedules: Vec<ScheduleView>,
    pub total_accumulated_rewards: Vec<CoinView>,
}

impl From<&FarmPool> for PoolView {
    fn from(pool: &FarmPool) -> Self {
        Self {
            name: pool.name.clone(),
            owner: pool.owner.to_string(),
            lock_mint: pool.lock_mint.to_string(),
            min_lock_amount: pool.min_lock_amount,
            deposit: CoinView {
                mint: pool.deposit_amount.mint.to_string(),
                amount: pool.deposit_amount.amount,
            },
            total_value_locked: pool.total_value_locked,
            locker_count: pool.locker_count,
            schedules: pool
                .yielded_token_infos
                .iter()
                .map(|info| ScheduleView {
                    mint: info.mint.to_string(),
                    start_block_height_to_yield: info.start_block_height_to_yield,
                    amount_yielded_per_block: info.amount_yielded_per_block,
                    remaining_amount: info.remaining_amount,
                })
                .collect(),
            total_accumulated_rewards: coin_views(&pool.total_accumulated_rewards),
        }
    }
}

#[derive(Serialize)]
pub struct LockView {
    pub owner: String,
    pub pool_name: String,
    pub amount: u64,
    pub start_block_height: u64,
    pub reference_period: u64,
}

impl From<&LockInfo> for LockView {
    fn from(lock: &LockInfo) -> Self {
        Self {
            owner: lock.owner.to_string(),
            pool_name: lock.pool_name.clone(),
            amount: lock.amount,
            start_block_height: lock.start_block_height,
            reference_period: lock.reference_period,
        }
    }
}
