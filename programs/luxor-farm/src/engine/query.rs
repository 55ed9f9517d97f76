use crate::engine::{advance_yield, load_lock_info, load_pool, FarmStore};
use crate::math::{Coins, DecCoins};
use crate::states::{FarmPool, LockInfo};
use anchor_lang::prelude::*;

pub fn query_pool<S: FarmStore + ?Sized>(store: &S, pool_name: &str) -> Result<FarmPool> {
    load_pool(store, pool_name)
}

pub fn query_lock_info<S: FarmStore + ?Sized>(
    store: &S,
    pool_name: &str,
    owner: &Pubkey,
) -> Result<LockInfo> {
    load_lock_info(store, pool_name, owner)
}

/// Rewards `owner` would receive by claiming at `height`, without writing anything.
pub fn query_earnings<S: FarmStore + ?Sized>(
    store: &S,
    pool_name: &str,
    owner: &Pubkey,
    height: u64,
) -> Result<Coins> {
    let mut pool = load_pool(store, pool_name)?;
    let lock = load_lock_info(store, pool_name, owner)?;
    let current = match store.current_rewards(pool_name)? {
        Some(current) => current,
        None => panic!("current rewards of pool {pool_name} not found"),
    };

    let released = advance_yield(
        &mut pool.yielded_token_infos,
        current.start_block_height,
        height,
    )?;
    let pending = current.rewards.checked_add(&released)?;
    let ratio = if pool.total_value_locked == 0 {
        DecCoins::empty()
    } else {
        DecCoins::quo_truncate(&pending, pool.total_value_locked)?
    };

    let (last_closed, starting) = match (
        store.historical_rewards(pool_name, current.period - 1)?,
        store.historical_rewards(pool_name, lock.reference_period)?,
    ) {
        (Some(last_closed), Some(starting)) => (last_closed, starting),
        _ => panic!("historical rewards of pool {pool_name} not found"),
    };
    let ending = last_closed.cumulative_reward_ratio.checked_add(&ratio)?;
    let difference = match ending.checked_sub(&starting.cumulative_reward_ratio) {
        Some(difference) => difference,
        None => panic!("negative rewards in pool {pool_name}"),
    };
    difference.mul_truncate(lock.amount)
}
