//! Period checkpoints and their reference counts.
//!
//! A historical record is referenced by the open period that follows it and
//! by every lock settled against it. Each lock settles against a period it
//! closed itself, so no record ever carries more than two references.

use crate::engine::{advance_yield, FarmStore};
use crate::math::{Coins, DecCoins};
use crate::states::{FarmPool, PoolCurrentRewards, PoolHistoricalRewards};
use anchor_lang::prelude::*;

/// Largest reference count a historical record can legitimately reach.
pub const MAX_REFERENCE_COUNT: u16 = 2;

/// Writes the initial checkpoint of a new pool: an empty period 0 referenced
/// once, and period 1 open from `height`.
pub fn initialise_pool_rewards<S: FarmStore + ?Sized>(
    store: &mut S,
    pool_name: &str,
    height: u64,
) -> Result<()> {
    store.set_historical_rewards(
        pool_name,
        0,
        &PoolHistoricalRewards {
            cumulative_reward_ratio: DecCoins::empty(),
            reference_count: 1,
        },
    )?;
    store.set_current_rewards(
        pool_name,
        &PoolCurrentRewards {
            start_block_height: height,
            period: 1,
            rewards: Coins::empty(),
        },
    )
}

pub fn increment_reference_count<S: FarmStore + ?Sized>(
    store: &mut S,
    pool_name: &str,
    period: u64,
) -> Result<()> {
    let mut historical = match store.historical_rewards(pool_name, period)? {
        Some(historical) => historical,
        None => panic!("historical rewards of pool {pool_name} period {period} not found"),
    };
    if historical.reference_count >= MAX_REFERENCE_COUNT {
        panic!(
            "reference count of pool {pool_name} period {period} would exceed {MAX_REFERENCE_COUNT}"
        );
    }
    historical.reference_count += 1;
    store.set_historical_rewards(pool_name, period, &historical)
}

/// Drops one reference and deletes the record when none remain.
pub fn decrement_reference_count<S: FarmStore + ?Sized>(
    store: &mut S,
    pool_name: &str,
    period: u64,
) -> Result<()> {
    let mut historical = match store.historical_rewards(pool_name, period)? {
        Some(historical) => historical,
        None => panic!("historical rewards of pool {pool_name} period {period} not found"),
    };
    if historical.reference_count == 0 {
        panic!("cannot set negative reference count of pool {pool_name} period {period}");
    }
    historical.reference_count -= 1;
    if historical.reference_count == 0 {
        store.delete_historical_rewards(pool_name, period)
    } else {
        store.set_historical_rewards(pool_name, period, &historical)
    }
}

/// Closes the open period of `pool` at `height` and returns its index.
///
/// Emission released since the period opened joins the rewards credited
/// during it; their sum divided by the locked value extends the cumulative
/// ratio. With nothing locked the ratio does not move. `pool` is updated in
/// place and must be persisted by the caller.
pub fn close_period<S: FarmStore + ?Sized>(
    store: &mut S,
    pool: &mut FarmPool,
    height: u64,
) -> Result<u64> {
    let current = match store.current_rewards(&pool.name)? {
        Some(current) => current,
        None => panic!("current rewards of pool {} not found", pool.name),
    };

    let released = advance_yield(
        &mut pool.yielded_token_infos,
        current.start_block_height,
        height,
    )?;
    pool.total_accumulated_rewards = pool.total_accumulated_rewards.checked_add(&released)?;
    let pending = current.rewards.checked_add(&released)?;

    let ratio = if pool.total_value_locked == 0 {
        DecCoins::empty()
    } else {
        DecCoins::quo_truncate(&pending, pool.total_value_locked)?
    };

    let previous = match store.historical_rewards(&pool.name, current.period - 1)? {
        Some(previous) => previous,
        None => panic!(
            "historical rewards of pool {} period {} not found",
            pool.name,
            current.period - 1
        ),
    };
    store.set_historical_rewards(
        &pool.name,
        current.period,
        &PoolHistoricalRewards {
            cumulative_reward_ratio: previous.cumulative_reward_ratio.checked_add(&ratio)?,
            reference_count: 1,
        },
    )?;
    decrement_reference_count(store, &pool.name, current.period - 1)?;

    store.set_current_rewards(
        &pool.name,
        &PoolCurrentRewards {
            start_block_height: height,
            period: current.period + 1,
            rewards: Coins::empty(),
        },
    )?;
    Ok(current.period)
}
