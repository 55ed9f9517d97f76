use crate::engine::{
    close_period, decrement_reference_count, increment_reference_count, load_lock_info, Escrow,
    FarmStore, TransferLedger,
};
use crate::error::ErrorCode;
use crate::math::Coins;
use crate::states::{FarmPool, LockInfo};
use anchor_lang::prelude::*;

/// Signed change applied to a lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockDelta {
    Lock(u64),
    Unlock(u64),
}

/// Rewards earned by `amount` locked from the end of `start_period` to the end
/// of `end_period`, truncated.
pub fn calculate_rewards_between<S: FarmStore + ?Sized>(
    store: &S,
    pool_name: &str,
    start_period: u64,
    end_period: u64,
    amount: u64,
) -> Result<Coins> {
    if start_period > end_period {
        panic!("start period {start_period} cannot be greater than end period {end_period}");
    }
    let (starting, ending) = match (
        store.historical_rewards(pool_name, start_period)?,
        store.historical_rewards(pool_name, end_period)?,
    ) {
        (Some(starting), Some(ending)) => (starting, ending),
        _ => panic!(
            "historical rewards of pool {pool_name} periods {start_period}..{end_period} not found"
        ),
    };
    let difference = match ending
        .cumulative_reward_ratio
        .checked_sub(&starting.cumulative_reward_ratio)
    {
        Some(difference) => difference,
        None => panic!("negative rewards in pool {pool_name} between periods {start_period} and {end_period}"),
    };
    difference.mul_truncate(amount)
}

/// Settles `owner`'s lock in `pool` at `height` and pays the rewards out of
/// the pool's reward escrow.
///
/// Closes the open period, pays `(ratio[end] - ratio[ref]) * amount`, then
/// moves the lock's reference from its old period to the one just closed.
pub fn withdraw_rewards<S, L>(
    store: &mut S,
    ledger: &mut L,
    pool: &mut FarmPool,
    owner: &Pubkey,
    height: u64,
) -> Result<Coins>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let mut lock = load_lock_info(store, &pool.name, owner)?;

    let ending_period = close_period(store, pool, height)?;
    let rewards = calculate_rewards_between(
        store,
        &pool.name,
        lock.reference_period,
        ending_period,
        lock.amount,
    )?;

    decrement_reference_count(store, &pool.name, lock.reference_period)?;
    increment_reference_count(store, &pool.name, ending_period)?;
    lock.reference_period = ending_period;
    lock.start_block_height = height;
    store.set_lock_info(&lock)?;

    if !rewards.is_zero() {
        pool.total_accumulated_rewards = match pool.total_accumulated_rewards.checked_sub(&rewards)
        {
            Some(left) => left,
            None => panic!(
                "pool {} pays out more rewards than it accumulated",
                pool.name
            ),
        };
        ledger.move_from_escrow(&pool.name, Escrow::Rewards, owner, &rewards)?;
        msg!(
            "Pool {}: paid {} reward denoms to {}",
            pool.name,
            rewards.len(),
            owner
        );
    }
    Ok(rewards)
}

/// Applies `delta` to `owner`'s lock, settling pending rewards first.
///
/// Callers validate the delta; an impossible one here is a ledger bug and
/// panics. `total_value_locked` changes only after the period is closed so the
/// closing ratio is computed with the value that was locked during it.
pub fn update_lock<S, L>(
    store: &mut S,
    ledger: &mut L,
    pool: &mut FarmPool,
    owner: &Pubkey,
    delta: LockDelta,
    height: u64,
) -> Result<Coins>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let rewards = match store.lock_info(&pool.name, owner)? {
        None => {
            let amount = match delta {
                LockDelta::Lock(amount) if amount > 0 => amount,
                _ => panic!("first lock of {owner} in pool {} must be positive", pool.name),
            };
            let ending_period = close_period(store, pool, height)?;
            increment_reference_count(store, &pool.name, ending_period)?;
            store.set_lock_info(&LockInfo {
                owner: *owner,
                pool_name: pool.name.clone(),
                amount,
                start_block_height: height,
                reference_period: ending_period,
            })?;
            pool.locker_count += 1;
            Coins::empty()
        }
        Some(_) => {
            let rewards = withdraw_rewards(store, ledger, pool, owner, height)?;
            let mut lock = load_lock_info(store, &pool.name, owner)?;
            lock.amount = match delta {
                LockDelta::Lock(amount) => lock.amount.checked_add(amount),
                LockDelta::Unlock(amount) => lock.amount.checked_sub(amount),
            }
            .unwrap_or_else(|| panic!("invalid lock change {delta:?} for {owner}"));

            if lock.amount == 0 {
                decrement_reference_count(store, &pool.name, lock.reference_period)?;
                store.delete_lock_info(&pool.name, owner)?;
                pool.locker_count -= 1;
            } else {
                store.set_lock_info(&lock)?;
            }
            rewards
        }
    };

    pool.total_value_locked = match delta {
        LockDelta::Lock(amount) => pool.total_value_locked.checked_add(amount),
        LockDelta::Unlock(amount) => pool.total_value_locked.checked_sub(amount),
    }
    .ok_or(error!(ErrorCode::MathOverflow))?;
    Ok(rewards)
}
