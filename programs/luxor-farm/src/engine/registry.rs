//! Pool lifecycle and locker entry points.
//!
//! Every operation validates its inputs before the first write so a failure
//! leaves the store untouched.

use crate::engine::{
    advance_yield, check_price_path, decrement_reference_count, initialise_pool_rewards,
    load_lock_info, load_pool, update_lock, withdraw_rewards, Escrow, FarmStore, LockDelta,
    PricingOracle, TokenRegistry, TransferLedger,
};
use crate::error::ErrorCode;
use crate::math::{Coin, Coins};
use crate::states::{validate_pool_name, FarmPool, YieldedTokenInfo, MAX_REWARD_DENOMS};
use anchor_lang::prelude::*;
use std::collections::BTreeSet;

/// Farm-wide settings the operations depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FarmParams {
    /// Token that whitelisted pools must be priceable in.
    pub quote_mint: Pubkey,
    /// Burned on pool creation.
    pub creation_fee: Coin,
    /// Escrowed on pool creation, refunded on destroy.
    pub deposit: Coin,
}

/// What `destroy_pool` returned to the owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolRefund {
    pub deposit: Coin,
    pub rewards: Coins,
}

#[allow(clippy::too_many_arguments)]
pub fn create_pool<S, L, R>(
    store: &mut S,
    ledger: &mut L,
    registry: &R,
    params: &FarmParams,
    owner: &Pubkey,
    pool_name: &str,
    lock_mint: Pubkey,
    min_lock_amount: u64,
    yield_mint: Pubkey,
    height: u64,
) -> Result<FarmPool>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
    R: TokenRegistry + ?Sized,
{
    validate_pool_name(pool_name)?;
    require!(
        store.pool(pool_name)?.is_none(),
        ErrorCode::PoolAlreadyExists
    );
    require!(
        registry.token_exists(&lock_mint) && registry.token_exists(&yield_mint),
        ErrorCode::TokenNotFound
    );

    let fee = params.creation_fee;
    let deposit = params.deposit;
    let fee_balance = ledger.balance(owner, &fee.mint)?;
    require!(fee_balance >= fee.amount, ErrorCode::InsufficientFeeCoins);
    let deposit_balance = if deposit.mint == fee.mint {
        fee_balance - fee.amount
    } else {
        ledger.balance(owner, &deposit.mint)?
    };
    require!(
        deposit_balance >= deposit.amount,
        ErrorCode::InsufficientDepositCoins
    );

    ledger.burn(owner, &Coins::from_coin(fee))?;
    ledger.move_to_escrow(owner, pool_name, Escrow::Deposits, &Coins::from_coin(deposit))?;

    let pool = FarmPool {
        name: pool_name.to_string(),
        owner: *owner,
        lock_mint,
        min_lock_amount,
        deposit_amount: deposit,
        total_value_locked: 0,
        yielded_token_infos: vec![YieldedTokenInfo::new(yield_mint)],
        total_accumulated_rewards: Coins::empty(),
        locker_count: 0,
    };
    initialise_pool_rewards(store, pool_name, height)?;
    store.set_pool(&pool)?;
    msg!("Pool {} created by {}", pool_name, owner);
    Ok(pool)
}

/// Removes a drained pool and refunds its deposit and unclaimable rewards.
pub fn destroy_pool<S, L>(
    store: &mut S,
    ledger: &mut L,
    owner: &Pubkey,
    pool_name: &str,
    height: u64,
) -> Result<PoolRefund>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let mut pool = load_pool(store, pool_name)?;
    require_keys_eq!(pool.owner, *owner, ErrorCode::NotPoolOwner);

    let current = match store.current_rewards(pool_name)? {
        Some(current) => current,
        None => panic!("current rewards of pool {pool_name} not found"),
    };
    let released = advance_yield(
        &mut pool.yielded_token_infos,
        current.start_block_height,
        height,
    )?;
    require!(pool.is_finished(), ErrorCode::PoolNotFinished);

    // nothing is locked, so everything accumulated is unclaimable
    let rewards = pool.total_accumulated_rewards.checked_add(&released)?;
    ledger.move_from_escrow(
        pool_name,
        Escrow::Deposits,
        owner,
        &Coins::from_coin(pool.deposit_amount),
    )?;
    ledger.move_from_escrow(pool_name, Escrow::Rewards, owner, &rewards)?;

    decrement_reference_count(store, pool_name, current.period - 1)?;
    if store
        .historical_rewards(pool_name, current.period - 1)?
        .is_some()
    {
        panic!("pool {pool_name} destroyed while period {} is still referenced", current.period - 1);
    }
    store.delete_current_rewards(pool_name)?;
    store.set_whitelisted(pool_name, false)?;
    store.delete_pool(pool_name)?;
    msg!("Pool {} destroyed by {}", pool_name, owner);

    Ok(PoolRefund {
        deposit: pool.deposit_amount,
        rewards,
    })
}

/// Funds the schedule of `amount.mint` with `amount`, released at
/// `amount_yielded_per_block` from `start_block_height`.
#[allow(clippy::too_many_arguments)]
pub fn provide<S, L>(
    store: &mut S,
    ledger: &mut L,
    provider: &Pubkey,
    pool_name: &str,
    amount: Coin,
    amount_yielded_per_block: u64,
    start_block_height: u64,
    height: u64,
) -> Result<()>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let mut pool = load_pool(store, pool_name)?;
    require!(
        start_block_height >= height,
        ErrorCode::InvalidStartHeight
    );
    require!(
        amount.amount > 0 && amount_yielded_per_block > 0,
        ErrorCode::NonPositiveAmount
    );
    let info = pool
        .yielded_info_mut(&amount.mint)
        .ok_or(error!(ErrorCode::InvalidDenom))?;
    require!(info.remaining_amount == 0, ErrorCode::YieldAlreadyProvided);

    ledger.move_to_escrow(provider, pool_name, Escrow::Rewards, &Coins::from_coin(amount))?;
    info.start_block_height_to_yield = start_block_height;
    info.amount_yielded_per_block = amount_yielded_per_block;
    info.remaining_amount = amount.amount;
    store.set_pool(&pool)?;
    msg!(
        "Pool {}: {} provided {} at {} per block from {}",
        pool_name,
        provider,
        amount.amount,
        amount_yielded_per_block,
        start_block_height
    );
    Ok(())
}

/// Locks `amount` into the pool, paying out rewards pending on an existing lock.
pub fn lock<S, L>(
    store: &mut S,
    ledger: &mut L,
    owner: &Pubkey,
    pool_name: &str,
    amount: Coin,
    height: u64,
) -> Result<Coins>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let mut pool = load_pool(store, pool_name)?;
    require_keys_eq!(amount.mint, pool.lock_mint, ErrorCode::InvalidDenom);
    require_gt!(amount.amount, 0, ErrorCode::NonPositiveAmount);
    let locked = store
        .lock_info(pool_name, owner)?
        .map(|lock| lock.amount)
        .unwrap_or(0);
    let total = locked
        .checked_add(amount.amount)
        .ok_or(error!(ErrorCode::MathOverflow))?;
    require!(
        total >= pool.min_lock_amount,
        ErrorCode::BelowMinLockAmount
    );

    ledger.move_to_escrow(owner, pool_name, Escrow::LockedTokens, &Coins::from_coin(amount))?;
    let rewards = update_lock(
        store,
        ledger,
        &mut pool,
        owner,
        LockDelta::Lock(amount.amount),
        height,
    )?;
    store.set_pool(&pool)?;
    Ok(rewards)
}

/// Unlocks `amount`, paying out pending rewards. The rest must stay at zero
/// or at least the pool minimum.
pub fn unlock<S, L>(
    store: &mut S,
    ledger: &mut L,
    owner: &Pubkey,
    pool_name: &str,
    amount: Coin,
    height: u64,
) -> Result<Coins>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let mut pool = load_pool(store, pool_name)?;
    let lock = load_lock_info(store, pool_name, owner)?;
    require_keys_eq!(amount.mint, pool.lock_mint, ErrorCode::InvalidDenom);
    require_gt!(amount.amount, 0, ErrorCode::NonPositiveAmount);
    require!(amount.amount <= lock.amount, ErrorCode::InsufficientLocked);
    let remaining = lock.amount - amount.amount;
    require!(
        remaining == 0 || remaining >= pool.min_lock_amount,
        ErrorCode::BelowMinLockAmount
    );

    let rewards = update_lock(
        store,
        ledger,
        &mut pool,
        owner,
        LockDelta::Unlock(amount.amount),
        height,
    )?;
    ledger.move_from_escrow(
        pool_name,
        Escrow::LockedTokens,
        owner,
        &Coins::from_coin(amount),
    )?;
    store.set_pool(&pool)?;
    Ok(rewards)
}

pub fn claim<S, L>(
    store: &mut S,
    ledger: &mut L,
    owner: &Pubkey,
    pool_name: &str,
    height: u64,
) -> Result<Coins>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    let mut pool = load_pool(store, pool_name)?;
    let rewards = withdraw_rewards(store, ledger, &mut pool, owner, height)?;
    store.set_pool(&pool)?;
    Ok(rewards)
}

/// Credits externally sourced rewards to the open period of a pool.
pub fn credit_rewards<S, L>(
    store: &mut S,
    ledger: &mut L,
    funder: &Pubkey,
    pool_name: &str,
    rewards: &Coins,
) -> Result<()>
where
    S: FarmStore + ?Sized,
    L: TransferLedger + ?Sized,
{
    require!(!rewards.is_zero(), ErrorCode::NonPositiveAmount);
    let mut pool = load_pool(store, pool_name)?;
    let mut current = match store.current_rewards(pool_name)? {
        Some(current) => current,
        None => panic!("current rewards of pool {pool_name} not found"),
    };
    let accumulated = pool.total_accumulated_rewards.checked_add(rewards)?;
    let last_closed = match store.historical_rewards(pool_name, current.period - 1)? {
        Some(last_closed) => last_closed,
        None => panic!(
            "historical rewards of pool {pool_name} period {} not found",
            current.period - 1
        ),
    };
    // the next checkpoint carries every mint the ratio ever held
    let mut denoms: BTreeSet<Pubkey> = last_closed
        .cumulative_reward_ratio
        .iter()
        .map(|dec| dec.mint)
        .collect();
    denoms.extend(accumulated.iter().map(|coin| coin.mint));
    denoms.extend(current.rewards.iter().map(|coin| coin.mint));
    denoms.extend(pool.yielded_token_infos.iter().map(|info| info.mint));
    require!(
        denoms.len() <= MAX_REWARD_DENOMS,
        ErrorCode::TooManyDenoms
    );

    ledger.move_to_escrow(funder, pool_name, Escrow::Rewards, rewards)?;
    current.rewards = current.rewards.checked_add(rewards)?;
    pool.total_accumulated_rewards = accumulated;
    store.set_current_rewards(pool_name, &current)?;
    store.set_pool(&pool)
}

pub fn add_to_whitelist<S, O>(
    store: &mut S,
    oracle: &O,
    params: &FarmParams,
    pool_name: &str,
) -> Result<()>
where
    S: FarmStore + ?Sized,
    O: PricingOracle + ?Sized,
{
    let pool = load_pool(store, pool_name)?;
    check_price_path(oracle, &pool.lock_mint, &params.quote_mint)?;
    if store.is_whitelisted(pool_name)? {
        return Ok(());
    }
    store.set_whitelisted(pool_name, true)
}

pub fn remove_from_whitelist<S: FarmStore + ?Sized>(store: &mut S, pool_name: &str) -> Result<()> {
    store.set_whitelisted(pool_name, false)
}
