mod common;

use anchor_lang::prelude::*;
use common::{assert_error, TestFarm, CREATION_FEE, DEPOSIT};
use luxor_farm::engine::{
    query_earnings, FarmOperation, OperationOutcome, PoolRefund, ReservePair, ReservePairsOracle,
};
use luxor_farm::error::ErrorCode;
use luxor_farm::math::{Coin, Coins};
use luxor_farm::states::{PoolHistoricalRewards, MAX_REWARD_DENOMS};

const POOL: &str = "luxor-lp";

#[test]
fn two_lockers_share_emission_by_locked_amount() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.provide(POOL, 1000, 10, 100, 0);
    farm.fund(&alice, farm.lock_mint, 100);
    farm.fund(&bob, farm.lock_mint, 50);

    assert_eq!(farm.lock(&alice, POOL, 100, 100).unwrap(), 0);
    assert_eq!(farm.lock(&bob, POOL, 50, 110).unwrap(), 0);

    assert_eq!(
        query_earnings(&farm.store, POOL, &alice, 120).unwrap(),
        farm.yield_coins(166)
    );
    assert_eq!(farm.claim(&alice, POOL, 120).unwrap(), 166);
    assert_eq!(farm.claim(&bob, POOL, 120).unwrap(), 33);

    assert_eq!(farm.balance(&alice, &farm.yield_mint), 166);
    assert_eq!(farm.balance(&bob, &farm.yield_mint), 33);
    let pool = farm.pool(POOL);
    // 200 released, 199 paid; truncation dust stays accumulated
    assert_eq!(pool.total_accumulated_rewards, farm.yield_coins(1));
    assert_eq!(pool.yielded_token_infos[0].remaining_amount, 800);
    assert_eq!(farm.reward_escrow(POOL), 801);
    assert_eq!(pool.total_value_locked, 150);
    assert_eq!(pool.locker_count, 2);
}

#[test]
fn claim_pays_released_emission() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.fund(&locker, farm.lock_mint, 10);
    farm.provide(POOL, 10, 1, 10, 5);

    farm.lock(&locker, POOL, 10, 10).unwrap();
    assert_eq!(farm.claim(&locker, POOL, 12).unwrap(), 2);
    assert_eq!(farm.claim(&locker, POOL, 30).unwrap(), 8);
    assert_eq!(farm.claim(&locker, POOL, 40).unwrap(), 0);
    assert_eq!(farm.balance(&locker, &farm.yield_mint), 10);
    assert_eq!(farm.reward_escrow(POOL), 0);
}

#[test]
fn claim_twice_at_same_height_pays_nothing_more() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.provide(POOL, 100, 5, 0, 0);
    farm.fund(&locker, farm.lock_mint, 5);
    farm.lock(&locker, POOL, 5, 0).unwrap();

    let first = farm.claim(&locker, POOL, 4).unwrap();
    assert_eq!(first, 20);
    let lock = farm.lock_info(POOL, &locker).unwrap();
    assert_eq!(farm.claim(&locker, POOL, 4).unwrap(), 0);
    assert_eq!(farm.lock_info(POOL, &locker).unwrap().amount, lock.amount);
    assert_eq!(farm.balance(&locker, &farm.yield_mint), first);
}

#[test]
fn relock_after_full_unlock_starts_fresh() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.provide(POOL, 1000, 10, 100, 0);
    farm.fund(&locker, farm.lock_mint, 100);

    farm.lock(&locker, POOL, 100, 100).unwrap();
    assert_eq!(farm.unlock(&locker, POOL, 100, 105).unwrap(), 50);
    assert!(farm.lock_info(POOL, &locker).is_none());
    assert_eq!(farm.pool(POOL).locker_count, 0);
    assert_eq!(farm.balance(&locker, &farm.lock_mint), 100);

    farm.lock(&locker, POOL, 100, 107).unwrap();
    let lock = farm.lock_info(POOL, &locker).unwrap();
    assert_eq!(lock.reference_period, 3);
    assert_eq!(lock.start_block_height, 107);
    assert_eq!(farm.pool(POOL).locker_count, 1);

    // emission while nothing was locked is not claimable
    assert_eq!(farm.claim(&locker, POOL, 110).unwrap(), 30);
    assert_eq!(
        farm.pool(POOL).total_accumulated_rewards,
        farm.yield_coins(20)
    );
}

#[test]
fn partial_unlock_keeps_earning_on_the_rest() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 10, 0);
    farm.provide(POOL, 1000, 10, 0, 0);
    farm.fund(&locker, farm.lock_mint, 40);

    farm.lock(&locker, POOL, 40, 0).unwrap();
    assert_eq!(farm.unlock(&locker, POOL, 30, 2).unwrap(), 20);
    assert_eq!(farm.lock_info(POOL, &locker).unwrap().amount, 10);
    assert_eq!(farm.pool(POOL).total_value_locked, 10);
    assert_eq!(farm.claim(&locker, POOL, 3).unwrap(), 10);
}

#[test]
fn earnings_query_matches_claim_and_writes_nothing() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.provide(POOL, 500, 3, 0, 0);
    farm.fund(&alice, farm.lock_mint, 30);
    farm.fund(&bob, farm.lock_mint, 70);
    farm.lock(&alice, POOL, 30, 1).unwrap();
    farm.lock(&bob, POOL, 70, 4).unwrap();

    let before = farm.store.clone();
    let expected = query_earnings(&farm.store, POOL, &alice, 19).unwrap();
    assert_eq!(farm.store, before);
    assert_eq!(farm.claim(&alice, POOL, 19).unwrap(), expected.amount_of(&farm.yield_mint));

    assert_error(
        query_earnings(&farm.store, POOL, &owner, 19),
        ErrorCode::LockNotFound,
    );
}

#[test]
fn credited_rewards_are_shared_in_the_open_period() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let admin = Pubkey::new_unique();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    let bonus_mint = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.fund(&alice, farm.lock_mint, 25);
    farm.fund(&bob, farm.lock_mint, 75);
    farm.fund(&admin, bonus_mint, 1_000);
    farm.lock(&alice, POOL, 25, 1).unwrap();
    farm.lock(&bob, POOL, 75, 1).unwrap();

    farm.run(
        FarmOperation::CreditRewards {
            funder: admin,
            pool_name: POOL.to_string(),
            rewards: luxor_farm::math::Coins::from_coin(Coin::new(bonus_mint, 400)),
        },
        5,
    )
    .unwrap();
    assert_eq!(
        farm.pool(POOL).total_accumulated_rewards.amount_of(&bonus_mint),
        400
    );

    let outcome = farm
        .run(
            FarmOperation::Claim {
                owner: bob,
                pool_name: POOL.to_string(),
            },
            6,
        )
        .unwrap();
    match outcome {
        OperationOutcome::Rewards(rewards) => assert_eq!(rewards.amount_of(&bonus_mint), 300),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(farm.balance(&bob, &bonus_mint), 300);

    let empty = farm.run(
        FarmOperation::CreditRewards {
            funder: admin,
            pool_name: POOL.to_string(),
            rewards: luxor_farm::math::Coins::empty(),
        },
        7,
    );
    assert_error(empty, ErrorCode::NonPositiveAmount);
}

#[test]
fn create_pool_burns_fee_and_escrows_deposit() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 5, 3);

    assert_eq!(farm.balance(&owner, &farm.fee_mint), 0);
    assert_eq!(farm.ledger.burned(&farm.fee_mint), CREATION_FEE);
    let pool = farm.pool(POOL);
    assert_eq!(pool.owner, owner);
    assert_eq!(pool.deposit_amount, Coin::new(farm.fee_mint, DEPOSIT));
    assert_eq!(pool.min_lock_amount, 5);
    assert_eq!(pool.yielded_token_infos.len(), 1);
    assert_eq!(pool.yielded_token_infos[0].mint, farm.yield_mint);
    let records: Vec<_> = farm.store.historical_records(POOL).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, 0);
    assert_eq!(records[0].1.reference_count, 1);
}

#[test]
fn create_pool_rejections() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let create = |farm: &TestFarm, name: &str, lock_mint: Pubkey| FarmOperation::CreatePool {
        owner,
        pool_name: name.to_string(),
        lock_mint,
        min_lock_amount: 0,
        yield_mint: farm.yield_mint,
    };

    farm.fund(&owner, farm.fee_mint, CREATION_FEE + DEPOSIT - 1);
    let op = create(&farm, POOL, farm.lock_mint);
    assert_error(farm.run(op, 0), ErrorCode::InsufficientDepositCoins);
    let op = create(&farm, "bad name!", farm.lock_mint);
    assert_error(farm.run(op, 0), ErrorCode::InvalidPoolName);
    let op = create(&farm, POOL, Pubkey::new_unique());
    assert_error(farm.run(op, 0), ErrorCode::TokenNotFound);

    farm.fund(&owner, farm.fee_mint, 1);
    let op = create(&farm, POOL, farm.lock_mint);
    farm.run(op, 0).unwrap();
    let op = create(&farm, POOL, farm.lock_mint);
    assert_error(farm.run(op, 0), ErrorCode::PoolAlreadyExists);

    let op = create(&farm, "second", farm.lock_mint);
    assert_error(farm.run(op, 0), ErrorCode::InsufficientFeeCoins);
}

#[test]
fn provide_rejections() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let provider = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.fund(&provider, farm.yield_mint, 100);
    let provide = |farm: &TestFarm, mint: Pubkey, amount: u64, start: u64| FarmOperation::Provide {
        provider,
        pool_name: POOL.to_string(),
        amount: Coin::new(mint, amount),
        amount_yielded_per_block: 1,
        start_block_height: start,
    };

    let op = provide(&farm, farm.yield_mint, 10, 4);
    assert_error(farm.run(op, 5), ErrorCode::InvalidStartHeight);
    let op = provide(&farm, farm.yield_mint, 0, 5);
    assert_error(farm.run(op, 5), ErrorCode::NonPositiveAmount);
    let op = provide(&farm, farm.lock_mint, 10, 5);
    assert_error(farm.run(op, 5), ErrorCode::InvalidDenom);
    let op = provide(&farm, farm.yield_mint, 1_000, 5);
    assert_error(farm.run(op, 5), ErrorCode::InsufficientFunds);

    let op = provide(&farm, farm.yield_mint, 10, 5);
    farm.run(op, 5).unwrap();
    let op = provide(&farm, farm.yield_mint, 10, 6);
    assert_error(farm.run(op, 5), ErrorCode::YieldAlreadyProvided);

    let op = FarmOperation::Provide {
        provider,
        pool_name: "missing".to_string(),
        amount: Coin::new(farm.yield_mint, 1),
        amount_yielded_per_block: 1,
        start_block_height: 5,
    };
    assert_error(farm.run(op, 5), ErrorCode::PoolNotFound);
}

#[test]
fn lock_and_unlock_rejections() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 10, 0);
    farm.fund(&locker, farm.lock_mint, 100);

    assert_error(farm.lock(&locker, POOL, 0, 1), ErrorCode::NonPositiveAmount);
    assert_error(farm.lock(&locker, POOL, 9, 1), ErrorCode::BelowMinLockAmount);
    assert_error(farm.lock(&locker, POOL, 101, 1), ErrorCode::InsufficientFunds);
    let wrong_mint = FarmOperation::Lock {
        owner: locker,
        pool_name: POOL.to_string(),
        amount: Coin::new(farm.yield_mint, 10),
    };
    assert_error(farm.run(wrong_mint, 1), ErrorCode::InvalidDenom);

    assert_error(farm.unlock(&locker, POOL, 1, 1), ErrorCode::LockNotFound);
    assert_error(farm.claim(&locker, POOL, 1), ErrorCode::LockNotFound);

    farm.lock(&locker, POOL, 20, 1).unwrap();
    // a top-up below the minimum is fine once the total clears it
    farm.lock(&locker, POOL, 1, 2).unwrap();
    assert_error(farm.unlock(&locker, POOL, 22, 3), ErrorCode::InsufficientLocked);
    assert_error(farm.unlock(&locker, POOL, 12, 3), ErrorCode::BelowMinLockAmount);
    assert_error(farm.unlock(&locker, POOL, 0, 3), ErrorCode::NonPositiveAmount);
    farm.unlock(&locker, POOL, 21, 3).unwrap();
    assert_eq!(farm.balance(&locker, &farm.lock_mint), 100);
}

#[test]
fn destroy_refunds_deposit_and_unclaimed_emission() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.provide(POOL, 100, 10, 5, 0);

    let outcome = farm
        .run(
            FarmOperation::DestroyPool {
                owner,
                pool_name: POOL.to_string(),
            },
            20,
        )
        .unwrap();
    assert_eq!(
        outcome,
        OperationOutcome::Refund(PoolRefund {
            deposit: Coin::new(farm.fee_mint, DEPOSIT),
            rewards: farm.yield_coins(100),
        })
    );
    assert_eq!(farm.balance(&owner, &farm.fee_mint), DEPOSIT);
    assert_eq!(farm.balance(&owner, &farm.yield_mint), 100);
    assert_eq!(farm.reward_escrow(POOL), 0);
    assert_eq!(farm.store.pools().count(), 0);
    assert_eq!(farm.store.historical_records(POOL).count(), 0);
}

#[test]
fn destroy_after_lockers_leave_clears_every_record() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.provide(POOL, 100, 10, 10, 0);
    farm.fund(&locker, farm.lock_mint, 50);
    farm.lock(&locker, POOL, 50, 10).unwrap();
    assert_eq!(farm.claim(&locker, POOL, 15).unwrap(), 50);

    let destroy = |height| {
        (
            FarmOperation::DestroyPool {
                owner,
                pool_name: POOL.to_string(),
            },
            height,
        )
    };
    let (op, height) = destroy(16);
    assert_error(farm.run(op, height), ErrorCode::PoolNotFinished);
    let not_owner = FarmOperation::DestroyPool {
        owner: locker,
        pool_name: POOL.to_string(),
    };
    assert_error(farm.run(not_owner, 16), ErrorCode::NotPoolOwner);

    assert_eq!(farm.unlock(&locker, POOL, 50, 30).unwrap(), 50);
    let (op, height) = destroy(40);
    farm.run(op, height).unwrap();
    assert_eq!(farm.balance(&owner, &farm.yield_mint), 0);
    assert_eq!(farm.store.historical_records(POOL).count(), 0);
    assert_error(
        farm.claim(&locker, POOL, 41),
        ErrorCode::PoolNotFound,
    );
}

#[test]
fn whitelist_requires_a_price_path() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    let add = || FarmOperation::AddToWhitelist {
        pool_name: POOL.to_string(),
    };

    assert_error(farm.run(add(), 1), ErrorCode::NoPricePath);
    farm.oracle = ReservePairsOracle::new(vec![ReservePair {
        mint_0: farm.lock_mint,
        reserve_0: 1_000,
        mint_1: farm.params.quote_mint,
        reserve_1: 2_000,
        lp_mint: None,
    }]);
    farm.run(add(), 1).unwrap();
    farm.run(add(), 2).unwrap();
    assert_eq!(farm.store.whitelist().collect::<Vec<_>>(), vec![POOL]);

    farm.run(
        FarmOperation::RemoveFromWhitelist {
            pool_name: POOL.to_string(),
        },
        3,
    )
    .unwrap();
    assert_eq!(farm.store.whitelist().count(), 0);

    let missing = FarmOperation::AddToWhitelist {
        pool_name: "missing".to_string(),
    };
    assert_error(farm.run(missing, 4), ErrorCode::PoolNotFound);
}

#[test]
fn paid_out_reward_mints_still_count_toward_the_denom_limit() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let admin = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.fund(&locker, farm.lock_mint, 1);
    farm.lock(&locker, POOL, 1, 1).unwrap();

    let credit = |farm: &mut TestFarm, mint: Pubkey, height| {
        farm.fund(&admin, mint, 1);
        farm.run(
            FarmOperation::CreditRewards {
                funder: admin,
                pool_name: POOL.to_string(),
                rewards: Coins::from_coin(Coin::new(mint, 1)),
            },
            height,
        )
    };

    // the yield schedule takes one slot, each credited mint another
    let mut height = 2;
    for _ in 1..MAX_REWARD_DENOMS {
        credit(&mut farm, Pubkey::new_unique(), height).unwrap();
        farm.claim(&locker, POOL, height + 1).unwrap();
        assert!(farm.pool(POOL).total_accumulated_rewards.is_zero());
        height += 2;
    }
    assert_error(
        credit(&mut farm, Pubkey::new_unique(), height),
        ErrorCode::TooManyDenoms,
    );

    // every checkpoint still fits its account
    farm.claim(&locker, POOL, height + 1).unwrap();
    for (period, record) in farm.store.historical_records(POOL) {
        let mut data = Vec::new();
        record.try_serialize(&mut data).unwrap();
        assert!(
            data.len() <= PoolHistoricalRewards::LEN,
            "period {period} takes {} bytes",
            data.len()
        );
    }
}

#[test]
fn destroyed_pool_name_can_be_reused() {
    let mut farm = TestFarm::new();
    let owner = Pubkey::new_unique();
    let locker = Pubkey::new_unique();
    farm.create_pool(&owner, POOL, 0, 0);
    farm.fund(&locker, farm.lock_mint, 10);
    farm.lock(&locker, POOL, 10, 1).unwrap();
    farm.unlock(&locker, POOL, 10, 2).unwrap();
    farm.run(
        FarmOperation::DestroyPool {
            owner,
            pool_name: POOL.to_string(),
        },
        3,
    )
    .unwrap();

    let next_owner = Pubkey::new_unique();
    farm.create_pool(&next_owner, POOL, 0, 4);
    let pool = farm.pool(POOL);
    assert_eq!(pool.owner, next_owner);
    assert_eq!(pool.total_value_locked, 0);
    assert!(farm.lock_info(POOL, &locker).is_none());

    farm.provide(POOL, 100, 10, 5, 4);
    farm.lock(&locker, POOL, 10, 5).unwrap();
    assert_eq!(farm.claim(&locker, POOL, 8).unwrap(), 30);
}
