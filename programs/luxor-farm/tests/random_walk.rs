mod common;

use anchor_lang::prelude::*;
use common::TestFarm;
use luxor_farm::engine::{FarmOperation, FarmStore, MAX_REFERENCE_COUNT};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const POOL: &str = "walk";
const BUDGET: u64 = 50_000;

#[derive(Clone, Copy, Debug)]
enum Step {
    Lock(usize, u64),
    Unlock(usize, u64),
    Claim(usize),
    Credit(u64),
}

struct Walk {
    farm: TestFarm,
    owners: Vec<Pubkey>,
    funder: Pubkey,
    credited: u64,
    height: u64,
}

impl Walk {
    fn new(owner_count: usize, rate: u64) -> Self {
        let mut farm = TestFarm::new();
        let creator = Pubkey::new_unique();
        farm.create_pool(&creator, POOL, 0, 0);
        farm.provide(POOL, BUDGET, rate, 3, 0);
        let owners: Vec<Pubkey> = (0..owner_count).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            farm.fund(owner, farm.lock_mint, 1_000);
        }
        let funder = Pubkey::new_unique();
        farm.fund(&funder, farm.yield_mint, BUDGET);
        Self {
            farm,
            owners,
            funder,
            credited: 0,
            height: 0,
        }
    }

    fn step(&mut self, step: Step, advance: u64) {
        self.height += advance;
        let height = self.height;
        // rejected steps roll back, which the invariants below also cover
        let _ = match step {
            Step::Lock(i, amount) => self.farm.lock(&self.owners[i], POOL, amount, height),
            Step::Unlock(i, amount) => self.farm.unlock(&self.owners[i], POOL, amount, height),
            Step::Claim(i) => self.farm.claim(&self.owners[i], POOL, height),
            Step::Credit(amount) => {
                let rewards = self.farm.yield_coins(amount);
                let result = self.farm.run(
                    FarmOperation::CreditRewards {
                        funder: self.funder,
                        pool_name: POOL.to_string(),
                        rewards,
                    },
                    height,
                );
                if result.is_ok() {
                    self.credited += amount;
                }
                result.map(|_| 0)
            }
        };
        self.check();
    }

    fn check(&self) {
        let farm = &self.farm;
        let pool = farm.pool(POOL);
        let locks: Vec<_> = farm.store.lock_infos(POOL).collect();

        let locked: u64 = locks.iter().map(|lock| lock.amount).sum();
        assert_eq!(pool.total_value_locked, locked);
        assert_eq!(pool.locker_count as usize, locks.len());
        assert!(locks.iter().all(|lock| lock.amount > 0));

        // every checkpoint is held by exactly its referrers: the locks
        // settled against it, plus the open period if it is the last closed one
        let current = farm.store.current_rewards(POOL).unwrap().unwrap();
        let mut referrers: BTreeMap<u64, u16> = BTreeMap::new();
        *referrers.entry(current.period - 1).or_default() += 1;
        for lock in &locks {
            *referrers.entry(lock.reference_period).or_default() += 1;
        }
        let records: BTreeMap<u64, u16> = farm
            .store
            .historical_records(POOL)
            .map(|(period, record)| (period, record.reference_count))
            .collect();
        assert_eq!(records, referrers);
        assert!(records
            .values()
            .all(|count| (1..=MAX_REFERENCE_COUNT).contains(count)));

        // escrow = provided + credited - paid = accumulated + unreleased
        let remaining = pool.yielded_token_infos[0].remaining_amount;
        let accumulated = pool.total_accumulated_rewards.amount_of(&farm.yield_mint);
        assert_eq!(farm.reward_escrow(POOL), accumulated + remaining);

        let paid: u64 = self
            .owners
            .iter()
            .map(|owner| farm.balance(owner, &farm.yield_mint))
            .sum();
        let released = BUDGET - remaining;
        assert!(paid <= released + self.credited);
        assert_eq!(
            farm.ledger.total_supply(&farm.yield_mint),
            2 * BUDGET as u128
        );
    }
}

fn step_strategy(owners: usize) -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0..owners, 1..300u64).prop_map(|(i, a)| Step::Lock(i, a)),
        3 => (0..owners, 1..300u64).prop_map(|(i, a)| Step::Unlock(i, a)),
        3 => (0..owners).prop_map(Step::Claim),
        1 => (1..500u64).prop_map(Step::Credit),
    ]
}

proptest! {
    #[test]
    fn random_operations_keep_ledger_consistent(
        rate in 1..200u64,
        steps in prop::collection::vec((step_strategy(3), 0..6u64), 1..60),
    ) {
        let mut walk = Walk::new(3, rate);
        for (step, advance) in steps {
            walk.step(step, advance);
        }
    }
}

#[test]
fn seeded_walk_drains_the_schedule() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut walk = Walk::new(5, 40);
    for _ in 0..2_000 {
        let owner = rng.random_range(0..5);
        let step = match rng.random_range(0..10) {
            0..=3 => Step::Lock(owner, rng.random_range(1..200)),
            4..=6 => Step::Unlock(owner, rng.random_range(1..200)),
            7 | 8 => Step::Claim(owner),
            _ => Step::Credit(rng.random_range(1..50)),
        };
        walk.step(step, rng.random_range(0..3));
    }

    // a late lock far past the end of the schedule releases what is left
    let late = Pubkey::new_unique();
    walk.farm.fund(&late, walk.farm.lock_mint, 1);
    walk.height += 1_000;
    walk.farm.lock(&late, POOL, 1, walk.height).unwrap();
    walk.check();
    let owners = walk.owners.len();
    for i in 0..owners {
        walk.step(Step::Claim(i), 0);
    }
    let pool = walk.farm.pool(POOL);
    assert_eq!(pool.yielded_token_infos[0].remaining_amount, 0);
}
