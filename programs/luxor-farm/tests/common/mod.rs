#![allow(dead_code)]

use anchor_lang::prelude::*;
use luxor_farm::engine::{
    apply, query_lock_info, query_pool, Escrow, FarmEnv, FarmOperation, FarmParams,
    KnownMints, MemoryLedger, MemoryStore, OperationOutcome, ReservePairsOracle,
};
use luxor_farm::error::ErrorCode;
use luxor_farm::math::{Coin, Coins};
use luxor_farm::states::{FarmPool, LockInfo};

pub const CREATION_FEE: u64 = 10;
pub const DEPOSIT: u64 = 20;

/// One farm with its collaborators, driven through `apply`.
pub struct TestFarm {
    pub store: MemoryStore,
    pub ledger: MemoryLedger,
    pub registry: KnownMints,
    pub oracle: ReservePairsOracle,
    pub params: FarmParams,
    pub lock_mint: Pubkey,
    pub yield_mint: Pubkey,
    pub fee_mint: Pubkey,
}

impl TestFarm {
    pub fn new() -> Self {
        let lock_mint = Pubkey::new_unique();
        let yield_mint = Pubkey::new_unique();
        let fee_mint = Pubkey::new_unique();
        Self {
            store: MemoryStore::new(),
            ledger: MemoryLedger::new(),
            registry: KnownMints::new([lock_mint, yield_mint, fee_mint]),
            oracle: ReservePairsOracle::default(),
            params: FarmParams {
                quote_mint: Pubkey::new_unique(),
                creation_fee: Coin::new(fee_mint, CREATION_FEE),
                deposit: Coin::new(fee_mint, DEPOSIT),
            },
            lock_mint,
            yield_mint,
            fee_mint,
        }
    }

    pub fn run(&mut self, operation: FarmOperation, height: u64) -> Result<OperationOutcome> {
        let env = FarmEnv {
            registry: &self.registry,
            oracle: &self.oracle,
            params: self.params,
        };
        apply(&mut self.store, &mut self.ledger, &env, operation, height)
    }

    pub fn fund(&mut self, owner: &Pubkey, mint: Pubkey, amount: u64) {
        self.ledger.mint_to(owner, Coin::new(mint, amount));
    }

    /// Funds `owner` with the fee and deposit, then creates `pool_name`.
    pub fn create_pool(&mut self, owner: &Pubkey, pool_name: &str, min_lock_amount: u64, height: u64) {
        self.fund(owner, self.fee_mint, CREATION_FEE + DEPOSIT);
        self.run(
            FarmOperation::CreatePool {
                owner: *owner,
                pool_name: pool_name.to_string(),
                lock_mint: self.lock_mint,
                min_lock_amount,
                yield_mint: self.yield_mint,
            },
            height,
        )
        .unwrap();
    }

    pub fn provide(&mut self, pool_name: &str, amount: u64, rate: u64, start: u64, height: u64) {
        let provider = Pubkey::new_unique();
        self.fund(&provider, self.yield_mint, amount);
        self.run(
            FarmOperation::Provide {
                provider,
                pool_name: pool_name.to_string(),
                amount: Coin::new(self.yield_mint, amount),
                amount_yielded_per_block: rate,
                start_block_height: start,
            },
            height,
        )
        .unwrap();
    }

    pub fn lock(&mut self, owner: &Pubkey, pool_name: &str, amount: u64, height: u64) -> Result<u64> {
        let operation = FarmOperation::Lock {
            owner: *owner,
            pool_name: pool_name.to_string(),
            amount: Coin::new(self.lock_mint, amount),
        };
        self.run(operation, height).map(|outcome| self.paid(outcome))
    }

    pub fn unlock(&mut self, owner: &Pubkey, pool_name: &str, amount: u64, height: u64) -> Result<u64> {
        let operation = FarmOperation::Unlock {
            owner: *owner,
            pool_name: pool_name.to_string(),
            amount: Coin::new(self.lock_mint, amount),
        };
        self.run(operation, height).map(|outcome| self.paid(outcome))
    }

    pub fn claim(&mut self, owner: &Pubkey, pool_name: &str, height: u64) -> Result<u64> {
        let operation = FarmOperation::Claim {
            owner: *owner,
            pool_name: pool_name.to_string(),
        };
        self.run(operation, height).map(|outcome| self.paid(outcome))
    }

    fn paid(&self, outcome: OperationOutcome) -> u64 {
        match outcome {
            OperationOutcome::Rewards(rewards) => rewards.amount_of(&self.yield_mint),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    pub fn pool(&self, pool_name: &str) -> FarmPool {
        query_pool(&self.store, pool_name).unwrap()
    }

    pub fn lock_info(&self, pool_name: &str, owner: &Pubkey) -> Option<LockInfo> {
        query_lock_info(&self.store, pool_name, owner).ok()
    }

    pub fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        use luxor_farm::engine::TransferLedger;
        self.ledger.balance(owner, mint).unwrap()
    }

    pub fn reward_escrow(&self, pool_name: &str) -> u64 {
        self.ledger
            .escrow_balance(pool_name, Escrow::Rewards, &self.yield_mint)
    }

    pub fn yield_coins(&self, amount: u64) -> Coins {
        Coins::from_coin(Coin::new(self.yield_mint, amount))
    }
}

pub fn assert_error<T: std::fmt::Debug>(result: Result<T>, code: ErrorCode) {
    assert_eq!(result.unwrap_err(), anchor_lang::error::Error::from(code));
}
